//! Template parser: SQL template text to [`ast::RootNode`].

pub mod ast;
mod grammar;

pub use grammar::parse_template;
