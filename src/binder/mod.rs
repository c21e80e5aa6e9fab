//! Binder module for static checking.
//!
//! The binder resolves every parameter reference of a parsed template
//! against the declaring method's signature:
//! - Positional indices against the declared parameter list
//! - Dotted property paths against bean types
//! - `in (...)` references against collection types
//!
//! The output is a checked template ready for operator construction.

mod checker;
mod context;

pub use checker::{CheckedTemplate, TypeChecker};
pub use context::TypeContext;
