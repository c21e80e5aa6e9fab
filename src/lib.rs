//! daobind - compile-time binder for SQL templates on data-access methods.
//!
//! A method declaration pairs a SQL template with a signature. Binding
//! parses the template, checks every parameter reference against the
//! declared parameter types, classifies the statement and compiles an
//! immutable [`Operator`]. All of that happens once per method; rendering a
//! call afterwards does no parsing and no type inspection.
//!
//! ```
//! use daobind::types::{BeanType, BeanValue, PrimitiveType, TypeDescriptor, Value};
//! use daobind::{bind, MethodDescriptor, Operator};
//!
//! let user = TypeDescriptor::bean(
//!     BeanType::new("User")
//!         .with_property("id", PrimitiveType::Int32)
//!         .with_property("name", PrimitiveType::String),
//! );
//! let method = MethodDescriptor::new(
//!     "rename",
//!     "UPDATE user SET name = :1.name WHERE id = :1.id",
//!     TypeDescriptor::INT32,
//! )
//! .with_parameter(user);
//!
//! let Operator::Update(update) = bind(&method).unwrap() else { unreachable!() };
//! let arg = Value::Bean(BeanValue::new("User").with("id", 1).with("name", "ash"));
//! let bound = update.render(&[arg]).unwrap();
//! assert_eq!(bound.sql, "UPDATE user SET name = ? WHERE id = ?");
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod method;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod types;

pub use config::{BinderConfig, PlaceholderStyle};
pub use error::{DaoError, Result};
pub use method::{DaoDescriptor, MethodDescriptor, ParameterDescriptor, ParameterMarker};
pub use operator::{Operator, OperatorFactory, Rendered, StatementKind};
pub use registry::OperatorRegistry;

/// Builds the operator for one method with the default configuration.
///
/// # Errors
///
/// Returns the construction error for a malformed declaration.
pub fn bind(method: &MethodDescriptor) -> Result<Operator> {
    OperatorFactory::default().build(method)
}
