//! Type descriptors and call-time values.

mod descriptor;
mod value;

pub use descriptor::{BeanType, PropertyDescriptor, TypeDescriptor};
pub use value::{BeanValue, PrimitiveType, Value};
