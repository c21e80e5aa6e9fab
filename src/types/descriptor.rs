//! Semantic type descriptors for parameters, properties and return types.

use std::fmt;
use std::sync::Arc;

use crate::error::{DaoError, Result};

use super::value::PrimitiveType;

/// Semantic type of a declared parameter, a bean property or a return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Scalar type.
    Primitive(PrimitiveType),
    /// Bean (struct) type with named properties.
    Bean(Arc<BeanType>),
    /// Ordered sequence of elements.
    List(Box<TypeDescriptor>),
    /// Collection of unique elements.
    Set(Box<TypeDescriptor>),
    /// Plain array of elements.
    Array(Box<TypeDescriptor>),
    /// Key/value mapping.
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// Unresolved generic type variable.
    Variable(String),
}

impl TypeDescriptor {
    /// 32-bit signed integer.
    pub const INT32: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Int32);
    /// 64-bit signed integer.
    pub const INT64: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Int64);
    /// UTF-8 string.
    pub const STRING: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::String);

    /// Creates a bean type descriptor.
    #[must_use]
    pub fn bean(bean: BeanType) -> Self {
        TypeDescriptor::Bean(Arc::new(bean))
    }

    /// Creates a list type descriptor.
    #[must_use]
    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    /// Creates a set type descriptor.
    #[must_use]
    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(element))
    }

    /// Creates an array type descriptor.
    #[must_use]
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    /// Creates a map type descriptor.
    #[must_use]
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(key), Box::new(value))
    }

    /// Returns the element type of a list, set or array.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::List(element)
            | TypeDescriptor::Set(element)
            | TypeDescriptor::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Returns whether values of this type are iterable collections.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.element_type().is_some()
    }

    /// Resolves the type of a named property on this type.
    ///
    /// # Errors
    ///
    /// Returns `IncorrectType` if this type cannot carry properties, or the
    /// property is missing or not readable.
    pub fn property_type(&self, name: &str) -> Result<&TypeDescriptor> {
        let TypeDescriptor::Bean(bean) = self else {
            return Err(DaoError::IncorrectType(format!(
                "type {self} cannot carry property '{name}'"
            )));
        };
        let property = bean.property(name).ok_or_else(|| {
            DaoError::IncorrectType(format!(
                "type {} has no property '{name}'",
                bean.name
            ))
        })?;
        if !property.readable {
            return Err(DaoError::IncorrectType(format!(
                "property '{name}' of type {} is not readable",
                bean.name
            )));
        }
        Ok(&property.ty)
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(primitive: PrimitiveType) -> Self {
        TypeDescriptor::Primitive(primitive)
    }
}

impl From<BeanType> for TypeDescriptor {
    fn from(bean: BeanType) -> Self {
        TypeDescriptor::bean(bean)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(primitive) => write!(f, "{primitive}"),
            TypeDescriptor::Bean(bean) => f.write_str(&bean.name),
            TypeDescriptor::List(element) => write!(f, "List<{element}>"),
            TypeDescriptor::Set(element) => write!(f, "Set<{element}>"),
            TypeDescriptor::Array(element) => write!(f, "[{element}]"),
            TypeDescriptor::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeDescriptor::Variable(name) => f.write_str(name),
        }
    }
}

/// A named struct type and its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanType {
    /// Type name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDescriptor>,
}

impl BeanType {
    /// Creates a bean type with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        BeanType {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Adds a readable property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, ty: impl Into<TypeDescriptor>) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            ty: ty.into(),
            readable: true,
        });
        self
    }

    /// Adds a property that cannot be read (write-only).
    #[must_use]
    pub fn with_write_only_property(
        mut self,
        name: impl Into<String>,
        ty: impl Into<TypeDescriptor>,
    ) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            ty: ty.into(),
            readable: false,
        });
        self
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A bean property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Property type.
    pub ty: TypeDescriptor,
    /// Whether the property has a getter.
    pub readable: bool,
}
