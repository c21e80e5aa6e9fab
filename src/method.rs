//! Method declaration descriptors.
//!
//! A front-end (derive macro, registration code, config loader) fills these
//! in from whatever declaration mechanism it uses; the binder only reads
//! them.

use std::sync::Arc;

use crate::types::TypeDescriptor;

/// Declaring type (DAO) of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoDescriptor {
    /// Type name.
    pub name: String,
    /// Type-level caching opt-in.
    pub cache: Option<DaoCache>,
}

impl DaoDescriptor {
    /// Creates a declaring type that does not use caching.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        DaoDescriptor {
            name: name.into(),
            cache: None,
        }
    }

    /// Opts the type into caching with the given key prefix.
    #[must_use]
    pub fn with_cache(mut self, prefix: impl Into<String>) -> Self {
        self.cache = Some(DaoCache {
            prefix: prefix.into(),
        });
        self
    }
}

/// Type-level caching declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoCache {
    /// Prefix prepended to every cache key.
    pub prefix: String,
}

/// Marker attached to a declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterMarker {
    /// The parameter (or the named property of it) is the cache key.
    /// An empty property name means the parameter value itself.
    CacheBy(String),
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub ty: TypeDescriptor,
    pub markers: Vec<ParameterMarker>,
}

impl ParameterDescriptor {
    /// Creates an unmarked parameter.
    #[must_use]
    pub fn new(ty: impl Into<TypeDescriptor>) -> Self {
        ParameterDescriptor {
            ty: ty.into(),
            markers: Vec::new(),
        }
    }

    /// Attaches a marker.
    #[must_use]
    pub fn with_marker(mut self, marker: ParameterMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// Everything the binder needs to know about one data-access method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Raw SQL template.
    pub template: String,
    /// Declared parameters, in order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Declared return type.
    pub return_type: TypeDescriptor,
    /// Whether the method asks for the generated id of an insert.
    pub return_generated_id: bool,
    /// Method-level caching opt-out.
    pub cache_ignored: bool,
    /// Declaring type.
    pub declaring: Arc<DaoDescriptor>,
}

impl MethodDescriptor {
    /// Creates a method with no parameters on an anonymous, non-caching type.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        return_type: impl Into<TypeDescriptor>,
    ) -> Self {
        MethodDescriptor {
            name: name.into(),
            template: template.into(),
            parameters: Vec::new(),
            return_type: return_type.into(),
            return_generated_id: false,
            cache_ignored: false,
            declaring: Arc::new(DaoDescriptor::new("")),
        }
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn declared_by(mut self, dao: Arc<DaoDescriptor>) -> Self {
        self.declaring = dao;
        self
    }

    /// Appends an unmarked parameter.
    #[must_use]
    pub fn with_parameter(self, ty: impl Into<TypeDescriptor>) -> Self {
        self.with_parameter_descriptor(ParameterDescriptor::new(ty))
    }

    /// Appends a parameter marked as the cache key.
    #[must_use]
    pub fn with_cache_key_parameter(
        self,
        ty: impl Into<TypeDescriptor>,
        property: impl Into<String>,
    ) -> Self {
        self.with_parameter_descriptor(
            ParameterDescriptor::new(ty).with_marker(ParameterMarker::CacheBy(property.into())),
        )
    }

    /// Appends a fully described parameter.
    #[must_use]
    pub fn with_parameter_descriptor(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Requests the generated id of an insert.
    #[must_use]
    pub fn returning_generated_id(mut self) -> Self {
        self.return_generated_id = true;
        self
    }

    /// Opts this method out of type-level caching.
    #[must_use]
    pub fn ignoring_cache(mut self) -> Self {
        self.cache_ignored = true;
        self
    }

    /// Returns `Dao.method`, the registry key of this method.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.declaring.name.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.declaring.name, self.name)
        }
    }

    /// Returns the declared parameter types, in order.
    #[must_use]
    pub fn parameter_types(&self) -> Vec<TypeDescriptor> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let dao = Arc::new(DaoDescriptor::new("UserDao"));
        let method = MethodDescriptor::new("getUser", "SELECT 1", TypeDescriptor::INT32);
        assert_eq!(method.qualified_name(), "getUser");
        assert_eq!(method.declared_by(dao).qualified_name(), "UserDao.getUser");
    }

    #[test]
    fn test_builder_collects_markers() {
        let method = MethodDescriptor::new("get", "SELECT 1", TypeDescriptor::INT32)
            .with_parameter(TypeDescriptor::STRING)
            .with_cache_key_parameter(TypeDescriptor::INT32, "");
        assert_eq!(method.parameters.len(), 2);
        assert!(method.parameters[0].markers.is_empty());
        assert_eq!(
            method.parameters[1].markers,
            vec![ParameterMarker::CacheBy(String::new())]
        );
    }
}
