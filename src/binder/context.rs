//! Type context: parameter addresses to semantic types.

use std::collections::HashMap;

use crate::error::{DaoError, Result};
use crate::types::TypeDescriptor;

/// Per-method mapping from 1-based parameter index to its semantic type.
///
/// Keys are strings so bare indices (`2`) and property paths (`2.name`)
/// resolve through the same lookup. Read-only after construction.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Parameter index (as string) -> declared type.
    types: HashMap<String, TypeDescriptor>,
}

impl TypeContext {
    /// Creates a context with one entry per declared parameter.
    #[must_use]
    pub fn new(parameter_types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let types = parameter_types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| ((i + 1).to_string(), ty))
            .collect();
        TypeContext { types }
    }

    /// Creates a context for a batch statement.
    ///
    /// The method must take exactly one collection parameter; `:1` then
    /// addresses one element of that collection.
    ///
    /// # Errors
    ///
    /// Returns `IncorrectParameterType` for any other parameter list.
    pub fn for_batch(parameter_types: &[TypeDescriptor]) -> Result<Self> {
        let [single] = parameter_types else {
            return Err(DaoError::IncorrectParameterType(format!(
                "batch update expects exactly 1 collection parameter, found {} parameters",
                parameter_types.len()
            )));
        };
        let element = single.element_type().ok_or_else(|| {
            DaoError::IncorrectParameterType(format!(
                "batch update expects a list, set or array parameter, found {single}"
            ))
        })?;
        Ok(Self::new([element.clone()]))
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the method declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves a parameter address such as `1` or `1.address.city`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParameter` if the index is not declared, and
    /// `IncorrectType` if a property segment cannot be read on its base type.
    pub fn resolve(&self, key: &str) -> Result<&TypeDescriptor> {
        let mut segments = key.split('.');
        let index = segments.next().unwrap_or_default();
        let mut ty = self
            .types
            .get(index)
            .ok_or_else(|| DaoError::UnknownParameter {
                key: key.to_string(),
                declared: self.types.len(),
            })?;

        for property in segments {
            ty = ty.property_type(property).map_err(|err| match err {
                DaoError::IncorrectType(message) => {
                    DaoError::IncorrectType(format!(":{key}: {message}"))
                }
                other => other,
            })?;
        }
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BeanType, PrimitiveType};

    fn context() -> TypeContext {
        let address = BeanType::new("Address").with_property("city", PrimitiveType::String);
        let user = BeanType::new("User")
            .with_property("id", PrimitiveType::Int32)
            .with_property("address", address);
        TypeContext::new([TypeDescriptor::INT64, user.into()])
    }

    #[test]
    fn test_resolve_bare_index() {
        assert_eq!(context().resolve("1").unwrap(), &TypeDescriptor::INT64);
    }

    #[test]
    fn test_resolve_nested_path() {
        assert_eq!(
            context().resolve("2.address.city").unwrap(),
            &TypeDescriptor::STRING
        );
    }

    #[test]
    fn test_resolve_unknown_index() {
        let err = context().resolve("3").unwrap_err();
        assert_eq!(
            err,
            DaoError::UnknownParameter {
                key: "3".into(),
                declared: 2
            }
        );
        assert!(matches!(
            context().resolve("0"),
            Err(DaoError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn test_resolve_bad_property() {
        let err = context().resolve("2.address.zip").unwrap_err();
        assert!(matches!(err, DaoError::IncorrectType(msg) if msg.starts_with(":2.address.zip")));
        assert!(matches!(
            context().resolve("1.id"),
            Err(DaoError::IncorrectType(_))
        ));
    }

    #[test]
    fn test_batch_context_uses_element_type() {
        let user = TypeDescriptor::bean(BeanType::new("User").with_property("id", PrimitiveType::Int32));
        let ctx = TypeContext::for_batch(&[TypeDescriptor::list(user)]).unwrap();
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.resolve("1.id").unwrap(), &TypeDescriptor::INT32);
    }

    #[test]
    fn test_batch_context_rejects_non_collection() {
        assert!(matches!(
            TypeContext::for_batch(&[TypeDescriptor::INT32]),
            Err(DaoError::IncorrectParameterType(_))
        ));
        assert!(matches!(
            TypeContext::for_batch(&[]),
            Err(DaoError::IncorrectParameterType(_))
        ));
    }
}
