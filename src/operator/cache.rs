//! Cache-key descriptor resolution for read operators.

use serde::{Deserialize, Serialize};

use crate::binder::TypeContext;
use crate::error::{DaoError, Result};
use crate::method::{MethodDescriptor, ParameterMarker};
use crate::types::Value;

use super::render::resolve_argument;

/// Whether and how a query's results are cache-keyed.
///
/// The default descriptor has caching disabled and empty key fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDescriptor {
    pub use_cache: bool,
    /// Prefix copied from the declaring type.
    pub prefix: String,
    /// 1-based index of the cache-key parameter, as a string.
    pub key_parameter_index: String,
    /// Property of the cache-key parameter; empty for the parameter itself.
    pub key_property_name: String,
}

impl CacheDescriptor {
    /// Resolves the descriptor for a method.
    ///
    /// Caching is enabled only when the declaring type opts in and the method
    /// does not opt out. It then requires exactly one `CacheBy` marker across
    /// all parameters, and the marked path must resolve in `context`.
    ///
    /// # Errors
    ///
    /// Returns `CacheKeyArity` for zero or several markers, and the context's
    /// resolution error if the key path does not type-check.
    pub fn resolve(method: &MethodDescriptor, context: &TypeContext) -> Result<Self> {
        let Some(dao_cache) = &method.declaring.cache else {
            return Ok(CacheDescriptor::default());
        };
        if method.cache_ignored {
            return Ok(CacheDescriptor::default());
        }

        let keys: Vec<(usize, &str)> = method
            .parameters
            .iter()
            .enumerate()
            .flat_map(|(i, parameter)| {
                parameter.markers.iter().map(move |marker| match marker {
                    ParameterMarker::CacheBy(property) => (i + 1, property.as_str()),
                })
            })
            .collect();

        let [(index, property)] = keys.as_slice() else {
            return Err(DaoError::CacheKeyArity { found: keys.len() });
        };

        let descriptor = CacheDescriptor {
            use_cache: true,
            prefix: dao_cache.prefix.clone(),
            key_parameter_index: index.to_string(),
            key_property_name: (*property).to_string(),
        };
        context.resolve(&descriptor.key_path())?;
        Ok(descriptor)
    }

    /// Returns the cache-key address, e.g. `1` or `1.id`.
    #[must_use]
    pub fn key_path(&self) -> String {
        if self.key_property_name.is_empty() {
            self.key_parameter_index.clone()
        } else {
            format!("{}.{}", self.key_parameter_index, self.key_property_name)
        }
    }

    /// Derives the cache key for one call, or None when caching is off.
    ///
    /// # Errors
    ///
    /// Returns a `Binding` error if the key value cannot be read from `args`.
    pub fn key_for(&self, args: &[Value]) -> Result<Option<String>> {
        if !self.use_cache {
            return Ok(None);
        }
        let value = resolve_argument(args, &self.key_path())?;
        Ok(Some(format!("{}{value}", self.prefix)))
    }
}
