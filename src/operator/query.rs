//! Query (SELECT) operator.

use std::sync::Arc;

use crate::binder::CheckedTemplate;
use crate::config::PlaceholderStyle;
use crate::error::{DaoError, Result};
use crate::types::{BeanType, PrimitiveType, TypeDescriptor, Value};

use super::cache::CacheDescriptor;
use super::render::{check_arity, render_template, BoundSql};

/// Collection shape of a query's declared return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// A bare mapped value.
    Single,
    /// Ordered sequence.
    List,
    /// Collection of unique elements.
    Set,
    /// Plain array.
    Array,
}

/// How one result row becomes one mapped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMapping {
    /// The row's single column converted to a primitive.
    SingleColumn(PrimitiveType),
    /// Columns assigned to bean properties by name.
    BeanProperty(Arc<BeanType>),
}

impl RowMapping {
    /// Returns the mapping for a mapped type, if rows can map to it.
    #[must_use]
    pub fn for_type(ty: &TypeDescriptor) -> Option<Self> {
        match ty {
            TypeDescriptor::Primitive(primitive) => Some(RowMapping::SingleColumn(*primitive)),
            TypeDescriptor::Bean(bean) => Some(RowMapping::BeanProperty(Arc::clone(bean))),
            _ => None,
        }
    }

    /// Returns the name of the mapped type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            RowMapping::SingleColumn(primitive) => primitive.name(),
            RowMapping::BeanProperty(bean) => &bean.name,
        }
    }
}

/// Splits a query return type into its shape and row mapping.
///
/// # Errors
///
/// Returns `IncorrectReturnType` if the mapped element type is not a
/// primitive or bean.
pub fn result_shape(return_type: &TypeDescriptor) -> Result<(ResultShape, RowMapping)> {
    let (shape, mapped) = match return_type {
        TypeDescriptor::List(element) => (ResultShape::List, element.as_ref()),
        TypeDescriptor::Set(element) => (ResultShape::Set, element.as_ref()),
        TypeDescriptor::Array(element) => (ResultShape::Array, element.as_ref()),
        other => (ResultShape::Single, other),
    };
    let mapping = RowMapping::for_type(mapped).ok_or_else(|| {
        DaoError::IncorrectReturnType(format!(
            "return type {return_type} has no mappable element type"
        ))
    })?;
    Ok((shape, mapping))
}

/// Operator for SELECT templates.
#[derive(Debug, Clone)]
pub struct QueryOperator {
    template: CheckedTemplate,
    parameter_count: usize,
    shape: ResultShape,
    mapping: RowMapping,
    cache: CacheDescriptor,
    placeholder_style: PlaceholderStyle,
}

impl QueryOperator {
    pub(crate) fn new(
        template: CheckedTemplate,
        parameter_count: usize,
        shape: ResultShape,
        mapping: RowMapping,
        cache: CacheDescriptor,
        placeholder_style: PlaceholderStyle,
    ) -> Self {
        QueryOperator {
            template,
            parameter_count,
            shape,
            mapping,
            cache,
            placeholder_style,
        }
    }

    /// Returns the result shape.
    #[must_use]
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Returns the row mapping target.
    #[must_use]
    pub fn mapping(&self) -> &RowMapping {
        &self.mapping
    }

    /// Returns the cache descriptor.
    #[must_use]
    pub fn cache_descriptor(&self) -> &CacheDescriptor {
        &self.cache
    }

    /// Renders the statement for one call.
    ///
    /// # Errors
    ///
    /// Returns a `Binding` error if `args` does not match the signature.
    pub fn render(&self, args: &[Value]) -> Result<BoundSql> {
        check_arity(args, self.parameter_count)?;
        render_template(&self.template, args, self.placeholder_style)
    }

    /// Derives the cache key for one call, or None when caching is off.
    ///
    /// # Errors
    ///
    /// Returns a `Binding` error if the key cannot be read from `args`.
    pub fn cache_key(&self, args: &[Value]) -> Result<Option<String>> {
        check_arity(args, self.parameter_count)?;
        self.cache.key_for(args)
    }
}
