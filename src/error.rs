//! Error types for binder construction and operator rendering.

use thiserror::Error;

/// Result type alias using [`DaoError`].
pub type Result<T> = std::result::Result<T, DaoError>;

/// Error types for daobind operations.
///
/// Every variant except [`DaoError::Binding`] is raised while an operator is
/// being built, never while it renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaoError {
    // ==================== Construction Errors ====================
    /// Malformed template, with location information.
    #[error("Syntax error at line {line}, column {col}: {message}")]
    Syntax {
        line: usize,
        col: usize,
        message: String,
    },

    /// The template does not start with INSERT, DELETE, UPDATE or SELECT.
    #[error("Unclassified statement: {0}")]
    UnclassifiedStatement(String),

    /// A reference points at a parameter index outside the signature.
    #[error("Unknown parameter: {key} (method declares {declared} parameters)")]
    UnknownParameter { key: String, declared: usize },

    /// A property path cannot be resolved on its base type.
    #[error("Incorrect type: {0}")]
    IncorrectType(String),

    /// The parameter list does not fit the selected operator.
    #[error("Incorrect parameter type: {0}")]
    IncorrectParameterType(String),

    /// The return type does not fit the statement kind.
    #[error("Incorrect return type: {0}")]
    IncorrectReturnType(String),

    /// Caching is enabled but the method does not carry exactly one cache key.
    #[error("Cache key arity error: expected exactly 1 cache key parameter, found {found}")]
    CacheKeyArity { found: usize },

    /// Two different declarations share one qualified method name.
    #[error("Conflicting declaration: {0}")]
    ConflictingDeclaration(String),

    // ==================== Call-time Errors ====================
    /// Call-time arguments do not match the checked signature.
    #[error("Binding error: {0}")]
    Binding(String),
}

impl DaoError {
    /// Returns true for errors raised while building an operator.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        !matches!(self, DaoError::Binding(_))
    }
}
