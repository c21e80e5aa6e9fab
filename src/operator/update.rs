//! Single-statement update (INSERT / UPDATE / DELETE) operator.

use crate::binder::CheckedTemplate;
use crate::config::PlaceholderStyle;
use crate::error::Result;
use crate::types::Value;

use super::classifier::StatementKind;
use super::render::{check_arity, render_template, BoundSql};

/// Operator for mutation templates returning an affected-row count.
#[derive(Debug, Clone)]
pub struct UpdateOperator {
    template: CheckedTemplate,
    kind: StatementKind,
    parameter_count: usize,
    return_generated_id: bool,
    placeholder_style: PlaceholderStyle,
}

impl UpdateOperator {
    pub(crate) fn new(
        template: CheckedTemplate,
        kind: StatementKind,
        parameter_count: usize,
        return_generated_id: bool,
        placeholder_style: PlaceholderStyle,
    ) -> Self {
        UpdateOperator {
            template,
            kind,
            parameter_count,
            return_generated_id,
            placeholder_style,
        }
    }

    /// Returns the statement kind.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Whether the execution layer should return the generated id instead
    /// of the affected-row count. Only ever true for INSERT.
    #[must_use]
    pub fn returns_generated_id(&self) -> bool {
        self.return_generated_id
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
}
