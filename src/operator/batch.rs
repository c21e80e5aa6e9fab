//! Batch update operator.

use crate::binder::CheckedTemplate;
use crate::config::PlaceholderStyle;
use crate::error::{DaoError, Result};
use crate::types::Value;

use super::classifier::StatementKind;
use super::render::{check_arity, render_template};

/// One statement and an argument group per batch element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSql {
    /// Statement shared by every group; empty when the batch is empty.
    pub sql: String,
    /// Bound values of each element, in batch order.
    pub groups: Vec<Vec<Value>>,
}

impl BatchSql {
    /// Returns true if there is nothing to execute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Operator for mutation templates returning one result code per element.
///
/// The template is checked against the element type of the method's single
/// collection parameter, so `:1` addresses one element.
#[derive(Debug, Clone)]
pub struct BatchUpdateOperator {
    template: CheckedTemplate,
    kind: StatementKind,
    placeholder_style: PlaceholderStyle,
}

impl BatchUpdateOperator {
    pub(crate) fn new(
        template: CheckedTemplate,
        kind: StatementKind,
        placeholder_style: PlaceholderStyle,
    ) -> Self {
        BatchUpdateOperator {
            template,
            kind,
            placeholder_style,
        }
    }

    /// Returns the statement kind.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Renders one argument group per element of the batch argument.
    ///
    /// # Errors
    ///
    /// Returns a `Binding` error if the argument is not a single collection,
    /// or if elements render different statements.
    pub fn render(&self, args: &[Value]) -> Result<BatchSql> {
        check_arity(args, 1)?;
        let Value::List(elements) = &args[0] else {
            return Err(DaoError::Binding(format!(
                "batch argument must be a collection, got {} value",
                args[0].kind_name()
            )));
        };

        let mut batch = BatchSql::default();
        for (i, element) in elements.iter().enumerate() {
            let bound = render_template(
                &self.template,
                std::slice::from_ref(element),
                self.placeholder_style,
            )?;
            if i == 0 {
                batch.sql = bound.sql;
            } else if bound.sql != batch.sql {
                return Err(DaoError::Binding(format!(
                    "batch element {i} renders a different statement: {}",
                    bound.sql
                )));
            }
            batch.groups.push(bound.args);
        }
        Ok(batch)
    }
}
