//! Compiled operators.
//!
//! An [`Operator`] is the immutable artifact built once per declared method.
//! It renders a concrete statement from call-time arguments and tells the
//! execution layer how to treat the result. Operators hold no interior
//! mutability and can be shared across threads freely.

mod batch;
mod cache;
mod classifier;
mod factory;
mod query;
mod render;
mod update;

pub use batch::{BatchSql, BatchUpdateOperator};
pub use cache::CacheDescriptor;
pub use classifier::StatementKind;
pub use factory::OperatorFactory;
pub use query::{result_shape, QueryOperator, ResultShape, RowMapping};
pub use render::BoundSql;
pub use update::UpdateOperator;

use crate::error::Result;
use crate::types::Value;

/// A compiled method: one of the three operator variants.
#[derive(Debug, Clone)]
pub enum Operator {
    Query(QueryOperator),
    Update(UpdateOperator),
    BatchUpdate(BatchUpdateOperator),
}

/// Output of [`Operator::render`]: the statement plus variant metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Query {
        statement: BoundSql,
        mapping: RowMapping,
        shape: ResultShape,
        /// Cache key of this call, when the query is cached.
        cache_key: Option<String>,
    },
    Update {
        statement: BoundSql,
        return_generated_id: bool,
    },
    BatchUpdate(BatchSql),
}

impl Operator {
    /// Returns the statement kind the operator was built for.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        match self {
            Operator::Query(_) => StatementKind::Select,
            Operator::Update(op) => op.kind(),
            Operator::BatchUpdate(op) => op.kind(),
        }
    }

    /// Returns a short name of the variant.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Operator::Query(_) => "query",
            Operator::Update(_) => "update",
            Operator::BatchUpdate(_) => "batch_update",
        }
    }

    /// Renders the statement for one call.
    ///
    /// # Errors
    ///
    /// Returns a `Binding` error if `args` does not match the method
    /// signature the operator was checked against.
    pub fn render(&self, args: &[Value]) -> Result<Rendered> {
        let rendered = match self {
            Operator::Query(op) => Rendered::Query {
                statement: op.render(args)?,
                mapping: op.mapping().clone(),
                shape: op.shape(),
                cache_key: op.cache_key(args)?,
            },
            Operator::Update(op) => Rendered::Update {
                statement: op.render(args)?,
                return_generated_id: op.returns_generated_id(),
            },
            Operator::BatchUpdate(op) => Rendered::BatchUpdate(op.render(args)?),
        };
        tracing::trace!(
            variant = self.variant_name(),
            sql = rendered.sql(),
            bound = rendered.bound_count(),
            "rendered statement"
        );
        Ok(rendered)
    }
}

impl Rendered {
    /// Returns the rendered statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            Rendered::Query { statement, .. } | Rendered::Update { statement, .. } => {
                &statement.sql
            }
            Rendered::BatchUpdate(batch) => &batch.sql,
        }
    }

    /// Returns the number of bound values across all argument groups.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        match self {
            Rendered::Query { statement, .. } | Rendered::Update { statement, .. } => {
                statement.args.len()
            }
            Rendered::BatchUpdate(batch) => batch.groups.iter().map(Vec::len).sum(),
        }
    }
}
