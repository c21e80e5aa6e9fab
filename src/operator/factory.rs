//! Operator selection for a method declaration.

use tracing::{debug, warn};

use crate::binder::{TypeChecker, TypeContext};
use crate::config::BinderConfig;
use crate::error::{DaoError, Result};
use crate::method::MethodDescriptor;
use crate::parser::parse_template;
use crate::types::TypeDescriptor;

use super::batch::BatchUpdateOperator;
use super::cache::CacheDescriptor;
use super::classifier::StatementKind;
use super::query::{result_shape, QueryOperator};
use super::update::UpdateOperator;
use super::Operator;

/// Builds operators from method declarations.
#[derive(Debug, Clone, Default)]
pub struct OperatorFactory {
    config: BinderConfig,
}

impl OperatorFactory {
    /// Creates a factory with the given configuration.
    #[must_use]
    pub fn new(config: BinderConfig) -> Self {
        OperatorFactory { config }
    }

    /// Returns the factory configuration.
    #[must_use]
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Parses, checks and compiles one method into an [`Operator`].
    ///
    /// Variant selection is a strict decision table:
    ///
    /// | kind                   | return type | operator          |
    /// |------------------------|-------------|-------------------|
    /// | SELECT                 | any mappable| `Query`           |
    /// | INSERT/UPDATE/DELETE   | `i32`       | `Update`          |
    /// | INSERT/UPDATE/DELETE   | `[i32]`     | `BatchUpdate`     |
    ///
    /// # Errors
    ///
    /// Returns the construction error of the first failing stage: syntax,
    /// statement classification, parameter checking, return type or cache
    /// key arity.
    pub fn build(&self, method: &MethodDescriptor) -> Result<Operator> {
        let root = parse_template(&method.template)?;
        let kind = StatementKind::classify(&method.template)?;

        let is_batch = kind.is_mutation() && is_int_array(&method.return_type);
        let parameter_types = method.parameter_types();
        let context = if is_batch {
            TypeContext::for_batch(&parameter_types)?
        } else {
            TypeContext::new(parameter_types)
        };
        let template = TypeChecker::new(&context).check(root)?;
        let style = self.config.placeholder_style;

        let operator = match kind {
            StatementKind::Select => {
                let (shape, mapping) = result_shape(&method.return_type)?;
                let cache = CacheDescriptor::resolve(method, &context)?;
                Operator::Query(QueryOperator::new(
                    template,
                    context.len(),
                    shape,
                    mapping,
                    cache,
                    style,
                ))
            }
            _ if method.return_type == TypeDescriptor::INT32 => {
                let return_generated_id = method.return_generated_id && kind == StatementKind::Insert;
                if method.return_generated_id && !return_generated_id {
                    warn!(
                        method = %method.qualified_name(),
                        %kind,
                        "generated id requested on a non-INSERT statement; ignoring"
                    );
                }
                Operator::Update(UpdateOperator::new(
                    template,
                    kind,
                    context.len(),
                    return_generated_id,
                    style,
                ))
            }
            _ if is_batch => Operator::BatchUpdate(BatchUpdateOperator::new(template, kind, style)),
            _ => {
                return Err(DaoError::IncorrectReturnType(format!(
                    "{kind} statement expects return type i32 or [i32] but found {}",
                    method.return_type
                )))
            }
        };

        debug!(
            method = %method.qualified_name(),
            %kind,
            variant = operator.variant_name(),
            "built operator"
        );
        Ok(operator)
    }
}

fn is_int_array(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Array(element) if **element == TypeDescriptor::INT32)
}
