//! Static type checking of template references.

use std::collections::HashMap;

use crate::error::{DaoError, Result};
use crate::parser::ast::{Condition, Node, Operand, ParameterRef, RootNode};
use crate::types::TypeDescriptor;

use super::context::TypeContext;

/// A template whose every parameter reference resolved against a
/// [`TypeContext`].
///
/// Only [`TypeChecker::check`] creates one, so holding a `CheckedTemplate`
/// means no referenced parameter can mismatch its declared type.
#[derive(Debug, Clone)]
pub struct CheckedTemplate {
    root: RootNode,
    /// Reference key -> resolved type.
    types: HashMap<String, TypeDescriptor>,
}

impl CheckedTemplate {
    /// Returns the checked tree.
    #[must_use]
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// Returns the resolved type of a reference in this template.
    #[must_use]
    pub fn reference_type(&self, param: &ParameterRef) -> Option<&TypeDescriptor> {
        self.types.get(&param.key())
    }

    /// Returns the number of distinct reference addresses.
    #[must_use]
    pub fn distinct_references(&self) -> usize {
        self.types.len()
    }
}

/// Walks a parsed template and resolves every reference.
pub struct TypeChecker<'a> {
    context: &'a TypeContext,
    types: HashMap<String, TypeDescriptor>,
}

impl<'a> TypeChecker<'a> {
    /// Creates a checker over the given context.
    #[must_use]
    pub fn new(context: &'a TypeContext) -> Self {
        TypeChecker {
            context,
            types: HashMap::new(),
        }
    }

    /// Checks the template, failing on the first unresolvable reference.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParameter` for an undeclared index and `IncorrectType`
    /// for an unreadable property path or an `in (...)` reference whose type
    /// is not a collection.
    pub fn check(mut self, root: RootNode) -> Result<CheckedTemplate> {
        self.check_nodes(root.nodes())?;
        Ok(CheckedTemplate {
            root,
            types: self.types,
        })
    }

    fn check_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(_) => {}
                Node::Parameter(param) => {
                    self.check_reference(param)?;
                }
                Node::Iterable { param, .. } => {
                    let ty = self.check_reference(param)?;
                    if !ty.is_collection() {
                        return Err(DaoError::IncorrectType(format!(
                            "{param} at line {}, column {} is used in an in (...) clause but has type {ty}, expected a list, set or array",
                            param.line, param.col
                        )));
                    }
                }
                Node::Conditional(cond) => {
                    for branch in &cond.branches {
                        self.check_condition(&branch.condition)?;
                        self.check_nodes(&branch.body)?;
                    }
                    if let Some(otherwise) = &cond.otherwise {
                        self.check_nodes(otherwise)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Condition) -> Result<()> {
        match condition {
            Condition::Operand(operand) => self.check_operand(operand),
            Condition::Compare { left, right, .. } => {
                self.check_operand(left)?;
                self.check_operand(right)
            }
            Condition::Not(inner) => self.check_condition(inner),
            Condition::And(a, b) | Condition::Or(a, b) => {
                self.check_condition(a)?;
                self.check_condition(b)
            }
        }
    }

    fn check_operand(&mut self, operand: &Operand) -> Result<()> {
        if let Operand::Parameter(param) = operand {
            self.check_reference(param)?;
        }
        Ok(())
    }

    fn check_reference(&mut self, param: &ParameterRef) -> Result<TypeDescriptor> {
        let key = param.key();
        let ty = self.context.resolve(&key)?.clone();
        self.types.insert(key, ty.clone());
        Ok(ty)
    }
}
