//! Rendering of checked templates against call-time arguments.

use std::cmp::Ordering;

use crate::binder::CheckedTemplate;
use crate::config::PlaceholderStyle;
use crate::error::{DaoError, Result};
use crate::parser::ast::{CompareOp, Condition, Node, Operand, ParameterRef};
use crate::types::Value;

/// A rendered statement and its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSql {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Renders `template` with `args`, writing placeholders in `style`.
pub(crate) fn render_template(
    template: &CheckedTemplate,
    args: &[Value],
    style: PlaceholderStyle,
) -> Result<BoundSql> {
    let mut renderer = Renderer {
        args,
        style,
        sql: String::new(),
        bound: Vec::new(),
    };
    renderer.render_nodes(template.root().nodes())?;
    Ok(BoundSql {
        sql: renderer.sql,
        args: renderer.bound,
    })
}

/// Fails unless exactly `expected` arguments were passed.
pub(crate) fn check_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(DaoError::Binding(format!(
            "expected {expected} arguments, got {}",
            args.len()
        )))
    }
}

/// Reads the value at an address such as `1` or `1.address.city`.
pub(crate) fn resolve_argument<'a>(args: &'a [Value], key: &str) -> Result<&'a Value> {
    let mut segments = key.split('.');
    let index = segments
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| DaoError::Binding(format!("invalid parameter address :{key}")))?;
    lookup(args, index, segments, key)
}

fn resolve_reference<'a>(args: &'a [Value], param: &ParameterRef) -> Result<&'a Value> {
    lookup(
        args,
        param.index,
        param.path.iter().map(String::as_str),
        &param.key(),
    )
}

fn lookup<'a, 'p>(
    args: &'a [Value],
    index: usize,
    path: impl Iterator<Item = &'p str>,
    key: &str,
) -> Result<&'a Value> {
    let mut value = index
        .checked_sub(1)
        .and_then(|i| args.get(i))
        .ok_or_else(|| {
            DaoError::Binding(format!(
                "no argument for :{key} ({} arguments passed)",
                args.len()
            ))
        })?;

    for property in path {
        let bean = match value {
            Value::Bean(bean) => bean,
            Value::Null => {
                return Err(DaoError::Binding(format!(
                    "cannot read '{property}' of null in :{key}"
                )))
            }
            other => {
                return Err(DaoError::Binding(format!(
                    "cannot read '{property}' of {} value in :{key}",
                    other.kind_name()
                )))
            }
        };
        value = bean.get(property).ok_or_else(|| {
            DaoError::Binding(format!(
                "{} value has no field '{property}' for :{key}",
                bean.type_name
            ))
        })?;
    }
    Ok(value)
}

struct Renderer<'a> {
    args: &'a [Value],
    style: PlaceholderStyle,
    sql: String,
    bound: Vec<Value>,
}

impl Renderer<'_> {
    fn render_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => self.sql.push_str(text),
                Node::Parameter(param) => {
                    let value = resolve_reference(self.args, param)?.clone();
                    self.bind(value);
                }
                Node::Iterable { keyword, param } => self.render_iterable(keyword, param)?,
                Node::Conditional(cond) => {
                    let mut taken = None;
                    for branch in &cond.branches {
                        if self.evaluate(&branch.condition)? {
                            taken = Some(&branch.body);
                            break;
                        }
                    }
                    if let Some(body) = taken.or(cond.otherwise.as_ref()) {
                        self.render_nodes(body)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render_iterable(&mut self, keyword: &str, param: &ParameterRef) -> Result<()> {
        let value = resolve_reference(self.args, param)?;
        let items = match value {
            Value::List(items) => items,
            other => {
                return Err(DaoError::Binding(format!(
                    "{param} expects a collection, got {} value",
                    other.kind_name()
                )))
            }
        };
        if items.is_empty() {
            return Err(DaoError::Binding(format!(
                "{param} is an empty collection in an in (...) clause"
            )));
        }

        self.sql.push_str(keyword);
        self.sql.push_str(" (");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push(',');
            }
            self.bind(item.clone());
        }
        self.sql.push(')');
        Ok(())
    }

    fn bind(&mut self, value: Value) {
        self.bound.push(value);
        self.style.write(&mut self.sql, self.bound.len());
    }

    fn evaluate(&self, condition: &Condition) -> Result<bool> {
        Ok(match condition {
            Condition::Operand(operand) => self.operand(operand)?.is_truthy(),
            Condition::Compare { left, op, right } => {
                let left = self.operand(left)?;
                let right = self.operand(right)?;
                match op {
                    CompareOp::Eq => left.loosely_equals(right),
                    CompareOp::Neq => !left.loosely_equals(right),
                    CompareOp::Gt => left.compare(right) == Some(Ordering::Greater),
                    CompareOp::Gte => matches!(
                        left.compare(right),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    CompareOp::Lt => left.compare(right) == Some(Ordering::Less),
                    CompareOp::Lte => {
                        matches!(left.compare(right), Some(Ordering::Less | Ordering::Equal))
                    }
                }
            }
            Condition::Not(inner) => !self.evaluate(inner)?,
            Condition::And(a, b) => self.evaluate(a)? && self.evaluate(b)?,
            Condition::Or(a, b) => self.evaluate(a)? || self.evaluate(b)?,
        })
    }

    fn operand<'v>(&'v self, operand: &'v Operand) -> Result<&'v Value> {
        match operand {
            Operand::Parameter(param) => resolve_reference(self.args, param),
            Operand::Literal(value) => Ok(value),
        }
    }
}
