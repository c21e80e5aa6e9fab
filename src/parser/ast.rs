//! Abstract Syntax Tree definitions for SQL templates.

use std::fmt;

use crate::types::Value;

/// A parsed template: the ordered top-level nodes.
///
/// The tree is immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    nodes: Vec<Node>,
}

impl RootNode {
    /// Creates a root node from its children.
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        RootNode { nodes }
    }

    /// Returns the top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns every parameter reference in the tree, in source order,
    /// including references inside directive conditions.
    #[must_use]
    pub fn references(&self) -> Vec<&ParameterRef> {
        let mut refs = Vec::new();
        collect_references(&self.nodes, &mut refs);
        refs
    }
}

fn collect_references<'a>(nodes: &'a [Node], refs: &mut Vec<&'a ParameterRef>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Parameter(param) | Node::Iterable { param, .. } => refs.push(param),
            Node::Conditional(cond) => {
                for branch in &cond.branches {
                    branch.condition.collect_references(refs);
                    collect_references(&branch.body, refs);
                }
                if let Some(otherwise) = &cond.otherwise {
                    collect_references(otherwise, refs);
                }
            }
        }
    }
}

/// A template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal SQL text, emitted verbatim.
    Text(String),
    /// Single-value placeholder (`:1`, `:1.name`).
    Parameter(ParameterRef),
    /// Collection placeholder (`in (:1)`), expanded per element.
    Iterable {
        /// The `in` keyword as written.
        keyword: String,
        param: ParameterRef,
    },
    /// `#if ... #elseif ... #else ... #end` block.
    Conditional(Conditional),
}

/// Reference to a positional parameter, optionally followed by a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRef {
    /// 1-based parameter index.
    pub index: usize,
    /// Dotted property path after the index.
    pub path: Vec<String>,
    /// Source line of the reference.
    pub line: usize,
    /// Source column of the reference.
    pub col: usize,
}

impl ParameterRef {
    /// Creates a reference with no source position.
    #[must_use]
    pub fn new(index: usize, path: Vec<String>) -> Self {
        ParameterRef {
            index,
            path,
            line: 0,
            col: 0,
        }
    }

    /// Returns the lookup key, e.g. `1` or `1.address.city`.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = self.index.to_string();
        for segment in &self.path {
            key.push('.');
            key.push_str(segment);
        }
        key
    }
}

impl fmt::Display for ParameterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.key())
    }
}

/// A conditional directive block.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// `#if` followed by every `#elseif`, in order.
    pub branches: Vec<Branch>,
    /// `#else` body.
    pub otherwise: Option<Vec<Node>>,
}

/// One guarded branch of a conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Condition,
    pub body: Vec<Node>,
}

/// Directive condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Truthiness test of a single operand.
    Operand(Operand),
    /// Binary comparison.
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    fn collect_references<'a>(&'a self, refs: &mut Vec<&'a ParameterRef>) {
        match self {
            Condition::Operand(operand) => operand.collect_reference(refs),
            Condition::Compare { left, right, .. } => {
                left.collect_reference(refs);
                right.collect_reference(refs);
            }
            Condition::Not(inner) => inner.collect_references(refs),
            Condition::And(a, b) | Condition::Or(a, b) => {
                a.collect_references(refs);
                b.collect_references(refs);
            }
        }
    }
}

/// Operand of a directive condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Parameter(ParameterRef),
    Literal(Value),
}

impl Operand {
    fn collect_reference<'a>(&'a self, refs: &mut Vec<&'a ParameterRef>) {
        if let Operand::Parameter(param) = self {
            refs.push(param);
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Parses a comparison operator from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Neq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }
}
