//! Pest parser integration for the template grammar.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{DaoError, Result};
use crate::parser::ast::{
    Branch, CompareOp, Condition, Conditional, Node, Operand, ParameterRef, RootNode,
};
use crate::types::Value;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct TemplateParser;

/// Parses a SQL template into a [`RootNode`].
///
/// Parsing is purely structural; parameter types are not known yet.
///
/// # Errors
///
/// Returns a `Syntax` error if the template is empty or malformed.
pub fn parse_template(template: &str) -> Result<RootNode> {
    if template.trim().is_empty() {
        return Err(syntax_error(1, 1, "template is empty"));
    }

    let pairs = TemplateParser::parse(Rule::template, template).map_err(|e| {
        let e = e.renamed_rules(rule_name);
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c))
            | pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        syntax_error(line, col, e.variant.message())
    })?;

    for pair in pairs {
        if pair.as_rule() == Rule::template {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::block {
                    return Ok(RootNode::new(build_block(inner)?));
                }
            }
        }
    }
    Err(syntax_error(1, 1, "no template found"))
}

fn rule_name(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of template".into(),
        Rule::parameter | Rule::index => "parameter index".into(),
        Rule::property => "property name".into(),
        Rule::conditional | Rule::if_branch => "#if directive".into(),
        Rule::elseif_branch => "#elseif".into(),
        Rule::else_branch => "#else".into(),
        Rule::iterable => "in (...) parameter".into(),
        Rule::text => "SQL text".into(),
        Rule::compare_op => "comparison operator".into(),
        Rule::or_expr | Rule::and_expr | Rule::unary | Rule::comparison | Rule::condition => {
            "condition".into()
        }
        other => format!("{other:?}"),
    }
}

fn syntax_error(line: usize, col: usize, message: impl Into<String>) -> DaoError {
    DaoError::Syntax {
        line,
        col,
        message: message.into(),
    }
}

fn error_at(pair: &Pair<Rule>, message: impl Into<String>) -> DaoError {
    let (line, col) = pair.as_span().start_pos().line_col();
    syntax_error(line, col, message)
}

fn build_block(pair: Pair<Rule>) -> Result<Vec<Node>> {
    pair.into_inner().map(build_node).collect()
}

fn build_node(pair: Pair<Rule>) -> Result<Node> {
    match pair.as_rule() {
        Rule::text => Ok(Node::Text(pair.as_str().to_string())),
        Rule::parameter => Ok(Node::Parameter(build_parameter(pair)?)),
        Rule::iterable => build_iterable(pair),
        Rule::conditional => build_conditional(pair),
        _ => Err(error_at(&pair, "unexpected template element")),
    }
}

fn build_parameter(pair: Pair<Rule>) -> Result<ParameterRef> {
    let (line, col) = pair.as_span().start_pos().line_col();
    let mut index = None;
    let mut path = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            // Digits only, so overflow is the sole parse failure. An index
            // past usize::MAX cannot be declared; the checker rejects it.
            Rule::index => index = Some(inner.as_str().parse::<usize>().unwrap_or(usize::MAX)),
            Rule::property => path.push(inner.as_str().to_string()),
            _ => {}
        }
    }

    let index = index.ok_or_else(|| syntax_error(line, col, "missing parameter index"))?;
    Ok(ParameterRef {
        index,
        path,
        line,
        col,
    })
}

fn build_iterable(pair: Pair<Rule>) -> Result<Node> {
    let mut keyword = None;
    let mut param = None;
    let span_pair = pair.clone();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::in_keyword => keyword = Some(inner.as_str().to_string()),
            Rule::parameter => param = Some(build_parameter(inner)?),
            _ => {}
        }
    }

    match (keyword, param) {
        (Some(keyword), Some(param)) => Ok(Node::Iterable { keyword, param }),
        _ => Err(error_at(&span_pair, "malformed in (...) parameter")),
    }
}

fn build_conditional(pair: Pair<Rule>) -> Result<Node> {
    let mut branches = Vec::new();
    let mut otherwise = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::if_branch | Rule::elseif_branch => branches.push(build_branch(inner)?),
            Rule::else_branch => {
                let mut body = Vec::new();
                for block in inner.into_inner() {
                    if block.as_rule() == Rule::block {
                        body = build_block(block)?;
                    }
                }
                otherwise = Some(body);
            }
            _ => {}
        }
    }

    Ok(Node::Conditional(Conditional {
        branches,
        otherwise,
    }))
}

fn build_branch(pair: Pair<Rule>) -> Result<Branch> {
    let span_pair = pair.clone();
    let mut condition = None;
    let mut body = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::condition => condition = Some(build_condition(inner)?),
            Rule::block => body = build_block(inner)?,
            _ => {}
        }
    }

    let condition = condition.ok_or_else(|| error_at(&span_pair, "directive without condition"))?;
    Ok(Branch { condition, body })
}

fn build_condition(pair: Pair<Rule>) -> Result<Condition> {
    let span_pair = pair.clone();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::or_expr {
            return build_or(inner);
        }
    }
    Err(error_at(&span_pair, "empty condition"))
}

fn build_or(pair: Pair<Rule>) -> Result<Condition> {
    let mut result: Option<Condition> = None;
    for inner in pair.into_inner() {
        let next = build_and(inner)?;
        result = Some(match result {
            Some(left) => Condition::Or(Box::new(left), Box::new(next)),
            None => next,
        });
    }
    result.ok_or_else(|| syntax_error(0, 0, "empty condition"))
}

fn build_and(pair: Pair<Rule>) -> Result<Condition> {
    let mut result: Option<Condition> = None;
    for inner in pair.into_inner() {
        let next = build_unary(inner)?;
        result = Some(match result {
            Some(left) => Condition::And(Box::new(left), Box::new(next)),
            None => next,
        });
    }
    result.ok_or_else(|| syntax_error(0, 0, "empty condition"))
}

fn build_unary(pair: Pair<Rule>) -> Result<Condition> {
    let span_pair = pair.clone();
    let mut inner = pair.into_inner();
    let Some(first) = inner.next() else {
        return Err(error_at(&span_pair, "empty condition"));
    };

    match first.as_rule() {
        Rule::not_op => {
            let operand = inner
                .next()
                .ok_or_else(|| error_at(&span_pair, "'!' without operand"))?;
            Ok(Condition::Not(Box::new(build_unary(operand)?)))
        }
        Rule::or_expr => build_or(first),
        Rule::comparison => build_comparison(first),
        _ => Err(error_at(&first, "unexpected condition element")),
    }
}

fn build_comparison(pair: Pair<Rule>) -> Result<Condition> {
    let span_pair = pair.clone();
    let mut inner = pair.into_inner();

    let left = match inner.next() {
        Some(operand) => build_operand(operand)?,
        None => return Err(error_at(&span_pair, "missing operand")),
    };

    let Some(op_pair) = inner.next() else {
        return Ok(Condition::Operand(left));
    };
    let op = CompareOp::parse(op_pair.as_str())
        .ok_or_else(|| error_at(&op_pair, "unknown comparison operator"))?;
    let right = match inner.next() {
        Some(operand) => build_operand(operand)?,
        None => return Err(error_at(&span_pair, "missing right operand")),
    };

    Ok(Condition::Compare { left, op, right })
}

fn build_operand(pair: Pair<Rule>) -> Result<Operand> {
    match pair.as_rule() {
        Rule::parameter => Ok(Operand::Parameter(build_parameter(pair)?)),
        Rule::null_literal => Ok(Operand::Literal(Value::Null)),
        Rule::bool_literal => Ok(Operand::Literal(Value::Bool(
            pair.as_str().eq_ignore_ascii_case("true"),
        ))),
        Rule::number_literal => {
            let s = pair.as_str();
            if s.contains('.') {
                let f = s
                    .parse::<f64>()
                    .map_err(|_| error_at(&pair, "invalid decimal literal"))?;
                Ok(Operand::Literal(Value::Float64(f)))
            } else {
                let i = s
                    .parse::<i64>()
                    .map_err(|_| error_at(&pair, "integer literal out of range"))?;
                Ok(Operand::Literal(Value::Int64(i)))
            }
        }
        Rule::string_literal => {
            let s = pair.as_str();
            let unquoted = s[1..s.len() - 1].replace("''", "'");
            Ok(Operand::Literal(Value::String(unquoted)))
        }
        _ => Err(error_at(&pair, "invalid operand")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(index: usize, path: &[&str]) -> ParameterRef {
        ParameterRef::new(index, path.iter().map(|s| (*s).to_string()).collect())
    }

    fn strip_positions(nodes: &[Node]) -> Vec<Node> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Parameter(p) => Node::Parameter(param_without_pos(p)),
                Node::Iterable { keyword, param } => Node::Iterable {
                    keyword: keyword.clone(),
                    param: param_without_pos(param),
                },
                other => other.clone(),
            })
            .collect()
    }

    fn param_without_pos(p: &ParameterRef) -> ParameterRef {
        ParameterRef::new(p.index, p.path.clone())
    }

    #[test]
    fn test_parse_plain_text() {
        let root = parse_template("SELECT * FROM user WHERE id = 1").unwrap();
        assert_eq!(
            root.nodes(),
            &[Node::Text("SELECT * FROM user WHERE id = 1".into())]
        );
    }

    #[test]
    fn test_parse_parameters() {
        let root = parse_template("UPDATE user SET name = :1.name WHERE id = :1.id").unwrap();
        assert_eq!(
            strip_positions(root.nodes()),
            vec![
                Node::Text("UPDATE user SET name = ".into()),
                Node::Parameter(param(1, &["name"])),
                Node::Text(" WHERE id = ".into()),
                Node::Parameter(param(1, &["id"])),
            ]
        );
    }

    #[test]
    fn test_parse_nested_property_path() {
        let root = parse_template("SELECT * FROM t WHERE city = :2.address.city").unwrap();
        let refs = root.references();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].key(), "2.address.city");
        assert_eq!(refs[0].line, 1);
        assert_eq!(refs[0].col, 30);
    }

    #[test]
    fn test_trailing_dot_is_text() {
        let root = parse_template("SELECT :1.").unwrap();
        assert_eq!(
            strip_positions(root.nodes()),
            vec![
                Node::Text("SELECT ".into()),
                Node::Parameter(param(1, &[])),
                Node::Text(".".into()),
            ]
        );
    }

    #[test]
    fn test_quoted_text_is_not_a_parameter() {
        let root = parse_template("SELECT * FROM t WHERE at = '10:30' AND x::int = :1").unwrap();
        let refs = root.references();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].index, 1);
    }

    #[test]
    fn test_parse_iterable() {
        let root = parse_template("SELECT * FROM user WHERE id IN (:1)").unwrap();
        assert_eq!(
            strip_positions(root.nodes()),
            vec![
                Node::Text("SELECT * FROM user WHERE id ".into()),
                Node::Iterable {
                    keyword: "IN".into(),
                    param: param(1, &[]),
                },
            ]
        );
    }

    #[test]
    fn test_in_inside_word_is_text() {
        let root = parse_template("SELECT * FROM a join (SELECT 1) b").unwrap();
        assert_eq!(root.nodes().len(), 1);
    }

    #[test]
    fn test_parse_conditional() {
        let root = parse_template(
            "SELECT * FROM user WHERE 1=1 #if(:1.name) AND name = :1.name #elseif(:1.id > 0) AND id = :1.id #else AND 1=0 #end",
        )
        .unwrap();
        let Node::Conditional(cond) = &root.nodes()[1] else {
            panic!("Expected conditional");
        };
        assert_eq!(cond.branches.len(), 2);
        assert!(cond.otherwise.is_some());
        assert!(matches!(
            cond.branches[1].condition,
            Condition::Compare { op: CompareOp::Gt, .. }
        ));
        assert_eq!(root.references().len(), 4);
    }

    #[test]
    fn test_parse_condition_operators() {
        let root = parse_template("#if(!:1 || (:2 != null && :3 == 'a''b'))x#end").unwrap();
        let Node::Conditional(cond) = &root.nodes()[0] else {
            panic!("Expected conditional");
        };
        let Condition::Or(left, right) = &cond.branches[0].condition else {
            panic!("Expected or");
        };
        assert!(matches!(**left, Condition::Not(_)));
        let Condition::And(_, eq) = &**right else {
            panic!("Expected and");
        };
        assert!(matches!(
            &**eq,
            Condition::Compare {
                op: CompareOp::Eq,
                right: Operand::Literal(Value::String(s)),
                ..
            } if s == "a'b"
        ));
    }

    #[test]
    fn test_nested_conditionals() {
        let root = parse_template("SELECT #if(:1) a #if(:2) b #end #end FROM t").unwrap();
        assert_eq!(root.references().len(), 2);
    }

    #[test]
    fn test_empty_template_rejected() {
        assert!(matches!(
            parse_template("   "),
            Err(DaoError::Syntax { line: 1, col: 1, .. })
        ));
    }

    #[test]
    fn test_named_placeholder_rejected() {
        assert!(matches!(
            parse_template("SELECT * FROM t WHERE id = :id"),
            Err(DaoError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_dangling_colon_rejected() {
        assert!(matches!(
            parse_template("SELECT * FROM t WHERE id = :"),
            Err(DaoError::Syntax { .. })
        ));
    }

    #[test]
    fn test_unbalanced_directives_rejected() {
        assert!(matches!(
            parse_template("SELECT * FROM t #if(:1) WHERE a = 1"),
            Err(DaoError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("SELECT * FROM t #end"),
            Err(DaoError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("SELECT * FROM t #else x"),
            Err(DaoError::Syntax { .. })
        ));
    }

    #[test]
    fn test_directive_lookalikes_are_text() {
        let root = parse_template("SELECT '#' || url FROM t WHERE path = #endpoint AND x = #iffy").unwrap();
        assert_eq!(
            root.nodes(),
            &[Node::Text(
                "SELECT '#' || url FROM t WHERE path = #endpoint AND x = #iffy".into()
            )]
        );

        let root = parse_template("SELECT * FROM t #if(:1) WHERE tag = #endless#end").unwrap();
        let Node::Conditional(cond) = &root.nodes()[1] else {
            panic!("Expected conditional");
        };
        assert_eq!(cond.branches[0].body, vec![Node::Text(" WHERE tag = #endless".into())]);
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert!(matches!(
            parse_template("SELECT * FROM t WHERE a = 'abc"),
            Err(DaoError::Syntax { .. })
        ));
    }

    #[test]
    fn test_oversized_index_is_not_a_syntax_error() {
        let root = parse_template("SELECT * FROM t WHERE id = :99999999999999999999999").unwrap();
        assert_eq!(root.references()[0].index, usize::MAX);
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse_template("SELECT *\nFROM t\nWHERE id = :x").unwrap_err();
        assert!(matches!(err, DaoError::Syntax { line: 3, .. }));
    }
}
