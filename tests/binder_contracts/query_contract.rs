use daobind::operator::ResultShape;
use daobind::types::{BeanType, BeanValue, PrimitiveType, TypeDescriptor, Value};
use daobind::{bind, DaoError, MethodDescriptor, Operator, Rendered};

fn user() -> TypeDescriptor {
    TypeDescriptor::bean(
        BeanType::new("User")
            .with_property("id", PrimitiveType::Int32)
            .with_property("name", PrimitiveType::String)
            .with_property("age", PrimitiveType::Int32),
    )
}

fn search_method() -> MethodDescriptor {
    MethodDescriptor::new(
        "search",
        concat!(
            "SELECT * FROM user WHERE 1 = 1",
            "#if(:1.name != null) AND name = :1.name#end",
            "#if(:1.age >= 18 && :2) AND adult = true#else AND adult = false#end",
            " ORDER BY id",
        ),
        TypeDescriptor::list(user()),
    )
    .with_parameter(user())
    .with_parameter(PrimitiveType::Bool)
}

#[test]
fn test_query_renders_conditionals() {
    let operator = bind(&search_method()).unwrap();
    let filter = Value::Bean(
        BeanValue::new("User")
            .with("name", "ash")
            .with("age", 30)
            .with("id", Value::Null),
    );

    let Rendered::Query { statement, shape, cache_key, .. } =
        operator.render(&[filter, Value::Bool(true)]).unwrap()
    else {
        panic!("Expected query rendering");
    };
    assert_eq!(
        statement.sql,
        "SELECT * FROM user WHERE 1 = 1 AND name = ? AND adult = true ORDER BY id"
    );
    assert_eq!(statement.args, vec![Value::from("ash")]);
    assert_eq!(shape, ResultShape::List);
    assert_eq!(cache_key, None);
}

#[test]
fn test_query_takes_else_branch() {
    let operator = bind(&search_method()).unwrap();
    let filter = Value::Bean(
        BeanValue::new("User")
            .with("name", Value::Null)
            .with("age", 12)
            .with("id", Value::Null),
    );

    let Rendered::Query { statement, .. } =
        operator.render(&[filter, Value::Bool(true)]).unwrap()
    else {
        panic!("Expected query rendering");
    };
    assert_eq!(
        statement.sql,
        "SELECT * FROM user WHERE 1 = 1 AND adult = false ORDER BY id"
    );
    assert!(statement.args.is_empty());
}

#[test]
fn test_query_expands_in_list() {
    let method = MethodDescriptor::new(
        "byIds",
        "SELECT * FROM user WHERE id IN (:1) AND name <> :2",
        TypeDescriptor::list(user()),
    )
    .with_parameter(TypeDescriptor::list(TypeDescriptor::INT32))
    .with_parameter(TypeDescriptor::STRING);
    let Operator::Query(query) = bind(&method).unwrap() else {
        panic!("Expected query operator");
    };

    let bound = query
        .render(&[Value::from(vec![3, 5, 8]), Value::from("root")])
        .unwrap();
    assert_eq!(bound.sql, "SELECT * FROM user WHERE id IN (?,?,?) AND name <> ?");
    assert_eq!(
        bound.args,
        vec![
            Value::Int32(3),
            Value::Int32(5),
            Value::Int32(8),
            Value::from("root")
        ]
    );
}

#[test]
fn test_query_rejects_empty_in_list() {
    let method = MethodDescriptor::new(
        "byIds",
        "SELECT * FROM user WHERE id in (:1)",
        TypeDescriptor::list(user()),
    )
    .with_parameter(TypeDescriptor::list(TypeDescriptor::INT32));
    let operator = bind(&method).unwrap();
    assert!(matches!(
        operator.render(&[Value::List(vec![])]),
        Err(DaoError::Binding(_))
    ));
}

#[test]
fn test_query_rejects_wrong_argument_count() {
    let operator = bind(&search_method()).unwrap();
    let err = operator.render(&[Value::Null]).unwrap_err();
    assert!(matches!(err, DaoError::Binding(_)));
    assert!(!err.is_construction_error());
}

#[test]
fn test_quoted_text_is_left_alone() {
    let method = MethodDescriptor::new(
        "literal",
        "SELECT ':1', created::date FROM user WHERE id = :1",
        user(),
    )
    .with_parameter(TypeDescriptor::INT32);
    let Operator::Query(query) = bind(&method).unwrap() else {
        panic!("Expected query operator");
    };
    let bound = query.render(&[Value::Int32(7)]).unwrap();
    assert_eq!(bound.sql, "SELECT ':1', created::date FROM user WHERE id = ?");
    assert_eq!(bound.args, vec![Value::Int32(7)]);
}
