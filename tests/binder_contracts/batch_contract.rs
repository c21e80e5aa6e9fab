use daobind::types::{BeanType, BeanValue, PrimitiveType, TypeDescriptor, Value};
use daobind::{bind, DaoError, MethodDescriptor, Operator, Rendered, StatementKind};

fn user() -> TypeDescriptor {
    TypeDescriptor::bean(
        BeanType::new("User")
            .with_property("id", PrimitiveType::Int32)
            .with_property("name", PrimitiveType::String),
    )
}

fn user_value(id: i32, name: Option<&str>) -> Value {
    Value::Bean(BeanValue::new("User").with("id", id).with("name", name))
}

fn batch_insert() -> MethodDescriptor {
    MethodDescriptor::new(
        "addAll",
        "INSERT INTO user(id, name) VALUES(:1.id, :1.name)",
        TypeDescriptor::array(TypeDescriptor::INT32),
    )
    .with_parameter(TypeDescriptor::list(user()))
}

#[test]
fn test_batch_renders_one_group_per_element() {
    let operator = bind(&batch_insert()).unwrap();
    let users = Value::List(vec![user_value(1, Some("ash")), user_value(2, Some("misty"))]);

    let rendered = operator.render(&[users]).unwrap();
    assert_eq!(rendered.sql(), "INSERT INTO user(id, name) VALUES(?, ?)");
    assert_eq!(rendered.bound_count(), 4);
    let Rendered::BatchUpdate(batch) = rendered else {
        panic!("Expected batch rendering");
    };
    assert_eq!(batch.sql, "INSERT INTO user(id, name) VALUES(?, ?)");
    assert_eq!(
        batch.groups,
        vec![
            vec![Value::Int32(1), Value::from("ash")],
            vec![Value::Int32(2), Value::from("misty")],
        ]
    );
}

#[test]
fn test_empty_batch_renders_nothing() {
    let Operator::BatchUpdate(batch) = bind(&batch_insert()).unwrap() else {
        panic!("Expected batch operator");
    };
    assert_eq!(batch.kind(), StatementKind::Insert);
    let rendered = batch.render(&[Value::List(vec![])]).unwrap();
    assert!(rendered.is_empty());
    assert!(rendered.sql.is_empty());
}

#[test]
fn test_batch_requires_collection_argument() {
    let operator = bind(&batch_insert()).unwrap();
    assert!(matches!(
        operator.render(&[user_value(1, Some("ash"))]),
        Err(DaoError::Binding(_))
    ));
}

#[test]
fn test_batch_elements_must_render_same_statement() {
    let method = MethodDescriptor::new(
        "saveAll",
        "UPDATE user SET id = :1.id#if(:1.name != null), name = :1.name#end",
        TypeDescriptor::array(TypeDescriptor::INT32),
    )
    .with_parameter(TypeDescriptor::list(user()));
    let operator = bind(&method).unwrap();

    let same = Value::List(vec![user_value(1, Some("ash")), user_value(2, Some("misty"))]);
    assert!(operator.render(&[same]).is_ok());

    let mixed = Value::List(vec![user_value(1, Some("ash")), user_value(2, None)]);
    assert!(matches!(
        operator.render(&[mixed]),
        Err(DaoError::Binding(_))
    ));
}
