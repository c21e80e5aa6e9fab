use std::sync::Arc;

use daobind::types::{BeanType, BeanValue, PrimitiveType, TypeDescriptor, Value};
use daobind::{
    BinderConfig, DaoDescriptor, MethodDescriptor, Operator, OperatorFactory, PlaceholderStyle,
    Rendered,
};

fn user() -> TypeDescriptor {
    TypeDescriptor::bean(
        BeanType::new("User")
            .with_property("id", PrimitiveType::Int32)
            .with_property("name", PrimitiveType::String),
    )
}

fn ash() -> Value {
    Value::Bean(BeanValue::new("User").with("id", 1).with("name", "ash"))
}

#[test]
fn test_update_renders_bean_properties_in_order() {
    let method = MethodDescriptor::new(
        "rename",
        "UPDATE user SET name = :1.name WHERE id = :1.id",
        TypeDescriptor::INT32,
    )
    .with_parameter(user());
    let operator = OperatorFactory::default().build(&method).unwrap();

    let Rendered::Update { statement, return_generated_id } = operator.render(&[ash()]).unwrap()
    else {
        panic!("Expected update rendering");
    };
    assert_eq!(statement.sql, "UPDATE user SET name = ? WHERE id = ?");
    assert_eq!(statement.args, vec![Value::from("ash"), Value::Int32(1)]);
    assert!(!return_generated_id);
}

#[test]
fn test_insert_reports_generated_id() {
    let method = MethodDescriptor::new(
        "add",
        "insert into user(id, name) values(:1.id, :1.name)",
        TypeDescriptor::INT32,
    )
    .with_parameter(user())
    .returning_generated_id();
    let operator = OperatorFactory::default().build(&method).unwrap();

    let Rendered::Update { statement, return_generated_id } = operator.render(&[ash()]).unwrap()
    else {
        panic!("Expected update rendering");
    };
    assert_eq!(statement.sql, "insert into user(id, name) values(?, ?)");
    assert!(return_generated_id);
}

#[test]
fn test_numbered_placeholders() {
    let factory =
        OperatorFactory::new(BinderConfig::new().with_placeholder_style(PlaceholderStyle::Numbered));
    let method = MethodDescriptor::new(
        "move",
        "UPDATE user SET name = :2 WHERE id = :1",
        TypeDescriptor::INT32,
    )
    .declared_by(Arc::new(DaoDescriptor::new("UserDao")))
    .with_parameter(TypeDescriptor::INT32)
    .with_parameter(TypeDescriptor::STRING);
    let Operator::Update(update) = factory.build(&method).unwrap() else {
        panic!("Expected update operator");
    };

    let bound = update
        .render(&[Value::Int32(9), Value::from("misty")])
        .unwrap();
    assert_eq!(bound.sql, "UPDATE user SET name = $1 WHERE id = $2");
    assert_eq!(bound.args, vec![Value::from("misty"), Value::Int32(9)]);
}

#[test]
fn test_reused_parameter_binds_twice() {
    let method = MethodDescriptor::new(
        "touch",
        "UPDATE user SET name = :1 WHERE name = :1",
        TypeDescriptor::INT32,
    )
    .with_parameter(TypeDescriptor::STRING);
    let Operator::Update(update) = OperatorFactory::default().build(&method).unwrap() else {
        panic!("Expected update operator");
    };
    let bound = update.render(&[Value::from("brock")]).unwrap();
    assert_eq!(bound.args.len(), 2);
}
