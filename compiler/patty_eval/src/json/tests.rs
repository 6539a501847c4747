use super::*;
use crate::value::{Native, Object};
use pretty_assertions::assert_eq;

fn record(fields: &[(&str, Value)]) -> Value {
    let mut object = Object::new();
    for (key, value) in fields {
        object.set(*key, value.clone());
    }
    Value::object(object)
}

#[test]
fn objects_keep_key_order() {
    let value = record(&[
        ("type", Value::string("ok")),
        ("data", record(&[("src", Value::string("hi"))])),
        ("count", Value::Number(2.0)),
    ]);
    assert_eq!(
        stringify(&value).unwrap().as_deref(),
        Some(r#"{"type":"ok","data":{"src":"hi"},"count":2}"#)
    );
}

#[test]
fn numbers() {
    let value = Value::array(vec![
        Value::Number(1.0),
        Value::Number(-0.0),
        Value::Number(0.25),
        Value::Number(f64::NAN),
        Value::Number(f64::INFINITY),
    ]);
    assert_eq!(
        stringify(&value).unwrap().as_deref(),
        Some("[1,0,0.25,null,null]")
    );
}

#[test]
fn undefined_and_functions_are_skipped_or_nulled() {
    let value = record(&[
        ("a", Value::Undefined),
        ("f", Value::native(Native::String)),
        ("list", Value::array(vec![Value::Undefined])),
    ]);
    assert_eq!(
        stringify(&value).unwrap().as_deref(),
        Some(r#"{"list":[null]}"#)
    );
    assert_eq!(stringify(&Value::Undefined).unwrap(), None);
}

#[test]
fn strings_are_escaped() {
    assert_eq!(
        stringify(&Value::string("a\"b\n")).unwrap().as_deref(),
        Some(r#""a\"b\n""#)
    );
}

#[test]
fn bigint_and_cycles_fail() {
    assert!(stringify(&Value::BigInt("10".into())).is_err());

    let list = Value::array(vec![]);
    if let Value::Array(items) = &list {
        items.borrow_mut().push(list.clone());
    }
    let err = stringify(&list).unwrap_err();
    assert!(err.contains("circular"), "{err}");
}

#[test]
fn shared_but_acyclic_values_are_fine() {
    let shared = Value::array(vec![Value::Number(1.0)]);
    let value = Value::array(vec![shared.clone(), shared]);
    assert_eq!(stringify(&value).unwrap().as_deref(), Some("[[1],[1]]"));
}
