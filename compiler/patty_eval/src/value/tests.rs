use super::*;
use pretty_assertions::assert_eq;

#[test]
fn type_of_follows_the_host_language() {
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::array(vec![]).type_of(), "object");
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::BigInt("1".into()).type_of(), "bigint");
    assert_eq!(Value::native(Native::String).type_of(), "function");
}

#[test]
fn truthiness() {
    let falsy = [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Number(0.0),
        Value::Number(-0.0),
        Value::Number(f64::NAN),
        Value::string(""),
        Value::BigInt("0".into()),
    ];
    for value in &falsy {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }
    assert!(Value::string("0").is_truthy());
    assert!(Value::array(vec![]).is_truthy());
    assert!(Value::object(Object::new()).is_truthy());
}

#[test]
fn numbers_print_like_the_host_language() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(0.5), "0.5");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(1.5e-9), "1.5e-9");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn display_of_compound_values() {
    let nested = Value::array(vec![
        Value::Number(1.0),
        Value::Null,
        Value::array(vec![Value::string("a"), Value::Bool(true)]),
    ]);
    assert_eq!(nested.to_string(), "1,,a,true");
    assert_eq!(Value::object(Object::new()).to_string(), "[object Object]");
    assert_eq!(Value::error("Error", "boom").to_string(), "Error: boom");
}

#[test]
fn strict_equality_is_identity_for_heap_values() {
    let a = Value::array(vec![]);
    let b = Value::array(vec![]);
    assert!(a.strict_eq(&a.clone()));
    assert!(!a.strict_eq(&b));
    assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
    assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
    assert!(Value::Number(0.0).strict_eq(&Value::Number(-0.0)));
}

#[test]
fn loose_equality_coerces() {
    assert!(Value::Null.loose_eq(&Value::Undefined));
    assert!(!Value::Null.loose_eq(&Value::Number(0.0)));
    assert!(Value::string("1").loose_eq(&Value::Number(1.0)));
    assert!(Value::Bool(true).loose_eq(&Value::string("1")));
    assert!(Value::array(vec![Value::Number(2.0)]).loose_eq(&Value::string("2")));
    assert!(!Value::string("a").loose_eq(&Value::Number(f64::NAN)));
}

#[test]
fn string_to_number_conversion() {
    assert_eq!(Value::string("  42 ").to_number(), 42.0);
    assert_eq!(Value::string("").to_number(), 0.0);
    assert_eq!(Value::string("1e3").to_number(), 1000.0);
    assert!(Value::string("inf").to_number().is_nan());
    assert!(Value::string("12px").to_number().is_nan());
    assert_eq!(Value::Bool(true).to_number(), 1.0);
    assert!(Value::Undefined.to_number().is_nan());
}

#[test]
fn objects_keep_insertion_order() {
    let mut object = Object::new();
    object.set("b", Value::Number(1.0));
    object.set("a", Value::Number(2.0));
    object.set("b", Value::Number(3.0));
    let keys: Vec<&str> = object.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["b", "a"]);
    assert_eq!(object.get("b").and_then(Value::as_number), Some(3.0));
}
