// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use latebound::*;

#[test]
fn value_as_index() -> Result<()> {
    let obj = Value::from_json_str(r#"{ "a": { "b": [1, 2, 3] } }"#)?;

    // present
    assert_eq!(&obj["a"]["b"][1usize], &Value::from(2u64));

    // missing key
    assert_eq!(&obj["x"], &Value::Undefined);
    assert_eq!(&obj["a"]["x"], &Value::Undefined);

    // out-of-range index
    assert_eq!(&obj["a"]["b"][9usize], &Value::Undefined);

    // non indexable nodes
    assert_eq!(&Value::Undefined["k"], &Value::Undefined);
    assert_eq!(&Value::Null["k"], &Value::Undefined);
    assert_eq!(&Value::Bool(true)["k"], &Value::Undefined);
    assert_eq!(&Value::from("text")["k"], &Value::Undefined);
    assert_eq!(&Value::from(5u64)["k"], &Value::Undefined);

    Ok(())
}

#[test]
fn serialize_number() -> Result<()> {
    // Integer values serialize without a fractional part.
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.0))?, "1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.0))?, "-1");

    // Fractional parts survive.
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.1))?, "1.1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.1))?, "-1.1");

    Ok(())
}

#[test]
fn serialize_sentinels() -> Result<()> {
    assert_eq!(serde_json::to_string(&Value::Undefined)?, r#""<undefined>""#);
    let f = Value::from_fn(|_, _| Ok(Value::Null));
    assert_eq!(serde_json::to_string(&f)?, r#""<function>""#);
    Ok(())
}

#[test]
fn json_round_trip() -> Result<()> {
    let json = r#"{ "a": { "b": [1, "two", null, true] }, "n": 1.5 }"#;
    let v = Value::from_json_str(json)?;
    let back = Value::from_json_str(&v.to_json_str()?)?;
    assert_eq!(v, back);
    Ok(())
}

#[test]
fn kinds() -> Result<()> {
    assert_eq!(Value::Undefined.kind(), Kind::Undefined);
    assert_eq!(Value::Null.kind(), Kind::Null);
    assert_eq!(Value::Bool(true).kind(), Kind::Bool);
    assert_eq!(Value::from(1u64).kind(), Kind::Number);
    assert_eq!(Value::from("s").kind(), Kind::String);
    assert_eq!(Value::new_array().kind(), Kind::Array);
    assert_eq!(Value::new_object().kind(), Kind::Object);
    assert_eq!(Value::from_fn(|_, _| Ok(Value::Null)).kind(), Kind::Function);

    assert_eq!(Kind::Function.as_str(), "function");
    assert_eq!(Kind::Undefined.to_string(), "undefined");
    Ok(())
}

#[test]
fn function_identity() {
    let f = NativeFn::new(|_, _| Ok(Value::Null));
    let g = NativeFn::new(|_, _| Ok(Value::Null));

    // identity follows the allocation, not the body
    assert_eq!(f, f.clone());
    assert_ne!(f, g);

    // clones stored in a graph stay callable and equal
    let v = Value::from(f.clone());
    assert_eq!(v, Value::Function(f));
}

#[test]
fn constructors() -> Result<()> {
    assert_eq!(Value::new_object(), Value::from_json_str("{}")?);
    assert_eq!(Value::new_array(), Value::from_json_str("[]")?);
    assert!(Value::new_object().is_empty_object());
    Ok(())
}

#[test]
fn typed_accessors() -> Result<()> {
    let v = Value::from_json_str(r#"{ "on": true, "name": "x", "ratio": 2.5, "n": null }"#)?;
    assert_eq!(v["on"].as_bool()?, &true);
    assert_eq!(v["name"].as_string()?.as_ref(), "x");
    assert_eq!(v["ratio"].as_f64()?, 2.5);
    assert!(v["n"].is_null());
    assert!(!v["name"].is_null());
    assert!(v["name"].as_bool().is_err());
    assert!(v["missing"].as_f64().is_err());

    let mut arr = Value::new_array();
    arr.as_array_mut()?.push(Value::from(1u64));
    assert_eq!(arr[0usize], Value::from(1u64));

    let f = Value::from_fn(|_, args| Ok(Value::from(args.len())));
    let out = f.as_fn()?.call(&Value::Null, &[Value::Null])?;
    assert_eq!(out, Value::from(1usize));
    assert!(Value::Null.as_fn().is_err());
    Ok(())
}

#[test]
fn number_order_mixes_int_and_float() {
    assert!(Number::from(3i64).is_integer());
    assert!(!Number::from(2.5).is_integer());
    assert_eq!(Value::from(1u64), Value::from(1.0));
    assert!(Number::from(1i64) < Number::from(1.5));
    assert!(Number::from(2.5) > Number::from(2i64));
}
