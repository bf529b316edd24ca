// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use tagcheck::*;

#[test]
fn serialize_unknown() -> Result<()> {
    let mut obj = Value::new_object();
    obj.as_object_mut()?.insert("Env".into(), Value::from("prod"));
    obj.as_object_mut()?.insert("Owner".into(), Value::Unknown);
    obj.as_object_mut()?.insert("Count".into(), Value::from(2u64));

    let json = serde_json::to_string_pretty(&obj)?;
    let expected = r#"{
  "Count": 2,
  "Env": "prod",
  "Owner": "<unknown>"
}"#;
    assert_eq!(json, expected);
    assert!(!obj.is_wholly_known());
    Ok(())
}

#[test]
fn serialize_number() -> Result<()> {
    // Integral values are serialized without fractional part.
    assert_eq!(serde_json::to_string(&Value::from(1u64))?, "1");
    assert_eq!(serde_json::to_string(&Value::from(-1i64))?, "-1");
    assert_eq!(serde_json::to_string(&Value::from(1.5))?, "1.5");
    assert_eq!(Value::from(f64::NAN), Value::Null);
    Ok(())
}

#[test]
fn yaml_and_json_agree() -> Result<()> {
    let from_json = Value::from_json_str(r#"{ "tags": { "Env": "prod" }, "list": [1, null, true] }"#)?;
    let from_yaml = Value::from_yaml_str(
        r#"
tags:
  Env: prod
list: [1, ~, true]
"#,
    )?;
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json["tags"]["Env"], Value::from("prod"));
    assert_eq!(from_json["list"], Value::from(vec![Value::from(1u64), Value::Null, Value::Bool(true)]));
    assert_eq!(from_json["missing"]["deeper"], Value::Null);
    Ok(())
}

#[test]
fn get_path() -> Result<()> {
    let v = Value::from_json_str(r#"{ "settings": { "tags": { "Env": "prod" } }, "name": "x" }"#)?;
    assert_eq!(v.get_path(&["settings", "tags", "Env"])?, Value::from("prod"));
    assert_eq!(v.get_path(&[])?, v);
    assert!(v.get_path(&["settings", "other"]).is_err());

    let err = v.get_path(&["name", "first"]).unwrap_err().to_string();
    assert_eq!(err, "cannot access attribute `first` of string value at `name`");

    assert_eq!(Value::Unknown.get_path(&["a", "b"])?, Value::Unknown);
    Ok(())
}

#[test]
fn deserialize_into_typed() -> Result<()> {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Config {
        tags: Vec<String>,
    }

    let v = Value::from_json_str(r#"{ "tags": ["Env", "Owner"] }"#)?;
    let config: Config = v.deserialize_into()?;
    assert_eq!(config.tags, vec!["Env".to_string(), "Owner".to_string()]);

    assert!(Value::from("Env").deserialize_into::<Config>().is_err());
    Ok(())
}

#[test]
fn display_is_json() -> Result<()> {
    let v = Value::from_json_str(r#"{ "Env": "prod", "Count": 3 }"#)?;
    assert_eq!(v.to_string(), r#"{"Count":3,"Env":"prod"}"#);
    assert_eq!(v.to_json_str()?, "{\n  \"Count\": 3,\n  \"Env\": \"prod\"\n}");
    Ok(())
}
