// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::value::{Number, Value};

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Shape an expression is expected to evaluate to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum Type {
    Any,

    Bool,
    Number,
    String,

    // Homogenous collections
    List { item_type: Box<Type> },
    Map { item_type: Box<Type> },

    // Objects with a fixed set of attributes
    Object { fields: BTreeMap<String, Type> },
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "any"),
            Type::Bool => write!(f, "bool"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::List { item_type } => write!(f, "list of {item_type}"),
            Type::Map { item_type } => write!(f, "map of {item_type}"),
            Type::Object { .. } => write!(f, "object"),
        }
    }
}

impl Type {
    pub fn list(item_type: Type) -> Type {
        Type::List {
            item_type: Box::new(item_type),
        }
    }

    pub fn map(item_type: Type) -> Type {
        Type::Map {
            item_type: Box::new(item_type),
        }
    }

    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Type)>) -> Type {
        Type::Object {
            fields: fields
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        }
    }

    /// Convert `value` to this type.
    ///
    /// Primitive values are coerced the way configuration languages usually do
    /// (numbers and bools become strings, "true"/"false" and numeric strings become
    /// bools and numbers). Null and unknown values convert to any type unchanged.
    pub fn convert(&self, value: &Value) -> Result<Value> {
        self.convert_at(value, "")
    }

    fn convert_at(&self, value: &Value, path: &str) -> Result<Value> {
        let at = |path: &str| {
            if path.is_empty() {
                String::new()
            } else {
                format!(" at `{path}`")
            }
        };

        match (self, value) {
            (_, Value::Unknown) | (_, Value::Null) | (Type::Any, _) => Ok(value.clone()),

            (Type::String, Value::String(_)) => Ok(value.clone()),
            (Type::String, Value::Number(n)) => Ok(Value::from(n.to_string())),
            (Type::String, Value::Bool(b)) => Ok(Value::from(b.to_string())),

            (Type::Bool, Value::Bool(_)) => Ok(value.clone()),
            (Type::Bool, Value::String(s)) => match s.as_ref() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => bail!("a bool is required{}, found string \"{s}\"", at(path)),
            },

            (Type::Number, Value::Number(_)) => Ok(value.clone()),
            (Type::Number, Value::String(s)) => match s.parse::<Number>() {
                Ok(n) => Ok(Value::Number(n)),
                Err(_) => bail!("a number is required{}, found string \"{s}\"", at(path)),
            },

            (Type::List { item_type }, Value::Array(items)) => {
                let mut converted = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    converted.push(item_type.convert_at(item, &format!("{path}[{idx}]"))?);
                }
                Ok(Value::from(converted))
            }

            (Type::Map { item_type }, Value::Object(fields)) => {
                let mut converted = BTreeMap::new();
                for (k, v) in fields.iter() {
                    let item = item_type.convert_at(v, &Self::join(path, k))?;
                    converted.insert(k.clone(), item);
                }
                Ok(Value::from(converted))
            }

            (Type::Object { fields }, Value::Object(attrs)) => {
                let mut converted = BTreeMap::new();
                for (name, ty) in fields.iter() {
                    match attrs.get(name.as_str()) {
                        Some(v) => {
                            let item = ty.convert_at(v, &Self::join(path, name))?;
                            converted.insert(Rc::from(name.as_str()), item);
                        }
                        None => bail!("attribute \"{name}\" is required{}", at(path)),
                    }
                }
                Ok(Value::from(converted))
            }

            _ => bail!("{self} is required{}, found {}", at(path), value.kind()),
        }
    }

    fn join(path: &str, key: &str) -> String {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    }
}
