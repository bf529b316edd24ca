// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::MissingTagsError;
use crate::range::Range;
use crate::value::Value;

use std::collections::BTreeMap;

use anyhow::Result;

/// Tag key to tag value.
///
/// An empty value stands for a tag that is declared but whose value is null,
/// not a string, or could not be resolved.
pub type TagMap = BTreeMap<String, String>;

/// Convert an evaluated `tags` map to a `TagMap`.
///
/// Only string values are kept as is; every other value, unknown included,
/// contributes an empty string. `range` locates the expression for errors.
pub fn tag_map_from_value(value: &Value, range: &Range) -> Result<TagMap> {
    let Value::Object(fields) = value else {
        return Err(MissingTagsError::NotAMap {
            at: range.to_string(),
            found: value.kind(),
        }
        .into());
    };

    Ok(fields
        .iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.to_string(),
                _ => String::new(),
            };
            (k.to_string(), v)
        })
        .collect())
}
