// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::tags::TagMap;

/// Required keys absent from `tags`, sorted and without duplicates.
pub fn missing_tags(required: &[String], tags: &TagMap) -> Vec<String> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|key| !tags.contains_key(key.as_str()))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

/// The finding for a resource lacking `missing`, or `None` when nothing is missing.
pub fn missing_tags_message(missing: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let wanted = missing
        .iter()
        .map(|tag| format!("\"{tag}\""))
        .collect::<Vec<String>>()
        .join(", ");
    Some(format!(
        "The resource is missing the following tags: {wanted}."
    ))
}
