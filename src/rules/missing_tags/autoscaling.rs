// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tags of `aws_autoscaling_group` resources.
//!
//! Autoscaling groups declare tags either with repeated `tag` blocks or with a
//! `tags` attribute holding a list of `{ key, value, propagate_at_launch }`
//! records. The two forms may not be mixed in one resource.

use crate::body::{Block, BodySchema};
use crate::error::MissingTagsError;
use crate::range::Range;
use crate::runner::Runner;
use crate::tags::TagMap;
use crate::typing::Type;
use crate::value::Value;

use anyhow::Result;
use tracing::debug;

use super::merge::ResolvedTags;
use super::TAGS_ATTRIBUTE;

pub const AUTOSCALING_GROUP: &str = "aws_autoscaling_group";

const TAG_BLOCK: &str = "tag";
const KEY_ATTRIBUTE: &str = "key";

/// One element of the `tags` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoscalingTagRecord {
    pub key: String,
    pub value: String,
    pub propagate_at_launch: bool,
}

impl AutoscalingTagRecord {
    /// Shape the `tags` attribute is evaluated against.
    pub fn list_type() -> Type {
        Type::list(Type::object([
            ("key", Type::String),
            ("value", Type::String),
            ("propagate_at_launch", Type::Bool),
        ]))
    }

    /// Read a converted record. Records whose key is not known yield `None`.
    fn from_value(value: &Value) -> Option<Self> {
        let Value::String(key) = &value["key"] else {
            return None;
        };
        let value_str = match &value["value"] {
            Value::String(s) => s.to_string(),
            _ => String::new(),
        };
        Some(Self {
            key: key.to_string(),
            value: value_str,
            propagate_at_launch: matches!(value["propagate_at_launch"], Value::Bool(true)),
        })
    }
}

/// How an autoscaling group declares its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoscalingTags {
    /// Neither form is used. Findings go to the resource definition.
    NoneDeclared(Range),
    FromBlocks(ResolvedTags),
    FromAttribute(ResolvedTags),
    /// Both forms are used.
    Conflict(Range),
}

pub fn schema() -> BodySchema {
    BodySchema::new()
        .attribute(TAGS_ATTRIBUTE)
        .block(TAG_BLOCK, BodySchema::new().attribute(KEY_ATTRIBUTE))
}

/// Keys declared with `tag` blocks. Block tags carry no value here.
pub fn block_tags(runner: &dyn Runner, resource: &Block) -> Result<TagMap> {
    let mut tags = TagMap::new();
    for tag in resource.body.blocks_of_kind(TAG_BLOCK) {
        let Some(attr) = tag.body.attribute(KEY_ATTRIBUTE) else {
            return Err(MissingTagsError::MissingTagKey {
                name: resource.label(1).to_string(),
                line: resource.def_range.start.line,
            }
            .into());
        };

        match runner.evaluate(&attr.expr, Some(&Type::String))? {
            Value::String(key) => {
                tags.insert(key.to_string(), String::new());
            }
            _ => debug!(
                "the missing tags rule can only evaluate provided variables, skipping tag key at {}",
                attr.expr.range
            ),
        }
    }
    Ok(tags)
}

/// Tags declared with the `tags` attribute, with the attribute's expression range.
pub fn attribute_tags(runner: &dyn Runner, resource: &Block) -> Result<Option<ResolvedTags>> {
    let Some(attr) = resource.body.attribute(TAGS_ATTRIBUTE) else {
        return Ok(None);
    };

    let value = runner.evaluate(&attr.expr, Some(&AutoscalingTagRecord::list_type()))?;
    let mut tags = TagMap::new();
    match &value {
        Value::Array(items) => {
            for record in items.iter().filter_map(AutoscalingTagRecord::from_value) {
                tags.insert(record.key, record.value);
            }
        }
        _ => debug!(
            "the missing tags rule can only evaluate provided variables, skipping {}.{}",
            resource.address(),
            TAGS_ATTRIBUTE
        ),
    }

    Ok(Some(ResolvedTags {
        tags,
        range: attr.expr.range.clone(),
    }))
}

/// Resolve both tag forms of `resource` and decide which one applies.
pub fn resolve(runner: &dyn Runner, resource: &Block) -> Result<AutoscalingTags> {
    let blocks = block_tags(runner, resource)?;
    let attribute = attribute_tags(runner, resource)?.filter(|r| !r.tags.is_empty());

    Ok(match (blocks.is_empty(), attribute) {
        (false, Some(_)) => AutoscalingTags::Conflict(resource.def_range.clone()),
        (true, None) => AutoscalingTags::NoneDeclared(resource.def_range.clone()),
        (false, None) => AutoscalingTags::FromBlocks(ResolvedTags {
            tags: blocks,
            range: resource.def_range.clone(),
        }),
        (true, Some(resolved)) => AutoscalingTags::FromAttribute(resolved),
    })
}
