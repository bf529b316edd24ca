// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::MissingTagsError;
use crate::runner::Runner;

use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// User configuration of the missing tags rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Tag keys every resource must carry.
    pub tags: Vec<String>,

    /// Resource types that are not checked.
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl RuleConfig {
    pub fn decode(runner: &dyn Runner, rule_name: &str) -> Result<Self> {
        let Some(value) = runner.decode_rule_config(rule_name)? else {
            return Err(MissingTagsError::MissingConfig {
                rule: rule_name.to_string(),
            }
            .into());
        };

        let config: RuleConfig = value
            .deserialize_into()
            .with_context(|| format!("invalid configuration for rule \"{rule_name}\""))?;
        if config.tags.is_empty() {
            bail!("invalid configuration for rule \"{rule_name}\": `tags` must list at least one tag");
        }
        Ok(config)
    }

    pub fn is_excluded(&self, resource_type: &str) -> bool {
        self.exclude.contains(resource_type)
    }
}
