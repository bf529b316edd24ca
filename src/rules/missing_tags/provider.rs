// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::body::BodySchema;
use crate::runner::Runner;
use crate::tags::{tag_map_from_value, TagMap};
use crate::typing::Type;
use crate::value::Value;

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::debug;

use super::{DEFAULT_ALIAS, DEFAULT_TAGS_BLOCK, PROVIDER_NAME, TAGS_ATTRIBUTE};

const ALIAS_ATTRIBUTE: &str = "alias";

/// Default tags of every declared provider configuration, keyed by alias.
///
/// A provider without usable default tags is still present, with `None`, so
/// that references to its alias stay valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTagTable {
    providers: BTreeMap<String, Option<TagMap>>,
}

impl ProviderTagTable {
    pub fn resolve(runner: &dyn Runner) -> Result<Self> {
        let schema = BodySchema::new().attribute(ALIAS_ATTRIBUTE).block(
            DEFAULT_TAGS_BLOCK,
            BodySchema::new().attribute(TAGS_ATTRIBUTE),
        );

        let mut table = Self::default();
        for provider in runner.provider_content(PROVIDER_NAME, &schema)? {
            let alias = match provider.body.attribute(ALIAS_ATTRIBUTE) {
                None => DEFAULT_ALIAS.to_string(),
                Some(attr) => match runner.evaluate(&attr.expr, Some(&Type::String))? {
                    Value::String(alias) => alias.to_string(),
                    // Unknown or null. Resources selecting this provider fail the alias lookup.
                    _ => {
                        debug!(
                            "the missing tags rule can only evaluate provided variables, skipping provider alias at {}",
                            attr.expr.range
                        );
                        continue;
                    }
                },
            };
            debug!(alias = %alias, "walk provider");
            table.providers.entry(alias.clone()).or_insert(None);

            for block in provider.body.blocks_of_kind(DEFAULT_TAGS_BLOCK) {
                let Some(attr) = block.body.attribute(TAGS_ATTRIBUTE) else {
                    continue;
                };

                let value = runner.evaluate(&attr.expr, None)?;
                if value.is_unknown() || value.is_null() {
                    debug!(
                        "the missing tags rule can only evaluate provided variables, skipping {}.{}.{}.{}",
                        PROVIDER_NAME, alias, DEFAULT_TAGS_BLOCK, TAGS_ATTRIBUTE
                    );
                    continue;
                }

                let tags = tag_map_from_value(&value, &attr.expr.range)?;
                debug!(alias = %alias, ?tags, "provider default tags");
                table.providers.insert(alias.clone(), Some(tags));
            }
        }

        Ok(table)
    }

    /// Whether a provider configuration with this alias was declared.
    pub fn contains(&self, alias: &str) -> bool {
        self.providers.contains_key(alias)
    }

    /// Default tags of the provider with this alias, if it declares any.
    pub fn default_tags(&self, alias: &str) -> Option<&TagMap> {
        self.providers.get(alias).and_then(Option::as_ref)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Number of provider configurations with a known alias.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider configuration with a known alias was declared.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl FromIterator<(String, Option<TagMap>)> for ProviderTagTable {
    fn from_iter<I: IntoIterator<Item = (String, Option<TagMap>)>>(iter: I) -> Self {
        Self {
            providers: iter.into_iter().collect(),
        }
    }
}
