// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! `aws_resource_missing_tags`: every taggable resource must carry the
//! configured tag keys once provider `default_tags` are taken into account.

mod autoscaling;
mod config;
mod evaluate;
mod merge;
mod provider;

pub use autoscaling::{AutoscalingTagRecord, AutoscalingTags, AUTOSCALING_GROUP};
pub use config::RuleConfig;
pub use evaluate::{missing_tags, missing_tags_message};
pub use merge::{merge_resource_tags, provider_alias, ResolvedTags};
pub use provider::ProviderTagTable;

use crate::body::BodySchema;
use crate::catalog::TAGGABLE_RESOURCES;
use crate::range::Range;
use crate::rule::{reference_link, Rule, Severity};
use crate::runner::Runner;
use crate::tags::TagMap;

use anyhow::Result;
use tracing::{debug, trace};

const PROVIDER_NAME: &str = "aws";
const DEFAULT_ALIAS: &str = "default";
const DEFAULT_TAGS_BLOCK: &str = "default_tags";
const TAGS_ATTRIBUTE: &str = "tags";
const PROVIDER_ATTRIBUTE: &str = "provider";

const CONFLICT_MESSAGE: &str = "Only tag block or tags attribute may be present, but found both";

/// Checks whether resources are tagged with the configured keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsResourceMissingTagsRule;

impl AwsResourceMissingTagsRule {
    pub fn new() -> Self {
        Self
    }

    fn emit_missing(&self, runner: &mut dyn Runner, config: &RuleConfig, tags: &TagMap, range: Range) {
        let missing = missing_tags(&config.tags, tags);
        if let Some(message) = missing_tags_message(&missing) {
            runner.emit_issue(self, message, range);
        }
    }

    fn check_resources(
        &self,
        runner: &mut dyn Runner,
        config: &RuleConfig,
        providers: &ProviderTagTable,
    ) -> Result<()> {
        let schema = BodySchema::new()
            .attribute(TAGS_ATTRIBUTE)
            .attribute(PROVIDER_ATTRIBUTE);

        for resource_type in TAGGABLE_RESOURCES {
            if config.is_excluded(resource_type) {
                continue;
            }

            let resources = runner.resource_content(resource_type, &schema)?;
            if resources.is_empty() {
                continue;
            }

            for resource in &resources {
                let resolved = merge_resource_tags(&*runner, resource, providers)?;
                self.emit_missing(runner, config, &resolved.tags, resolved.range);
            }
        }
        Ok(())
    }

    fn check_autoscaling_groups(&self, runner: &mut dyn Runner, config: &RuleConfig) -> Result<()> {
        if config.is_excluded(AUTOSCALING_GROUP) {
            return Ok(());
        }

        let resources = runner.resource_content(AUTOSCALING_GROUP, &autoscaling::schema())?;
        for resource in &resources {
            debug!("walk `{}` resource", resource.address());
            match autoscaling::resolve(&*runner, resource)? {
                AutoscalingTags::Conflict(range) => {
                    runner.emit_issue(self, CONFLICT_MESSAGE.to_string(), range)
                }
                AutoscalingTags::NoneDeclared(range) => {
                    self.emit_missing(runner, config, &TagMap::new(), range)
                }
                AutoscalingTags::FromBlocks(resolved) | AutoscalingTags::FromAttribute(resolved) => {
                    self.emit_missing(runner, config, &resolved.tags, resolved.range)
                }
            }
        }
        Ok(())
    }
}

impl Rule for AwsResourceMissingTagsRule {
    fn name(&self) -> &'static str {
        "aws_resource_missing_tags"
    }

    fn enabled(&self) -> bool {
        false
    }

    fn severity(&self) -> Severity {
        Severity::Notice
    }

    fn link(&self) -> String {
        reference_link(self.name())
    }

    fn check(&self, runner: &mut dyn Runner) -> Result<()> {
        trace!("check `{}` rule", self.name());

        let config = RuleConfig::decode(&*runner, self.name())?;
        let providers = ProviderTagTable::resolve(&*runner)?;

        self.check_resources(runner, &config, &providers)?;

        // Autoscaling groups declare tags differently from every other resource.
        self.check_autoscaling_groups(runner, &config)
    }
}
