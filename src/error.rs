// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Errors that abort the missing tags check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingTagsError {
    /// A resource selects a provider configuration nobody declared
    #[error("The aws provider with alias \"{alias}\" doesn't exist.")]
    UnknownProviderAlias { alias: String },

    /// A `tag` block of an autoscaling group without `key`
    #[error("Did not find expected field \"key\" in aws_autoscaling_group \"{name}\" starting at line {line}")]
    MissingTagKey { name: String, line: u32 },

    /// A tags expression that resolved to something other than a map
    #[error("{at}: tags must be a map of strings, found {found}")]
    NotAMap { at: String, found: &'static str },

    /// The rule was enabled without a configuration block
    #[error("rule \"{rule}\" requires a configuration with a `tags` list")]
    MissingConfig { rule: String },
}
