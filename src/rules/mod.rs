// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub mod missing_tags;

pub use missing_tags::AwsResourceMissingTagsRule;

use crate::rule::Rule;

/// Every rule shipped with this crate.
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![Box::new(AwsResourceMissingTagsRule::new())]
}

/// Look up a shipped rule by name.
pub fn find(name: &str) -> Option<Box<dyn Rule>> {
    all().into_iter().find(|r| r.name() == name)
}
