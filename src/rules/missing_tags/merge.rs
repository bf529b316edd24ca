// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::body::Block;
use crate::error::MissingTagsError;
use crate::range::Range;
use crate::runner::Runner;
use crate::tags::{tag_map_from_value, TagMap};

use anyhow::Result;
use tracing::{debug, error};

use super::provider::ProviderTagTable;
use super::{DEFAULT_ALIAS, PROVIDER_ATTRIBUTE, TAGS_ATTRIBUTE};

/// Effective tags of a resource and the range findings about them belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTags {
    pub tags: TagMap,
    pub range: Range,
}

/// Alias of the provider configuration `resource` is managed by.
pub fn provider_alias(
    runner: &dyn Runner,
    resource: &Block,
    providers: &ProviderTagTable,
) -> Result<String> {
    let Some(attr) = resource.body.attribute(PROVIDER_ATTRIBUTE) else {
        return Ok(DEFAULT_ALIAS.to_string());
    };

    let provider = runner.decode_provider_ref(&attr.expr)?;
    match provider.alias {
        // `provider = aws` selects the default configuration, which always exists.
        None => Ok(DEFAULT_ALIAS.to_string()),
        Some(alias) if providers.contains(&alias) => Ok(alias.to_string()),
        Some(alias) => {
            let err = MissingTagsError::UnknownProviderAlias {
                alias: alias.to_string(),
            };
            error!("error querying provider tags: {err}");
            Err(err.into())
        }
    }
}

/// Provider default tags of `resource` overlaid with its own `tags`.
pub fn merge_resource_tags(
    runner: &dyn Runner,
    resource: &Block,
    providers: &ProviderTagTable,
) -> Result<ResolvedTags> {
    let alias = provider_alias(runner, resource, providers)?;

    // Provider defaults are overridden by the resource's own tags.
    let mut tags = providers.default_tags(&alias).cloned().unwrap_or_default();

    let Some(attr) = resource.body.attribute(TAGS_ATTRIBUTE) else {
        debug!("walk `{}` resource", resource.address());
        return Ok(ResolvedTags {
            tags,
            range: resource.def_range.clone(),
        });
    };

    debug!("walk `{}.{}` attribute", resource.address(), TAGS_ATTRIBUTE);
    let value = runner.evaluate(&attr.expr, None)?;
    if value.is_unknown() || value.is_null() {
        debug!(
            "the missing tags rule can only evaluate provided variables, skipping {}.{}",
            resource.address(),
            TAGS_ATTRIBUTE
        );
        return Ok(ResolvedTags {
            tags,
            range: resource.def_range.clone(),
        });
    }

    if !value.is_wholly_known() {
        debug!(
            "some tags of {} are unknown, their values count as empty",
            resource.address()
        );
    }
    tags.extend(tag_map_from_value(&value, &attr.expr.range)?);
    Ok(ResolvedTags {
        tags,
        range: attr.expr.range.clone(),
    })
}
