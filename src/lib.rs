// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod body;
mod catalog;
mod error;
mod memory;
mod range;
mod rule;
mod runner;
mod source;
mod tags;
mod typing;
mod value;

pub mod rules;

pub use body::{Attribute, AttributeSchema, Block, BlockSchema, Body, BodySchema, Expr, ExprKind};
pub use catalog::{is_taggable, TAGGABLE_RESOURCES};
pub use error::MissingTagsError;
pub use memory::{DefaultTagsFixture, Fixture, MemoryRunner, ProviderFixture, ResourceFixture};
pub use range::{Pos, Range};
pub use rule::{reference_link, Rule, Severity};
pub use runner::{Issue, ProviderRef, Runner};
pub use source::Source;
pub use tags::{tag_map_from_value, TagMap};
pub use typing::Type;
pub use value::{Number, Value};

#[cfg(test)]
mod tests;
