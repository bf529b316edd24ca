// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Attribute/block tree of a parsed configuration, and the schemas used to
//! select parts of it.

use crate::range::Range;
use crate::value::Value;

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal or an already folded constant. May contain unknown values.
    Literal(Value),

    /// A reference such as `var.tags` or `aws.prod`.
    Traversal(Vec<Rc<str>>),

    /// An expression the evaluator cannot make sense of.
    Invalid(Rc<str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: Range,
}

impl Expr {
    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Dotted form of a traversal, e.g. `aws.prod`.
    pub fn traversal_path(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Traversal(parts) => Some(
                parts
                    .iter()
                    .map(|p| p.as_ref())
                    .collect::<Vec<&str>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Rc<str>,
    pub expr: Expr,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: Rc<str>,
    pub labels: Vec<Rc<str>>,
    pub body: Body,
    pub def_range: Range,
}

impl Block {
    /// Labels joined with dots, e.g. `aws_s3_bucket.logs`.
    pub fn address(&self) -> String {
        self.labels
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<&str>>()
            .join(".")
    }

    pub fn label(&self, idx: usize) -> &str {
        self.labels.get(idx).map(|l| l.as_ref()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub attributes: BTreeMap<Rc<str>, Attribute>,
    pub blocks: Vec<Block>,
}

impl Body {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn blocks_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.kind.as_ref() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }

    /// Select the attributes and nested blocks named by `schema`.
    ///
    /// Anything the schema does not mention is left out. A required attribute
    /// that is not declared is an error reported at `def_range`.
    pub fn content(&self, schema: &BodySchema, def_range: &Range) -> Result<Body> {
        let mut attributes = BTreeMap::new();
        for attr_schema in &schema.attributes {
            match self.attributes.get(attr_schema.name.as_str()) {
                Some(attr) => {
                    attributes.insert(attr.name.clone(), attr.clone());
                }
                None if attr_schema.required => bail!(
                    "{def_range}: the argument \"{}\" is required, but no definition was found",
                    attr_schema.name
                ),
                None => (),
            }
        }

        let mut blocks = vec![];
        for block in &self.blocks {
            let Some(block_schema) = schema
                .blocks
                .iter()
                .find(|s| s.kind == block.kind.as_ref())
            else {
                continue;
            };
            blocks.push(Block {
                kind: block.kind.clone(),
                labels: block.labels.clone(),
                body: block.body.content(&block_schema.body, &block.def_range)?,
                def_range: block.def_range.clone(),
            });
        }

        Ok(Body { attributes, blocks })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSchema {
    pub kind: String,
    pub body: BodySchema,
}

/// The shape of a body a rule is interested in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    pub attributes: Vec<AttributeSchema>,
    pub blocks: Vec<BlockSchema>,
}

impl BodySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.attributes.push(AttributeSchema {
            name: name.to_string(),
            required: false,
        });
        self
    }

    pub fn required_attribute(mut self, name: &str) -> Self {
        self.attributes.push(AttributeSchema {
            name: name.to_string(),
            required: true,
        });
        self
    }

    pub fn block(mut self, kind: &str, body: BodySchema) -> Self {
        self.blocks.push(BlockSchema {
            kind: kind.to_string(),
            body,
        });
        self
    }
}
