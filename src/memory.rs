// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An in-memory `Runner` over a declarative description of a configuration.
//!
//! The description is laid out as configuration text so that every block,
//! attribute and expression gets a real location. Inside expressions:
//!
//! - the string `"#unknown"` is a value that cannot be resolved statically,
//! - `{ "ref!": "var.tags" }` is a reference,
//! - `{ "error!": "message" }` is an expression that fails to evaluate.

use crate::body::{Attribute, Block, Body, BodySchema, Expr, ExprKind};
use crate::range::{Pos, Range};
use crate::rule::Rule;
use crate::runner::{Issue, ProviderRef, Runner};
use crate::source::Source;
use crate::typing::Type;
use crate::value::Value;

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Deserializer};

const UNKNOWN_MARKER: &str = "#unknown";
const REF_MARKER: &str = "ref!";
const ERROR_MARKER: &str = "error!";

fn default_provider_name() -> String {
    "aws".to_string()
}

// Distinguish an explicit `null` from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Rule name to rule configuration.
    #[serde(default)]
    pub rules: BTreeMap<String, Value>,
    /// Values of `var.<name>`. Undeclared variables are unknown.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    /// Values of `local.<name>`.
    #[serde(default)]
    pub locals: BTreeMap<String, Value>,
    #[serde(default)]
    pub providers: Vec<ProviderFixture>,
    #[serde(default)]
    pub resources: Vec<ResourceFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderFixture {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default, deserialize_with = "present")]
    pub alias: Option<Value>,
    pub default_tags: Option<DefaultTagsFixture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultTagsFixture {
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceFixture {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default, deserialize_with = "present")]
    pub provider: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
    /// `tag` blocks, each a map of attribute name to expression.
    #[serde(default)]
    pub tag: Vec<BTreeMap<String, Value>>,
}

/// Replace helper encodings inside a literal.
fn process_literal(v: &Value) -> Value {
    match v {
        Value::String(s) if s.as_ref() == UNKNOWN_MARKER => Value::Unknown,
        Value::Array(items) => Value::from(items.iter().map(process_literal).collect::<Vec<_>>()),
        Value::Object(fields) => Value::from(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), process_literal(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
        _ => v.clone(),
    }
}

fn expr_kind(v: &Value) -> ExprKind {
    if let Value::Object(fields) = v {
        if fields.len() == 1 {
            if let Value::String(path) = &v[REF_MARKER] {
                return ExprKind::Traversal(path.split('.').map(Rc::from).collect());
            }
            if let Value::String(msg) = &v[ERROR_MARKER] {
                return ExprKind::Invalid(msg.clone());
            }
        }
    }
    ExprKind::Literal(process_literal(v))
}

fn render_expr(kind: &ExprKind) -> String {
    match kind {
        ExprKind::Literal(v) => v.to_string(),
        ExprKind::Traversal(parts) => parts
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<&str>>()
            .join("."),
        ExprKind::Invalid(msg) => format!("error({msg:?})"),
    }
}

/// Writes configuration text line by line and hands out ranges into it.
struct Layout {
    filename: Rc<str>,
    contents: String,
    line: u32,
    anchors: BTreeMap<String, Range>,
}

impl Layout {
    fn new(filename: &str) -> Self {
        Self {
            filename: filename.into(),
            contents: String::new(),
            line: 0,
            anchors: BTreeMap::new(),
        }
    }

    /// Append a line and return the position of its first non-blank character.
    fn push_line(&mut self, indent: usize, text: &str) -> Pos {
        self.line += 1;
        let byte = (self.contents.len() + indent) as u32;
        self.contents.push_str(&" ".repeat(indent));
        self.contents.push_str(text);
        self.contents.push('\n');
        Pos {
            line: self.line,
            column: indent as u32 + 1,
            byte,
        }
    }

    fn range(&self, start: Pos, len: usize) -> Range {
        let end = Pos {
            line: start.line,
            column: start.column + len as u32,
            byte: start.byte + len as u32,
        };
        Range::new(self.filename.clone(), start, end)
    }

    fn anchor(&mut self, name: String, range: &Range) {
        self.anchors.insert(name, range.clone());
    }

    fn attribute(&mut self, indent: usize, name: &str, kind: ExprKind, anchor: String) -> Attribute {
        let prefix = format!("{name} = ");
        let text = render_expr(&kind);
        let start = self.push_line(indent, &format!("{prefix}{text}"));
        let range = self.range(start, prefix.len() + text.len());
        let expr_start = Pos {
            line: start.line,
            column: start.column + prefix.len() as u32,
            byte: start.byte + prefix.len() as u32,
        };
        let expr_range = self.range(expr_start, text.len());
        self.anchor(anchor, &expr_range);
        Attribute {
            name: name.into(),
            expr: Expr {
                kind,
                range: expr_range,
            },
            range,
        }
    }

    /// Open a block and return its definition range.
    fn open_block(&mut self, indent: usize, header: &str, anchor: String) -> Range {
        let start = self.push_line(indent, &format!("{header} {{"));
        let range = self.range(start, header.len());
        self.anchor(anchor, &range);
        range
    }

    fn close_block(&mut self, indent: usize) {
        self.push_line(indent, "}");
    }

    fn provider(&mut self, provider: &ProviderFixture) -> Block {
        let mut anchor = format!("provider.{}", provider.name);
        if let Some(Value::String(alias)) = &provider.alias {
            anchor = format!("{anchor}.{alias}");
        }

        let def_range = self.open_block(0, &format!("provider {:?}", provider.name), anchor.clone());
        let mut body = Body::default();
        if let Some(alias) = &provider.alias {
            let attr = self.attribute(2, "alias", expr_kind(alias), format!("{anchor}.alias"));
            body.attributes.insert(attr.name.clone(), attr);
        }
        if let Some(default_tags) = &provider.default_tags {
            let block_anchor = format!("{anchor}.default_tags");
            let block_range = self.open_block(2, "default_tags", block_anchor.clone());
            let mut block_body = Body::default();
            if let Some(tags) = &default_tags.tags {
                let attr = self.attribute(4, "tags", expr_kind(tags), format!("{block_anchor}.tags"));
                block_body.attributes.insert(attr.name.clone(), attr);
            }
            self.close_block(2);
            body.blocks.push(Block {
                kind: "default_tags".into(),
                labels: vec![],
                body: block_body,
                def_range: block_range,
            });
        }
        self.close_block(0);
        self.push_line(0, "");

        Block {
            kind: "provider".into(),
            labels: vec![provider.name.as_str().into()],
            body,
            def_range,
        }
    }

    fn resource(&mut self, resource: &ResourceFixture) -> Block {
        let anchor = format!("{}.{}", resource.resource_type, resource.name);
        let header = format!("resource {:?} {:?}", resource.resource_type, resource.name);
        let def_range = self.open_block(0, &header, anchor.clone());

        let mut body = Body::default();
        for (name, expr) in [("provider", &resource.provider), ("tags", &resource.tags)] {
            if let Some(expr) = expr {
                let attr = self.attribute(2, name, expr_kind(expr), format!("{anchor}.{name}"));
                body.attributes.insert(attr.name.clone(), attr);
            }
        }
        for (idx, tag) in resource.tag.iter().enumerate() {
            let tag_anchor = format!("{anchor}.tag[{idx}]");
            let tag_range = self.open_block(2, "tag", tag_anchor.clone());
            let mut tag_body = Body::default();
            for (name, expr) in tag {
                let attr = self.attribute(4, name, expr_kind(expr), format!("{tag_anchor}.{name}"));
                tag_body.attributes.insert(attr.name.clone(), attr);
            }
            self.close_block(2);
            body.blocks.push(Block {
                kind: "tag".into(),
                labels: vec![],
                body: tag_body,
                def_range: tag_range,
            });
        }
        self.close_block(0);
        self.push_line(0, "");

        Block {
            kind: "resource".into(),
            labels: vec![
                resource.resource_type.as_str().into(),
                resource.name.as_str().into(),
            ],
            body,
            def_range,
        }
    }
}

/// A `Runner` over an in-memory configuration. Issues are collected in order.
#[derive(Debug, Clone)]
pub struct MemoryRunner {
    source: Source,
    providers: Vec<Block>,
    resources: Vec<Block>,
    variables: BTreeMap<String, Value>,
    locals: BTreeMap<String, Value>,
    rules: BTreeMap<String, Value>,
    anchors: BTreeMap<String, Range>,
    issues: Vec<Issue>,
}

impl MemoryRunner {
    pub const FILENAME: &'static str = "main.tf";

    pub fn from_fixture(fixture: Fixture) -> Result<Self> {
        let mut layout = Layout::new(Self::FILENAME);
        let providers = fixture
            .providers
            .iter()
            .map(|p| layout.provider(p))
            .collect();
        let resources = fixture
            .resources
            .iter()
            .map(|r| layout.resource(r))
            .collect();

        Ok(Self {
            source: Source::from_contents(layout.filename, layout.contents)?,
            providers,
            resources,
            variables: fixture.variables,
            locals: fixture.locals,
            rules: fixture.rules,
            anchors: layout.anchors,
            issues: vec![],
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_fixture(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::from_fixture(serde_yaml::from_str(yaml)?)
    }

    pub fn set_rule_config(&mut self, rule_name: &str, config: Value) {
        self.rules.insert(rule_name.to_string(), config);
    }

    /// The configuration text the fixture was laid out as.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Range recorded for an anchor such as `aws_s3_bucket.b` or `aws_s3_bucket.b.tags`.
    pub fn range_of(&self, anchor: &str) -> Option<&Range> {
        self.anchors.get(anchor)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    /// Run `rule` and return the issues it emitted.
    pub fn check(&mut self, rule: &dyn Rule) -> Result<Vec<Issue>> {
        self.issues.clear();
        rule.check(self)?;
        Ok(self.take_issues())
    }

    /// Issue message with the offending line and a caret under its start.
    pub fn render(&self, issue: &Issue) -> String {
        self.source.range_message(
            &issue.range,
            &issue.severity.to_string(),
            &format!("{} ({})", issue.message, issue.rule),
        )
    }

    fn content_of(blocks: &[Block], label: &str, schema: &BodySchema) -> Result<Vec<Block>> {
        blocks
            .iter()
            .filter(|b| b.label(0) == label)
            .map(|b| {
                Ok(Block {
                    kind: b.kind.clone(),
                    labels: b.labels.clone(),
                    body: b.body.content(schema, &b.def_range)?,
                    def_range: b.def_range.clone(),
                })
            })
            .collect()
    }

    fn resolve_reference(&self, parts: &[Rc<str>], range: &Range) -> Result<Value> {
        let path: Vec<&str> = parts.iter().map(|p| p.as_ref()).collect();
        let (root, name, rest) = match path.as_slice() {
            [root, name, rest @ ..] => (*root, *name, rest),
            _ => bail!("{range}: unsupported reference `{}`", path.join(".")),
        };

        let value = match root {
            // A variable without a value is supplied at apply time.
            "var" => match self.variables.get(name) {
                Some(v) => v.clone(),
                None => return Ok(Value::Unknown),
            },
            "local" => match self.locals.get(name) {
                Some(v) => v.clone(),
                None => bail!("{range}: a local value with the name \"{name}\" has not been declared"),
            },
            _ => bail!("{range}: unsupported reference `{}`", path.join(".")),
        };

        process_literal(&value)
            .get_path(rest)
            .map_err(|e| anyhow!("{range}: {e}"))
    }
}

impl Runner for MemoryRunner {
    fn resource_content(&self, resource_type: &str, schema: &BodySchema) -> Result<Vec<Block>> {
        Self::content_of(&self.resources, resource_type, schema)
    }

    fn provider_content(&self, provider_name: &str, schema: &BodySchema) -> Result<Vec<Block>> {
        Self::content_of(&self.providers, provider_name, schema)
    }

    fn evaluate(&self, expr: &Expr, want: Option<&Type>) -> Result<Value> {
        let value = match &expr.kind {
            ExprKind::Literal(v) => v.clone(),
            ExprKind::Traversal(parts) => self.resolve_reference(parts, &expr.range)?,
            ExprKind::Invalid(msg) => bail!("{}: {msg}", expr.range),
        };

        match want {
            Some(ty) => ty
                .convert(&value)
                .map_err(|e| anyhow!("{}: inappropriate value: {e}", expr.range)),
            None => Ok(value),
        }
    }

    fn decode_provider_ref(&self, expr: &Expr) -> Result<ProviderRef> {
        match &expr.kind {
            ExprKind::Traversal(parts) => match parts.as_slice() {
                [name] => Ok(ProviderRef {
                    name: name.clone(),
                    alias: None,
                }),
                [name, alias] => Ok(ProviderRef {
                    name: name.clone(),
                    alias: Some(alias.clone()),
                }),
                _ => bail!(
                    "{}: provider argument requires a provider name followed by an optional alias name",
                    expr.range
                ),
            },
            _ => bail!(
                "{}: a provider configuration reference is required, found an expression",
                expr.range
            ),
        }
    }

    fn decode_rule_config(&self, rule_name: &str) -> Result<Option<Value>> {
        Ok(self.rules.get(rule_name).cloned())
    }

    fn emit_issue(&mut self, rule: &dyn Rule, message: String, range: Range) {
        self.issues.push(Issue::new(rule, message, range));
    }
}
