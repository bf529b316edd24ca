// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::body::{Block, BodySchema, Expr};
use crate::range::Range;
use crate::rule::{Rule, Severity};
use crate::typing::Type;
use crate::value::Value;

use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A provider configuration selected by a resource's `provider` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRef {
    pub name: Rc<str>,
    /// `None` for the provider's default configuration.
    pub alias: Option<Rc<str>>,
}

/// An observation made by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub range: Range,
}

/// Access to the configuration under check.
///
/// Hosts implement this on top of their parser and expression evaluator. Rules
/// only ever see the configuration through it.
pub trait Runner {
    /// All `resource` blocks of `resource_type`, restricted to `schema`.
    fn resource_content(&self, resource_type: &str, schema: &BodySchema) -> Result<Vec<Block>>;

    /// All `provider` blocks for `provider_name`, restricted to `schema`.
    fn provider_content(&self, provider_name: &str, schema: &BodySchema) -> Result<Vec<Block>>;

    /// Statically evaluate `expr`, converting the result to `want` if given.
    ///
    /// Values that cannot be resolved statically are returned as `Value::Unknown`
    /// rather than as an error. Errors mean the expression itself is broken.
    fn evaluate(&self, expr: &Expr, want: Option<&Type>) -> Result<Value>;

    /// Decode the reference in a resource's `provider` argument.
    fn decode_provider_ref(&self, expr: &Expr) -> Result<ProviderRef>;

    /// The configuration block of the named rule, if the user wrote one.
    fn decode_rule_config(&self, rule_name: &str) -> Result<Option<Value>>;

    fn emit_issue(&mut self, rule: &dyn Rule, message: String, range: Range);
}

impl Issue {
    pub fn new(rule: &dyn Rule, message: String, range: Range) -> Self {
        Self {
            rule: rule.name().to_string(),
            severity: rule.severity(),
            message,
            range,
        }
    }
}
