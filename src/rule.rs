// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::runner::Runner;

use core::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Notice => write!(f, "notice"),
        }
    }
}

/// A check run against a whole configuration.
pub trait Rule {
    fn name(&self) -> &'static str;

    /// Whether the rule runs without being switched on in the host's configuration.
    fn enabled(&self) -> bool;

    fn severity(&self) -> Severity;

    /// Where the rule's documentation lives.
    fn link(&self) -> String;

    /// Inspect the configuration and report findings through `runner`.
    ///
    /// An error aborts the check; findings are never reported as errors.
    fn check(&self, runner: &mut dyn Runner) -> Result<()>;
}

/// Documentation location of a rule shipped with this crate.
pub fn reference_link(rule_name: &str) -> String {
    format!("docs/rules/{rule_name}.md")
}
