// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used, clippy::print_stderr)] // test harness asserts and unwraps to validate rule behavior

use crate::rules::missing_tags::ProviderTagTable;
use crate::rules::AwsResourceMissingTagsRule;
use crate::*;

use std::env;

use anyhow::{bail, Result};
use serde::Deserialize;
use test_generator::test_resources;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct WantIssue {
    message: String,
    /// Anchor of the range the issue must point at, e.g. `aws_s3_bucket.b.tags`.
    at: String,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    config: Option<Value>,
    #[serde(default)]
    module: Fixture,
    want_issues: Option<Vec<WantIssue>>,
    error: Option<String>,
    skip: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn check_issues(runner: &MemoryRunner, computed: &[Issue], expected: &[WantIssue]) -> Result<()> {
    if computed.len() != expected.len() {
        let rendered: Vec<String> = computed.iter().map(|i| runner.render(i)).collect();
        bail!(
            "the number of computed issues ({}) and expected issues ({}) is not equal:{}",
            computed.len(),
            expected.len(),
            rendered.join("\n")
        );
    }

    for (issue, want) in computed.iter().zip(expected) {
        if issue.message != want.message {
            std::println!(
                "message mismatch :\n{}",
                prettydiff::diff_chars(&want.message, &issue.message)
            );
            bail!("expected `{}`, found `{}`", want.message, issue.message);
        }

        let Some(range) = runner.range_of(&want.at) else {
            bail!("unknown anchor `{}`", want.at);
        };
        if &issue.range != range {
            bail!(
                "issue `{}` reported at {} instead of {} ({})",
                issue.message,
                issue.range,
                range,
                want.at
            );
        }

        assert_eq!(issue.rule, "aws_resource_missing_tags");
        assert_eq!(issue.severity, Severity::Notice);
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    init_logging();

    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    std::println!("running {file}");

    let rule = AwsResourceMissingTagsRule::new();
    for case in test.cases {
        std::print!("case {} ", case.note);
        if case.skip == Some(true) {
            std::println!("skipped");
            continue;
        }

        match (&case.want_issues, &case.error) {
            (Some(_), None) | (None, Some(_)) => (),
            _ => panic!("either want_issues or error must be specified in test case."),
        }

        let mut runner = MemoryRunner::from_fixture(case.module)?;
        if let Some(config) = case.config {
            runner.set_rule_config(rule.name(), config);
        }

        match runner.check(&rule) {
            Ok(issues) => match &case.want_issues {
                Some(expected) => check_issues(&runner, &issues, expected)?,
                None => bail!("check succeeded and did not produce any errors"),
            },
            Err(actual) => match &case.error {
                Some(expected) => {
                    let actual = format!("{actual:#}");
                    if !actual.contains(expected.as_str()) {
                        bail!(
                            "Error message\n`{}\n`\ndoes not contain `{}`",
                            actual,
                            expected
                        );
                    }
                    std::println!("{actual}");
                }
                _ => return Err(actual),
            },
        }

        std::println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test]
fn yaml_test_basic() -> Result<()> {
    yaml_test("tests/missing_tags/cases/basic.yaml")
}

#[test]
#[ignore = "intended for running a single yaml file"]
fn one_yaml() -> Result<()> {
    let mut file = String::default();

    for a in env::args() {
        if a.ends_with(".yaml") {
            file = a;
        }
    }

    if file.is_empty() {
        bail!("missing <yaml-file>");
    }

    yaml_test(file.as_str())
}

#[test_resources("tests/missing_tags/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn rule_metadata() {
    let rule = AwsResourceMissingTagsRule::new();
    assert_eq!(rule.name(), "aws_resource_missing_tags");
    assert!(!rule.enabled());
    assert_eq!(rule.severity(), Severity::Notice);
    assert_eq!(rule.link(), "docs/rules/aws_resource_missing_tags.md");
    assert!(std::path::Path::new(&rule.link()).exists());
    assert!(rules::find("aws_resource_missing_tags").is_some());
    assert_eq!(rules::all().len(), 1);
}

#[test]
fn unknown_tags_are_logged_not_fatal() -> Result<()> {
    init_logging();
    let mut runner = MemoryRunner::from_yaml_str(
        r##"
rules:
  aws_resource_missing_tags:
    tags: [Env]
resources:
  - type: aws_s3_bucket
    name: b
    tags: "#unknown"
"##,
    )?;
    let issues = runner.check(&AwsResourceMissingTagsRule::new())?;
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        r#"The resource is missing the following tags: "Env"."#
    );
    assert_eq!(Some(&issues[0].range), runner.range_of("aws_s3_bucket.b"));

    let rendered = runner.render(&issues[0]);
    assert!(rendered.contains("--> main.tf:1:1"), "{rendered}");
    assert!(
        rendered.contains(&format!("\n  | {}\n", "^".repeat(28))),
        "{rendered}"
    );
    assert!(rendered.contains("notice: The resource is missing"), "{rendered}");
    Ok(())
}

#[test]
fn provider_table_registers_aliases_without_tags() -> Result<()> {
    let runner = MemoryRunner::from_yaml_str(
        r##"
providers:
  - {}
  - alias: east
  - alias: west
    default_tags:
      tags: { Env: west, Count: 2 }
  - alias: north
    default_tags: {}
  - alias: "#unknown"
    default_tags:
      tags: { Env: south }
"##,
    )?;
    let table = ProviderTagTable::resolve(&runner)?;
    assert_eq!(table.len(), 4);
    assert_eq!(
        table.aliases().collect::<Vec<_>>(),
        vec!["default", "east", "north", "west"]
    );
    assert!(table.default_tags("east").is_none());
    assert!(table.default_tags("north").is_none());
    let west = table.default_tags("west").cloned().unwrap_or_default();
    assert_eq!(west.get("Env").map(String::as_str), Some("west"));
    assert_eq!(west.get("Count").map(String::as_str), Some(""));
    Ok(())
}

#[test]
fn resource_tags_override_provider_defaults() -> Result<()> {
    let runner = MemoryRunner::from_yaml_str(
        r#"
providers:
  - default_tags:
      tags: { Env: staging, Team: platform }
resources:
  - type: aws_instance
    name: web
    tags: { Env: prod, Owner: null }
"#,
    )?;
    let providers = ProviderTagTable::resolve(&runner)?;
    let resources = runner.resource_content(
        "aws_instance",
        &BodySchema::new().attribute("tags").attribute("provider"),
    )?;
    let resolved =
        rules::missing_tags::merge_resource_tags(&runner, &resources[0], &providers)?;

    assert_eq!(resolved.tags.get("Env").map(String::as_str), Some("prod"));
    assert_eq!(resolved.tags.get("Team").map(String::as_str), Some("platform"));
    assert_eq!(resolved.tags.get("Owner").map(String::as_str), Some(""));
    assert_eq!(Some(&resolved.range), runner.range_of("aws_instance.web.tags"));
    Ok(())
}
