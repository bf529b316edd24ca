// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

//! The rule running inside a host that is not the in-memory fixture runner.

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use tagcheck::rules::AwsResourceMissingTagsRule;
use tagcheck::*;

fn pos(line: u32, column: u32) -> Pos {
    Pos {
        line,
        column,
        byte: 0,
    }
}

fn range(line: u32, start: u32, end: u32) -> Range {
    Range::new("hosted.tf".into(), pos(line, start), pos(line, end))
}

fn attribute(name: &str, kind: ExprKind, line: u32) -> (Rc<str>, Attribute) {
    let expr = Expr {
        kind,
        range: range(line, 10, 30),
    };
    (
        name.into(),
        Attribute {
            name: name.into(),
            expr,
            range: range(line, 3, 30),
        },
    )
}

fn block(kind: &str, labels: &[&str], attributes: Vec<(Rc<str>, Attribute)>, line: u32) -> Block {
    Block {
        kind: kind.into(),
        labels: labels.iter().map(|l| Rc::from(*l)).collect(),
        body: Body {
            attributes: attributes.into_iter().collect(),
            blocks: vec![],
        },
        def_range: range(line, 1, 20),
    }
}

/// A host that keeps already parsed blocks and records issues as rendered strings.
struct Host {
    providers: Vec<Block>,
    resources: Vec<Block>,
    config: Option<Value>,
    emitted: Vec<String>,
}

impl Runner for Host {
    fn resource_content(&self, resource_type: &str, schema: &BodySchema) -> Result<Vec<Block>> {
        self.resources
            .iter()
            .filter(|b| b.label(0) == resource_type)
            .map(|b| {
                Ok(Block {
                    body: b.body.content(schema, &b.def_range)?,
                    ..b.clone()
                })
            })
            .collect()
    }

    fn provider_content(&self, provider_name: &str, schema: &BodySchema) -> Result<Vec<Block>> {
        self.providers
            .iter()
            .filter(|b| b.label(0) == provider_name)
            .map(|b| {
                Ok(Block {
                    body: b.body.content(schema, &b.def_range)?,
                    ..b.clone()
                })
            })
            .collect()
    }

    fn evaluate(&self, expr: &Expr, want: Option<&Type>) -> Result<Value> {
        let value = match &expr.kind {
            ExprKind::Literal(v) => v.clone(),
            // This host resolves no references at all.
            ExprKind::Traversal(_) => Value::Unknown,
            ExprKind::Invalid(msg) => bail!("{msg}"),
        };
        match want {
            Some(ty) => ty.convert(&value),
            None => Ok(value),
        }
    }

    fn decode_provider_ref(&self, expr: &Expr) -> Result<ProviderRef> {
        match &expr.kind {
            ExprKind::Traversal(parts) if parts.len() == 2 => Ok(ProviderRef {
                name: parts[0].clone(),
                alias: Some(parts[1].clone()),
            }),
            _ => bail!("unsupported provider reference"),
        }
    }

    fn decode_rule_config(&self, _rule_name: &str) -> Result<Option<Value>> {
        Ok(self.config.clone())
    }

    fn emit_issue(&mut self, rule: &dyn Rule, message: String, range: Range) {
        self.emitted
            .push(format!("{}[{}] {range}: {message}", rule.name(), rule.severity()));
    }
}

fn tags(pairs: &[(&str, &str)]) -> ExprKind {
    let map: BTreeMap<Rc<str>, Value> = pairs
        .iter()
        .map(|(k, v)| (Rc::from(*k), Value::from(*v)))
        .collect();
    ExprKind::Literal(Value::from(map))
}

fn host() -> Result<Host> {
    let mut provider = block(
        "provider",
        &["aws"],
        vec![attribute("alias", ExprKind::Literal(Value::from("west")), 2)],
        1,
    );
    provider.body.blocks.push(block(
        "default_tags",
        &[],
        vec![attribute("tags", tags(&[("Env", "prod")]), 4)],
        3,
    ));

    Ok(Host {
        providers: vec![provider],
        resources: vec![
            block(
                "resource",
                &["aws_s3_bucket", "logs"],
                vec![
                    attribute(
                        "provider",
                        ExprKind::Traversal(vec!["aws".into(), "west".into()]),
                        11,
                    ),
                    attribute("tags", tags(&[("Owner", "infra")]), 12),
                ],
                10,
            ),
            block(
                "resource",
                &["aws_sqs_queue", "jobs"],
                vec![attribute(
                    "tags",
                    ExprKind::Traversal(vec!["var".into(), "tags".into()]),
                    21,
                )],
                20,
            ),
            block("resource", &["aws_iam_role", "ci"], vec![], 30),
        ],
        config: Some(Value::from_json_str(
            r#"{ "tags": ["Owner", "Env", "Team"], "exclude": ["aws_iam_role"] }"#,
        )?),
        emitted: vec![],
    })
}

#[test]
fn rule_runs_in_any_host() -> Result<()> {
    let mut host = host()?;
    AwsResourceMissingTagsRule::new().check(&mut host)?;

    assert_eq!(
        host.emitted,
        vec![
            r#"aws_resource_missing_tags[notice] hosted.tf:12,10-30: The resource is missing the following tags: "Team"."#,
            r#"aws_resource_missing_tags[notice] hosted.tf:20,1-20: The resource is missing the following tags: "Env", "Owner", "Team"."#,
        ]
    );
    Ok(())
}

#[test]
fn registry_lookup() -> Result<()> {
    let mut host = host()?;
    let Some(rule) = rules::find("aws_resource_missing_tags") else {
        bail!("rule is not registered");
    };
    rule.check(&mut host)?;
    assert_eq!(host.emitted.len(), 2);
    assert!(rules::find("aws_instance_invalid_type").is_none());
    Ok(())
}

#[test]
fn missing_config_is_an_error() -> Result<()> {
    let mut host = host()?;
    host.config = None;
    let err = AwsResourceMissingTagsRule::new()
        .check(&mut host)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<MissingTagsError>(),
        Some(&MissingTagsError::MissingConfig {
            rule: "aws_resource_missing_tags".to_string()
        })
    );
    assert!(host.emitted.is_empty());
    Ok(())
}

#[test]
fn catalog() {
    assert!(is_taggable("aws_s3_bucket"));
    assert!(is_taggable("aws_sqs_queue"));
    assert!(!is_taggable("aws_autoscaling_group"));
    assert!(!is_taggable("google_storage_bucket"));
    assert!(TAGGABLE_RESOURCES.windows(2).all(|w| w[0] < w[1]));
}
