//! The validation adapter.
//!
//! After rendering, a [`ValidationSet`] walks (selector, validator) pairs
//! over each document: the selector is evaluated, the validator runs once per
//! match, and every rejection is collected before anything is reported. Rule
//! collections are a typed registry — the compiled-in stand-in for
//! dynamically loaded rule modules.

use std::fmt::Write as _;
use std::path::PathBuf;

use cfn_check_yaml::Node;
use miette::Diagnostic;
use thiserror::Error;

use crate::error::Error;
use crate::query::Path;

type Check = Box<dyn Fn(&Node) -> Result<(), String> + Send + Sync>;

/// One validation rule: a selector, what it asserts, and the check to run on
/// every match. A flag-gated rule only runs when all its flags are enabled.
pub struct Rule {
    pub selector: String,
    pub description: String,
    pub flags: Vec<String>,
    check: Check,
}

impl Rule {
    pub fn new(
        selector: impl Into<String>,
        description: impl Into<String>,
        check: impl Fn(&Node) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            selector: selector.into(),
            description: description.into(),
            flags: Vec::new(),
            check: Box::new(check),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn enabled(&self, flags: &[String]) -> bool {
        self.flags.iter().all(|flag| flags.contains(flag))
    }

    pub fn check(&self, value: &Node) -> Result<(), String> {
        (self.check)(value)
    }
}

/// A named group of rules.
pub struct Collection {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// One rejected match.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub file: PathBuf,
    pub selector: String,
    pub path: String,
    pub description: String,
    pub message: String,
}

fn render_failures(failures: &[ValidationFailure]) -> String {
    let mut out = format!("{} validation failure(s)", failures.len());
    for failure in failures {
        let _ = write!(
            out,
            "\n  {}: `{}` at {} in {}: {}",
            failure.description,
            failure.selector,
            if failure.path.is_empty() { "<root>" } else { &failure.path },
            failure.file.display(),
            failure.message,
        );
    }
    out
}

/// The aggregate outcome of a failed run; carries every rule failure across
/// every document.
#[derive(Debug, Error, Diagnostic)]
#[error("{}", render_failures(.failures))]
#[diagnostic(code(cfn_check::validation))]
pub struct ValidationError {
    pub failures: Vec<ValidationFailure>,
}

/// Runs rule collections across rendered documents. One failing rule never
/// stops subsequent rules; all failures are aggregated.
pub struct ValidationSet {
    collections: Vec<Collection>,
    flags: Vec<String>,
}

impl ValidationSet {
    pub fn new(collections: Vec<Collection>, flags: Vec<String>) -> Self {
        Self { collections, flags }
    }

    /// Validates every document, returning the number of checks that ran.
    /// Selector parse errors surface immediately; validator rejections are
    /// collected into one [`ValidationError`].
    pub fn validate(&self, documents: &[(PathBuf, Node)]) -> Result<usize, Error> {
        let mut failures = Vec::new();
        let mut checks = 0usize;

        for collection in &self.collections {
            for rule in &collection.rules {
                if !rule.enabled(&self.flags) {
                    continue;
                }
                let path = Path::parse(&rule.selector)?;
                for (file, document) in documents {
                    for (matched_path, value) in path.evaluate(document) {
                        checks += 1;
                        if let Err(message) = rule.check(&value) {
                            tracing::debug!(
                                selector = %rule.selector,
                                path = %matched_path,
                                "validation failure: {message}"
                            );
                            failures.push(ValidationFailure {
                                file: file.clone(),
                                selector: rule.selector.clone(),
                                path: matched_path,
                                description: rule.description.clone(),
                                message,
                            });
                        }
                    }
                }
            }
        }

        if failures.is_empty() {
            Ok(checks)
        } else {
            Err(Error::Validation(ValidationError { failures }))
        }
    }
}

/// The rule collections compiled into the binary; `--rules` picks one by
/// name.
pub fn builtin_collections() -> Vec<Collection> {
    vec![Collection {
        name: "cloudformation".to_string(),
        rules: vec![
            Rule::new("Resources", "Resources is a non-empty mapping", |value| {
                let mapping = value
                    .as_mapping()
                    .ok_or_else(|| format!("expected a mapping, found {}", value.kind()))?;
                if mapping.is_empty() {
                    return Err("no resources defined".to_string());
                }
                Ok(())
            }),
            Rule::new(
                "Resources::*::Type",
                "every resource declares a string Type",
                |value| match value.as_str() {
                    Some(_) => Ok(()),
                    None => Err(format!("expected a string, found {}", value.kind())),
                },
            ),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use cfn_check_yaml::node_from_yaml;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Node {
        node_from_yaml(serde_yaml::from_str(text).unwrap())
    }

    fn documents(text: &str) -> Vec<(PathBuf, Node)> {
        vec![(PathBuf::from("template.yml"), parse(text))]
    }

    #[test]
    fn test_passing_run_counts_checks() {
        let set = ValidationSet::new(builtin_collections(), Vec::new());
        let checks = set
            .validate(&documents("Resources:\n  A:\n    Type: T1\n  B:\n    Type: T2\n"))
            .unwrap();
        // one Resources check plus one Type check per resource
        assert_eq!(checks, 3);
    }

    #[test]
    fn test_failures_are_aggregated_not_short_circuited() {
        let set = ValidationSet::new(builtin_collections(), Vec::new());
        let error = set
            .validate(&documents("Resources:\n  A:\n    Type: 1\n  B:\n    Type: [x]\n"))
            .unwrap_err();
        match error {
            Error::Validation(validation) => {
                assert_eq!(validation.failures.len(), 2);
                assert_eq!(validation.failures[0].path, "Resources::A::Type");
                assert_eq!(validation.failures[1].path, "Resources::B::Type");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_matches_is_not_a_failure() {
        let set = ValidationSet::new(builtin_collections(), Vec::new());
        let checks = set.validate(&documents("Outputs: {}\n")).unwrap();
        assert_eq!(checks, 0);
    }

    #[test]
    fn test_flag_gated_rule_skipped_without_flag() {
        let gated = || {
            vec![Collection {
                name: "gated".to_string(),
                rules: vec![
                    Rule::new("Resources", "always fails", |_| Err("boom".to_string()))
                        .with_flag("strict"),
                ],
            }]
        };
        let docs = documents("Resources:\n  A:\n    Type: T\n");

        let set = ValidationSet::new(gated(), Vec::new());
        assert_eq!(set.validate(&docs).unwrap(), 0);

        let set = ValidationSet::new(gated(), vec!["strict".to_string()]);
        assert!(set.validate(&docs).is_err());
    }

    #[test]
    fn test_bad_selector_is_an_error_not_a_failure() {
        let set = ValidationSet::new(
            vec![Collection {
                name: "broken".to_string(),
                rules: vec![Rule::new("(^Oops", "unbalanced", |_| Ok(()))],
            }],
            Vec::new(),
        );
        let error = set.validate(&documents("Resources: {}\n")).unwrap_err();
        assert!(matches!(error, Error::Selector { .. }));
    }
}
