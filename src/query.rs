//! The selector mini-language used by the validation engine.
//!
//! Selectors address values in a rendered document, e.g.
//! `Resources::*::Type` or `Resources::Role::Policies::[0-2]`. Parsing happens
//! once per selector; evaluation threads candidate nodes through the token
//! sequence and always terminates with a finite match list.

pub mod parser;
pub mod token;

pub use parser::parse;
pub use token::Token;

use cfn_check_yaml::Node;

use crate::error::Error;

/// A parsed selector.
#[derive(Debug, Clone)]
pub struct Path {
    pub(crate) tokens: Vec<Token>,
    pub(crate) source: String,
}

impl Path {
    pub fn parse(selector: &str) -> Result<Self, Error> {
        parser::parse(selector)
    }

    /// The selector string this path was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Evaluates the path against a document, yielding `(path, value)`
    /// matches in document order. Sub-paths are joined with `::`.
    pub fn evaluate(&self, root: &Node) -> Vec<(String, Node)> {
        let mut candidates = vec![(String::new(), root.clone())];
        for token in &self.tokens {
            let mut next = Vec::new();
            for (path, node) in &candidates {
                for (segment, child) in token.match_node(node) {
                    let child_path = if path.is_empty() {
                        segment
                    } else {
                        format!("{path}::{segment}")
                    };
                    next.push((child_path, child));
                }
            }
            candidates = next;
            if candidates.is_empty() {
                break;
            }
        }
        candidates
    }
}
