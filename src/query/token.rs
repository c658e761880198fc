//! Selector tokens and their matching rules.

use cfn_check_yaml::{Node, Sequence};
use regex::Regex;

/// One segment of a parsed selector.
#[derive(Debug, Clone)]
pub enum Token {
    /// `name` — a mapping key.
    Key(String),
    /// `*` — every mapping entry.
    Wildcard,
    /// `(regex)` — mapping entries whose key matches.
    Pattern(Regex),
    /// `[i]` — one sequence element.
    Index(usize),
    /// `[lo-hi]` — a slice, yielded as one synthetic sequence.
    BoundRange(usize, usize),
    /// `[]` — the whole sequence as one synthetic slice.
    UnboundRange,
    /// `[(regex)]` — sequence elements whose scalar form matches.
    PatternRange(Regex),
    /// `[*]` — every sequence element.
    WildcardRange,
    /// `[v]` — sequence elements whose scalar form equals `v`.
    Value(String),
}

impl Token {
    /// Matches this token against a node, yielding `(sub-path, child)` pairs.
    /// A token applied to the wrong node kind yields nothing.
    pub fn match_node(&self, node: &Node) -> Vec<(String, Node)> {
        match self {
            Token::Key(name) => match node.as_mapping().and_then(|m| m.get(name)) {
                Some(child) => vec![(name.clone(), child.clone())],
                None => vec![],
            },
            Token::Wildcard => match node.as_mapping() {
                Some(mapping) => mapping
                    .iter()
                    .map(|(key, child)| (key.clone(), child.clone()))
                    .collect(),
                None => vec![],
            },
            Token::Pattern(regex) => match node.as_mapping() {
                Some(mapping) => mapping
                    .iter()
                    .filter(|(key, _)| regex.is_match(key))
                    .map(|(key, child)| (key.clone(), child.clone()))
                    .collect(),
                None => vec![],
            },
            Token::Index(index) => match node.as_sequence().and_then(|s| s.get(*index)) {
                Some(child) => vec![(index.to_string(), child.clone())],
                None => vec![],
            },
            Token::BoundRange(lo, hi) => match node.as_sequence() {
                Some(sequence) => {
                    let hi = (*hi).min(sequence.len());
                    if *lo > hi {
                        return vec![];
                    }
                    let slice = Sequence::new(sequence.items[*lo..hi].to_vec());
                    vec![(format!("{lo}-{hi}"), Node::Sequence(slice))]
                }
                None => vec![],
            },
            Token::UnboundRange => match node.as_sequence() {
                Some(sequence) => {
                    let slice = Sequence::new(sequence.items.clone());
                    vec![(format!("0-{}", sequence.len()), Node::Sequence(slice))]
                }
                None => vec![],
            },
            Token::PatternRange(regex) => match node.as_sequence() {
                Some(sequence) => sequence
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| {
                        item.scalar_string()
                            .is_some_and(|text| regex.is_match(&text))
                    })
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
                None => vec![],
            },
            Token::WildcardRange => match node.as_sequence() {
                Some(sequence) => sequence
                    .items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
                None => vec![],
            },
            Token::Value(value) => match node.as_sequence() {
                Some(sequence) => sequence
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| item.scalar_string().as_deref() == Some(value))
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
                None => vec![],
            },
        }
    }
}
