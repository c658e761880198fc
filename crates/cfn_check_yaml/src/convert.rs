//! Conversion between [`serde_yaml::Value`] and the node model.
//!
//! serde_yaml parses CFN short tags into [`Value::Tagged`] wrappers. The
//! conversion normalizes tag names to their bare form (`Ref`, not `!Ref`) and
//! keeps key order through [`serde_yaml::Mapping`], which iterates in
//! insertion order in both directions.

use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};

use crate::node::{Mapping, Node, Scalar, Sequence};

fn tag_name(tag: &Tag) -> String {
    tag.to_string().trim_start_matches('!').to_string()
}

/// Non-string mapping keys are folded to their scalar string form; the
/// renderer's document model is keyed by strings.
fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn scalar_from_yaml(value: Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else {
                Scalar::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Scalar::String(s),
        // Containers never reach here; scalar_from_yaml is only called on
        // leaf values.
        _ => Scalar::Null,
    }
}

fn mapping_from_yaml(mapping: serde_yaml::Mapping, tag: Option<String>) -> Mapping {
    let mut result: Mapping = mapping
        .into_iter()
        .map(|(k, v)| (key_string(&k), node_from_yaml(v)))
        .collect();
    result.tag = tag;
    result
}

fn sequence_from_yaml(sequence: serde_yaml::Sequence, tag: Option<String>) -> Sequence {
    let mut result: Sequence = sequence.into_iter().map(node_from_yaml).collect();
    result.tag = tag;
    result
}

/// Converts a parsed YAML value into a [`Node`].
pub fn node_from_yaml(value: Value) -> Node {
    match value {
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let name = tag_name(&tag);
            match value {
                Value::Mapping(m) => Node::Mapping(mapping_from_yaml(m, Some(name))),
                Value::Sequence(s) => Node::Sequence(sequence_from_yaml(s, Some(name))),
                other => Node::TaggedScalar {
                    tag: name,
                    value: scalar_from_yaml(other),
                },
            }
        }
        Value::Mapping(m) => Node::Mapping(mapping_from_yaml(m, None)),
        Value::Sequence(s) => Node::Sequence(sequence_from_yaml(s, None)),
        other => Node::Scalar(scalar_from_yaml(other)),
    }
}

fn yaml_from_scalar(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Number((*i).into()),
        Scalar::Float(x) => Value::Number((*x).into()),
        Scalar::String(s) => Value::String(s.clone()),
    }
}

fn with_tag(tag: &Option<String>, value: Value) -> Value {
    match tag {
        Some(name) => Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(name.as_str()),
            value,
        })),
        None => value,
    }
}

/// Converts a [`Node`] back into a YAML value, restoring `!Tag` wrappers.
pub fn yaml_from_node(node: &Node) -> Value {
    match node {
        Node::Scalar(s) => yaml_from_scalar(s),
        Node::TaggedScalar { tag, value } => Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag.as_str()),
            value: yaml_from_scalar(value),
        })),
        Node::Mapping(m) => {
            let mapping: serde_yaml::Mapping = m
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), yaml_from_node(v)))
                .collect();
            with_tag(&m.tag, Value::Mapping(mapping))
        }
        Node::Sequence(s) => {
            let sequence: serde_yaml::Sequence = s.items.iter().map(yaml_from_node).collect();
            with_tag(&s.tag, Value::Sequence(sequence))
        }
    }
}
