//! The tagged node model.
//!
//! Every value in a template is a [`Node`]. Tags are carried as plain strings
//! without the leading `!`, so `!Ref Env` becomes a [`Node::TaggedScalar`]
//! with tag `"Ref"`. Mappings keep insertion order and replacing an entry by
//! key never moves it, which is what lets the renderer rewrite values in
//! place without disturbing the document layout.

use std::fmt;

use indexmap::IndexMap;

/// A YAML primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Returns the string contents if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// The string form used wherever a scalar is coerced into text, such as
/// `!Join` concatenation and `!Sub` substitution. Null coerces to the empty
/// string.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// An insertion-ordered mapping from string keys to nodes.
///
/// A tag on the mapping marks an intrinsic invocation whose arguments are the
/// mapping's contents (the `Fn::` long forms are not modeled; CFN short tags
/// attach to mappings only for nested intrinsic results).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    pub tag: Option<String>,
    entries: IndexMap<String, Node>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Inserts an entry. Replacing an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Node)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        Self {
            tag: None,
            entries: iter.into_iter().collect(),
        }
    }
}

/// An ordered sequence of nodes, optionally tagged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub tag: Option<String>,
    pub items: Vec<Node>,
}

impl Sequence {
    pub fn new(items: Vec<Node>) -> Self {
        Self { tag: None, items }
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A YAML value with its tag metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    TaggedScalar { tag: String, value: Scalar },
    Mapping(Mapping),
    Sequence(Sequence),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    /// Builds a tagged scalar, e.g. `Node::tagged("Ref", "Env")` for `!Ref Env`.
    pub fn tagged(tag: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Node::TaggedScalar {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// The tag carried by this node, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Scalar(_) => None,
            Node::TaggedScalar { tag, .. } => Some(tag),
            Node::Mapping(m) => m.tag.as_deref(),
            Node::Sequence(s) => s.tag.as_deref(),
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.tag().is_some()
    }

    /// A copy of this node with its top-level tag removed. The argument of an
    /// intrinsic invocation is the tagged node's untagged shape.
    pub fn untagged(&self) -> Node {
        match self {
            Node::Scalar(s) => Node::Scalar(s.clone()),
            Node::TaggedScalar { value, .. } => Node::Scalar(value.clone()),
            Node::Mapping(m) => Node::Mapping(Mapping {
                tag: None,
                entries: m.entries.clone(),
            }),
            Node::Sequence(s) => Node::Sequence(Sequence {
                tag: None,
                items: s.items.clone(),
            }),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// The coerced string form of an untagged scalar.
    pub fn scalar_string(&self) -> Option<String> {
        self.as_scalar().map(ToString::to_string)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::TaggedScalar { .. } => "tagged scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
        }
    }

    /// Depth-first search for the first mapping entry named `key`, in
    /// insertion order. Iterative so document depth never touches the call
    /// stack.
    pub fn find_first(&self, key: &str) -> Option<&Node> {
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Mapping(m) => {
                    if let Some(found) = m.get(key) {
                        return Some(found);
                    }
                    stack.extend(m.iter().rev().map(|(_, v)| v));
                }
                Node::Sequence(s) => stack.extend(s.items.iter().rev()),
                _ => {}
            }
        }
        None
    }

    /// True when this node or any descendant carries a tag.
    pub fn contains_tag(&self) -> bool {
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_tagged() {
                return true;
            }
            match node {
                Node::Mapping(m) => stack.extend(m.iter().map(|(_, v)| v)),
                Node::Sequence(s) => stack.extend(s.items.iter()),
                _ => {}
            }
        }
        false
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Node::Mapping(value)
    }
}

impl From<Sequence> for Node {
    fn from(value: Sequence) -> Self {
        Node::Sequence(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut m = Mapping::new();
        m.insert("a", 1i64);
        m.insert("b", 2i64);
        m.insert("c", 3i64);
        m.insert("b", Node::string("replaced"));

        let keys: Vec<&String> = m.keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(m.get("b"), Some(&Node::string("replaced")));
    }

    #[test]
    fn test_find_first_prefers_insertion_order() {
        let mut inner = Mapping::new();
        inner.insert("Name", Node::string("first"));
        let mut later = Mapping::new();
        later.insert("Name", Node::string("second"));
        let mut root = Mapping::new();
        root.insert("A", inner);
        root.insert("B", later);

        let root = Node::Mapping(root);
        assert_eq!(root.find_first("Name"), Some(&Node::string("first")));
        assert_eq!(root.find_first("Missing"), None);
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-3).to_string(), "-3");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::String("x".into()).to_string(), "x");
    }

    #[test]
    fn test_untagged_strips_only_the_top_tag() {
        let node = Node::tagged("Ref", "Env");
        assert_eq!(node.untagged(), Node::string("Env"));

        let seq = Node::Sequence(Sequence {
            tag: Some("Join".into()),
            items: vec![Node::string("-"), Node::tagged("Ref", "Env")],
        });
        let stripped = seq.untagged();
        assert_eq!(stripped.tag(), None);
        assert!(stripped.contains_tag());
    }
}
