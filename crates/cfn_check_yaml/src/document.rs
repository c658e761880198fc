//! Parsed template documents.

use std::str::FromStr;

use crate::convert::{node_from_yaml, yaml_from_node};
use crate::error::YamlError;
use crate::node::Node;

/// The five top-level keys that carry semantic meaning to the renderer.
/// Everything else in a document is pass-through.
pub const PARAMETERS: &str = "Parameters";
pub const MAPPINGS: &str = "Mappings";
pub const CONDITIONS: &str = "Conditions";
pub const RESOURCES: &str = "Resources";
pub const OUTPUTS: &str = "Outputs";

/// A parsed template. The root is usually a mapping but the model does not
/// require it; non-mapping documents simply have no blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, YamlError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(YamlError::Parse)?;
        Ok(Self {
            root: node_from_yaml(value),
        })
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// A top-level block by name, e.g. `doc.block(RESOURCES)`.
    pub fn block(&self, name: &str) -> Option<&Node> {
        self.root.as_mapping()?.get(name)
    }

    pub fn to_yaml_string(&self) -> Result<String, YamlError> {
        serde_yaml::to_string(&yaml_from_node(&self.root)).map_err(YamlError::Emit)
    }
}

impl FromStr for Document {
    type Err = YamlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_blocks() {
        let doc = Document::parse("Parameters:\n  Env:\n    Default: prod\nExtra: 1\n").unwrap();
        assert!(doc.block(PARAMETERS).is_some());
        assert!(doc.block(RESOURCES).is_none());
        assert_eq!(doc.block("Extra"), Some(&Node::from(1i64)));
    }

    #[test]
    fn test_round_trip_preserves_layout_order() {
        let text = "Description: demo\nResources:\n  B:\n    Type: T2\n  A:\n    Type: T1\n";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.to_yaml_string().unwrap(), text);
    }
}
