//! YAML infrastructure shared by the cfn-check renderer and query engine.
//!
//! CloudFormation templates lean on YAML tags (`!Ref`, `!Sub`, `!GetAtt`, ...)
//! to mark intrinsic function calls. This crate provides a node model that
//! keeps those tags first-class and preserves mapping key order across every
//! rewrite, plus lossless conversion to and from [`serde_yaml::Value`] so
//! documents round-trip through the external parser.
//!
//! # Core Types
//!
//! - [`Node`] - A YAML value: scalar, tagged scalar, mapping, or sequence
//! - [`Scalar`] - A primitive (string, integer, float, boolean, null)
//! - [`Mapping`] - An insertion-ordered map that may carry a tag
//! - [`Sequence`] - An ordered list that may carry a tag
//! - [`Document`] - A parsed template with access to its top-level blocks
//!
//! # Example
//!
//! ```rust
//! use cfn_check_yaml::{Document, Node};
//!
//! let doc = Document::parse("Resources:\n  Api:\n    Type: !Ref Kind\n").unwrap();
//! let kind = doc.block("Resources").and_then(|r| r.as_mapping()).unwrap();
//! let api = kind.get("Api").and_then(|n| n.as_mapping()).unwrap();
//! assert_eq!(api.get("Type").and_then(Node::tag), Some("Ref"));
//! ```

pub mod convert;
pub mod document;
pub mod error;
pub mod node;

pub use convert::{node_from_yaml, yaml_from_node};
pub use document::{CONDITIONS, Document, MAPPINGS, OUTPUTS, PARAMETERS, RESOURCES};
pub use error::YamlError;
pub use node::{Mapping, Node, Scalar, Sequence};
