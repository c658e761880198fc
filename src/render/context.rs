//! Input staging.
//!
//! User-supplied substitutions arrive as `key=value` strings from the CLI and
//! are normalized here into the structured, immutable [`InputContext`] the
//! resolvers consult. Defaults are seeded from the template's own
//! `Parameters` block before any resolver runs.

use cfn_check_yaml::{CONDITIONS, Document, MAPPINGS, Mapping, Node, PARAMETERS, RESOURCES, Scalar};
use indexmap::{IndexMap, IndexSet};

/// Splits `key=value` entries on the first `=` only; later `=` characters
/// belong to the value. Entries with no `=` or an empty key are discarded;
/// `key=` binds the key to the empty string.
pub fn parse_key_value_pairs(pairs: &[String]) -> IndexMap<String, String> {
    pairs
        .iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// User-supplied substitution inputs, already split into structured maps.
#[derive(Debug, Default)]
pub struct RenderInputs {
    /// Overrides for template Parameters.
    pub parameters: IndexMap<String, String>,
    /// Values for `!Ref` targets outside Parameters and Resources.
    pub references: IndexMap<String, String>,
    /// Values for `!GetAtt`, keyed `"Logical.Attribute"`.
    pub attributes: IndexMap<String, String>,
    /// Chosen top-level key per mapping, for `!FindInMap`.
    pub selected_mappings: IndexMap<String, String>,
    /// Zone names for `!GetAZs`.
    pub availability_zones: Vec<String>,
    /// Loaded documents for `!ImportValue`, keyed by file, carrying the
    /// export key each file serves.
    pub import_values: IndexMap<String, (String, Document)>,
}

/// Everything a resolver may consult. Built once per render and immutable
/// for the render's lifetime.
#[derive(Debug, Default)]
pub struct InputContext {
    pub parameters: IndexMap<String, Scalar>,
    pub parameter_defaults: IndexMap<String, Scalar>,
    /// Names declared under the template's `Parameters` block; a `!Ref` to
    /// one of these stays symbolic until a value is supplied.
    pub parameter_names: IndexSet<String>,
    pub references: IndexMap<String, Scalar>,
    pub attributes: IndexMap<String, Node>,
    pub mappings: Mapping,
    pub selected_mappings: IndexMap<String, String>,
    pub conditions: Mapping,
    pub resources: Mapping,
    pub availability_zones: Vec<String>,
    pub import_values: IndexMap<String, (String, Document)>,
}

fn block(document: &Node, name: &str) -> Mapping {
    document
        .as_mapping()
        .and_then(|m| m.get(name))
        .and_then(Node::as_mapping)
        .cloned()
        .unwrap_or_default()
}

impl InputContext {
    /// Stages inputs against a template: copies `Parameters.*.Default` into
    /// the defaults table and snapshots the Mappings, Conditions, and
    /// Resources blocks.
    pub fn build(document: &Node, inputs: RenderInputs) -> Self {
        let parameters_block = block(document, PARAMETERS);
        let mut parameter_defaults = IndexMap::new();
        let mut parameter_names = IndexSet::new();
        for (name, parameter) in parameters_block.iter() {
            parameter_names.insert(name.clone());
            let default = parameter
                .as_mapping()
                .and_then(|p| p.get("Default"))
                .and_then(Node::as_scalar);
            if let Some(default) = default {
                parameter_defaults.insert(name.clone(), default.clone());
            }
        }

        Self {
            parameters: inputs
                .parameters
                .into_iter()
                .map(|(key, value)| (key, Scalar::String(value)))
                .collect(),
            parameter_defaults,
            parameter_names,
            references: inputs
                .references
                .into_iter()
                .map(|(key, value)| (key, Scalar::String(value)))
                .collect(),
            attributes: inputs
                .attributes
                .into_iter()
                .map(|(key, value)| (key, Node::string(value)))
                .collect(),
            mappings: block(document, MAPPINGS),
            selected_mappings: inputs.selected_mappings,
            conditions: block(document, CONDITIONS),
            resources: block(document, RESOURCES),
            availability_zones: inputs.availability_zones,
            import_values: inputs.import_values,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_key_value_splitting() {
        let pairs = [
            "Env=prod".to_string(),
            "Conn=host=db;port=5432".to_string(),
            "Empty=".to_string(),
            "=nokey".to_string(),
            "noseparator".to_string(),
        ];
        let parsed = parse_key_value_pairs(&pairs);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["Env"], "prod");
        assert_eq!(parsed["Conn"], "host=db;port=5432");
        assert_eq!(parsed["Empty"], "");
    }

    #[test]
    fn test_defaults_seeded_from_parameters_block() {
        let document = Document::parse(
            "Parameters:\n  Env:\n    Default: prod\n  Count:\n    Default: 3\n  NoDefault:\n    Type: String\n",
        )
        .unwrap();
        let ctx = InputContext::build(document.root(), RenderInputs::default());

        assert_eq!(ctx.parameter_defaults["Env"], Scalar::String("prod".into()));
        assert_eq!(ctx.parameter_defaults["Count"], Scalar::Int(3));
        assert!(!ctx.parameter_defaults.contains_key("NoDefault"));
        assert!(ctx.parameter_names.contains("NoDefault"));
    }

    #[test]
    fn test_blocks_snapshotted() {
        let document = Document::parse(
            "Mappings:\n  Region:\n    us-east-1:\n      ami: ami-1\nResources:\n  Api:\n    Type: T\n",
        )
        .unwrap();
        let ctx = InputContext::build(document.root(), RenderInputs::default());
        assert!(ctx.mappings.contains_key("Region"));
        assert!(ctx.resources.contains_key("Api"));
        assert!(ctx.conditions.is_empty());
    }
}
