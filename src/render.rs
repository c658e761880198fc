//! Template rendering.
//!
//! Ties together input staging ([`context`]), the per-tag resolvers
//! ([`intrinsics`]), and the tree rewriter ([`walker`]). Rendering is a
//! single-threaded, deterministic, in-place rewrite: the caller hands over
//! the document tree, every resolvable intrinsic is replaced by its value,
//! and everything else comes back byte-for-byte as it went in.

pub mod context;
pub mod intrinsics;
pub mod walker;

use cfn_check_yaml::Document;
use indexmap::IndexSet;

pub use context::{InputContext, RenderInputs, parse_key_value_pairs};
pub use intrinsics::{Intrinsic, Resolver};

/// Renderer configuration: the recognized tag set and the traversal budget.
/// Passed in explicitly; there is no global registry.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    tags: IndexSet<String>,
    pub visit_budget: usize,
}

impl RenderConfig {
    /// The safety rail against circular references: after this many node
    /// visits the walker halts with a partial result.
    pub const DEFAULT_VISIT_BUDGET: usize = 10_000;

    /// A config recognizing only the given tag names.
    pub fn with_tags(tags: impl IntoIterator<Item = String>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            visit_budget: Self::DEFAULT_VISIT_BUDGET,
        }
    }

    pub fn with_visit_budget(mut self, visit_budget: usize) -> Self {
        self.visit_budget = visit_budget;
        self
    }

    /// Whether a tag name is treated as an intrinsic invocation.
    pub fn recognizes(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::with_tags(Intrinsic::ALL.iter().map(|i| i.tag().to_string()))
    }
}

/// Renders a document in place.
pub fn render_template(document: &mut Document, ctx: &InputContext, config: &RenderConfig) {
    walker::rewrite(document.root_mut(), ctx, config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_recognizes_the_cfn_set() {
        let config = RenderConfig::default();
        assert!(config.recognizes("Ref"));
        assert!(config.recognizes("ToJsonString"));
        assert!(!config.recognizes("Mystery"));
    }

    #[test]
    fn test_custom_tag_set() {
        let config = RenderConfig::with_tags(["Ref".to_string()]);
        assert!(config.recognizes("Ref"));
        assert!(!config.recognizes("Sub"));
    }
}
