//! The tree walker: an iterative depth-first rewriter.
//!
//! The walk is driven by an explicit stack of node addresses (key/index step
//! vectors from the document root) rather than recursion, so document depth
//! never touches the call stack. A tagged node is resolved against the
//! current tree and its replacement written back in place; the walker then
//! descends into whatever now sits at that address, which is how intrinsics
//! nested inside intrinsic results get resolved. Keys are never deleted and
//! mappings never reordered.

use cfn_check_yaml::Node;

use crate::render::RenderConfig;
use crate::render::context::InputContext;
use crate::render::intrinsics::Resolver;

/// One step of a node address, from the document root.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Key(String),
    Index(usize),
}

fn node_at<'a>(root: &'a Node, address: &[Step]) -> Option<&'a Node> {
    let mut current = root;
    for step in address {
        current = match (current, step) {
            (Node::Mapping(mapping), Step::Key(key)) => mapping.get(key)?,
            (Node::Sequence(sequence), Step::Index(index)) => sequence.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn node_at_mut<'a>(root: &'a mut Node, address: &[Step]) -> Option<&'a mut Node> {
    let mut current = root;
    for step in address {
        current = match (current, step) {
            (Node::Mapping(mapping), Step::Key(key)) => mapping.get_mut(key)?,
            (Node::Sequence(sequence), Step::Index(index)) => sequence.items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Rewrites the tree in place, replacing every resolvable intrinsic with its
/// computed value. Children are pushed in reverse so pops walk the document
/// top to bottom. Traversal stops at the configured visit budget, leaving
/// the partial result in place.
pub fn rewrite(root: &mut Node, ctx: &InputContext, config: &RenderConfig) {
    let resolver = Resolver::new(ctx, config);
    let mut stack: Vec<Vec<Step>> = vec![Vec::new()];

    while let Some(address) = stack.pop() {
        if !resolver.charge() {
            stack.push(address);
            break;
        }

        let Some(node) = node_at(root, &address) else {
            continue;
        };

        if node.is_tagged() {
            let original = node.clone();
            if let Some(replacement) = resolver.resolve(root, &original) {
                if replacement != original {
                    if let Some(slot) = node_at_mut(root, &address) {
                        *slot = replacement;
                    }
                }
            }
        }

        // Descend into whatever now sits at this address, so intrinsics
        // nested inside a replacement get their turn too.
        let Some(node) = node_at(root, &address) else {
            continue;
        };
        match node {
            Node::Mapping(mapping) => {
                for key in mapping.keys().rev() {
                    let mut child = address.clone();
                    child.push(Step::Key(key.clone()));
                    stack.push(child);
                }
            }
            Node::Sequence(sequence) => {
                for index in (0..sequence.len()).rev() {
                    let mut child = address.clone();
                    child.push(Step::Index(index));
                    stack.push(child);
                }
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        tracing::warn!(
            budget = config.visit_budget,
            "traversal budget exhausted, returning the partial result"
        );
    }
}
