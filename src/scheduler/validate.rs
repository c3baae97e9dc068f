// ABOUTME: Tree shape validation using structural identity hashes
// ABOUTME: Rejects trees where any node is reachable by more than one path

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

use super::error::GraphError;
use crate::task::TaskRunner;

/// Check that the structure rooted at `root` is a genuine rooted tree,
/// returning the number of nodes visited.
///
/// Breadth-first traversal records each visited node's identity hash; a hash
/// seen twice rejects the tree. This single check covers both a shared
/// subtree and a true cycle, and it is sufficient only because the model
/// constrains ownership to a tree: every result stream has exactly one
/// consumer, so a node reachable by two paths would have its stream drained
/// by at most one of them.
pub fn check_tree(root: &Arc<dyn TaskRunner>) -> Result<usize, GraphError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<Arc<dyn TaskRunner>> = VecDeque::new();
    queue.push_back(Arc::clone(root));

    while let Some(runner) = queue.pop_front() {
        let hash = runner.node().identity_hash();

        if !seen.insert(hash.clone()) {
            debug!("Rejecting tree: node '{}' seen twice", runner.node().name());
            return Err(GraphError::DuplicateNode {
                name: runner.node().name().to_string(),
                hash,
            });
        }

        for child in runner.node().children() {
            queue.push_back(child);
        }
    }

    Ok(seen.len())
}

/// True if the structure rooted at `root` is a valid rooted tree.
pub fn verify_tree(root: &Arc<dyn TaskRunner>) -> bool {
    check_tree(root).is_ok()
}
