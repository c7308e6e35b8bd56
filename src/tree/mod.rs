//! Accessible tree adapter interface
//!
//! The navigator never owns the tree it walks. Everything it knows about a
//! node is obtained through [`AccessibleTree`], whose calls may fail at any
//! time because the hosting application can mutate or drop nodes between
//! queries. This module provides:
//! - AccessibleTree: the adapter trait (roles, states, text, structure, tables, collection)
//! - Role / State / StateSet: the vocabulary of node properties
//! - SearchCriteria: declarative match rules for the bulk collection query
//! - Path helpers: document-order comparison and bounded ancestor walks
//! - SnapshotTree: an in-memory adapter built from a JSON description

pub mod criteria;
pub mod node;
pub mod role;
pub mod snapshot;

pub use criteria::{MatchType, SearchCriteria};
pub use node::{NodeSpec, TableSpan};
pub use role::{Role, State, StateSet};
pub use snapshot::SnapshotTree;

pub use crate::error::{TreeError, TreeResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Opaque handle to a node in an external accessibility tree
pub type NodeId = u64;

/// Deepest ancestor chain walked before giving up
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Position and extent of a table cell, as reported by the tree
///
/// `row`/`col` are the cell's top-left anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellExtents {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// Read access to a live accessibility tree
///
/// Only structure, role, state and text queries are required. Collection,
/// table and hypertext capabilities are optional and report
/// [`TreeError::NotSupported`] by default.
pub trait AccessibleTree {
    fn role(&self, node: NodeId) -> TreeResult<Role>;

    fn states(&self, node: NodeId) -> TreeResult<StateSet>;

    fn name(&self, node: NodeId) -> TreeResult<String>;

    fn description(&self, _node: NodeId) -> TreeResult<String> {
        Ok(String::new())
    }

    /// Text between `start` and `end` character offsets (`None` = end of text)
    fn text(&self, node: NodeId, start: usize, end: Option<usize>) -> TreeResult<String>;

    fn character_count(&self, node: NodeId) -> TreeResult<usize> {
        Ok(self.text(node, 0, None)?.chars().count())
    }

    /// Object attributes such as `tag`, `level` or `xml-roles`
    fn attributes(&self, node: NodeId) -> TreeResult<IndexMap<String, String>>;

    fn parent(&self, node: NodeId) -> TreeResult<Option<NodeId>>;

    fn children(&self, node: NodeId) -> TreeResult<Vec<NodeId>>;

    fn index_in_parent(&self, node: NodeId) -> TreeResult<Option<usize>> {
        match self.parent(node)? {
            Some(parent) => Ok(self.children(parent)?.iter().position(|c| *c == node)),
            None => Ok(None),
        }
    }

    /// Child-index sequence from the tree root down to `node`
    fn path(&self, node: NodeId) -> TreeResult<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = node;
        let mut visited = HashSet::new();
        while visited.insert(current) && visited.len() <= DEFAULT_MAX_DEPTH {
            let Some(parent) = self.parent(current)? else {
                break;
            };
            let index = self.index_in_parent(current)?.ok_or(TreeError::Defunct(current))?;
            path.push(index);
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Names of the actions the node supports (e.g. `click`)
    fn actions(&self, _node: NodeId) -> TreeResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn link_uri(&self, node: NodeId) -> TreeResult<Option<String>> {
        Err(TreeError::NotSupported { node, interface: "Hyperlink" })
    }

    /// Link descendants whose text falls between the two offsets
    fn links_in_range(&self, node: NodeId, _start: usize, _end: Option<usize>) -> TreeResult<Vec<NodeId>> {
        Err(TreeError::NotSupported { node, interface: "Hypertext" })
    }

    /// Ask the application to focus the node; returns whether the request was accepted
    fn grab_focus(&self, node: NodeId) -> TreeResult<bool> {
        Err(TreeError::NotSupported { node, interface: "Component" })
    }

    /// The application's currently active top-level window
    fn active_window(&self) -> Option<NodeId> {
        None
    }

    /// Whether `root` can answer bulk collection queries
    fn supports_collection(&self, _root: NodeId) -> bool {
        false
    }

    /// Descendants of `root` matching `criteria`, in canonical document order
    fn collection_query(&self, root: NodeId, _criteria: &SearchCriteria) -> TreeResult<Vec<NodeId>> {
        Err(TreeError::NotSupported { node: root, interface: "Collection" })
    }

    fn row_count(&self, table: NodeId) -> TreeResult<usize> {
        Err(TreeError::NotSupported { node: table, interface: "Table" })
    }

    fn column_count(&self, table: NodeId) -> TreeResult<usize> {
        Err(TreeError::NotSupported { node: table, interface: "Table" })
    }

    /// Cell occupying `(row, col)`; spanning cells are returned for every covered coordinate
    fn cell_at(&self, table: NodeId, _row: usize, _col: usize) -> TreeResult<Option<NodeId>> {
        Err(TreeError::NotSupported { node: table, interface: "Table" })
    }

    fn cell_extents(&self, cell: NodeId) -> TreeResult<CellExtents> {
        Err(TreeError::NotSupported { node: cell, interface: "TableCell" })
    }

    fn row_headers(&self, cell: NodeId) -> TreeResult<Vec<NodeId>> {
        Err(TreeError::NotSupported { node: cell, interface: "TableCell" })
    }

    fn column_headers(&self, cell: NodeId) -> TreeResult<Vec<NodeId>> {
        Err(TreeError::NotSupported { node: cell, interface: "TableCell" })
    }

    fn caption(&self, table: NodeId) -> TreeResult<Option<NodeId>> {
        Err(TreeError::NotSupported { node: table, interface: "Table" })
    }
}

/// Compare two tree paths in document order
///
/// The shorter path is padded with -1, so an ancestor sorts before its
/// descendants.
pub fn path_compare(a: &[usize], b: &[usize]) -> Ordering {
    let len = a.len().max(b.len());
    let pad = |path: &[usize], i: usize| path.get(i).map_or(-1, |&v| v as i64);
    (0..len)
        .map(|i| pad(a, i).cmp(&pad(b, i)))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Nearest ancestor of `node` (itself included) satisfying `pred`
///
/// The walk stops at `max_depth` steps or on the first revisited node.
pub fn find_ancestor_inclusive(
    tree: &dyn AccessibleTree,
    node: NodeId,
    max_depth: usize,
    mut pred: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    let mut visited = HashSet::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if !visited.insert(id) || visited.len() > max_depth {
            log::debug!("Ancestor walk from {} stopped at {}", node, id);
            return None;
        }
        if pred(id) {
            return Some(id);
        }
        current = tree.parent(id).ok().flatten();
    }
    None
}

/// Nearest proper ancestor of `node` satisfying `pred`
pub fn find_ancestor(
    tree: &dyn AccessibleTree,
    node: NodeId,
    max_depth: usize,
    mut pred: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    let parent = tree.parent(node).ok().flatten()?;
    find_ancestor_inclusive(tree, parent, max_depth, |id| pred(id))
}

/// Whether `ancestor` is `node` or one of its ancestors
pub fn is_ancestor_inclusive(tree: &dyn AccessibleTree, ancestor: NodeId, node: NodeId, max_depth: usize) -> bool {
    find_ancestor_inclusive(tree, node, max_depth, |id| id == ancestor).is_some()
}

/// Full text of a node, empty when unavailable
pub fn all_text(tree: &dyn AccessibleTree, node: NodeId) -> String {
    tree.text(node, 0, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_compare_orders_ancestor_first() {
        assert_eq!(path_compare(&[0, 1], &[0, 1, 0]), Ordering::Less);
        assert_eq!(path_compare(&[0, 2], &[0, 1, 5]), Ordering::Greater);
        assert_eq!(path_compare(&[1, 0], &[1, 0]), Ordering::Equal);
        assert_eq!(path_compare(&[], &[0]), Ordering::Less);
    }

    #[test]
    fn test_ancestor_walks() {
        let doc = NodeSpec::new(Role::DocumentWeb).with_child(
            NodeSpec::new(Role::Section).with_child(NodeSpec::new(Role::Paragraph).with_text("Hello there")),
        );
        let tree = SnapshotTree::from_spec(doc);
        let root = tree.root();
        let section = tree.children(root).unwrap()[0];
        let paragraph = tree.children(section).unwrap()[0];

        let found = find_ancestor_inclusive(&tree, paragraph, 16, |id| tree.role(id) == Ok(Role::Section));
        assert_eq!(found, Some(section));
        assert_eq!(find_ancestor(&tree, section, 16, |_| true), Some(root));
        assert!(is_ancestor_inclusive(&tree, root, paragraph, 16));
        assert!(!is_ancestor_inclusive(&tree, paragraph, root, 16));
        assert_eq!(tree.path(paragraph).unwrap(), vec![0, 0]);
        assert_eq!(all_text(&tree, paragraph), "Hello there");
    }
}
