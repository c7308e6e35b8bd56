//! Category finder and its per-root match cache

use crate::navigation::category::{Category, CategorySpec};
use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::mode::NavigationMode;
use crate::tree::{is_ancestor_inclusive, path_compare, NodeId, TreeResult};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Cache key: one search root, one category, one optional level argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub root: NodeId,
    pub category: Category,
    pub level: Option<u32>,
}

impl CacheKey {
    pub fn new(root: NodeId, category: Category, level: Option<u32>) -> Self {
        Self { root, category, level }
    }
}

/// Previously enumerated match sets, valid until the host reports a change
#[derive(Debug, Clone, Default)]
pub struct MatchCache {
    entries: IndexMap<CacheKey, Vec<NodeId>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a cached, non-empty match set
    pub fn get(&self, key: &CacheKey) -> Option<Vec<NodeId>> {
        self.entries.get(key).filter(|matches| !matches.is_empty()).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, matches: Vec<NodeId>) {
        self.entries.insert(key, matches);
    }

    /// Drop every entry searched from `root` or from a node inside it,
    /// such as a dialog within a changed document, along with entries whose
    /// root has left the tree; returns how many were removed
    pub fn invalidate(&mut self, ctx: &ClassifyContext, root: NodeId) -> usize {
        let max_depth = ctx.settings.max_ancestor_depth;
        let before = self.entries.len();
        self.entries.retain(|key, _| {
            key.root != root && ctx.role(key.root).is_some() && !is_ancestor_inclusive(ctx.tree, root, key.root, max_depth)
        });
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a match set was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderStrategy {
    Cache,
    Collection,
    CollectionWithPredicate,
    Traversal,
}

/// Result of one enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOutcome {
    /// Matches in document order
    pub matches: Vec<NodeId>,
    pub strategy: FinderStrategy,
    /// The root offers no collection support and could not be traversed
    pub unsupported: bool,
}

impl FindOutcome {
    fn empty_unsupported() -> Self {
        Self {
            matches: Vec::new(),
            strategy: FinderStrategy::Traversal,
            unsupported: true,
        }
    }
}

/// Enumerate every match of `spec` below `root`
///
/// Adapter failures never escape: a node that cannot be queried is left out,
/// and a root that cannot be traversed yields an empty, `unsupported` outcome.
pub fn find_all(
    ctx: &ClassifyContext,
    cache: &mut MatchCache,
    spec: &CategorySpec,
    root: NodeId,
    level: Option<u32>,
    mode: NavigationMode,
) -> FindOutcome {
    let key = CacheKey::new(root, spec.category, level);
    if let Some(matches) = cache.get(&key) {
        log::debug!("Cache hit for {} under {}: {} matches", spec.category, root, matches.len());
        return FindOutcome {
            matches,
            strategy: FinderStrategy::Cache,
            unsupported: false,
        };
    }
    log::debug!("Cache miss for {} under {}", spec.category, root);

    let Some((candidates, strategy)) = enumerate(ctx, spec, root, level) else {
        return FindOutcome::empty_unsupported();
    };

    let filtered: Vec<NodeId> = candidates
        .into_iter()
        .filter(|node| classifier::is_valid_match(ctx, *node))
        .filter(|node| mode != NavigationMode::Gui || classifier::is_non_document_object(ctx, *node))
        .collect();
    let matches = sort_by_document_order(ctx, filtered);
    log::debug!(
        "Found {} {} matches under {} via {:?}",
        matches.len(),
        spec.category,
        root,
        strategy
    );

    if !matches.is_empty() {
        cache.insert(key, matches.clone());
    }
    FindOutcome {
        matches,
        strategy,
        unsupported: false,
    }
}

fn enumerate(
    ctx: &ClassifyContext,
    spec: &CategorySpec,
    root: NodeId,
    level: Option<u32>,
) -> Option<(Vec<NodeId>, FinderStrategy)> {
    let criteria = spec.search_criteria(level);
    let collection = ctx.tree.supports_collection(root);

    if let (true, Some(criteria)) = (collection, criteria) {
        match ctx.tree.collection_query(root, &criteria) {
            Ok(mut nodes) => {
                let cap = ctx.settings.max_traversal_nodes;
                if nodes.len() > cap {
                    log::warn!("Collection query under {} returned {} nodes, keeping {}", root, nodes.len(), cap);
                    nodes.truncate(cap);
                }
                if criteria.apply_predicate {
                    nodes.retain(|node| spec.matches(ctx, *node, level));
                    return Some((nodes, FinderStrategy::CollectionWithPredicate));
                }
                return Some((nodes, FinderStrategy::Collection));
            }
            Err(e) => {
                log::debug!("Collection query for {} under {} failed: {}", spec.category, root, e);
            }
        }
    }

    match traverse(ctx, root, |node| spec.matches(ctx, node, level)) {
        Ok(nodes) => Some((nodes, FinderStrategy::Traversal)),
        Err(e) => {
            if collection {
                log::debug!("Traversal of {} failed after collection fallback: {}", root, e);
                Some((Vec::new(), FinderStrategy::Traversal))
            } else {
                log::warn!("Structural navigation not supported under {}: {}", root, e);
                None
            }
        }
    }
}

/// Depth-first pre-order walk of the descendants of `root`
///
/// Fails only when the root itself cannot be read. Unreadable descendants
/// are skipped, revisits are ignored, and the walk stops after
/// `max_traversal_nodes` nodes.
pub fn traverse(
    ctx: &ClassifyContext,
    root: NodeId,
    mut pred: impl FnMut(NodeId) -> bool,
) -> TreeResult<Vec<NodeId>> {
    let children = ctx.tree.children(root)?;
    let cap = ctx.settings.max_traversal_nodes;
    let mut visited = HashSet::from([root]);
    let mut stack: Vec<NodeId> = children.into_iter().rev().collect();
    let mut matches = Vec::new();
    let mut count = 0;

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        count += 1;
        if count > cap {
            log::warn!("Traversal under {} stopped after {} nodes", root, cap);
            break;
        }
        if pred(node) {
            matches.push(node);
        }
        match ctx.tree.children(node) {
            Ok(children) => stack.extend(children.into_iter().rev()),
            Err(e) => log::debug!("Skipping children of {}: {}", node, e),
        }
    }
    Ok(matches)
}

/// Sort into document order, dropping duplicates and nodes without a path
pub fn sort_by_document_order(ctx: &ClassifyContext, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut with_paths: Vec<(Vec<usize>, NodeId)> = nodes
        .into_iter()
        .filter(|node| seen.insert(*node))
        .filter_map(|node| match ctx.tree.path(node) {
            Ok(path) => Some((path, node)),
            Err(e) => {
                log::debug!("Dropping {} without a path: {}", node, e);
                None
            }
        })
        .collect();
    with_paths.sort_by(|a, b| path_compare(&a.0, &b.0));
    with_paths.dedup_by(|a, b| a.0 == b.0);
    with_paths.into_iter().map(|(_, node)| node).collect()
}
