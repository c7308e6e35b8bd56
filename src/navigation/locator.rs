//! Where the current locus sits relative to an ordered match set

use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::Direction;
use crate::tree::{find_ancestor, find_ancestor_inclusive, path_compare, NodeId};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Where the current object sits relative to a match set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The current object is `matches[index]` (`exact`) or one of its descendants
    Within { index: usize, exact: bool },
    /// The current object lies between matches.
    ///
    /// `lower` matches come before it in document order, `upper` come
    /// before or share its path.
    Between { lower: usize, upper: usize },
}

impl Position {
    /// Index of the first candidate in `direction`; may fall outside the set
    pub fn step_start(self, direction: Direction) -> isize {
        match (self, direction) {
            (Self::Within { index, .. }, Direction::Next) => index as isize + 1,
            (Self::Within { index, .. }, Direction::Previous) => index as isize - 1,
            (Self::Between { upper, .. }, Direction::Next) => upper as isize,
            (Self::Between { lower, .. }, Direction::Previous) => lower as isize - 1,
        }
    }

    /// Index of the match the current object is in, if any
    pub fn anchor(self) -> Option<usize> {
        match self {
            Self::Within { index, .. } => Some(index),
            Self::Between { .. } => None,
        }
    }
}

/// Find `current` in `matches`, which must be in document order
pub fn locate(ctx: &ClassifyContext, matches: &[NodeId], current: NodeId, direction: Direction) -> Position {
    let index_of: HashMap<NodeId, usize> = matches.iter().enumerate().map(|(i, node)| (*node, i)).collect();
    let max_depth = ctx.settings.max_ancestor_depth;

    if let Some(anchor) = find_ancestor_inclusive(ctx.tree, current, max_depth, |id| index_of.contains_key(&id)) {
        let mut anchor = anchor;
        // A heading wrapped in another heading would make "previous" land on its own wrapper
        if direction == Direction::Previous && classifier::is_heading(ctx, anchor) {
            if let Some(outer) = find_ancestor(ctx.tree, anchor, max_depth, |id| {
                classifier::is_heading(ctx, id) && index_of.contains_key(&id)
            }) {
                log::debug!("Heading {} is inside heading {}; using the outer one", anchor, outer);
                anchor = outer;
            }
        }
        if let Some(index) = index_of.get(&anchor) {
            return Position::Within {
                index: *index,
                exact: anchor == current,
            };
        }
    }

    let Ok(current_path) = ctx.tree.path(current) else {
        log::debug!("No path for current object {}; treating it as the document start", current);
        return Position::Between { lower: 0, upper: 0 };
    };

    let mut lower = 0;
    let mut upper = 0;
    for node in matches {
        let Ok(path) = ctx.tree.path(*node) else {
            continue;
        };
        match path_compare(&path, &current_path) {
            Ordering::Less => {
                lower += 1;
                upper += 1;
            }
            Ordering::Equal => upper += 1,
            Ordering::Greater => break,
        }
    }
    Position::Between { lower, upper }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorSettings;
    use crate::tree::{NodeSpec, Role, SnapshotTree};

    fn create_test_document() -> SnapshotTree {
        SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(
                    NodeSpec::paragraph("First paragraph with enough text")
                        .with_id("p1")
                        .with_child(NodeSpec::new(Role::Static).with_text("inner").with_id("p1-text")),
                )
                .with_child(NodeSpec::new(Role::Separator).with_id("hr"))
                .with_child(NodeSpec::paragraph("Second paragraph with enough text").with_id("p2"))
                .with_child(
                    NodeSpec::heading(2, "Outer")
                        .with_id("outer")
                        .with_child(NodeSpec::heading(2, "Inner").with_id("inner")),
                ),
        )
    }

    #[test]
    fn test_locate_exact_and_descendant() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let matches = vec![tree.node("p1").unwrap(), tree.node("p2").unwrap()];

        assert_eq!(
            locate(&ctx, &matches, tree.node("p2").unwrap(), Direction::Next),
            Position::Within { index: 1, exact: true }
        );
        assert_eq!(
            locate(&ctx, &matches, tree.node("p1-text").unwrap(), Direction::Next),
            Position::Within { index: 0, exact: false }
        );
    }

    #[test]
    fn test_locate_between_matches() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let matches = vec![tree.node("p1").unwrap(), tree.node("p2").unwrap()];

        let position = locate(&ctx, &matches, tree.node("hr").unwrap(), Direction::Next);
        assert_eq!(position, Position::Between { lower: 1, upper: 1 });
        assert_eq!(position.step_start(Direction::Next), 1);
        assert_eq!(position.step_start(Direction::Previous), 0);

        let position = locate(&ctx, &matches, tree.root(), Direction::Next);
        assert_eq!(position, Position::Between { lower: 0, upper: 0 });
        assert_eq!(position.step_start(Direction::Previous), -1);
    }

    #[test]
    fn test_nested_heading_uses_outer_for_previous() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let outer = tree.node("outer").unwrap();
        let inner = tree.node("inner").unwrap();
        let matches = vec![outer, inner];

        assert_eq!(
            locate(&ctx, &matches, inner, Direction::Previous),
            Position::Within { index: 0, exact: false }
        );
        assert_eq!(
            locate(&ctx, &matches, inner, Direction::Next),
            Position::Within { index: 1, exact: true }
        );
    }

    #[test]
    fn test_locate_stale_current() {
        let mut tree = create_test_document();
        let hr = tree.node("hr").unwrap();
        tree.remove(hr).unwrap();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let matches = vec![tree.node("p1").unwrap(), tree.node("p2").unwrap()];

        assert_eq!(locate(&ctx, &matches, hr, Direction::Next), Position::Between { lower: 0, upper: 0 });
    }
}
