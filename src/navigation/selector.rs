//! Choosing the next or previous match, wrapping when allowed

use crate::messages;
use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::locator::Position;
use crate::navigation::Direction;
use crate::tree::NodeId;

/// Outcome of stepping through a match set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Found(NodeId),
    /// Found after crossing the end of the set in the direction of travel
    Wrapped(NodeId),
    NotFound,
}

impl Selection {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Found(node) | Self::Wrapped(node) => Some(node),
            Self::NotFound => None,
        }
    }

    /// "Wrapping to top." / "Wrapping to bottom." for wrapped selections
    pub fn wrap_message(self, direction: Direction) -> Option<&'static str> {
        match (self, direction) {
            (Self::Wrapped(_), Direction::Next) => Some(messages::WRAPPING_TO_TOP),
            (Self::Wrapped(_), Direction::Previous) => Some(messages::WRAPPING_TO_BOTTOM),
            _ => None,
        }
    }
}

/// Pick the next valid match in `direction`
///
/// At most `matches.len()` candidates are examined. Entries that are no
/// longer showing or have lost their content are skipped. After wrapping,
/// neither `current` nor the match containing it is ever returned.
pub fn select(
    ctx: &ClassifyContext,
    matches: &[NodeId],
    position: Position,
    direction: Direction,
    wrap: bool,
    current: Option<NodeId>,
) -> Selection {
    let len = matches.len() as isize;
    if len == 0 {
        return Selection::NotFound;
    }
    let anchor = position.anchor().and_then(|index| matches.get(index).copied());
    let step = direction.step();
    let mut index = position.step_start(direction);
    let mut wrapped = false;

    for _ in 0..len {
        if index < 0 || index >= len {
            if !wrap || wrapped {
                return Selection::NotFound;
            }
            index = if direction == Direction::Next { 0 } else { len - 1 };
            wrapped = true;
        }

        let candidate = matches[index as usize];
        if wrapped && (Some(candidate) == current || Some(candidate) == anchor) {
            log::debug!("Not wrapping back onto {}", candidate);
            return Selection::NotFound;
        }
        if classifier::is_valid_match(ctx, candidate) {
            return if wrapped {
                Selection::Wrapped(candidate)
            } else {
                Selection::Found(candidate)
            };
        }
        log::debug!("Skipping stale match {}", candidate);
        index += step;
    }
    Selection::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorSettings;
    use crate::tree::{NodeSpec, Role, SnapshotTree, State};

    fn create_test_document() -> SnapshotTree {
        SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::heading(1, "One").with_id("one"))
                .with_child(NodeSpec::heading(2, "Two").with_id("two"))
                .with_child(NodeSpec::heading(2, "Three").with_id("three")),
        )
    }

    fn ids(tree: &SnapshotTree) -> Vec<NodeId> {
        ["one", "two", "three"].iter().map(|id| tree.node(id).unwrap()).collect()
    }

    #[test]
    fn test_step_and_wrap() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let matches = ids(&tree);
        let first = Position::Within { index: 0, exact: true };
        let last = Position::Within { index: 2, exact: true };

        assert_eq!(select(&ctx, &matches, first, Direction::Next, true, Some(matches[0])), Selection::Found(matches[1]));
        assert_eq!(
            select(&ctx, &matches, first, Direction::Previous, true, Some(matches[0])),
            Selection::Wrapped(matches[2])
        );
        assert_eq!(select(&ctx, &matches, last, Direction::Next, true, Some(matches[2])), Selection::Wrapped(matches[0]));
        assert_eq!(select(&ctx, &matches, last, Direction::Next, false, Some(matches[2])), Selection::NotFound);
    }

    #[test]
    fn test_wrap_messages() {
        assert_eq!(Selection::Wrapped(1).wrap_message(Direction::Next), Some("Wrapping to top."));
        assert_eq!(Selection::Wrapped(1).wrap_message(Direction::Previous), Some("Wrapping to bottom."));
        assert_eq!(Selection::Found(1).wrap_message(Direction::Next), None);
    }

    #[test]
    fn test_single_match_never_wraps_to_itself() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let only = vec![tree.node("two").unwrap()];
        let position = Position::Within { index: 0, exact: true };

        assert_eq!(select(&ctx, &only, position, Direction::Next, true, Some(only[0])), Selection::NotFound);
        assert_eq!(select(&ctx, &only, position, Direction::Previous, true, Some(only[0])), Selection::NotFound);
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        let mut tree = create_test_document();
        let matches = ids(&tree);
        tree.set_state(matches[1], State::Showing, false).unwrap();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let first = Position::Within { index: 0, exact: true };

        assert_eq!(select(&ctx, &matches, first, Direction::Next, true, Some(matches[0])), Selection::Found(matches[2]));

        tree.remove(matches[2]).unwrap();
        let ctx = ClassifyContext::new(&tree, &settings);
        assert_eq!(select(&ctx, &matches, first, Direction::Next, true, Some(matches[0])), Selection::NotFound);
    }

    #[test]
    fn test_between_positions() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let matches = ids(&tree);
        let before_all = Position::Between { lower: 0, upper: 0 };

        assert_eq!(select(&ctx, &matches, before_all, Direction::Next, true, None), Selection::Found(matches[0]));
        assert_eq!(
            select(&ctx, &matches, before_all, Direction::Previous, true, None),
            Selection::Wrapped(matches[2])
        );
        assert_eq!(select(&ctx, &matches, before_all, Direction::Previous, false, None), Selection::NotFound);
    }
}
