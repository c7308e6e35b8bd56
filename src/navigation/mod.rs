//! The structural navigation engine
//!
//! Each submodule is one stage of a category command:
//! - root: pick the subtree to search
//! - finder: enumerate and cache the matches of a category
//! - locator: find the current object within the matches
//! - selector: step to the next or previous valid match, wrapping if allowed
//! - table: move between cells of one table
//!
//! classifier and category hold the per-category knowledge the stages share.

pub mod category;
pub mod classifier;
pub mod finder;
pub mod labels;
pub mod locator;
pub mod mode;
pub mod root;
pub mod selector;
pub mod table;

pub use category::{Category, CategoryRegistry, CategorySpec, CommandKinds};
pub use classifier::ClassifyContext;
pub use finder::{CacheKey, FindOutcome, FinderStrategy, MatchCache};
pub use locator::Position;
pub use mode::{ModeState, NavigationMode};
pub use selector::Selection;
pub use table::{CellCoordinate, CellDirection, CellMove, CellMoveResult, DynamicHeader, TableNavigator};

use serde::{Deserialize, Serialize};

/// Direction of travel through a match set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Previous => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}
