//! # structural-nav
//!
//! Structural navigation for screen readers: jump between headings, links,
//! form fields, tables, landmarks and other semantic categories of a live
//! accessibility tree, and move between table cells by row and column.
//!
//! ## Features
//!
//! - **Category search**: collection queries when the tree offers them, bounded traversal otherwise
//! - **Positional lookup**: finds the caret's place in a match set even when it sits inside or between matches
//! - **Wrap-aware stepping**: next/previous with optional wrapping that never lands back on the start
//! - **Table cells**: row/column movement that stays stable across spanning cells
//! - **Command system**: named commands with JSON parameters and default key bindings
//!
//! ## Library Usage
//!
//! The tree is always owned by someone else. Implement [`AccessibleTree`]
//! for your accessibility backend, or load a [`SnapshotTree`] from JSON:
//!
//! ```rust
//! use structural_nav::presenter::RecordingPresenter;
//! use structural_nav::tree::{NodeSpec, Role, SnapshotTree};
//! use structural_nav::{Category, NavigatorSettings, StructuralNavigator};
//!
//! let tree = SnapshotTree::from_spec(
//!     NodeSpec::new(Role::DocumentWeb)
//!         .with_child(NodeSpec::heading(1, "Intro").with_id("intro"))
//!         .with_child(NodeSpec::paragraph("Some text under the first heading"))
//!         .with_child(NodeSpec::heading(2, "Details").with_id("details")),
//! );
//!
//! let mut navigator = StructuralNavigator::new(NavigatorSettings::default());
//! navigator.set_locus_of_focus(tree.find("intro"));
//! let mut presenter = RecordingPresenter::new();
//!
//! let next = navigator.next(&tree, &mut presenter, Category::Heading, None);
//! assert_eq!(next, tree.find("details"));
//! ```
//!
//! ## Module Overview
//!
//! - [`tree`]: the accessible tree adapter trait and an in-memory snapshot implementation
//! - [`navigation`]: classifier, category registry, root resolver, finder, locator, selector and table navigator
//! - [`navigator`]: [`StructuralNavigator`], the per-document session that ties them together
//! - [`commands`]: named commands and their registry
//! - [`presenter`]: the output boundary
//! - [`config`]: user settings
//! - [`error`]: error types and result aliases

pub mod commands;
pub mod config;
pub mod error;
pub mod messages;
pub mod navigation;
pub mod navigator;
pub mod presenter;
pub mod tree;

pub use commands::{Command, CommandContext, CommandRegistry, CommandResult, KeyBinding};
pub use config::NavigatorSettings;
pub use error::{NavigatorError, Result, TreeError, TreeResult};
pub use navigation::{Category, CategoryRegistry, CellDirection, Direction, DynamicHeader, NavigationMode};
pub use navigator::{ContainerEdge, StructuralNavigator};
pub use presenter::{ObjectList, Presentation, Presenter, RecordingPresenter};
pub use tree::{AccessibleTree, NodeId, NodeSpec, Role, SnapshotTree, State};
