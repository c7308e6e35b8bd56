//! Structural navigator session
//!
//! [`StructuralNavigator`] owns everything that lives for one document
//! session: the navigation mode, the match cache, the table position and
//! the locus of focus. It never owns the tree; every operation borrows the
//! tree and a [`Presenter`] for the duration of one command.

use crate::config::NavigatorSettings;
use crate::messages;
use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::labels;
use crate::navigation::locator::{self, Position};
use crate::navigation::root::resolve_root;
use crate::navigation::selector::{self, Selection};
use crate::navigation::{
    finder, Category, CategoryRegistry, CategorySpec, CellDirection, CellMoveResult, Direction, DynamicHeader, FindOutcome,
    MatchCache, ModeState, NavigationMode, TableNavigator,
};
use crate::presenter::{ObjectList, ObjectListRow, Presenter};
use crate::tree::{find_ancestor_inclusive, is_ancestor_inclusive, path_compare, AccessibleTree, NodeId, State};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Which end of the enclosing container to move to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEdge {
    Start,
    End,
}

/// Mode & command controller for one document session
#[derive(Debug)]
pub struct StructuralNavigator {
    registry: CategoryRegistry,
    settings: NavigatorSettings,
    mode: ModeState,
    cache: MatchCache,
    tables: TableNavigator,
    locus: Option<NodeId>,
    warned_roots: HashSet<NodeId>,
    last_live_region: Option<NodeId>,
}

impl StructuralNavigator {
    /// Navigator in document mode with the built-in categories
    pub fn new(settings: NavigatorSettings) -> Self {
        Self {
            registry: CategoryRegistry::with_defaults(),
            settings,
            mode: ModeState::new(NavigationMode::Document),
            cache: MatchCache::new(),
            tables: TableNavigator::new(),
            locus: None,
            warned_roots: HashSet::new(),
            last_live_region: None,
        }
    }

    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.mode = ModeState::new(mode);
        self
    }

    pub fn with_registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = registry;
        self.cache.clear();
        self
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    /// Replace the settings
    ///
    /// Cached matches may depend on the settings and are dropped. Roots
    /// already warned about as unsupported are forgotten so the warning is
    /// given again under the new settings.
    pub fn set_settings(&mut self, settings: NavigatorSettings) {
        self.settings = settings;
        self.cache.clear();
        self.warned_roots.clear();
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub fn tables(&self) -> &TableNavigator {
        &self.tables
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode.mode()
    }

    /// Set the mode without any announcement; returns whether it changed
    pub fn set_mode(&mut self, mode: NavigationMode) -> bool {
        let changed = self.mode.set_mode(mode);
        if changed {
            log::info!("Structural navigation mode set to {}", mode);
            self.cache.clear();
        }
        changed
    }

    /// Advance Off -> Document -> Gui -> Off, announcing the new mode
    ///
    /// Entering Document or Gui warns once per root when the root offers
    /// no collection support.
    pub fn cycle_mode(&mut self, tree: &dyn AccessibleTree, presenter: &mut dyn Presenter) -> NavigationMode {
        if !self.mode.cycle_enabled() {
            log::debug!("Mode cycle ignored while suspended");
            return self.mode.mode();
        }
        let mode = self.mode.cycle();
        self.cache.clear();
        log::info!("Structural navigation mode cycled to {}", mode);
        presenter.present_message(mode.message(), None);

        if mode != NavigationMode::Off {
            let ctx = ClassifyContext::new(tree, &self.settings);
            if let Some(root) = resolve_root(&ctx, mode, self.locus) {
                if !tree.supports_collection(root) {
                    self.warn_unsupported(root, presenter);
                }
            }
        }
        mode
    }

    pub fn is_suspended(&self) -> bool {
        self.mode.is_suspended()
    }

    /// Temporarily disable every command without changing the mode
    pub fn set_suspended(&mut self, suspended: bool) -> bool {
        let changed = self.mode.set_suspended(suspended);
        if changed {
            log::debug!("Structural navigation {}", if suspended { "suspended" } else { "resumed" });
        }
        changed
    }

    /// Category, container, live region and table commands
    pub fn commands_enabled(&self) -> bool {
        self.mode.commands_enabled()
    }

    /// The mode cycle command
    pub fn cycle_enabled(&self) -> bool {
        self.mode.cycle_enabled()
    }

    pub fn locus_of_focus(&self) -> Option<NodeId> {
        self.locus
    }

    /// Record where the user is; cached matches stay valid
    pub fn set_locus_of_focus(&mut self, node: Option<NodeId>) {
        self.locus = node;
    }

    /// Drop cached matches searched from `root` or from anything inside it
    /// after a structural change
    pub fn invalidate(&mut self, tree: &dyn AccessibleTree, root: NodeId) -> usize {
        let ctx = ClassifyContext::new(tree, &self.settings);
        let dropped = self.cache.invalidate(&ctx, root);
        log::debug!("Invalidated {} cached match sets under {}", dropped, root);
        dropped
    }

    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    /// Search root for the current locus and mode
    pub fn current_root(&self, tree: &dyn AccessibleTree) -> Option<NodeId> {
        let ctx = ClassifyContext::new(tree, &self.settings);
        resolve_root(&ctx, self.mode.mode(), self.locus)
    }

    fn warn_unsupported(&mut self, root: NodeId, presenter: &mut dyn Presenter) {
        if self.warned_roots.insert(root) {
            log::warn!("Structural navigation is not supported under {}", root);
            presenter.present_message(
                messages::STRUCTURAL_NAVIGATION_NOT_SUPPORTED_FULL,
                Some(messages::STRUCTURAL_NAVIGATION_NOT_SUPPORTED_BRIEF),
            );
        }
    }

    fn spec(&self, category: Category) -> Option<CategorySpec> {
        let spec = self.registry.get(category).cloned();
        if spec.is_none() {
            log::debug!("No category registered for {}", category);
        }
        spec
    }

    /// Enumerate under the current root, warning once if the root is unsupported
    ///
    /// `None` when no search root can be resolved.
    fn find_outcome(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: Option<&mut dyn Presenter>,
        spec: &CategorySpec,
        level: Option<u32>,
    ) -> Option<FindOutcome> {
        let mode = self.mode.mode();
        let ctx = ClassifyContext::new(tree, &self.settings);
        let Some(root) = resolve_root(&ctx, mode, self.locus) else {
            log::debug!("No search root for {}", spec.category);
            return None;
        };
        let outcome = finder::find_all(&ctx, &mut self.cache, spec, root, level, mode);
        if outcome.unsupported {
            match presenter {
                Some(presenter) => self.warn_unsupported(root, presenter),
                None => {
                    self.warned_roots.insert(root);
                }
            }
        }
        Some(outcome)
    }

    /// Every match of `category` under the current root, in document order
    ///
    /// Empty while commands are disabled; no query is made in that case.
    pub fn find_all(&mut self, tree: &dyn AccessibleTree, category: Category, level: Option<u32>) -> Vec<NodeId> {
        if !self.commands_enabled() {
            return Vec::new();
        }
        let Some(spec) = self.spec(category) else {
            return Vec::new();
        };
        self.find_outcome(tree, None, &spec, level)
            .map(|outcome| outcome.matches)
            .unwrap_or_default()
    }

    pub fn next(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        category: Category,
        level: Option<u32>,
    ) -> Option<NodeId> {
        self.step(tree, presenter, category, level, Direction::Next)
    }

    pub fn previous(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        category: Category,
        level: Option<u32>,
    ) -> Option<NodeId> {
        self.step(tree, presenter, category, level, Direction::Previous)
    }

    /// Move to the next or previous match and present it
    pub fn step(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        category: Category,
        level: Option<u32>,
        direction: Direction,
    ) -> Option<NodeId> {
        if !self.commands_enabled() {
            log::debug!("Ignoring {} {}: commands disabled", direction.as_str(), category);
            return None;
        }
        let spec = self.spec(category)?;
        let matches = match self.find_outcome(tree, Some(&mut *presenter), &spec, level) {
            Some(outcome) if outcome.unsupported => return None,
            Some(outcome) => outcome.matches,
            None => Vec::new(),
        };

        let selection = {
            let ctx = ClassifyContext::new(tree, &self.settings);
            let position = match self.locus {
                Some(current) => locator::locate(&ctx, &matches, current, direction),
                None => Position::Between { lower: 0, upper: 0 },
            };
            log::debug!("{} {}: {} matches, position {:?}", direction.as_str(), category, matches.len(), position);
            selector::select(&ctx, &matches, position, direction, self.settings.wrap, self.locus)
        };

        match selection {
            Selection::NotFound => {
                presenter.present_message(
                    &spec.not_found_message(level),
                    Some(messages::STRUCTURAL_NAVIGATION_NOT_FOUND),
                );
                None
            }
            Selection::Found(node) | Selection::Wrapped(node) => {
                if let Some(message) = selection.wrap_message(direction) {
                    presenter.present_message(message, None);
                }
                self.present_match(tree, presenter, node);
                Some(node)
            }
        }
    }

    /// Build and show the list dialog for `category`
    ///
    /// Returns `None` when commands are disabled or nothing matched.
    pub fn list(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        category: Category,
        level: Option<u32>,
    ) -> Option<ObjectList> {
        if !self.commands_enabled() {
            log::debug!("Ignoring list of {}: commands disabled", category);
            return None;
        }
        let spec = self.spec(category)?;
        let matches = match self.find_outcome(tree, Some(&mut *presenter), &spec, level) {
            Some(outcome) if outcome.unsupported => return None,
            Some(outcome) => outcome.matches,
            None => Vec::new(),
        };
        let title = format!("{}: {}", spec.list_title(level), messages::items_found(matches.len()));
        if matches.is_empty() {
            presenter.present_message(&title, None);
            return None;
        }

        let ctx = ClassifyContext::new(tree, &self.settings);
        let selected = match self.locus {
            Some(current) => match locator::locate(&ctx, &matches, current, Direction::Next) {
                Position::Within { index, .. } => index,
                Position::Between { .. } => 0,
            },
            None => 0,
        };
        let rows = matches
            .iter()
            .map(|node| ObjectListRow {
                node: *node,
                cells: spec.row_for(&ctx, *node, level),
            })
            .collect();
        let list = ObjectList {
            title,
            column_headers: spec.column_headers(level),
            rows,
            selected,
        };
        presenter.show_list(&list);
        Some(list)
    }

    /// Move the locus to `node` and present it the way the mode requires
    ///
    /// In GUI mode the node is focused; a node that does not report
    /// itself focused afterwards is announced as unfocusable.
    pub fn present_match(&mut self, tree: &dyn AccessibleTree, presenter: &mut dyn Presenter, node: NodeId) {
        self.locus = Some(node);
        if self.mode.mode() != NavigationMode::Gui {
            presenter.present_object(tree, node, 0);
            return;
        }

        if let Err(e) = tree.grab_focus(node) {
            log::debug!("Focus request for {} failed: {}", node, e);
        }
        let focused = tree
            .states(node)
            .is_ok_and(|states| states.contains(State::Focused));
        if focused {
            presenter.present_object(tree, node, 0);
        } else {
            presenter.present_message(messages::NOT_FOCUSED, None);
        }
    }

    /// Remember the live region that last produced an announcement
    pub fn note_live_region(&mut self, node: NodeId) {
        self.last_live_region = Some(node);
    }

    pub fn last_live_region(&self) -> Option<NodeId> {
        self.last_live_region
    }

    /// Move to the most recently announced live region
    pub fn present_last_live_region(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
    ) -> Option<NodeId> {
        if !self.commands_enabled() {
            return None;
        }
        if !self.settings.infer_live_regions {
            presenter.present_message(messages::LIVE_REGIONS_OFF, None);
            return None;
        }

        let valid = {
            let ctx = ClassifyContext::new(tree, &self.settings);
            self.last_live_region.filter(|node| classifier::is_valid_match(&ctx, *node))
        };
        match valid {
            Some(node) => {
                self.present_match(tree, presenter, node);
                Some(node)
            }
            None => {
                let message = self
                    .registry
                    .get(Category::LiveRegion)
                    .map(|spec| spec.not_found_message(None))
                    .unwrap_or_else(|| messages::STRUCTURAL_NAVIGATION_NOT_FOUND.to_string());
                presenter.present_message(&message, Some(messages::STRUCTURAL_NAVIGATION_NOT_FOUND));
                None
            }
        }
    }

    /// Move to the start or just past the end of the enclosing container
    pub fn container_edge(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        edge: ContainerEdge,
    ) -> Option<NodeId> {
        if !self.commands_enabled() {
            return None;
        }
        let target = {
            let ctx = ClassifyContext::new(tree, &self.settings);
            container_target(&ctx, self.mode.mode(), self.locus, edge)
        };
        match target {
            Some(node) => {
                self.present_match(tree, presenter, node);
                Some(node)
            }
            None => {
                presenter.present_message(messages::CONTAINER_NOT_IN_A, None);
                None
            }
        }
    }

    pub fn container_start(&mut self, tree: &dyn AccessibleTree, presenter: &mut dyn Presenter) -> Option<NodeId> {
        self.container_edge(tree, presenter, ContainerEdge::Start)
    }

    pub fn container_end(&mut self, tree: &dyn AccessibleTree, presenter: &mut dyn Presenter) -> Option<NodeId> {
        self.container_edge(tree, presenter, ContainerEdge::End)
    }

    /// Move between cells of the table around the locus
    pub fn move_cell(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        direction: CellDirection,
    ) -> Option<NodeId> {
        if !self.commands_enabled() {
            return None;
        }
        let Some(current) = self.locus else {
            presenter.present_message(messages::TABLE_NOT_IN_A, None);
            return None;
        };

        let ctx = ClassifyContext::new(tree, &self.settings);
        match self.tables.move_cell(&ctx, current, direction) {
            CellMoveResult::NotInTable => {
                presenter.present_message(messages::TABLE_NOT_IN_A, None);
                None
            }
            CellMoveResult::Stayed { edge, .. } => {
                presenter.present_message(edge, None);
                None
            }
            CellMoveResult::Moved(moved) => {
                if let Some(edge) = moved.edge {
                    presenter.present_message(edge, None);
                }
                for header in moved.row_headers.iter().chain(&moved.column_headers) {
                    let label = labels::item_string(&ctx, *header);
                    if !label.is_empty() {
                        presenter.present_message(&label, None);
                    }
                }
                self.locus = Some(moved.cell);
                presenter.present_object(tree, moved.cell, 0);

                if let Some(extents) = moved.extents.filter(|_| self.settings.speak_cell_span) {
                    let span = messages::cell_span(extents.row_span, extents.col_span);
                    if !span.is_empty() {
                        presenter.present_message(&span, None);
                    }
                }
                if self.settings.present_cell_coordinates {
                    if let Some(coordinate) = moved.coordinate {
                        presenter.present_message(
                            &messages::table_cell_coordinates(coordinate.row, coordinate.col),
                            None,
                        );
                    }
                }
                Some(moved.cell)
            }
        }
    }

    /// Make the current cell's row (or column) the dynamic header line of
    /// its table; returns the zero-based index that was set
    pub fn set_dynamic_headers(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        header: DynamicHeader,
    ) -> Option<usize> {
        if !self.commands_enabled() {
            return None;
        }
        let ctx = ClassifyContext::new(tree, &self.settings);
        let Some((table, cell)) = self.locus.and_then(|current| TableNavigator::locate_cell(&ctx, current)) else {
            presenter.present_message(messages::TABLE_NOT_IN_A, None);
            return None;
        };
        let coordinate = match self.tables.coordinate_of(&ctx, table, cell) {
            Ok(coordinate) => coordinate,
            Err(e) => {
                log::debug!("No coordinate for cell {}: {}", cell, e);
                return None;
            }
        };

        let (index, message) = match header {
            DynamicHeader::ColumnHeadersRow => {
                self.tables.set_dynamic_column_headers_row(table, coordinate.row);
                (coordinate.row, messages::dynamic_column_header_set(coordinate.row))
            }
            DynamicHeader::RowHeadersColumn => {
                self.tables.set_dynamic_row_headers_column(table, coordinate.col);
                (coordinate.col, messages::dynamic_row_header_set(coordinate.col))
            }
        };
        log::debug!("Dynamic {} of table {} set to {}", header.as_str(), table, index);
        presenter.present_message(&message, None);
        Some(index)
    }

    /// Forget the dynamic header line of the current table; returns whether
    /// the locus was in a table
    pub fn clear_dynamic_headers(
        &mut self,
        tree: &dyn AccessibleTree,
        presenter: &mut dyn Presenter,
        header: DynamicHeader,
    ) -> bool {
        if !self.commands_enabled() {
            return false;
        }
        let ctx = ClassifyContext::new(tree, &self.settings);
        let Some((table, _)) = self.locus.and_then(|current| TableNavigator::locate_cell(&ctx, current)) else {
            presenter.present_message(messages::TABLE_NOT_IN_A, None);
            return false;
        };

        let message = match header {
            DynamicHeader::ColumnHeadersRow => {
                self.tables.clear_dynamic_column_headers_row(table);
                messages::DYNAMIC_COLUMN_HEADER_CLEARED
            }
            DynamicHeader::RowHeadersColumn => {
                self.tables.clear_dynamic_row_headers_column(table);
                messages::DYNAMIC_ROW_HEADER_CLEARED
            }
        };
        presenter.present_message(message, None);
        true
    }
}

/// Leaf that can carry the caret
fn is_content(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.tree.children(node).is_ok_and(|children| children.is_empty()) && classifier::is_valid_match(ctx, node)
}

fn container_target(
    ctx: &ClassifyContext,
    mode: NavigationMode,
    locus: Option<NodeId>,
    edge: ContainerEdge,
) -> Option<NodeId> {
    let current = locus?;
    let root = resolve_root(ctx, mode, Some(current))?;
    let max_depth = ctx.settings.max_ancestor_depth;

    let container = find_ancestor_inclusive(ctx.tree, current, max_depth, |id| {
        id == root || classifier::is_large_container(ctx, id)
    })
    .filter(|id| *id != root)?;
    log::debug!("Container of {} is {}", current, container);

    let inside = finder::traverse(ctx, container, |id| is_content(ctx, id)).unwrap_or_default();
    match edge {
        ContainerEdge::Start => inside.first().copied().or(Some(container)),
        ContainerEdge::End => {
            let container_path = ctx.tree.path(container).ok()?;
            let following = finder::traverse(ctx, root, |id| {
                is_content(ctx, id)
                    && !is_ancestor_inclusive(ctx.tree, container, id, max_depth)
                    && ctx
                        .tree
                        .path(id)
                        .is_ok_and(|path| path_compare(&path, &container_path) == Ordering::Greater)
            })
            .unwrap_or_default();
            following
                .first()
                .copied()
                .or_else(|| inside.last().copied())
                .or(Some(container))
        }
    }
}
