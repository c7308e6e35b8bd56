//! In-memory [`AccessibleTree`] built from a [`NodeSpec`] description
//!
//! Used by the tests and by the command-line tool, which loads snapshots
//! from JSON.

use crate::error::{NavigatorError, Result, TreeError, TreeResult};
use crate::tree::criteria::SearchCriteria;
use crate::tree::node::{NodeSpec, TableSpan};
use crate::tree::role::{Role, State, StateSet};
use crate::tree::{AccessibleTree, CellExtents, NodeId};
use indexmap::IndexMap;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
struct NodeData {
    role: Role,
    name: String,
    description: String,
    text: String,
    states: StateSet,
    attributes: IndexMap<String, String>,
    actions: Vec<String>,
    uri: Option<String>,
    span: TableSpan,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    defunct: bool,
}

/// Grid layout of one table, derived from its rows and cell spans
#[derive(Debug, Default)]
struct TableLayout {
    grid: Vec<Vec<Option<NodeId>>>,
    extents: HashMap<NodeId, CellExtents>,
    columns: usize,
}

/// In-memory accessibility tree
///
/// Built from a [`NodeSpec`] document and mutable afterwards, so tests and
/// the CLI can reproduce a live tree: nodes can be removed (their handles
/// become defunct), states can change, and the collection and table
/// capabilities can be switched off to exercise fallback paths.
#[derive(Debug)]
pub struct SnapshotTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    ids: IndexMap<String, NodeId>,
    collection: bool,
    tables: bool,
    focused: Cell<Option<NodeId>>,
    active_window: Option<NodeId>,
}

impl SnapshotTree {
    /// Build a tree from a node description
    pub fn from_spec(spec: NodeSpec) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(spec.count_nodes()),
            root: 0,
            ids: IndexMap::new(),
            collection: true,
            tables: true,
            focused: Cell::new(None),
            active_window: None,
        };
        tree.root = tree.insert_spec(spec, None);
        tree
    }

    /// Parse a JSON node description
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: NodeSpec = serde_json::from_str(json)
            .map_err(|e| NavigatorError::Snapshot(format!("Failed to parse snapshot JSON: {}", e)))?;
        Ok(Self::from_spec(spec))
    }

    /// Load a JSON node description from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| NavigatorError::Snapshot(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Builder method: enable or disable the collection capability
    pub fn with_collection(mut self, enabled: bool) -> Self {
        self.collection = enabled;
        self
    }

    /// Builder method: enable or disable the table capability
    pub fn with_table_support(mut self, enabled: bool) -> Self {
        self.tables = enabled;
        self
    }

    /// Builder method: set the active window
    pub fn with_active_window(mut self, window: NodeId) -> Self {
        self.active_window = Some(window);
        self
    }

    pub fn set_collection(&mut self, enabled: bool) {
        self.collection = enabled;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| !n.defunct).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a node by its `id` attribute
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied().filter(|node| self.data(*node).is_ok())
    }

    /// Look up a node by its `id` attribute, failing when absent
    pub fn node(&self, id: &str) -> Result<NodeId> {
        self.find(id)
            .ok_or_else(|| NavigatorError::Snapshot(format!("No node with id '{}'", id)))
    }

    /// Node currently holding focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Remove a node and its subtree; their handles become defunct
    pub fn remove(&mut self, node: NodeId) -> TreeResult<()> {
        let parent = self.data(node)?.parent;
        if let Some(parent) = parent {
            self.data_mut(parent)?.children.retain(|c| *c != node);
        }
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            let data = self.data_mut(id)?;
            data.defunct = true;
            pending.extend(data.children.iter().copied());
        }
        if self.focused.get().is_some_and(|f| self.data(f).is_err()) {
            self.focused.set(None);
        }
        Ok(())
    }

    /// Insert a new subtree under `parent` at `index` (clamped to the child count)
    pub fn insert(&mut self, parent: NodeId, index: usize, spec: NodeSpec) -> TreeResult<NodeId> {
        self.data(parent)?;
        let id = self.insert_spec(spec, Some(parent));
        let children = &mut self.data_mut(parent)?.children;
        // insert_spec appended the child; move it into place
        children.pop();
        let index = index.min(children.len());
        children.insert(index, id);
        Ok(id)
    }

    /// Add or clear a state on a node
    pub fn set_state(&mut self, node: NodeId, state: State, enabled: bool) -> TreeResult<()> {
        if state == State::Focused {
            self.data(node)?;
            self.focused.set(if enabled { Some(node) } else { None });
            return Ok(());
        }
        let states = &mut self.data_mut(node)?.states;
        if enabled {
            states.insert(state);
        } else {
            states.remove(state);
        }
        Ok(())
    }

    /// Replace a node's text
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> TreeResult<()> {
        self.data_mut(node)?.text = text.into();
        Ok(())
    }

    /// Indented outline of the live tree with node handles
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_recursive(self.root, 0, &mut out);
        out
    }

    fn outline_recursive(&self, node: NodeId, depth: usize, out: &mut String) {
        let Ok(data) = self.data(node) else {
            return;
        };
        let label = if data.name.is_empty() { &data.text } else { &data.name };
        out.push_str(&format!("{}[{}] {}", "  ".repeat(depth), node, data.role));
        if let Some(id) = data.attributes.get("id") {
            out.push_str(&format!(" #{}", id));
        }
        if !label.trim().is_empty() {
            out.push_str(&format!(" \"{}\"", label.trim()));
        }
        out.push('\n');
        for child in &data.children {
            self.outline_recursive(*child, depth + 1, out);
        }
    }

    fn insert_spec(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let mut states = spec.states;
        if !spec.hidden {
            states.insert(State::Showing);
            states.insert(State::Visible);
        }
        if states.remove(State::Focused) {
            self.focused.set(Some(id));
        }
        if let Some(key) = spec.attributes.get("id") {
            self.ids.entry(key.clone()).or_insert(id);
        }

        self.nodes.push(NodeData {
            role: spec.role,
            name: spec.name.unwrap_or_default(),
            description: spec.description.unwrap_or_default(),
            text: spec.text.unwrap_or_default(),
            states,
            attributes: spec.attributes,
            actions: spec.actions,
            uri: spec.uri,
            span: spec.span.unwrap_or_default(),
            parent,
            children: Vec::new(),
            defunct: false,
        });
        if let Some(parent) = parent {
            self.nodes[parent as usize].children.push(id);
        }

        for child in spec.children {
            self.insert_spec(child, Some(id));
        }
        id
    }

    fn data(&self, node: NodeId) -> TreeResult<&NodeData> {
        let data = self
            .nodes
            .get(node as usize)
            .ok_or(TreeError::UnknownNode(node))?;
        if data.defunct {
            return Err(TreeError::Defunct(node));
        }
        Ok(data)
    }

    fn data_mut(&mut self, node: NodeId) -> TreeResult<&mut NodeData> {
        let data = self
            .nodes
            .get_mut(node as usize)
            .ok_or(TreeError::UnknownNode(node))?;
        if data.defunct {
            return Err(TreeError::Defunct(node));
        }
        Ok(data)
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) -> TreeResult<()> {
        for child in &self.data(root)?.children {
            out.push(*child);
            self.descendants(*child, out)?;
        }
        Ok(())
    }

    fn table_for(&self, cell: NodeId) -> TreeResult<NodeId> {
        let mut current = self.data(cell)?.parent;
        while let Some(id) = current {
            let data = self.data(id)?;
            if data.role == Role::Table {
                return Ok(id);
            }
            current = data.parent;
        }
        Err(TreeError::NotSupported { node: cell, interface: "TableCell" })
    }

    fn require_table(&self, table: NodeId) -> TreeResult<&NodeData> {
        let data = self.data(table)?;
        if !self.tables || data.role != Role::Table {
            return Err(TreeError::NotSupported { node: table, interface: "Table" });
        }
        Ok(data)
    }

    /// Rows of a table, looking through row groups but not into nested tables
    fn table_rows(&self, node: NodeId, rows: &mut Vec<NodeId>) -> TreeResult<()> {
        for child in &self.data(node)?.children {
            match self.data(*child)?.role {
                Role::TableRow => rows.push(*child),
                Role::Table => {}
                _ => self.table_rows(*child, rows)?,
            }
        }
        Ok(())
    }

    fn layout(&self, table: NodeId) -> TreeResult<TableLayout> {
        self.require_table(table)?;
        let mut rows = Vec::new();
        self.table_rows(table, &mut rows)?;

        let mut layout = TableLayout::default();
        for (r, row) in rows.iter().enumerate() {
            let mut col = 0;
            for cell in &self.data(*row)?.children {
                let data = self.data(*cell)?;
                if !data.role.is_table_cell() {
                    continue;
                }
                while layout.grid.get(r).and_then(|cells| cells.get(col)).is_some_and(Option::is_some) {
                    col += 1;
                }
                let row_span = data.span.rows.max(1);
                let col_span = data.span.cols.max(1);
                for rr in r..r + row_span {
                    if layout.grid.len() <= rr {
                        layout.grid.resize_with(rr + 1, Vec::new);
                    }
                    let grid_row = &mut layout.grid[rr];
                    if grid_row.len() < col + col_span {
                        grid_row.resize(col + col_span, None);
                    }
                    for slot in &mut grid_row[col..col + col_span] {
                        *slot = Some(*cell);
                    }
                }
                layout.extents.insert(*cell, CellExtents { row: r, col, row_span, col_span });
                col += col_span;
            }
            if layout.grid.len() <= r {
                layout.grid.resize_with(r + 1, Vec::new);
            }
        }
        layout.columns = layout.grid.iter().map(Vec::len).max().unwrap_or(0);
        Ok(layout)
    }

    fn headers(&self, cell: NodeId, role: Role) -> TreeResult<Vec<NodeId>> {
        let table = self.table_for(cell)?;
        let layout = self.layout(table)?;
        let extents = layout
            .extents
            .get(&cell)
            .copied()
            .ok_or(TreeError::NotSupported { node: cell, interface: "TableCell" })?;

        let slots: Vec<(usize, usize)> = if role == Role::TableRowHeader {
            (extents.row..extents.row + extents.row_span)
                .flat_map(|r| (0..layout.columns).map(move |c| (r, c)))
                .collect()
        } else {
            (0..layout.grid.len())
                .flat_map(|r| (extents.col..extents.col + extents.col_span).map(move |c| (r, c)))
                .collect()
        };

        let mut headers = Vec::new();
        for (r, c) in slots {
            let Some(Some(candidate)) = layout.grid.get(r).and_then(|row| row.get(c)) else {
                continue;
            };
            if *candidate != cell && !headers.contains(candidate) && self.data(*candidate)?.role == role {
                headers.push(*candidate);
            }
        }
        Ok(headers)
    }
}

impl AccessibleTree for SnapshotTree {
    fn role(&self, node: NodeId) -> TreeResult<Role> {
        Ok(self.data(node)?.role)
    }

    fn states(&self, node: NodeId) -> TreeResult<StateSet> {
        let mut states = self.data(node)?.states.clone();
        if self.focused.get() == Some(node) {
            states.insert(State::Focused);
        }
        Ok(states)
    }

    fn name(&self, node: NodeId) -> TreeResult<String> {
        Ok(self.data(node)?.name.clone())
    }

    fn description(&self, node: NodeId) -> TreeResult<String> {
        Ok(self.data(node)?.description.clone())
    }

    fn text(&self, node: NodeId, start: usize, end: Option<usize>) -> TreeResult<String> {
        let text = &self.data(node)?.text;
        let count = text.chars().count();
        let end = end.unwrap_or(count).min(count);
        Ok(text.chars().skip(start).take(end.saturating_sub(start)).collect())
    }

    fn character_count(&self, node: NodeId) -> TreeResult<usize> {
        Ok(self.data(node)?.text.chars().count())
    }

    fn attributes(&self, node: NodeId) -> TreeResult<IndexMap<String, String>> {
        Ok(self.data(node)?.attributes.clone())
    }

    fn parent(&self, node: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.data(node)?.parent)
    }

    fn children(&self, node: NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self.data(node)?.children.clone())
    }

    fn index_in_parent(&self, node: NodeId) -> TreeResult<Option<usize>> {
        match self.data(node)?.parent {
            Some(parent) => Ok(self.data(parent)?.children.iter().position(|c| *c == node)),
            None => Ok(None),
        }
    }

    fn actions(&self, node: NodeId) -> TreeResult<Vec<String>> {
        Ok(self.data(node)?.actions.clone())
    }

    fn link_uri(&self, node: NodeId) -> TreeResult<Option<String>> {
        let data = self.data(node)?;
        if data.role != Role::Link {
            return Err(TreeError::NotSupported { node, interface: "Hyperlink" });
        }
        Ok(data.uri.clone())
    }

    fn links_in_range(&self, node: NodeId, _start: usize, _end: Option<usize>) -> TreeResult<Vec<NodeId>> {
        let mut all = Vec::new();
        self.descendants(node, &mut all)?;
        Ok(all
            .into_iter()
            .filter(|id| self.data(*id).is_ok_and(|d| d.role == Role::Link))
            .collect())
    }

    fn grab_focus(&self, node: NodeId) -> TreeResult<bool> {
        let data = self.data(node)?;
        if !data.states.contains(State::Focusable) {
            log::debug!("Accessible {} rejected focus request", node);
            return Ok(false);
        }
        self.focused.set(Some(node));
        Ok(true)
    }

    fn active_window(&self) -> Option<NodeId> {
        if let Some(window) = self.active_window.filter(|w| self.data(*w).is_ok()) {
            return Some(window);
        }
        let mut all = vec![self.root];
        self.descendants(self.root, &mut all).ok()?;
        all.into_iter()
            .find(|id| self.data(*id).is_ok_and(|d| d.role.is_window()))
    }

    fn supports_collection(&self, root: NodeId) -> bool {
        self.collection && self.data(root).is_ok()
    }

    fn collection_query(&self, root: NodeId, criteria: &SearchCriteria) -> TreeResult<Vec<NodeId>> {
        if !self.collection {
            return Err(TreeError::NotSupported { node: root, interface: "Collection" });
        }
        let mut all = Vec::new();
        self.descendants(root, &mut all)?;
        let mut matches = Vec::new();
        for id in all {
            let data = self.data(id)?;
            if criteria.evaluate(data.role, &self.states(id)?, &data.attributes) {
                matches.push(id);
            }
        }
        Ok(matches)
    }

    fn row_count(&self, table: NodeId) -> TreeResult<usize> {
        Ok(self.layout(table)?.grid.len())
    }

    fn column_count(&self, table: NodeId) -> TreeResult<usize> {
        Ok(self.layout(table)?.columns)
    }

    fn cell_at(&self, table: NodeId, row: usize, col: usize) -> TreeResult<Option<NodeId>> {
        let layout = self.layout(table)?;
        Ok(layout.grid.get(row).and_then(|cells| cells.get(col)).copied().flatten())
    }

    fn cell_extents(&self, cell: NodeId) -> TreeResult<CellExtents> {
        let table = self.table_for(cell)?;
        self.layout(table)?
            .extents
            .get(&cell)
            .copied()
            .ok_or(TreeError::NotSupported { node: cell, interface: "TableCell" })
    }

    fn row_headers(&self, cell: NodeId) -> TreeResult<Vec<NodeId>> {
        self.headers(cell, Role::TableRowHeader)
    }

    fn column_headers(&self, cell: NodeId) -> TreeResult<Vec<NodeId>> {
        self.headers(cell, Role::TableColumnHeader)
    }

    fn caption(&self, table: NodeId) -> TreeResult<Option<NodeId>> {
        let data = self.require_table(table)?;
        Ok(data
            .children
            .iter()
            .copied()
            .find(|c| self.data(*c).is_ok_and(|d| d.role == Role::Caption)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> NodeSpec {
        NodeSpec::new(Role::TableCell).with_text(text)
    }

    fn create_test_table() -> NodeSpec {
        // a1 spans two rows; b2 sits beside it
        NodeSpec::new(Role::DocumentWeb).with_child(
            NodeSpec::new(Role::Table)
                .with_id("table")
                .with_child(NodeSpec::new(Role::Caption).with_text("Prices"))
                .with_child(
                    NodeSpec::new(Role::TableRow)
                        .with_child(NodeSpec::new(Role::TableColumnHeader).with_text("Item"))
                        .with_child(NodeSpec::new(Role::TableColumnHeader).with_text("Cost")),
                )
                .with_child(
                    NodeSpec::new(Role::TableRow)
                        .with_child(cell("a1").with_span(2, 1).with_id("a1"))
                        .with_child(cell("b1")),
                )
                .with_child(NodeSpec::new(Role::TableRow).with_child(cell("b2").with_id("b2"))),
        )
    }

    #[test]
    fn test_from_spec_assigns_preorder_ids() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::heading(1, "Intro").with_id("intro"))
                .with_child(NodeSpec::paragraph("Body")),
        );

        assert_eq!(tree.root(), 0);
        assert_eq!(tree.find("intro"), Some(1));
        assert_eq!(tree.children(0).unwrap(), vec![1, 2]);
        assert_eq!(tree.len(), 3);
        assert!(tree.states(1).unwrap().contains(State::Showing));
    }

    #[test]
    fn test_text_slicing() {
        let tree = SnapshotTree::from_spec(NodeSpec::paragraph("Hello world"));
        assert_eq!(tree.text(0, 6, None).unwrap(), "world");
        assert_eq!(tree.text(0, 0, Some(5)).unwrap(), "Hello");
        assert_eq!(tree.character_count(0).unwrap(), 11);
    }

    #[test]
    fn test_remove_makes_handles_defunct() {
        let mut tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::new(Role::Section).with_child(NodeSpec::paragraph("Gone")))
                .with_child(NodeSpec::paragraph("Kept")),
        );

        tree.remove(1).unwrap();
        assert_eq!(tree.role(1), Err(TreeError::Defunct(1)));
        assert_eq!(tree.role(2), Err(TreeError::Defunct(2)));
        assert_eq!(tree.children(0).unwrap(), vec![3]);
        assert_eq!(tree.path(3).unwrap(), vec![0]);
        assert_eq!(tree.role(99), Err(TreeError::UnknownNode(99)));
    }

    #[test]
    fn test_insert_child_at_index() {
        let mut tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb).with_child(NodeSpec::paragraph("Second")),
        );
        let first = tree.insert(0, 0, NodeSpec::paragraph("First")).unwrap();

        assert_eq!(tree.children(0).unwrap(), vec![first, 1]);
        assert_eq!(tree.path(first).unwrap(), vec![0]);
        assert_eq!(tree.path(1).unwrap(), vec![1]);
    }

    #[test]
    fn test_table_layout_with_spans() {
        let tree = SnapshotTree::from_spec(create_test_table());
        let table = tree.node("table").unwrap();
        let a1 = tree.node("a1").unwrap();
        let b2 = tree.node("b2").unwrap();

        assert_eq!(tree.row_count(table).unwrap(), 3);
        assert_eq!(tree.column_count(table).unwrap(), 2);
        assert_eq!(tree.cell_at(table, 1, 0).unwrap(), Some(a1));
        assert_eq!(tree.cell_at(table, 2, 0).unwrap(), Some(a1));
        assert_eq!(tree.cell_at(table, 2, 1).unwrap(), Some(b2));
        assert_eq!(tree.cell_at(table, 5, 0).unwrap(), None);
        assert_eq!(
            tree.cell_extents(a1).unwrap(),
            CellExtents { row: 1, col: 0, row_span: 2, col_span: 1 }
        );

        let headers = tree.column_headers(b2).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(tree.text(headers[0], 0, None).unwrap(), "Cost");
        assert!(tree.row_headers(b2).unwrap().is_empty());

        let caption = tree.caption(table).unwrap().unwrap();
        assert_eq!(tree.text(caption, 0, None).unwrap(), "Prices");
    }

    #[test]
    fn test_table_support_can_be_disabled() {
        let tree = SnapshotTree::from_spec(create_test_table()).with_table_support(false);
        let table = tree.node("table").unwrap();
        assert!(matches!(tree.row_count(table), Err(TreeError::NotSupported { .. })));
    }

    #[test]
    fn test_collection_query() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::heading(1, "Intro"))
                .with_child(NodeSpec::heading(2, "Details"))
                .with_child(NodeSpec::new(Role::Button).hidden()),
        );

        let criteria = SearchCriteria::roles([Role::Heading]).with_attribute("level", "2");
        assert_eq!(tree.collection_query(0, &criteria).unwrap(), vec![2]);

        let showing = SearchCriteria::default()
            .with_states([State::Showing], crate::tree::MatchType::None);
        assert_eq!(tree.collection_query(0, &showing).unwrap(), vec![3]);

        let tree = tree.with_collection(false);
        assert!(!tree.supports_collection(0));
        assert!(tree.collection_query(0, &criteria).is_err());
    }

    #[test]
    fn test_grab_focus() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::Dialog)
                .with_child(NodeSpec::new(Role::Button).with_name("OK").with_state(State::Focusable))
                .with_child(NodeSpec::new(Role::Label).with_text("Static")),
        );

        assert_eq!(tree.grab_focus(1), Ok(true));
        assert!(tree.states(1).unwrap().contains(State::Focused));
        assert_eq!(tree.grab_focus(2), Ok(false));
        assert_eq!(tree.focused(), Some(1));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "role": "frame",
            "name": "Browser",
            "children": [
                { "role": "document_web", "attributes": { "id": "doc" }, "children": [
                    { "role": "link", "text": "Home", "uri": "https://example.com/", "states": ["focusable"] }
                ] }
            ]
        }"#;

        let tree = SnapshotTree::from_json_str(json).unwrap();
        let doc = tree.node("doc").unwrap();
        let link = tree.children(doc).unwrap()[0];
        assert_eq!(tree.link_uri(link).unwrap().as_deref(), Some("https://example.com/"));
        assert_eq!(tree.active_window(), Some(0));
        assert!(SnapshotTree::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_outline() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb).with_child(NodeSpec::heading(1, "Intro").with_id("intro")),
        );
        let outline = tree.outline();
        assert!(outline.contains("[0] web document"));
        assert!(outline.contains("  [1] heading #intro \"Intro\""));
    }
}
