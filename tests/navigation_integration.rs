use indexmap::IndexMap;
use serde_json::json;
use std::cell::Cell;
use structural_nav::commands::{CommandContext, CommandRegistry};
use structural_nav::navigation::classifier::ClassifyContext;
use structural_nav::navigation::locator::{self, Position};
use structural_nav::navigation::{CellCoordinate, CellDirection, CellMoveResult, TableNavigator};
use structural_nav::tree::{path_compare, SearchCriteria, StateSet, TreeResult};
use structural_nav::{
    AccessibleTree, Category, Direction, NavigationMode, NavigatorSettings, NodeId, NodeSpec, RecordingPresenter, Role,
    SnapshotTree, StructuralNavigator,
};

const LOREM: &str = "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do";

fn cell(id: &str) -> NodeSpec {
    NodeSpec::new(Role::TableCell).with_text(id).with_id(id)
}

fn row(cells: Vec<NodeSpec>) -> NodeSpec {
    NodeSpec::new(Role::TableRow).with_children(cells)
}

fn create_test_document() -> NodeSpec {
    NodeSpec::new(Role::DocumentWeb)
        .with_child(NodeSpec::heading(1, "Intro").with_id("intro"))
        .with_child(
            NodeSpec::paragraph(LOREM)
                .with_id("lorem")
                .with_child(NodeSpec::new(Role::Static).with_text("ipsum").with_id("caret")),
        )
        .with_child(NodeSpec::link("Home", "https://example.com/").with_id("home"))
        .with_child(NodeSpec::heading(2, "Details").with_id("details"))
        .with_child(NodeSpec::link("About", "https://example.com/about").with_id("about"))
        .with_child(
            NodeSpec::new(Role::Table)
                .with_id("table")
                .with_child(row(vec![cell("a1"), cell("b1")]))
                .with_child(row(vec![cell("a2"), cell("b2")])),
        )
}

/// The same document, once with collection support and once traversal-only
fn both_adapters() -> Vec<(&'static str, SnapshotTree)> {
    vec![
        ("collection", SnapshotTree::from_spec(create_test_document())),
        ("traversal", SnapshotTree::from_spec(create_test_document()).with_collection(false)),
    ]
}

fn navigator_at(tree: &SnapshotTree, id: &str) -> StructuralNavigator {
    let mut navigator = StructuralNavigator::new(NavigatorSettings::default());
    navigator.set_locus_of_focus(Some(tree.node(id).expect("fixture id")));
    navigator
}

fn ids(tree: &SnapshotTree, names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|id| tree.node(id).expect("fixture id")).collect()
}

#[test]
fn test_matches_are_in_document_order() {
    for (adapter, tree) in both_adapters() {
        let mut navigator = navigator_at(&tree, "intro");
        for category in Category::ALL {
            let matches = navigator.find_all(&tree, category, None);
            for pair in matches.windows(2) {
                let first = tree.path(pair[0]).expect("path");
                let second = tree.path(pair[1]).expect("path");
                assert_eq!(
                    path_compare(&first, &second),
                    std::cmp::Ordering::Less,
                    "{} matches out of order with {} adapter",
                    category,
                    adapter
                );
            }
        }
    }
}

#[test]
fn test_find_all_is_idempotent() {
    for (adapter, tree) in both_adapters() {
        let mut navigator = navigator_at(&tree, "intro");
        for category in [Category::Heading, Category::Link, Category::Paragraph, Category::TableCell] {
            let first = navigator.find_all(&tree, category, None);
            let second = navigator.find_all(&tree, category, None);
            assert_eq!(first, second, "{} with {} adapter", category, adapter);
        }
    }
}

#[test]
fn test_next_then_previous_returns_to_start() {
    for (adapter, tree) in both_adapters() {
        for category in [Category::Heading, Category::Link] {
            let mut navigator = navigator_at(&tree, "intro");
            let matches = navigator.find_all(&tree, category, None);
            assert_eq!(matches.len(), 2);

            for start in matches {
                let mut presenter = RecordingPresenter::new();
                navigator.set_locus_of_focus(Some(start));
                let next = navigator.next(&tree, &mut presenter, category, None);
                assert!(next.is_some(), "{} with {} adapter", category, adapter);
                let back = navigator.previous(&tree, &mut presenter, category, None);
                assert_eq!(back, Some(start), "{} with {} adapter", category, adapter);
            }
        }
    }
}

fn create_three_headings() -> NodeSpec {
    NodeSpec::new(Role::DocumentWeb)
        .with_child(NodeSpec::heading(1, "Overview").with_id("first"))
        .with_child(NodeSpec::paragraph(LOREM))
        .with_child(NodeSpec::heading(2, "Installation").with_id("middle"))
        .with_child(NodeSpec::paragraph(LOREM))
        .with_child(NodeSpec::heading(2, "Usage").with_id("last"))
}

#[test]
fn test_heading_round_trip_and_wrap_at_the_top() {
    for tree in [
        SnapshotTree::from_spec(create_three_headings()),
        SnapshotTree::from_spec(create_three_headings()).with_collection(false),
    ] {
        let mut navigator = navigator_at(&tree, "middle");
        let mut presenter = RecordingPresenter::new();
        assert_eq!(navigator.next(&tree, &mut presenter, Category::Heading, None), tree.find("last"));
        assert_eq!(navigator.previous(&tree, &mut presenter, Category::Heading, None), tree.find("middle"));
        assert!(presenter.messages().is_empty());

        navigator.set_locus_of_focus(tree.find("first"));
        assert_eq!(navigator.previous(&tree, &mut presenter, Category::Heading, None), tree.find("last"));
        assert_eq!(presenter.messages(), vec!["Wrapping to bottom."]);
        assert_eq!(navigator.locus_of_focus(), tree.find("last"));

        navigator.set_settings(NavigatorSettings::default().wrap(false));
        navigator.set_locus_of_focus(tree.find("first"));
        presenter.clear();
        assert_eq!(navigator.previous(&tree, &mut presenter, Category::Heading, None), None);
        assert_eq!(presenter.messages(), vec!["No more headings."]);
        assert_eq!(navigator.locus_of_focus(), tree.find("first"));
    }
}

#[test]
fn test_no_wrap_stops_at_the_end() {
    for (adapter, tree) in both_adapters() {
        let mut navigator = navigator_at(&tree, "details");
        navigator.set_settings(NavigatorSettings::default().wrap(false));
        let before = navigator.find_all(&tree, Category::Heading, None);

        let mut presenter = RecordingPresenter::new();
        assert_eq!(navigator.next(&tree, &mut presenter, Category::Heading, None), None, "{}", adapter);
        assert_eq!(presenter.messages(), vec!["No more headings."]);
        assert_eq!(navigator.locus_of_focus(), tree.find("details"));
        assert_eq!(navigator.find_all(&tree, Category::Heading, None), before);
    }
}

#[test]
fn test_single_match_is_not_revisited_by_wrapping() {
    let spec = NodeSpec::new(Role::DocumentWeb)
        .with_child(NodeSpec::heading(1, "Only").with_id("only"))
        .with_child(NodeSpec::paragraph(LOREM));
    for tree in [
        SnapshotTree::from_spec(spec.clone()),
        SnapshotTree::from_spec(spec.clone()).with_collection(false),
    ] {
        let mut navigator = navigator_at(&tree, "only");
        let mut presenter = RecordingPresenter::new();

        assert_eq!(navigator.next(&tree, &mut presenter, Category::Heading, None), None);
        assert_eq!(navigator.previous(&tree, &mut presenter, Category::Heading, None), None);
        assert!(!presenter.messages().contains(&"Wrapping to top."));
        assert!(!presenter.messages().contains(&"Wrapping to bottom."));
        assert!(presenter.objects().is_empty());
    }
}

#[test]
fn test_spanning_cell_keeps_the_column() {
    // s spans rows 1-2 of column 0
    let spec = NodeSpec::new(Role::DocumentWeb).with_child(
        NodeSpec::new(Role::Table)
            .with_id("table")
            .with_child(row(vec![cell("r0c0"), cell("r0c1")]))
            .with_child(row(vec![cell("s").with_span(2, 1), cell("r1c1")]))
            .with_child(row(vec![cell("r2c1")]))
            .with_child(row(vec![cell("r3c0"), cell("r3c1")])),
    );
    for tree in [
        SnapshotTree::from_spec(spec.clone()),
        SnapshotTree::from_spec(spec.clone()).with_collection(false),
    ] {
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let mut tables = TableNavigator::new();
        let start = tree.node("r0c0").expect("fixture id");

        let spanning = match tables.move_cell(&ctx, start, CellDirection::Down) {
            CellMoveResult::Moved(moved) => moved.cell,
            other => panic!("expected a move, got {:?}", other),
        };
        assert_eq!(Some(spanning), tree.find("s"));

        let below = match tables.move_cell(&ctx, spanning, CellDirection::Down) {
            CellMoveResult::Moved(moved) => moved,
            other => panic!("expected a move, got {:?}", other),
        };
        assert_eq!(Some(below.cell), tree.find("r3c0"));
        assert_eq!(below.coordinate, Some(CellCoordinate::new(3, 0)));
        assert_eq!(tables.last_visited(), Some((below.table, CellCoordinate::new(3, 0))));
    }
}

#[test]
fn test_caret_inside_paragraph_locates_the_paragraph() {
    for (adapter, tree) in both_adapters() {
        let mut navigator = navigator_at(&tree, "caret");
        let paragraphs = navigator.find_all(&tree, Category::Paragraph, None);
        let lorem = tree.node("lorem").expect("fixture id");
        let index = paragraphs.iter().position(|node| *node == lorem).expect("paragraph match");

        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let caret = tree.node("caret").expect("fixture id");
        assert_eq!(
            locator::locate(&ctx, &paragraphs, caret, Direction::Next),
            Position::Within { index, exact: false },
            "{}",
            adapter
        );

        let mut presenter = RecordingPresenter::new();
        let next = navigator.next(&tree, &mut presenter, Category::Paragraph, None);
        assert_eq!(next, paragraphs.get(index + 1).copied(), "{}", adapter);
    }
}

#[test]
fn test_heading_scenario_from_json_snapshot() {
    let snapshot = json!({
        "role": "document_web",
        "children": [
            {"role": "heading", "text": "Intro", "attributes": {"level": "1", "id": "intro"}},
            {"role": "paragraph", "text": LOREM},
            {"role": "heading", "text": "Details", "attributes": {"level": "2", "id": "details"}},
            {"role": "table", "children": [
                {"role": "table_row", "children": [
                    {"role": "table_cell", "text": "a1"},
                    {"role": "table_cell", "text": "b1"}
                ]},
                {"role": "table_row", "children": [
                    {"role": "table_cell", "text": "a2"},
                    {"role": "table_cell", "text": "b2"}
                ]}
            ]}
        ]
    });
    let tree = SnapshotTree::from_json_str(&snapshot.to_string()).expect("valid snapshot");
    let mut navigator = navigator_at(&tree, "intro");
    let mut presenter = RecordingPresenter::new();

    assert_eq!(
        navigator.find_all(&tree, Category::Heading, None),
        ids(&tree, &["intro", "details"])
    );
    assert_eq!(navigator.find_all(&tree, Category::Heading, Some(2)), ids(&tree, &["details"]));

    assert_eq!(navigator.next(&tree, &mut presenter, Category::Heading, None), tree.find("details"));
    assert!(presenter.messages().is_empty());

    assert_eq!(navigator.next(&tree, &mut presenter, Category::Heading, None), tree.find("intro"));
    assert_eq!(presenter.messages(), vec!["Wrapping to top."]);
    assert_eq!(presenter.objects(), ids(&tree, &["details", "intro"]));
}

/// Counts the structural queries made against the wrapped tree
struct CountingTree {
    inner: SnapshotTree,
    children_calls: Cell<usize>,
    collection_calls: Cell<usize>,
}

impl CountingTree {
    fn new(inner: SnapshotTree) -> Self {
        Self {
            inner,
            children_calls: Cell::new(0),
            collection_calls: Cell::new(0),
        }
    }

    fn queries(&self) -> usize {
        self.children_calls.get() + self.collection_calls.get()
    }
}

impl AccessibleTree for CountingTree {
    fn role(&self, node: NodeId) -> TreeResult<Role> {
        self.inner.role(node)
    }

    fn states(&self, node: NodeId) -> TreeResult<StateSet> {
        self.inner.states(node)
    }

    fn name(&self, node: NodeId) -> TreeResult<String> {
        self.inner.name(node)
    }

    fn text(&self, node: NodeId, start: usize, end: Option<usize>) -> TreeResult<String> {
        self.inner.text(node, start, end)
    }

    fn attributes(&self, node: NodeId) -> TreeResult<IndexMap<String, String>> {
        self.inner.attributes(node)
    }

    fn parent(&self, node: NodeId) -> TreeResult<Option<NodeId>> {
        self.inner.parent(node)
    }

    fn children(&self, node: NodeId) -> TreeResult<Vec<NodeId>> {
        self.children_calls.set(self.children_calls.get() + 1);
        self.inner.children(node)
    }

    fn supports_collection(&self, root: NodeId) -> bool {
        self.inner.supports_collection(root)
    }

    fn collection_query(&self, root: NodeId, criteria: &SearchCriteria) -> TreeResult<Vec<NodeId>> {
        self.collection_calls.set(self.collection_calls.get() + 1);
        self.inner.collection_query(root, criteria)
    }
}

#[test]
fn test_disabled_commands_make_no_queries() {
    for (adapter, inner) in both_adapters() {
        let focus = inner.node("intro").expect("fixture id");
        let tree = CountingTree::new(inner);
        let registry = CommandRegistry::with_defaults();
        let mut presenter = RecordingPresenter::new();

        let mut off = StructuralNavigator::new(NavigatorSettings::default()).with_mode(NavigationMode::Off);
        off.set_locus_of_focus(Some(focus));
        let mut suspended = StructuralNavigator::new(NavigatorSettings::default());
        suspended.set_locus_of_focus(Some(focus));
        suspended.set_suspended(true);

        for navigator in [&mut off, &mut suspended] {
            for name in ["next_heading", "previous_link", "list_headings", "table_cell_down", "container_end"] {
                let mut context = CommandContext::new(&mut *navigator, &tree, &mut presenter);
                let result = registry.execute(name, json!({}), &mut context).expect("known command");
                assert!(!result.handled, "{} ran with {} adapter", name, adapter);
            }
            assert!(navigator.cache().is_empty());
            assert!(navigator.find_all(&tree, Category::Heading, None).is_empty());
        }

        assert_eq!(tree.queries(), 0, "{}", adapter);
        assert!(presenter.events().is_empty());
    }
}

#[test]
fn test_cycling_reenables_commands() {
    let tree = SnapshotTree::from_spec(create_test_document());
    let registry = CommandRegistry::with_defaults();
    let mut navigator = StructuralNavigator::new(NavigatorSettings::default()).with_mode(NavigationMode::Off);
    navigator.set_locus_of_focus(tree.find("intro"));
    let mut presenter = RecordingPresenter::new();

    let mut context = CommandContext::new(&mut navigator, &tree, &mut presenter);
    let cycled = registry
        .execute("structural_navigator_mode_cycle", json!({}), &mut context)
        .expect("known command");
    assert_eq!(cycled.data.expect("mode data")["mode"], json!("document"));

    let result = registry.execute("next_heading", json!({}), &mut context).expect("known command");
    assert!(result.handled);
    assert_eq!(result.data.expect("step data")["node"], json!(tree.find("details")));
}
