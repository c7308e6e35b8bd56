use crate::messages;
use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::labels;
use crate::tree::{MatchType, NodeId, Role, SearchCriteria, State};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic class of objects that structural navigation moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Blockquote,
    Button,
    CheckBox,
    ComboBox,
    Entry,
    FormField,
    Heading,
    Iframe,
    Image,
    Landmark,
    Link,
    VisitedLink,
    UnvisitedLink,
    List,
    ListItem,
    LiveRegion,
    Paragraph,
    RadioButton,
    Separator,
    Table,
    TableCell,
    LargeObject,
    Clickable,
    Container,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Self::Blockquote,
        Self::Button,
        Self::CheckBox,
        Self::ComboBox,
        Self::Entry,
        Self::FormField,
        Self::Heading,
        Self::Iframe,
        Self::Image,
        Self::Landmark,
        Self::Link,
        Self::VisitedLink,
        Self::UnvisitedLink,
        Self::List,
        Self::ListItem,
        Self::LiveRegion,
        Self::Paragraph,
        Self::RadioButton,
        Self::Separator,
        Self::Table,
        Self::TableCell,
        Self::LargeObject,
        Self::Clickable,
        Self::Container,
    ];

    /// Identifier used in command names
    pub fn name(self) -> &'static str {
        match self {
            Self::Blockquote => "blockquote",
            Self::Button => "button",
            Self::CheckBox => "check_box",
            Self::ComboBox => "combo_box",
            Self::Entry => "entry",
            Self::FormField => "form_field",
            Self::Heading => "heading",
            Self::Iframe => "iframe",
            Self::Image => "image",
            Self::Landmark => "landmark",
            Self::Link => "link",
            Self::VisitedLink => "visited_link",
            Self::UnvisitedLink => "unvisited_link",
            Self::List => "list",
            Self::ListItem => "list_item",
            Self::LiveRegion => "live_region",
            Self::Paragraph => "paragraph",
            Self::RadioButton => "radio_button",
            Self::Separator => "separator",
            Self::Table => "table",
            Self::TableCell => "table_cell",
            Self::LargeObject => "large_object",
            Self::Clickable => "clickable",
            Self::Container => "container",
        }
    }

    /// Look a category up by its command identifier
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type Classifier = fn(&ClassifyContext<'_>, NodeId, Option<u32>) -> bool;
pub type CriteriaBuilder = fn(Option<u32>) -> Option<SearchCriteria>;
pub type MessageBuilder = fn(Option<u32>) -> String;
pub type ColumnBuilder = fn(Option<u32>) -> Vec<String>;
pub type RowBuilder = fn(&ClassifyContext<'_>, NodeId, Option<u32>) -> Vec<String>;

/// Which command families a category exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandKinds {
    /// previous_X / next_X
    pub step: bool,
    /// list_X
    pub list: bool,
}

impl CommandKinds {
    pub const STEP_AND_LIST: Self = Self { step: true, list: true };
    pub const STEP_ONLY: Self = Self { step: true, list: false };
    pub const NONE: Self = Self { step: false, list: false };
}

/// Everything the navigator needs to know about one category
#[derive(Clone)]
pub struct CategorySpec {
    pub category: Category,

    /// Plural identifier used by list commands ("headings", "check_boxes")
    pub plural: &'static str,

    pub classify: Classifier,

    /// Collection-query criteria, `None` when only traversal can find matches
    pub criteria: CriteriaBuilder,

    pub not_found: MessageBuilder,

    /// List dialog title
    pub title: MessageBuilder,

    /// List dialog column headers
    pub columns: ColumnBuilder,

    /// One list dialog row per match
    pub row: RowBuilder,

    /// Key letter for the default bindings
    pub binding: Option<char>,

    pub commands: CommandKinds,
}

impl fmt::Debug for CategorySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorySpec")
            .field("category", &self.category)
            .field("plural", &self.plural)
            .field("binding", &self.binding)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl CategorySpec {
    fn new(category: Category, plural: &'static str, classify: Classifier) -> Self {
        Self {
            category,
            plural,
            classify,
            criteria: |_| None,
            not_found: |_| String::new(),
            title: |_| String::new(),
            columns: |_| Vec::new(),
            row: |ctx, node, _| vec![labels::item_string(ctx, node)],
            binding: None,
            commands: CommandKinds::STEP_AND_LIST,
        }
    }

    fn with_criteria(mut self, criteria: CriteriaBuilder) -> Self {
        self.criteria = criteria;
        self
    }

    fn with_not_found(mut self, not_found: MessageBuilder) -> Self {
        self.not_found = not_found;
        self
    }

    fn with_list(mut self, title: MessageBuilder, columns: ColumnBuilder, row: RowBuilder) -> Self {
        self.title = title;
        self.columns = columns;
        self.row = row;
        self
    }

    fn with_binding(mut self, key: char) -> Self {
        self.binding = Some(key);
        self
    }

    fn with_commands(mut self, commands: CommandKinds) -> Self {
        self.commands = commands;
        self
    }

    pub fn matches(&self, ctx: &ClassifyContext, node: NodeId, level: Option<u32>) -> bool {
        (self.classify)(ctx, node, level)
    }

    pub fn search_criteria(&self, level: Option<u32>) -> Option<SearchCriteria> {
        (self.criteria)(level)
    }

    pub fn not_found_message(&self, level: Option<u32>) -> String {
        (self.not_found)(level)
    }

    pub fn list_title(&self, level: Option<u32>) -> String {
        (self.title)(level)
    }

    pub fn column_headers(&self, level: Option<u32>) -> Vec<String> {
        (self.columns)(level)
    }

    pub fn row_for(&self, ctx: &ClassifyContext, node: NodeId, level: Option<u32>) -> Vec<String> {
        (self.row)(ctx, node, level)
    }
}

fn columns(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

fn level_or_blank(ctx: &ClassifyContext, node: NodeId) -> String {
    classifier::heading_level(ctx, node)
        .map(|level| level.to_string())
        .unwrap_or_default()
}

fn table_description(ctx: &ClassifyContext, node: NodeId) -> String {
    if let Ok(description) = ctx.tree.description(node) {
        if !description.trim().is_empty() {
            return description.trim().to_string();
        }
    }
    match (ctx.tree.row_count(node), ctx.tree.column_count(node)) {
        (Ok(rows), Ok(cols)) => messages::table_size(rows, cols),
        _ => String::new(),
    }
}

/// Static table of every category's classifier, criteria and labels
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    specs: IndexMap<Category, CategorySpec>,
}

impl CategoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { specs: IndexMap::new() }
    }

    /// Registry with every built-in category
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for spec in default_specs() {
            registry.register(spec);
        }
        registry
    }

    /// Add or replace a category
    pub fn register(&mut self, spec: CategorySpec) {
        self.specs.insert(spec.category, spec);
    }

    pub fn get(&self, category: Category) -> Option<&CategorySpec> {
        self.specs.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategorySpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_specs() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new(Category::Blockquote, "blockquotes", |ctx, node, _| classifier::is_blockquote(ctx, node))
            .with_not_found(|_| messages::NO_MORE_BLOCKQUOTES.to_string())
            .with_list(
                |_| messages::LIST_BLOCKQUOTES.to_string(),
                |_| columns(&["Blockquote"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('q'),
        CategorySpec::new(Category::Button, "buttons", |ctx, node, _| classifier::is_button(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::BUTTON_ROLES.iter().copied())))
            .with_not_found(|_| messages::NO_MORE_BUTTONS.to_string())
            .with_list(
                |_| messages::LIST_BUTTONS.to_string(),
                |_| columns(&["Button"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('b'),
        CategorySpec::new(Category::CheckBox, "check_boxes", |ctx, node, _| classifier::is_check_box(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::CHECK_BOX_ROLES.iter().copied())))
            .with_not_found(|_| messages::NO_MORE_CHECK_BOXES.to_string())
            .with_list(
                |_| messages::LIST_CHECK_BOXES.to_string(),
                |_| columns(&["Check Box", "State"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), labels::state_string(ctx, node)],
            )
            .with_binding('x'),
        CategorySpec::new(Category::ComboBox, "combo_boxes", |ctx, node, _| classifier::is_combo_box(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles([Role::ComboBox])))
            .with_not_found(|_| messages::NO_MORE_COMBO_BOXES.to_string())
            .with_list(
                |_| messages::LIST_COMBO_BOXES.to_string(),
                |_| columns(&["Combo Box", "Selected Item"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), labels::value_string(ctx, node)],
            )
            .with_binding('c'),
        CategorySpec::new(Category::Entry, "entries", |ctx, node, _| classifier::is_entry(ctx, node))
            .with_criteria(|_| {
                Some(SearchCriteria::default().with_states([State::Focusable], MatchType::Any).with_predicate())
            })
            .with_not_found(|_| messages::NO_MORE_ENTRIES.to_string())
            .with_list(
                |_| messages::LIST_ENTRIES.to_string(),
                |_| columns(&["Label", "Text"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), labels::value_string(ctx, node)],
            )
            .with_binding('e'),
        CategorySpec::new(Category::FormField, "form_fields", |ctx, node, _| classifier::is_form_field(ctx, node))
            .with_criteria(|_| {
                Some(
                    SearchCriteria::roles(classifier::FORM_FIELD_ROLES.iter().copied())
                        .with_states([State::Focusable], MatchType::All)
                        .with_predicate(),
                )
            })
            .with_not_found(|_| messages::NO_MORE_FORM_FIELDS.to_string())
            .with_list(
                |_| messages::LIST_FORM_FIELDS.to_string(),
                |_| columns(&["Label", "Role", "Value"]),
                |ctx, node, _| {
                    vec![
                        labels::item_string(ctx, node),
                        labels::role_string(ctx, node),
                        labels::value_string(ctx, node),
                    ]
                },
            )
            .with_binding('f'),
        CategorySpec::new(Category::Heading, "headings", classifier::is_heading_at_level)
            .with_criteria(|level| {
                // Level attributes come as " 2" or "02" too; filter on the parsed value
                let criteria = SearchCriteria::roles([Role::Heading]);
                Some(match level {
                    Some(_) => criteria.with_predicate(),
                    None => criteria,
                })
            })
            .with_not_found(|level| match level {
                Some(level) => messages::no_more_headings_at_level(level),
                None => messages::NO_MORE_HEADINGS.to_string(),
            })
            .with_list(
                |level| match level {
                    Some(level) => messages::headings_at_level(level),
                    None => messages::LIST_HEADINGS.to_string(),
                },
                |level| match level {
                    Some(_) => columns(&["Heading"]),
                    None => columns(&["Heading", "Level"]),
                },
                |ctx, node, level| match level {
                    Some(_) => vec![labels::item_string(ctx, node)],
                    None => vec![labels::item_string(ctx, node), level_or_blank(ctx, node)],
                },
            )
            .with_binding('h'),
        CategorySpec::new(Category::Iframe, "iframes", |ctx, node, _| classifier::is_iframe(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles([Role::InternalFrame])))
            .with_not_found(|_| messages::NO_MORE_IFRAMES.to_string())
            .with_list(
                |_| messages::LIST_IFRAMES.to_string(),
                |_| columns(&["Internal Frame"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            ),
        CategorySpec::new(Category::Image, "images", |ctx, node, _| classifier::is_image(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::IMAGE_ROLES.iter().copied())))
            .with_not_found(|_| messages::NO_MORE_IMAGES.to_string())
            .with_list(
                |_| messages::LIST_IMAGES.to_string(),
                |_| columns(&["Image"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('g'),
        CategorySpec::new(Category::Landmark, "landmarks", |ctx, node, _| classifier::is_landmark(ctx, node))
            .with_not_found(|_| messages::NO_LANDMARK_FOUND.to_string())
            .with_list(
                |_| messages::LIST_LANDMARKS.to_string(),
                |_| columns(&["Landmark", "Role"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), labels::role_string(ctx, node)],
            )
            .with_binding('m'),
        CategorySpec::new(Category::Link, "links", |ctx, node, _| classifier::is_link(ctx, node))
            .with_criteria(|_| {
                Some(SearchCriteria::roles([Role::Link]).with_states([State::Focusable], MatchType::All))
            })
            .with_not_found(|_| messages::NO_MORE_LINKS.to_string())
            .with_list(
                |_| messages::LIST_LINKS.to_string(),
                |_| columns(&["Link", "State", "URI"]),
                |ctx, node, _| {
                    vec![
                        labels::item_string(ctx, node),
                        labels::state_string(ctx, node),
                        labels::uri_string(ctx, node),
                    ]
                },
            )
            .with_binding('k'),
        CategorySpec::new(Category::VisitedLink, "visited_links", |ctx, node, _| {
            classifier::is_visited_link(ctx, node)
        })
        .with_criteria(|_| {
            Some(SearchCriteria::roles([Role::Link]).with_states([State::Focusable, State::Visited], MatchType::All))
        })
        .with_not_found(|_| messages::NO_MORE_VISITED_LINKS.to_string())
        .with_list(
            |_| messages::LIST_VISITED_LINKS.to_string(),
            |_| columns(&["Link", "URI"]),
            |ctx, node, _| vec![labels::item_string(ctx, node), labels::uri_string(ctx, node)],
        )
        .with_binding('v'),
        CategorySpec::new(Category::UnvisitedLink, "unvisited_links", |ctx, node, _| {
            classifier::is_unvisited_link(ctx, node)
        })
        .with_criteria(|_| {
            Some(
                SearchCriteria::roles([Role::Link])
                    .with_states([State::Focusable], MatchType::All)
                    .with_predicate(),
            )
        })
        .with_not_found(|_| messages::NO_MORE_UNVISITED_LINKS.to_string())
        .with_list(
            |_| messages::LIST_UNVISITED_LINKS.to_string(),
            |_| columns(&["Link", "URI"]),
            |ctx, node, _| vec![labels::item_string(ctx, node), labels::uri_string(ctx, node)],
        )
        .with_binding('u'),
        CategorySpec::new(Category::List, "lists", |ctx, node, _| classifier::is_list(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::LIST_ROLES.iter().copied())))
            .with_not_found(|_| messages::NO_MORE_LISTS.to_string())
            .with_list(
                |_| messages::LIST_LISTS.to_string(),
                |_| columns(&["List"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('l'),
        CategorySpec::new(Category::ListItem, "list_items", |ctx, node, _| classifier::is_list_item(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::LIST_ITEM_ROLES.iter().copied())))
            .with_not_found(|_| messages::NO_MORE_LIST_ITEMS.to_string())
            .with_list(
                |_| messages::LIST_LIST_ITEMS.to_string(),
                |_| columns(&["List Item"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('i'),
        CategorySpec::new(Category::LiveRegion, "live_regions", |ctx, node, _| classifier::is_live_region(ctx, node))
            .with_not_found(|_| messages::NO_MORE_LIVE_REGIONS.to_string())
            .with_binding('d')
            .with_commands(CommandKinds::STEP_ONLY),
        CategorySpec::new(Category::Paragraph, "paragraphs", |ctx, node, _| classifier::is_paragraph(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles([Role::Paragraph, Role::Heading]).with_predicate()))
            .with_not_found(|_| messages::NO_MORE_PARAGRAPHS.to_string())
            .with_list(
                |_| messages::LIST_PARAGRAPHS.to_string(),
                |_| columns(&["Paragraph"]),
                |ctx, node, _| vec![labels::item_string(ctx, node)],
            )
            .with_binding('p'),
        CategorySpec::new(Category::RadioButton, "radio_buttons", |ctx, node, _| {
            classifier::is_radio_button(ctx, node)
        })
        .with_criteria(|_| Some(SearchCriteria::roles([Role::RadioButton])))
        .with_not_found(|_| messages::NO_MORE_RADIO_BUTTONS.to_string())
        .with_list(
            |_| messages::LIST_RADIO_BUTTONS.to_string(),
            |_| columns(&["Radio Button", "State"]),
            |ctx, node, _| vec![labels::item_string(ctx, node), labels::state_string(ctx, node)],
        )
        .with_binding('r'),
        CategorySpec::new(Category::Separator, "separators", |ctx, node, _| classifier::is_separator(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles([Role::Separator])))
            .with_not_found(|_| messages::NO_MORE_SEPARATORS.to_string())
            .with_binding('s')
            .with_commands(CommandKinds::STEP_ONLY),
        CategorySpec::new(Category::Table, "tables", |ctx, node, _| classifier::is_table(ctx, node))
            .with_criteria(|_| {
                Some(
                    SearchCriteria::roles([Role::Table])
                        .with_attribute("layout-guess", "true")
                        .with_attribute_match(MatchType::None),
                )
            })
            .with_not_found(|_| messages::NO_MORE_TABLES.to_string())
            .with_list(
                |_| messages::LIST_TABLES.to_string(),
                |_| columns(&["Caption", "Description"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), table_description(ctx, node)],
            )
            .with_binding('t'),
        CategorySpec::new(Category::TableCell, "table_cells", |ctx, node, _| classifier::is_table_cell(ctx, node))
            .with_criteria(|_| Some(SearchCriteria::roles(classifier::TABLE_CELL_ROLES.iter().copied())))
            .with_not_found(|_| messages::TABLE_NOT_IN_A.to_string())
            .with_commands(CommandKinds::NONE),
        CategorySpec::new(Category::LargeObject, "large_objects", |ctx, node, _| {
            classifier::is_large_object(ctx, node)
        })
        .with_criteria(|_| Some(SearchCriteria::roles(classifier::LARGE_OBJECT_ROLES.iter().copied()).with_predicate()))
        .with_not_found(|_| messages::NO_MORE_LARGE_OBJECTS.to_string())
        .with_list(
            |_| messages::LIST_LARGE_OBJECTS.to_string(),
            |_| columns(&["Object", "Role"]),
            |ctx, node, _| vec![labels::item_string(ctx, node), labels::role_string(ctx, node)],
        )
        .with_binding('o'),
        CategorySpec::new(Category::Clickable, "clickables", |ctx, node, _| classifier::is_clickable(ctx, node))
            .with_criteria(|_| {
                Some(SearchCriteria::default().with_states([State::Focusable], MatchType::None).with_predicate())
            })
            .with_not_found(|_| messages::NO_MORE_CLICKABLES.to_string())
            .with_list(
                |_| messages::LIST_CLICKABLES.to_string(),
                |_| columns(&["Clickable", "Role"]),
                |ctx, node, _| vec![labels::item_string(ctx, node), labels::role_string(ctx, node)],
            )
            .with_binding('a'),
        CategorySpec::new(Category::Container, "containers", |ctx, node, _| {
            classifier::is_large_container(ctx, node)
        })
        .with_not_found(|_| messages::CONTAINER_NOT_IN_A.to_string())
        .with_commands(CommandKinds::NONE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorSettings;
    use crate::navigation::finder::{self, MatchCache};
    use crate::navigation::mode::NavigationMode;
    use crate::tree::{AccessibleTree, NodeSpec, SnapshotTree};

    #[test]
    fn test_registry_covers_every_category() {
        let registry = CategoryRegistry::with_defaults();
        assert_eq!(registry.len(), Category::ALL.len());
        for category in Category::ALL {
            let spec = registry.get(category).unwrap();
            assert_eq!(spec.category, category);
            assert!(!spec.not_found_message(None).is_empty(), "{} lacks a message", category);
            if spec.commands.list {
                assert!(!spec.list_title(None).is_empty());
                assert!(!spec.column_headers(None).is_empty());
            }
        }
    }

    #[test]
    fn test_bindings_are_unique() {
        let registry = CategoryRegistry::with_defaults();
        let mut seen = std::collections::HashSet::new();
        for key in registry.iter().filter_map(|spec| spec.binding) {
            assert!(seen.insert(key), "binding {} assigned twice", key);
        }
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::CheckBox.name(), "check_box");
        assert_eq!(Category::from_name("large_object"), Some(Category::LargeObject));
        assert_eq!(Category::from_name("widget"), None);
        let json = serde_json::to_string(&Category::VisitedLink).unwrap();
        assert_eq!(json, "\"visited_link\"");
    }

    #[test]
    fn test_heading_labels_depend_on_level() {
        let registry = CategoryRegistry::with_defaults();
        let heading = registry.get(Category::Heading).unwrap();

        assert_eq!(heading.not_found_message(None), "No more headings.");
        assert_eq!(heading.not_found_message(Some(2)), "No more headings at level 2.");
        assert_eq!(heading.list_title(Some(3)), "Headings at Level 3");
        assert_eq!(heading.column_headers(None), vec!["Heading", "Level"]);
        assert_eq!(heading.column_headers(Some(1)), vec!["Heading"]);

        let criteria = heading.search_criteria(Some(2)).unwrap();
        assert!(criteria.attributes.is_empty());
        assert!(criteria.apply_predicate);
    }

    #[test]
    fn test_heading_level_is_parsed_not_compared() {
        let create_tree = || {
            SnapshotTree::from_spec(
                NodeSpec::new(Role::DocumentWeb)
                    .with_child(NodeSpec::new(Role::Heading).with_text("Padded").with_attribute("level", " 2").with_id("padded"))
                    .with_child(NodeSpec::new(Role::Heading).with_text("Zeroed").with_attribute("level", "02").with_id("zeroed"))
                    .with_child(NodeSpec::heading(3, "Other")),
            )
        };
        let tree = create_tree();
        let settings = NavigatorSettings::default();
        let registry = CategoryRegistry::with_defaults();
        let heading = registry.get(Category::Heading).unwrap();
        let expected = vec![tree.node("padded").unwrap(), tree.node("zeroed").unwrap()];

        for tree in [create_tree(), create_tree().with_collection(false)] {
            let ctx = ClassifyContext::new(&tree, &settings);
            let outcome = finder::find_all(&ctx, &mut MatchCache::new(), heading, tree.root(), Some(2), NavigationMode::Document);
            assert_eq!(outcome.matches, expected);
        }
    }

    #[test]
    fn test_exact_criteria_agree_with_classifiers() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::heading(1, "Intro"))
                .with_child(NodeSpec::new(Role::Button).with_name("Go"))
                .with_child(NodeSpec::link("Home", "/"))
                .with_child(NodeSpec::link("Seen", "/seen").with_state(State::Visited))
                .with_child(NodeSpec::new(Role::Link).with_text("anchor"))
                .with_child(NodeSpec::new(Role::Table).with_attribute("layout-guess", "true"))
                .with_child(NodeSpec::new(Role::Table)),
        );
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let registry = CategoryRegistry::with_defaults();
        let all = tree.collection_query(tree.root(), &SearchCriteria::default()).unwrap();

        for spec in registry.iter() {
            let Some(criteria) = spec.search_criteria(None) else {
                continue;
            };
            if criteria.apply_predicate {
                continue;
            }
            let queried = tree.collection_query(tree.root(), &criteria).unwrap();
            let classified: Vec<NodeId> = all.iter().copied().filter(|n| spec.matches(&ctx, *n, None)).collect();
            assert_eq!(queried, classified, "criteria for {} disagree", spec.category);
        }
    }

    #[test]
    fn test_rows() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(NodeSpec::link("Home", "https://example.com/").with_id("home"))
                .with_child(NodeSpec::heading(3, "Setup").with_id("setup")),
        );
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);
        let registry = CategoryRegistry::with_defaults();

        let link = registry.get(Category::Link).unwrap();
        assert_eq!(
            link.row_for(&ctx, tree.node("home").unwrap(), None),
            vec!["Home", "unvisited", "https://example.com/"]
        );
        let heading = registry.get(Category::Heading).unwrap();
        assert_eq!(heading.row_for(&ctx, tree.node("setup").unwrap(), None), vec!["Setup", "3"]);
    }
}
