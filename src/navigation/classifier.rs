//! Object classifier predicates
//!
//! Every predicate is total: a node that cannot be queried (stale, removed,
//! or owned by a crashed application) simply does not match.

use crate::config::NavigatorSettings;
use crate::tree::{find_ancestor_inclusive, AccessibleTree, NodeId, Role, State, StateSet};

/// Embedded object replacement character
pub const EMBEDDED_OBJECT_CHAR: char = '\u{fffc}';

/// Highest fraction of embedded objects a large object may contain
const MAX_EMBEDDED_OBJECT_RATIO: f64 = 0.05;

/// `xml-roles` tokens that mark a landmark region
pub const LANDMARK_XML_ROLES: &[&str] = &[
    "banner",
    "complementary",
    "contentinfo",
    "main",
    "navigation",
    "region",
    "search",
    "form",
];

/// Values of `container-live` that identify a live region
pub const LIVE_REGION_POLITENESS: &[&str] = &["off", "polite", "assertive"];

pub const BUTTON_ROLES: &[Role] = &[Role::Button, Role::ToggleButton];
pub const CHECK_BOX_ROLES: &[Role] = &[Role::CheckBox, Role::Switch];
pub const ENTRY_ROLES: &[Role] = &[Role::Entry, Role::PasswordText, Role::SpinButton];
pub const IMAGE_ROLES: &[Role] = &[Role::Image, Role::ImageMap];
pub const LIST_ROLES: &[Role] = &[Role::List, Role::DescriptionList, Role::PageTabList];
pub const LIST_ITEM_ROLES: &[Role] = &[Role::ListItem, Role::DescriptionTerm, Role::PageTab];
pub const TABLE_CELL_ROLES: &[Role] = &[Role::TableCell, Role::TableColumnHeader, Role::TableRowHeader];

pub const FORM_FIELD_ROLES: &[Role] = &[
    Role::Button,
    Role::CheckBox,
    Role::ComboBox,
    Role::DocumentFrame,
    Role::Entry,
    Role::ListBox,
    Role::PasswordText,
    Role::RadioButton,
    Role::Slider,
    Role::SpinButton,
    Role::Switch,
    Role::Text,
    Role::ToggleButton,
];

pub const LARGE_OBJECT_ROLES: &[Role] = &[
    Role::Article,
    Role::BlockQuote,
    Role::DescriptionValue,
    Role::Heading,
    Role::ListItem,
    Role::Paragraph,
    Role::Section,
    Role::Static,
    Role::TableCell,
];

pub const LARGE_CONTAINER_ROLES: &[Role] = &[
    Role::Article,
    Role::BlockQuote,
    Role::DescriptionList,
    Role::Form,
    Role::Landmark,
    Role::List,
    Role::Table,
];

/// Roles never reported as clickables
pub const CLICKABLE_EXCLUDED_ROLES: &[Role] = &[
    Role::Application,
    Role::DocumentFrame,
    Role::DocumentWeb,
    Role::Label,
    Role::ListItem,
    Role::MenuItem,
    Role::PageTab,
    Role::Section,
    Role::Static,
    Role::TableCell,
    Role::TableRow,
    Role::Text,
];

/// Tree access plus the preferences some predicates depend on
#[derive(Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub tree: &'a dyn AccessibleTree,
    pub settings: &'a NavigatorSettings,
}

impl<'a> ClassifyContext<'a> {
    pub fn new(tree: &'a dyn AccessibleTree, settings: &'a NavigatorSettings) -> Self {
        Self { tree, settings }
    }

    pub fn role(&self, node: NodeId) -> Option<Role> {
        self.tree.role(node).ok()
    }

    pub fn states(&self, node: NodeId) -> StateSet {
        self.tree.states(node).unwrap_or_default()
    }

    pub fn has_state(&self, node: NodeId, state: State) -> bool {
        self.states(node).contains(state)
    }

    pub fn has_role(&self, node: NodeId, roles: &[Role]) -> bool {
        self.role(node).is_some_and(|role| roles.contains(&role))
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> Option<String> {
        self.tree.attributes(node).ok()?.get(key).cloned()
    }

    /// Whitespace-separated `xml-roles` tokens
    pub fn xml_roles(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "xml-roles")
            .map(|roles| roles.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

pub fn is_heading(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::Heading)
}

/// Heading level from the `level` attribute
pub fn heading_level(ctx: &ClassifyContext, node: NodeId) -> Option<u32> {
    ctx.attribute(node, "level")?.trim().parse().ok()
}

pub fn is_heading_at_level(ctx: &ClassifyContext, node: NodeId, level: Option<u32>) -> bool {
    is_heading(ctx, node) && level.is_none_or(|level| heading_level(ctx, node) == Some(level))
}

pub fn is_blockquote(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::BlockQuote)
        || ctx
            .attribute(node, "tag")
            .is_some_and(|tag| tag.eq_ignore_ascii_case("blockquote"))
}

pub fn is_button(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, BUTTON_ROLES)
}

pub fn is_check_box(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, CHECK_BOX_ROLES)
}

pub fn is_combo_box(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::ComboBox)
}

/// Focusable entry or editable widget that is not nested inside another editable
pub fn is_entry(ctx: &ClassifyContext, node: NodeId) -> bool {
    let Some(role) = ctx.role(node) else {
        return false;
    };
    if role.is_document() {
        return false;
    }
    let states = ctx.states(node);
    if !states.contains(State::Focusable) {
        return false;
    }
    if !states.contains(State::Editable) && !ENTRY_ROLES.contains(&role) {
        return false;
    }
    let parent_editable = ctx
        .tree
        .parent(node)
        .ok()
        .flatten()
        .is_some_and(|parent| ctx.has_state(parent, State::Editable));
    !parent_editable
}

pub fn is_form_field(ctx: &ClassifyContext, node: NodeId) -> bool {
    let Some(role) = ctx.role(node) else {
        return false;
    };
    if !FORM_FIELD_ROLES.contains(&role) {
        return false;
    }
    let states = ctx.states(node);
    if role == Role::DocumentFrame && !states.contains(State::Editable) {
        return false;
    }
    states.contains(State::Focusable)
}

pub fn is_iframe(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::InternalFrame)
}

pub fn is_image(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, IMAGE_ROLES)
}

/// Landmark role, or an `xml-roles` landmark token; `form` only counts when named
pub fn is_landmark(ctx: &ClassifyContext, node: NodeId) -> bool {
    if ctx.role(node) == Some(Role::Landmark) {
        return true;
    }
    ctx.xml_roles(node).iter().any(|token| {
        if token == "form" {
            return ctx.tree.name(node).is_ok_and(|name| !name.trim().is_empty());
        }
        LANDMARK_XML_ROLES.contains(&token.as_str())
    })
}

pub fn is_link(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::Link) && ctx.has_state(node, State::Focusable)
}

pub fn is_visited_link(ctx: &ClassifyContext, node: NodeId) -> bool {
    is_link(ctx, node) && ctx.has_state(node, State::Visited)
}

pub fn is_unvisited_link(ctx: &ClassifyContext, node: NodeId) -> bool {
    is_link(ctx, node) && !ctx.has_state(node, State::Visited)
}

pub fn is_list(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, LIST_ROLES)
}

pub fn is_list_item(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, LIST_ITEM_ROLES)
}

pub fn is_live_region(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.attribute(node, "container-live")
        .is_some_and(|value| LIVE_REGION_POLITENESS.contains(&value.as_str()))
}

/// Paragraphs with some content; headings count as paragraphs
pub fn is_paragraph(ctx: &ClassifyContext, node: NodeId) -> bool {
    match ctx.role(node) {
        Some(Role::Heading) => true,
        Some(Role::Paragraph) => ctx.tree.character_count(node).is_ok_and(|count| count > 2),
        _ => false,
    }
}

pub fn is_radio_button(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::RadioButton)
}

pub fn is_separator(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::Separator)
}

pub fn is_layout_table(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.attribute(node, "layout-guess").as_deref() == Some("true")
}

/// Data tables only
pub fn is_table(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node) == Some(Role::Table) && !is_layout_table(ctx, node)
}

pub fn is_table_cell(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.has_role(node, TABLE_CELL_ROLES)
}

/// Substantial block of text
///
/// Headings always qualify. Other content roles need more than
/// `large_object_text_length` characters, of which fewer than 5% may be
/// embedded objects.
pub fn is_large_object(ctx: &ClassifyContext, node: NodeId) -> bool {
    let Some(role) = ctx.role(node) else {
        return false;
    };
    if role == Role::Heading {
        return true;
    }
    if !LARGE_OBJECT_ROLES.contains(&role) {
        return false;
    }
    let Ok(text) = ctx.tree.text(node, 0, None) else {
        return false;
    };
    let length = text.chars().count();
    if length <= ctx.settings.large_object_text_length {
        return false;
    }
    let embedded = text.chars().filter(|c| *c == EMBEDDED_OBJECT_CHAR).count();
    (embedded as f64 / length as f64) < MAX_EMBEDDED_OBJECT_RATIO
}

/// Non-focusable element that still responds to clicks
pub fn is_clickable(ctx: &ClassifyContext, node: NodeId) -> bool {
    if ctx.has_role(node, CLICKABLE_EXCLUDED_ROLES) || ctx.has_state(node, State::Focusable) {
        return false;
    }
    if ctx.xml_roles(node).iter().any(|token| token == "gridcell") {
        return false;
    }
    ctx.tree
        .actions(node)
        .is_ok_and(|actions| actions.iter().any(|a| a == "click"))
}

/// Region that container start/end move across
pub fn is_large_container(ctx: &ClassifyContext, node: NodeId) -> bool {
    let Some(role) = ctx.role(node) else {
        return false;
    };
    match role {
        Role::Table => !is_layout_table(ctx, node),
        Role::Panel | Role::Section | Role::Grouping => is_landmark(ctx, node),
        _ => LARGE_CONTAINER_ROLES.contains(&role),
    }
}

pub fn is_modal_dialog(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node).is_some_and(|role| role.is_dialog()) && ctx.has_state(node, State::Modal)
}

pub fn is_document(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.role(node).is_some_and(|role| role.is_document())
}

pub fn is_showing(ctx: &ClassifyContext, node: NodeId) -> bool {
    ctx.tree
        .states(node)
        .is_ok_and(|states| states.contains(State::Showing) && !states.contains(State::Defunct))
}

/// Showing object outside any document; the GUI-mode filter
pub fn is_non_document_object(ctx: &ClassifyContext, node: NodeId) -> bool {
    is_showing(ctx, node)
        && find_ancestor_inclusive(ctx.tree, node, ctx.settings.max_ancestor_depth, |id| {
            is_document(ctx, id)
        })
        .is_none()
}

/// No name, no text and no children; leaf widgets and separators are never empty
pub fn is_empty_of_content(ctx: &ClassifyContext, node: NodeId) -> bool {
    if ctx.has_role(node, &[Role::Separator, Role::Image, Role::ImageMap])
        || ctx.has_state(node, State::Focusable)
    {
        return false;
    }
    let tree = ctx.tree;
    tree.name(node).is_ok_and(|n| n.trim().is_empty())
        && tree.text(node, 0, None).is_ok_and(|t| t.trim().is_empty())
        && tree.children(node).is_ok_and(|c| c.is_empty())
}

/// Re-check performed before acting on a previously enumerated match
pub fn is_valid_match(ctx: &ClassifyContext, node: NodeId) -> bool {
    is_showing(ctx, node) && !is_empty_of_content(ctx, node)
}

/// Cell whose subtree carries no name or text
pub fn is_blank_cell(ctx: &ClassifyContext, cell: NodeId) -> bool {
    let tree = ctx.tree;
    let mut pending = vec![cell];
    let mut visited = 0;
    while let Some(node) = pending.pop() {
        visited += 1;
        if visited > ctx.settings.max_traversal_nodes {
            return false;
        }
        let has_content = tree.name(node).is_ok_and(|n| !n.trim().is_empty())
            || tree.text(node, 0, None).is_ok_and(|t| !t.trim().is_empty())
            || ctx.has_role(node, IMAGE_ROLES)
            || (node != cell && ctx.has_state(node, State::Focusable));
        if has_content {
            return false;
        }
        pending.extend(tree.children(node).unwrap_or_default());
    }
    true
}
