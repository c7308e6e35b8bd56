use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Accessible role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Alert,
    Application,
    Article,
    BlockQuote,
    Button,
    Canvas,
    Caption,
    CheckBox,
    ComboBox,
    DescriptionList,
    DescriptionTerm,
    DescriptionValue,
    Dialog,
    DocumentEmail,
    DocumentFrame,
    DocumentPresentation,
    DocumentSpreadsheet,
    DocumentText,
    DocumentWeb,
    Entry,
    FileChooser,
    Footer,
    Form,
    Frame,
    Grouping,
    Header,
    Heading,
    Image,
    ImageMap,
    InternalFrame,
    Label,
    Landmark,
    Link,
    List,
    ListBox,
    ListItem,
    Menu,
    MenuItem,
    PageTab,
    PageTabList,
    Panel,
    Paragraph,
    PasswordText,
    RadioButton,
    Section,
    Separator,
    Slider,
    SpinButton,
    Static,
    Switch,
    Table,
    TableCell,
    TableColumnHeader,
    TableRow,
    TableRowHeader,
    Text,
    ToggleButton,
    Window,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Document roles; the outermost one bounds a DOCUMENT-mode search
    pub fn is_document(&self) -> bool {
        matches!(
            self,
            Self::DocumentEmail
                | Self::DocumentFrame
                | Self::DocumentPresentation
                | Self::DocumentSpreadsheet
                | Self::DocumentText
                | Self::DocumentWeb
        )
    }

    /// Dialog-like roles that bound a GUI-mode search
    pub fn is_dialog(&self) -> bool {
        matches!(self, Self::Alert | Self::Dialog | Self::FileChooser)
    }

    /// Top-level window roles
    pub fn is_window(&self) -> bool {
        matches!(self, Self::Frame | Self::Window)
    }

    pub fn is_table_cell(&self) -> bool {
        matches!(
            self,
            Self::TableCell | Self::TableColumnHeader | Self::TableRowHeader
        )
    }

    /// Human-readable role name used in list rows
    pub fn label(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Application => "application",
            Self::Article => "article",
            Self::BlockQuote => "block quote",
            Self::Button => "push button",
            Self::Canvas => "canvas",
            Self::Caption => "caption",
            Self::CheckBox => "check box",
            Self::ComboBox => "combo box",
            Self::DescriptionList => "description list",
            Self::DescriptionTerm => "description term",
            Self::DescriptionValue => "description value",
            Self::Dialog => "dialog",
            Self::DocumentEmail => "email",
            Self::DocumentFrame => "document",
            Self::DocumentPresentation => "presentation",
            Self::DocumentSpreadsheet => "spreadsheet",
            Self::DocumentText => "text document",
            Self::DocumentWeb => "web document",
            Self::Entry => "entry",
            Self::FileChooser => "file chooser",
            Self::Footer => "footer",
            Self::Form => "form",
            Self::Frame => "frame",
            Self::Grouping => "grouping",
            Self::Header => "header",
            Self::Heading => "heading",
            Self::Image => "image",
            Self::ImageMap => "image map",
            Self::InternalFrame => "internal frame",
            Self::Label => "label",
            Self::Landmark => "landmark",
            Self::Link => "link",
            Self::List => "list",
            Self::ListBox => "list box",
            Self::ListItem => "list item",
            Self::Menu => "menu",
            Self::MenuItem => "menu item",
            Self::PageTab => "page tab",
            Self::PageTabList => "page tab list",
            Self::Panel => "panel",
            Self::Paragraph => "paragraph",
            Self::PasswordText => "password text",
            Self::RadioButton => "radio button",
            Self::Section => "section",
            Self::Separator => "separator",
            Self::Slider => "slider",
            Self::SpinButton => "spin button",
            Self::Static => "static",
            Self::Switch => "switch",
            Self::Table => "table",
            Self::TableCell => "table cell",
            Self::TableColumnHeader => "column header",
            Self::TableRow => "table row",
            Self::TableRowHeader => "row header",
            Self::Text => "text",
            Self::ToggleButton => "toggle button",
            Self::Window => "window",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accessible state flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Checked,
    Defunct,
    Editable,
    Enabled,
    Expanded,
    Focusable,
    Focused,
    Indeterminate,
    Modal,
    Multiline,
    ReadOnly,
    Selected,
    Sensitive,
    Showing,
    Visible,
    Visited,
}

/// Set of states reported for a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(BTreeSet<State>);

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, state: State) -> bool {
        self.0.contains(&state)
    }

    pub fn insert(&mut self, state: State) -> bool {
        self.0.insert(state)
    }

    pub fn remove(&mut self, state: State) -> bool {
        self.0.remove(&state)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = State> + '_ {
        self.0.iter().copied()
    }

    /// Builder method: add a state
    pub fn with(mut self, state: State) -> Self {
        self.0.insert(state);
        self
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        let role: Role = serde_json::from_str("\"table_column_header\"").unwrap();
        assert_eq!(role, Role::TableColumnHeader);

        let unknown: Role = serde_json::from_str("\"scroll_pane\"").unwrap();
        assert_eq!(unknown, Role::Unknown);
    }

    #[test]
    fn test_role_groups() {
        assert!(Role::DocumentWeb.is_document());
        assert!(!Role::InternalFrame.is_document());
        assert!(Role::Alert.is_dialog());
        assert!(Role::TableRowHeader.is_table_cell());
        assert_eq!(Role::Button.to_string(), "push button");
    }

    #[test]
    fn test_state_set() {
        let mut states = StateSet::new().with(State::Focusable).with(State::Showing);
        assert!(states.contains(State::Focusable));
        assert!(states.remove(State::Showing));
        assert!(!states.contains(State::Showing));

        let json = serde_json::to_string(&states).unwrap();
        assert_eq!(json, "[\"focusable\"]");
    }
}
