use crate::tree::role::{Role, State, StateSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Description of one accessible node and its subtree
///
/// This is the serialized form loaded by [`SnapshotTree`](crate::tree::SnapshotTree);
/// it mirrors what an accessibility bus reports for a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    /// Accessible role
    pub role: Role,

    /// Accessible name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Accessible description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Text content exposed through the text interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Explicit states; `showing` and `visible` are implied unless `hidden` is set
    #[serde(default, skip_serializing_if = "StateSet::is_empty")]
    pub states: StateSet,

    /// Object attributes (e.g. tag, level, xml-roles, id)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    /// Supported action names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Row/column span for table cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TableSpan>,

    /// Whether the node is off screen
    #[serde(default)]
    pub hidden: bool,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

/// Number of rows and columns a cell covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSpan {
    #[serde(default = "one")]
    pub rows: usize,
    #[serde(default = "one")]
    pub cols: usize,
}

fn one() -> usize {
    1
}

impl Default for TableSpan {
    fn default() -> Self {
        Self { rows: 1, cols: 1 }
    }
}

impl NodeSpec {
    /// Create a new node with the given role
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: None,
            description: None,
            text: None,
            states: StateSet::new(),
            attributes: IndexMap::new(),
            actions: Vec::new(),
            uri: None,
            span: None,
            hidden: false,
            children: Vec::new(),
        }
    }

    /// Heading of the given level with its text
    pub fn heading(level: u32, text: impl Into<String>) -> Self {
        Self::new(Role::Heading)
            .with_text(text)
            .with_attribute("level", level.to_string())
    }

    /// Paragraph holding plain text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(Role::Paragraph).with_text(text)
    }

    /// Focusable link with text and target
    pub fn link(text: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(Role::Link)
            .with_text(text)
            .with_uri(uri)
            .with_state(State::Focusable)
    }

    /// Builder method: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: add a state
    pub fn with_state(mut self, state: State) -> Self {
        self.states.insert(state);
        self
    }

    /// Builder method: add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set the `id` attribute used to look the node up
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }

    /// Builder method: add an action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Builder method: set hyperlink target
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Builder method: set cell span
    pub fn with_span(mut self, rows: usize, cols: usize) -> Self {
        self.span = Some(TableSpan { rows, cols });
        self
    }

    /// Builder method: mark as not showing
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Builder method: append a child
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child node
    pub fn add_child(&mut self, child: NodeSpec) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Lookup id
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Number of nodes in this subtree
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::count_nodes).sum::<usize>()
    }

    /// One-line description used by the CLI dump
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.role.label())];

        if let Some(id) = self.id() {
            parts.push(format!(" id=\"{}\"", id));
        }

        if let Some(level) = self.get_attribute("level") {
            parts.push(format!(" level=\"{}\"", level));
        }

        parts.push(">".to_string());

        if let Some(label) = self.name.as_ref().or(self.text.as_ref()) {
            if !label.trim().is_empty() {
                parts.push(label.trim().to_string());
            }
        }

        parts.join("")
    }
}
