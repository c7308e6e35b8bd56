//! Boundary to speech, braille and list-dialog output
//!
//! The navigator decides *what* the user should hear; a [`Presenter`]
//! decides how. [`RecordingPresenter`] keeps every request as a
//! [`Presentation`] event, which is what tests and the CLI use.

use crate::tree::{all_text, AccessibleTree, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of an object list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectListRow {
    pub node: NodeId,
    pub cells: Vec<String>,
}

/// Data for a "list of headings"-style dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectList {
    /// "Headings: 3 items found"
    pub title: String,
    pub column_headers: Vec<String>,
    pub rows: Vec<ObjectListRow>,
    /// Row to select when the dialog opens
    pub selected: usize,
}

impl ObjectList {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.rows.get(self.selected).map(|row| row.node)
    }
}

/// A single output request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    Message {
        full: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brief: Option<String>,
    },
    Object {
        node: NodeId,
        offset: usize,
        text: String,
    },
    List {
        list: ObjectList,
    },
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message { full, .. } => write!(f, "message: {}", full),
            Self::Object { node, offset, text } => write!(f, "object {} @{}: {}", node, offset, text),
            Self::List { list } => {
                write!(f, "list: {}", list.title)?;
                if !list.column_headers.is_empty() {
                    write!(f, "\n  [{}]", list.column_headers.join(" | "))?;
                }
                for (i, row) in list.rows.iter().enumerate() {
                    let marker = if i == list.selected { '>' } else { ' ' };
                    write!(f, "\n {} {} ({})", marker, row.cells.join(" | "), row.node)?;
                }
                Ok(())
            }
        }
    }
}

/// Output side of structural navigation
pub trait Presenter {
    /// Speak or braille a message; `brief` replaces `full` in terse verbosity
    fn present_message(&mut self, full: &str, brief: Option<&str>);

    /// Present `node` starting at character `offset`
    fn present_object(&mut self, tree: &dyn AccessibleTree, node: NodeId, offset: usize);

    /// Open a list dialog
    fn show_list(&mut self, list: &ObjectList);
}

/// Presenter that only remembers what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Vec<Presentation>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Presentation] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<Presentation> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Full text of every message, in order
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Presentation::Message { full, .. } => Some(full.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every presented object, in order
    pub fn objects(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Presentation::Object { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn last_list(&self) -> Option<&ObjectList> {
        self.events.iter().rev().find_map(|event| match event {
            Presentation::List { list } => Some(list),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn present_message(&mut self, full: &str, brief: Option<&str>) {
        log::debug!("Presenting message: {}", full);
        self.events.push(Presentation::Message {
            full: full.to_string(),
            brief: brief.map(str::to_string),
        });
    }

    fn present_object(&mut self, tree: &dyn AccessibleTree, node: NodeId, offset: usize) {
        let name = tree.name(node).unwrap_or_default();
        let text = if name.trim().is_empty() {
            all_text(tree, node).chars().skip(offset).collect::<String>()
        } else {
            name
        };
        self.events.push(Presentation::Object {
            node,
            offset,
            text: text.trim().to_string(),
        });
    }

    fn show_list(&mut self, list: &ObjectList) {
        self.events.push(Presentation::List { list: list.clone() });
    }
}
