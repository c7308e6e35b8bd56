//! Navigator settings, loadable from JSON

use crate::error::{NavigatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User preferences consulted by the navigator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigatorSettings {
    /// Wrap to the other end of the document when no further match exists
    pub wrap: bool,

    /// Minimum text length for a "large object"
    pub large_object_text_length: usize,

    /// Skip empty cells during table navigation
    pub skip_blank_cells: bool,

    /// Whether live regions are tracked at all
    pub infer_live_regions: bool,

    /// Announce "Row r, column c." after each cell move
    pub present_cell_coordinates: bool,

    /// Announce how many rows or columns a spanning cell covers
    pub speak_cell_span: bool,

    /// Cap on nodes visited by the traversal fallback
    pub max_traversal_nodes: usize,

    /// Cap on ancestor chain length
    pub max_ancestor_depth: usize,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            wrap: true,
            large_object_text_length: 75,
            skip_blank_cells: false,
            infer_live_regions: true,
            present_cell_coordinates: false,
            speak_cell_span: true,
            max_traversal_nodes: 50_000,
            max_ancestor_depth: crate::tree::DEFAULT_MAX_DEPTH,
        }
    }
}

impl NavigatorSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| NavigatorError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| NavigatorError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Reject values the navigator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_traversal_nodes == 0 {
            return Err(NavigatorError::Config("max_traversal_nodes must be positive".to_string()));
        }
        if self.max_ancestor_depth == 0 {
            return Err(NavigatorError::Config("max_ancestor_depth must be positive".to_string()));
        }
        Ok(())
    }

    /// Builder method: set wrapping
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder method: set large object threshold
    pub fn large_object_text_length(mut self, length: usize) -> Self {
        self.large_object_text_length = length;
        self
    }

    /// Builder method: set blank cell skipping
    pub fn skip_blank_cells(mut self, skip: bool) -> Self {
        self.skip_blank_cells = skip;
        self
    }

    /// Builder method: set live region support
    pub fn infer_live_regions(mut self, infer: bool) -> Self {
        self.infer_live_regions = infer;
        self
    }

    /// Builder method: set cell coordinate announcements
    pub fn present_cell_coordinates(mut self, present: bool) -> Self {
        self.present_cell_coordinates = present;
        self
    }

    /// Builder method: set cell span announcements
    pub fn speak_cell_span(mut self, speak: bool) -> Self {
        self.speak_cell_span = speak;
        self
    }

    /// Builder method: set traversal cap
    pub fn max_traversal_nodes(mut self, max: usize) -> Self {
        self.max_traversal_nodes = max;
        self
    }
}
