//! Navigation mode state and the mode cycle

use crate::error::NavigatorError;
use crate::messages;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where category commands look for matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Category commands are inert
    #[default]
    Off,
    /// Search the document containing the focus
    Document,
    /// Search the focused dialog or window, skipping document content
    Gui,
}

impl NavigationMode {
    /// Successor in the Off → Document → Gui → Off cycle
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Document,
            Self::Document => Self::Gui,
            Self::Gui => Self::Off,
        }
    }

    /// Announcement made when this mode is entered
    pub fn message(self) -> &'static str {
        match self {
            Self::Off => messages::STRUCTURAL_NAVIGATION_KEYS_OFF,
            Self::Document => messages::STRUCTURAL_NAVIGATION_KEYS_DOCUMENT,
            Self::Gui => messages::STRUCTURAL_NAVIGATION_KEYS_GUI,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Document => "document",
            Self::Gui => "gui",
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationMode {
    type Err = NavigatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "document" => Ok(Self::Document),
            "gui" => Ok(Self::Gui),
            other => Err(NavigatorError::Config(format!("Unknown navigation mode '{}'", other))),
        }
    }
}

/// User-selected mode plus the temporary suspension imposed by focus-mode logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    mode: NavigationMode,
    suspended: bool,
}

impl ModeState {
    pub fn new(mode: NavigationMode) -> Self {
        Self { mode, suspended: false }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Returns whether the mode actually changed
    pub fn set_mode(&mut self, mode: NavigationMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Advance to the next mode and return it
    pub fn cycle(&mut self) -> NavigationMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Returns whether the flag actually changed
    pub fn set_suspended(&mut self, suspended: bool) -> bool {
        let changed = self.suspended != suspended;
        self.suspended = suspended;
        changed
    }

    /// Category, table and container commands
    pub fn commands_enabled(&self) -> bool {
        self.mode != NavigationMode::Off && !self.suspended
    }

    /// The mode-cycle command survives `Off` but not suspension
    pub fn cycle_enabled(&self) -> bool {
        !self.suspended
    }
}
