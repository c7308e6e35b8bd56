//! Named commands over a [`StructuralNavigator`]
//!
//! Every user-facing operation is a [`Command`] with typed, JSON-schema
//! described parameters. [`CommandRegistry`] erases the parameter type so
//! an input layer (or the CLI) can dispatch by name:
//!
//! ```rust
//! use structural_nav::commands::{CommandContext, CommandRegistry};
//! use structural_nav::presenter::RecordingPresenter;
//! use structural_nav::tree::{NodeSpec, Role, SnapshotTree};
//! use structural_nav::{NavigatorSettings, StructuralNavigator};
//! use serde_json::json;
//!
//! # fn main() -> structural_nav::Result<()> {
//! let tree = SnapshotTree::from_spec(
//!     NodeSpec::new(Role::DocumentWeb)
//!         .with_child(NodeSpec::heading(1, "Intro").with_id("intro"))
//!         .with_child(NodeSpec::heading(2, "Details")),
//! );
//! let mut navigator = StructuralNavigator::new(NavigatorSettings::default());
//! navigator.set_locus_of_focus(tree.find("intro"));
//! let mut presenter = RecordingPresenter::new();
//!
//! let registry = CommandRegistry::with_defaults();
//! let mut context = CommandContext::new(&mut navigator, &tree, &mut presenter);
//! let result = registry.execute("next_heading", json!({}), &mut context)?;
//! assert!(result.handled);
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod document;
pub mod mode;
pub mod table;

pub use category::{CategoryListCommand, CategoryStepCommand, LevelParams};
pub use document::{ContainerCommand, LastLiveRegionCommand};
pub use mode::CycleModeCommand;
pub use table::{DynamicHeadersCommand, TableCellCommand};

use crate::error::{NavigatorError, Result};
use crate::navigation::{Category, CategoryRegistry, CellDirection, DynamicHeader};
use crate::navigator::{ContainerEdge, StructuralNavigator};
use crate::presenter::Presenter;
use crate::tree::AccessibleTree;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Everything a command may touch while it runs
pub struct CommandContext<'a> {
    pub navigator: &'a mut StructuralNavigator,
    pub tree: &'a dyn AccessibleTree,
    pub presenter: &'a mut dyn Presenter,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        navigator: &'a mut StructuralNavigator,
        tree: &'a dyn AccessibleTree,
        presenter: &'a mut dyn Presenter,
    ) -> Self {
        Self { navigator, tree, presenter }
    }
}

/// Outcome of one command invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// `false` when the command was disabled and did nothing
    pub handled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResult {
    pub fn handled() -> Self {
        Self { handled: true, data: None }
    }

    pub fn handled_with(data: Value) -> Self {
        Self { handled: true, data: Some(data) }
    }

    pub fn unhandled() -> Self {
        Self { handled: false, data: None }
    }
}

/// Modifier keys of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub orca: bool,
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Default key for a command; data only, an outer input layer grabs the keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub modifiers: Modifiers,
    /// Presses in quick succession; 2 for a double-click binding
    #[serde(default = "single_click")]
    pub clicks: u8,
}

fn single_click() -> u8 {
    1
}

impl KeyBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            clicks: 1,
        }
    }

    pub fn double_click(mut self) -> Self {
        self.clicks = 2;
        self
    }

    pub fn orca(mut self) -> Self {
        self.modifiers.orca = true;
        self
    }

    pub fn control(mut self) -> Self {
        self.modifiers.control = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (on, label) in [(m.orca, "Orca"), (m.control, "Ctrl"), (m.alt, "Alt"), (m.shift, "Shift")] {
            if on {
                write!(f, "{}+", label)?;
            }
        }
        f.write_str(&self.key)?;
        match self.clicks {
            0 | 1 => Ok(()),
            2 => f.write_str(" (double-click)"),
            n => write!(f, " ({} clicks)", n),
        }
    }
}

/// Parameters for commands that take none
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// A named navigator operation with typed parameters
pub trait Command: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn description(&self) -> String;

    fn binding(&self) -> Option<KeyBinding> {
        None
    }

    /// Whether the command would do anything right now
    fn is_enabled(&self, navigator: &StructuralNavigator) -> bool {
        navigator.commands_enabled()
    }

    fn execute_typed(&self, params: Self::Params, context: &mut CommandContext) -> Result<CommandResult>;

    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }
}

/// Object-safe view of a [`Command`]
pub trait DynCommand: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> String;

    fn binding(&self) -> Option<KeyBinding>;

    fn is_enabled(&self, navigator: &StructuralNavigator) -> bool;

    fn parameters_schema(&self) -> Value;

    fn execute(&self, params: Value, context: &mut CommandContext) -> Result<CommandResult>;
}

impl<T: Command> DynCommand for T {
    fn name(&self) -> &str {
        Command::name(self)
    }

    fn description(&self) -> String {
        Command::description(self)
    }

    fn binding(&self) -> Option<KeyBinding> {
        Command::binding(self)
    }

    fn is_enabled(&self, navigator: &StructuralNavigator) -> bool {
        Command::is_enabled(self, navigator)
    }

    fn parameters_schema(&self) -> Value {
        Command::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut CommandContext) -> Result<CommandResult> {
        let params = if params.is_null() { Value::Object(Default::default()) } else { params };
        let typed: T::Params = serde_json::from_value(params).map_err(|e| NavigatorError::InvalidParams {
            command: Command::name(self).to_string(),
            reason: e.to_string(),
        })?;

        if !Command::is_enabled(self, context.navigator) {
            log::debug!("Command {} is disabled", Command::name(self));
            return Ok(CommandResult::unhandled());
        }
        self.execute_typed(typed, context)
    }
}

/// Summary of a registered command, for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub binding: Option<String>,
    pub enabled: bool,
}

/// Commands by name, in registration order
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Arc<dyn DynCommand>>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command for the built-in categories
    pub fn with_defaults() -> Self {
        Self::for_categories(&CategoryRegistry::with_defaults())
    }

    /// Every command the given categories support, plus the fixed commands
    pub fn for_categories(categories: &CategoryRegistry) -> Self {
        let mut registry = Self::new();
        registry.register(CycleModeCommand);

        for spec in categories.iter() {
            if spec.commands.step {
                registry.register(CategoryStepCommand::previous(spec));
                registry.register(CategoryStepCommand::next(spec));
            }
            if spec.commands.list {
                registry.register(CategoryListCommand::new(spec));
            }
            if spec.category == Category::Heading {
                for level in 1..=6 {
                    registry.register(CategoryStepCommand::previous(spec).at_level(level));
                    registry.register(CategoryStepCommand::next(spec).at_level(level));
                    registry.register(CategoryListCommand::new(spec).at_level(level));
                }
            }
        }

        registry.register(LastLiveRegionCommand);
        registry.register(ContainerCommand::new(ContainerEdge::Start));
        registry.register(ContainerCommand::new(ContainerEdge::End));
        for direction in CellDirection::ALL {
            registry.register(TableCellCommand::new(direction));
        }
        for header in [DynamicHeader::ColumnHeadersRow, DynamicHeader::RowHeadersColumn] {
            registry.register(DynamicHeadersCommand::set(header));
            registry.register(DynamicHeadersCommand::clear(header));
        }
        registry
    }

    /// Add a command, replacing any command with the same name
    pub fn register<C: Command + 'static>(&mut self, command: C) {
        let name = Command::name(&command).to_string();
        self.commands.insert(name, Arc::new(command));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynCommand>> {
        self.commands.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Name, description, binding and enabled bit of every command
    pub fn describe(&self, navigator: &StructuralNavigator) -> Vec<CommandInfo> {
        self.commands
            .values()
            .map(|command| CommandInfo {
                name: command.name().to_string(),
                description: command.description(),
                binding: command.binding().map(|b| b.to_string()),
                enabled: command.is_enabled(navigator),
            })
            .collect()
    }

    /// Run a command by name
    pub fn execute(&self, name: &str, params: Value, context: &mut CommandContext) -> Result<CommandResult> {
        let command = self
            .get(name)
            .ok_or_else(|| NavigatorError::CommandNotFound(name.to_string()))?;
        log::debug!("Executing command {}", name);
        command.execute(params, context)
    }
}
