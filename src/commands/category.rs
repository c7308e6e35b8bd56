use crate::commands::{Command, CommandContext, CommandResult, KeyBinding};
use crate::error::{NavigatorError, Result};
use crate::navigation::{Category, CategorySpec, Direction};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters shared by category commands
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LevelParams {
    /// Heading level (1-6); overrides the command's own level
    #[serde(default)]
    pub level: Option<u32>,
}

fn resolve_level(command: &str, requested: Option<u32>, fixed: Option<u32>) -> Result<Option<u32>> {
    match requested.or(fixed) {
        Some(level) if !(1..=6).contains(&level) => Err(NavigatorError::InvalidParams {
            command: command.to_string(),
            reason: format!("level must be between 1 and 6, got {}", level),
        }),
        level => Ok(level),
    }
}

fn level_key(level: u32) -> String {
    level.to_string()
}

/// previous_X / next_X
#[derive(Debug, Clone)]
pub struct CategoryStepCommand {
    name: String,
    category: Category,
    direction: Direction,
    level: Option<u32>,
    key: Option<String>,
}

impl CategoryStepCommand {
    pub fn new(spec: &CategorySpec, direction: Direction) -> Self {
        Self {
            name: format!("{}_{}", direction.as_str(), spec.category.name()),
            category: spec.category,
            direction,
            level: None,
            key: spec.binding.map(|key| key.to_string()),
        }
    }

    pub fn previous(spec: &CategorySpec) -> Self {
        Self::new(spec, Direction::Previous)
    }

    pub fn next(spec: &CategorySpec) -> Self {
        Self::new(spec, Direction::Next)
    }

    /// Restrict to one heading level, renaming to `next_heading_level_N`
    pub fn at_level(mut self, level: u32) -> Self {
        self.name = format!("{}_{}_level_{}", self.direction.as_str(), self.category.name(), level);
        self.level = Some(level);
        self.key = Some(level_key(level));
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Command for CategoryStepCommand {
    type Params = LevelParams;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        let what = self.category.name().replace('_', " ");
        match self.level {
            Some(level) => format!("Go to {} {} at level {}", self.direction.as_str(), what, level),
            None => format!("Go to {} {}", self.direction.as_str(), what),
        }
    }

    fn binding(&self) -> Option<KeyBinding> {
        let binding = KeyBinding::new(self.key.clone()?);
        Some(match self.direction {
            Direction::Next => binding,
            Direction::Previous => binding.shift(),
        })
    }

    fn execute_typed(&self, params: LevelParams, context: &mut CommandContext) -> Result<CommandResult> {
        let level = resolve_level(&self.name, params.level, self.level)?;
        let node = context
            .navigator
            .step(context.tree, context.presenter, self.category, level, self.direction);

        Ok(CommandResult::handled_with(serde_json::json!({
            "category": self.category,
            "direction": self.direction,
            "level": level,
            "node": node,
        })))
    }
}

/// list_X
#[derive(Debug, Clone)]
pub struct CategoryListCommand {
    name: String,
    category: Category,
    plural: &'static str,
    level: Option<u32>,
    key: Option<String>,
}

impl CategoryListCommand {
    pub fn new(spec: &CategorySpec) -> Self {
        Self {
            name: format!("list_{}", spec.plural),
            category: spec.category,
            plural: spec.plural,
            level: None,
            key: spec.binding.map(|key| key.to_string()),
        }
    }

    /// Restrict to one heading level, renaming to `list_headings_level_N`
    pub fn at_level(mut self, level: u32) -> Self {
        self.name = format!("list_{}_level_{}", self.plural, level);
        self.level = Some(level);
        self.key = Some(level_key(level));
        self
    }
}

impl Command for CategoryListCommand {
    type Params = LevelParams;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        let what = self.plural.replace('_', " ");
        match self.level {
            Some(level) => format!("Display a list of {} at level {}", what, level),
            None => format!("Display a list of {}", what),
        }
    }

    fn binding(&self) -> Option<KeyBinding> {
        Some(KeyBinding::new(self.key.clone()?).alt().shift())
    }

    fn execute_typed(&self, params: LevelParams, context: &mut CommandContext) -> Result<CommandResult> {
        let level = resolve_level(&self.name, params.level, self.level)?;
        let list = context
            .navigator
            .list(context.tree, context.presenter, self.category, level);

        Ok(CommandResult::handled_with(serde_json::json!({
            "category": self.category,
            "level": level,
            "count": list.as_ref().map_or(0, |list| list.len()),
            "selected": list.as_ref().and_then(|list| list.selected_node()),
        })))
    }
}
