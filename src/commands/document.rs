use crate::commands::{Command, CommandContext, CommandResult, KeyBinding, NoParams};
use crate::error::Result;
use crate::navigator::ContainerEdge;

/// Return to the live region that spoke last
#[derive(Debug, Clone, Default)]
pub struct LastLiveRegionCommand;

impl Command for LastLiveRegionCommand {
    type Params = NoParams;

    fn name(&self) -> &str {
        "last_live_region"
    }

    fn description(&self) -> String {
        "Go to the last live region which made an announcement".to_string()
    }

    fn binding(&self) -> Option<KeyBinding> {
        Some(KeyBinding::new("y"))
    }

    fn execute_typed(&self, _params: NoParams, context: &mut CommandContext) -> Result<CommandResult> {
        let node = context
            .navigator
            .present_last_live_region(context.tree, context.presenter);
        Ok(CommandResult::handled_with(serde_json::json!({ "node": node })))
    }
}

/// container_start / container_end
#[derive(Debug, Clone)]
pub struct ContainerCommand {
    edge: ContainerEdge,
}

impl ContainerCommand {
    pub fn new(edge: ContainerEdge) -> Self {
        Self { edge }
    }
}

impl Command for ContainerCommand {
    type Params = NoParams;

    fn name(&self) -> &str {
        match self.edge {
            ContainerEdge::Start => "container_start",
            ContainerEdge::End => "container_end",
        }
    }

    fn description(&self) -> String {
        match self.edge {
            ContainerEdge::Start => "Go to the start of the current container".to_string(),
            ContainerEdge::End => "Go to the end of the current container".to_string(),
        }
    }

    fn binding(&self) -> Option<KeyBinding> {
        let binding = KeyBinding::new("comma");
        Some(match self.edge {
            ContainerEdge::Start => binding.shift(),
            ContainerEdge::End => binding,
        })
    }

    fn execute_typed(&self, _params: NoParams, context: &mut CommandContext) -> Result<CommandResult> {
        let node = context
            .navigator
            .container_edge(context.tree, context.presenter, self.edge);
        Ok(CommandResult::handled_with(serde_json::json!({ "node": node })))
    }
}
