use crate::commands::{Command, CommandContext, CommandResult, KeyBinding, NoParams};
use crate::error::Result;
use crate::navigator::StructuralNavigator;

/// Cycle Off -> Document -> Gui
#[derive(Debug, Clone, Default)]
pub struct CycleModeCommand;

impl Command for CycleModeCommand {
    type Params = NoParams;

    fn name(&self) -> &str {
        "structural_navigator_mode_cycle"
    }

    fn description(&self) -> String {
        "Cycle the structural navigation mode".to_string()
    }

    fn binding(&self) -> Option<KeyBinding> {
        Some(KeyBinding::new("z").orca())
    }

    /// Available in every mode, only suspension disables it
    fn is_enabled(&self, navigator: &StructuralNavigator) -> bool {
        navigator.cycle_enabled()
    }

    fn execute_typed(&self, _params: NoParams, context: &mut CommandContext) -> Result<CommandResult> {
        let mode = context.navigator.cycle_mode(context.tree, context.presenter);
        Ok(CommandResult::handled_with(serde_json::json!({ "mode": mode })))
    }
}
