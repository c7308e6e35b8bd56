use crate::commands::{Command, CommandContext, CommandResult, KeyBinding, NoParams};
use crate::error::Result;
use crate::navigation::{CellDirection, DynamicHeader};

/// table_cell_left, table_cell_right, ... table_cell_bottom_of_column
#[derive(Debug, Clone)]
pub struct TableCellCommand {
    name: String,
    direction: CellDirection,
}

impl TableCellCommand {
    pub fn new(direction: CellDirection) -> Self {
        Self {
            name: format!("table_cell_{}", direction.as_str()),
            direction,
        }
    }
}

impl Command for TableCellCommand {
    type Params = NoParams;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        match self.direction {
            CellDirection::Left => "Go left one cell".to_string(),
            CellDirection::Right => "Go right one cell".to_string(),
            CellDirection::Up => "Go up one cell".to_string(),
            CellDirection::Down => "Go down one cell".to_string(),
            CellDirection::First => "Go to the first cell in the table".to_string(),
            CellDirection::Last => "Go to the last cell in the table".to_string(),
            CellDirection::StartOfRow => "Go to the beginning of the row".to_string(),
            CellDirection::EndOfRow => "Go to the end of the row".to_string(),
            CellDirection::TopOfColumn => "Go to the top of the column".to_string(),
            CellDirection::BottomOfColumn => "Go to the bottom of the column".to_string(),
        }
    }

    fn binding(&self) -> Option<KeyBinding> {
        let binding = match self.direction {
            CellDirection::Left => KeyBinding::new("Left"),
            CellDirection::Right => KeyBinding::new("Right"),
            CellDirection::Up => KeyBinding::new("Up"),
            CellDirection::Down => KeyBinding::new("Down"),
            CellDirection::First => KeyBinding::new("Home"),
            CellDirection::Last => KeyBinding::new("End"),
            CellDirection::StartOfRow => KeyBinding::new("Left").orca(),
            CellDirection::EndOfRow => KeyBinding::new("Right").orca(),
            CellDirection::TopOfColumn => KeyBinding::new("Up").orca(),
            CellDirection::BottomOfColumn => KeyBinding::new("Down").orca(),
        };
        Some(binding.alt().shift())
    }

    fn execute_typed(&self, _params: NoParams, context: &mut CommandContext) -> Result<CommandResult> {
        let node = context
            .navigator
            .move_cell(context.tree, context.presenter, self.direction);
        let coordinate = context
            .navigator
            .tables()
            .last_visited()
            .map(|(_, coordinate)| coordinate);

        Ok(CommandResult::handled_with(serde_json::json!({
            "direction": self.direction,
            "node": node,
            "coordinate": coordinate,
        })))
    }
}

/// set_/clear_dynamic_column_headers_row and set_/clear_dynamic_row_headers_column
#[derive(Debug, Clone)]
pub struct DynamicHeadersCommand {
    name: String,
    header: DynamicHeader,
    clear: bool,
}

impl DynamicHeadersCommand {
    pub fn set(header: DynamicHeader) -> Self {
        Self {
            name: format!("set_dynamic_{}", header.as_str()),
            header,
            clear: false,
        }
    }

    pub fn clear(header: DynamicHeader) -> Self {
        Self {
            name: format!("clear_dynamic_{}", header.as_str()),
            header,
            clear: true,
        }
    }
}

impl Command for DynamicHeadersCommand {
    type Params = NoParams;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        match (self.header, self.clear) {
            (DynamicHeader::ColumnHeadersRow, false) => "Use the current row as the column headers".to_string(),
            (DynamicHeader::ColumnHeadersRow, true) => "Clear the dynamic column headers".to_string(),
            (DynamicHeader::RowHeadersColumn, false) => "Use the current column as the row headers".to_string(),
            (DynamicHeader::RowHeadersColumn, true) => "Clear the dynamic row headers".to_string(),
        }
    }

    fn binding(&self) -> Option<KeyBinding> {
        let key = match self.header {
            DynamicHeader::ColumnHeadersRow => "r",
            DynamicHeader::RowHeadersColumn => "c",
        };
        let binding = KeyBinding::new(key).orca().shift();
        Some(if self.clear { binding.double_click() } else { binding })
    }

    fn execute_typed(&self, _params: NoParams, context: &mut CommandContext) -> Result<CommandResult> {
        if self.clear {
            let cleared = context
                .navigator
                .clear_dynamic_headers(context.tree, context.presenter, self.header);
            return Ok(CommandResult::handled_with(serde_json::json!({ "cleared": cleared })));
        }
        let index = context
            .navigator
            .set_dynamic_headers(context.tree, context.presenter, self.header);
        Ok(CommandResult::handled_with(serde_json::json!({ "index": index })))
    }
}
