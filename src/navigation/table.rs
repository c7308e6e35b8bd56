//! Two-dimensional movement between the cells of one table
//!
//! Coordinates are zero-based. A spanning cell occupies several
//! coordinates; the navigator remembers the coordinate it was asked to
//! reach rather than the cell's top-left anchor, so moving across a span
//! keeps the user in the row or column they travelled along.

use crate::messages;
use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::finder;
use crate::tree::{find_ancestor, find_ancestor_inclusive, CellExtents, NodeId, Role, TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellDirection {
    Left,
    Right,
    Up,
    Down,
    First,
    Last,
    StartOfRow,
    EndOfRow,
    TopOfColumn,
    BottomOfColumn,
}

impl CellDirection {
    pub const ALL: [CellDirection; 10] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::First,
        Self::Last,
        Self::StartOfRow,
        Self::EndOfRow,
        Self::TopOfColumn,
        Self::BottomOfColumn,
    ];

    /// (row, column) step; zero for the absolute moves
    fn delta(self) -> (isize, isize) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            _ => (0, 0),
        }
    }

    /// Edge reached when no move is possible in this direction
    fn edge_message(self) -> &'static str {
        match self {
            Self::Left | Self::First | Self::StartOfRow => messages::TABLE_ROW_BEGINNING,
            Self::Right | Self::EndOfRow => messages::TABLE_ROW_END,
            Self::Up | Self::TopOfColumn => messages::TABLE_COLUMN_TOP,
            Self::Down | Self::Last | Self::BottomOfColumn => messages::TABLE_COLUMN_BOTTOM,
        }
    }

    /// For the row and column edge moves: the outermost slot and the step
    /// that walks from it back towards `current`
    fn edge_scan(self, current: CellCoordinate, rows: usize, cols: usize) -> Option<((isize, isize), (isize, isize))> {
        let (row, col) = (current.row as isize, current.col as isize);
        match self {
            Self::StartOfRow => Some(((row, 0), (0, 1))),
            Self::EndOfRow => Some(((row, cols as isize - 1), (0, -1))),
            Self::TopOfColumn => Some(((0, col), (1, 0))),
            Self::BottomOfColumn => Some(((rows as isize - 1, col), (-1, 0))),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::First => "first",
            Self::Last => "last",
            Self::StartOfRow => "start_of_row",
            Self::EndOfRow => "end_of_row",
            Self::TopOfColumn => "top_of_column",
            Self::BottomOfColumn => "bottom_of_column",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: usize,
}

impl CellCoordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A completed move to another cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMove {
    pub table: NodeId,
    pub cell: NodeId,
    /// `None` when the table's geometry was unavailable
    pub coordinate: Option<CellCoordinate>,
    pub extents: Option<CellExtents>,
    /// Edge crossed on the way, if the move was clamped
    pub edge: Option<&'static str>,
    /// Row headers not shared with the previous cell
    pub row_headers: Vec<NodeId>,
    /// Column headers not shared with the previous cell
    pub column_headers: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellMoveResult {
    NotInTable,
    /// Already at the edge in the direction of travel
    Stayed { cell: NodeId, edge: &'static str },
    Moved(CellMove),
}

/// Which axis a dynamic header line replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicHeader {
    /// A row whose cells act as the column headers of every other row
    ColumnHeadersRow,
    /// A column whose cells act as the row headers of every other column
    RowHeadersColumn,
}

impl DynamicHeader {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ColumnHeadersRow => "column_headers_row",
            Self::RowHeadersColumn => "row_headers_column",
        }
    }
}

/// Remembers the last coordinate reached in the current table and any
/// user-chosen header row or column per table
#[derive(Debug, Clone, Default)]
pub struct TableNavigator {
    last_visited: Option<(NodeId, CellCoordinate)>,
    column_headers_rows: HashMap<NodeId, usize>,
    row_headers_columns: HashMap<NodeId, usize>,
}

impl TableNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table and coordinate of the last successful move
    pub fn last_visited(&self) -> Option<(NodeId, CellCoordinate)> {
        self.last_visited
    }

    pub fn reset(&mut self) {
        self.last_visited = None;
    }

    /// Treat row `row` of `table` as the column headers of its other rows
    pub fn set_dynamic_column_headers_row(&mut self, table: NodeId, row: usize) {
        self.column_headers_rows.insert(table, row);
    }

    /// Returns whether a header row had been set
    pub fn clear_dynamic_column_headers_row(&mut self, table: NodeId) -> bool {
        self.column_headers_rows.remove(&table).is_some()
    }

    /// Treat column `col` of `table` as the row headers of its other columns
    pub fn set_dynamic_row_headers_column(&mut self, table: NodeId, col: usize) {
        self.row_headers_columns.insert(table, col);
    }

    /// Returns whether a header column had been set
    pub fn clear_dynamic_row_headers_column(&mut self, table: NodeId) -> bool {
        self.row_headers_columns.remove(&table).is_some()
    }

    pub fn dynamic_header(&self, table: NodeId, header: DynamicHeader) -> Option<usize> {
        match header {
            DynamicHeader::ColumnHeadersRow => self.column_headers_rows.get(&table).copied(),
            DynamicHeader::RowHeadersColumn => self.row_headers_columns.get(&table).copied(),
        }
    }

    /// Cell containing `current` and the table around it
    pub fn locate_cell(ctx: &ClassifyContext, current: NodeId) -> Option<(NodeId, NodeId)> {
        let max_depth = ctx.settings.max_ancestor_depth;
        let cell = find_ancestor_inclusive(ctx.tree, current, max_depth, |id| classifier::is_table_cell(ctx, id))?;
        let table = find_ancestor(ctx.tree, cell, max_depth, |id| ctx.role(id) == Some(Role::Table))?;
        Some((table, cell))
    }

    /// Coordinate the user is at in `cell`; the last visited one when it
    /// still lies inside the cell
    pub fn coordinate_of(&self, ctx: &ClassifyContext, table: NodeId, cell: NodeId) -> TreeResult<CellCoordinate> {
        if let Some((visited, coordinate)) = self.last_visited {
            if visited == table && ctx.tree.cell_at(table, coordinate.row, coordinate.col)? == Some(cell) {
                return Ok(coordinate);
            }
        }
        let extents = ctx.tree.cell_extents(cell)?;
        Ok(CellCoordinate::new(extents.row, extents.col))
    }

    /// Move from the cell containing `current` in `direction`
    pub fn move_cell(&mut self, ctx: &ClassifyContext, current: NodeId, direction: CellDirection) -> CellMoveResult {
        let Some((table, cell)) = Self::locate_cell(ctx, current) else {
            return CellMoveResult::NotInTable;
        };

        if self.last_visited.is_some_and(|(visited, _)| visited != table) {
            log::debug!("Entered table {}; forgetting the last coordinate", table);
            self.last_visited = None;
        }

        match self.move_in_grid(ctx, table, cell, direction) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("Geometry of table {} unavailable ({}); moving in cell order", table, e);
                self.move_in_order(ctx, table, cell, direction)
            }
        }
    }

    fn move_in_grid(
        &mut self,
        ctx: &ClassifyContext,
        table: NodeId,
        cell: NodeId,
        direction: CellDirection,
    ) -> TreeResult<CellMoveResult> {
        let tree = ctx.tree;
        let rows = tree.row_count(table)?;
        let cols = tree.column_count(table)?;
        if rows == 0 || cols == 0 {
            return Err(TreeError::InvalidCoordinate { row: rows, col: cols });
        }
        let current = self.coordinate_of(ctx, table, cell)?;
        let in_bounds = |row: isize, col: isize| row >= 0 && col >= 0 && row < rows as isize && col < cols as isize;

        if let Some(((mut row, mut col), (back_row, back_col))) = direction.edge_scan(current, rows, cols) {
            // Holes at the far end are skipped; reaching `cell` itself means it is already at the edge
            while in_bounds(row, col) {
                match tree.cell_at(table, row as usize, col as usize)? {
                    Some(found) if found == cell => break,
                    Some(found) => {
                        let desired = CellCoordinate::new(row as usize, col as usize);
                        return Ok(self.finish_move(ctx, table, (cell, current), (found, desired), None));
                    }
                    None => {
                        row += back_row;
                        col += back_col;
                    }
                }
            }
            return Ok(CellMoveResult::Stayed {
                cell,
                edge: direction.edge_message(),
            });
        }

        let (dr, dc) = direction.delta();
        let (mut row, mut col) = match direction {
            CellDirection::First => (0, 0),
            CellDirection::Last => (rows as isize - 1, cols as isize - 1),
            _ => (current.row as isize + dr, current.col as isize + dc),
        };

        let mut edge = None;
        let mut target = None;
        for _ in 0..rows + cols + 2 {
            if !in_bounds(row, col) {
                edge = Some(if col < 0 {
                    messages::TABLE_ROW_BEGINNING
                } else if col >= cols as isize {
                    messages::TABLE_ROW_END
                } else if row < 0 {
                    messages::TABLE_COLUMN_TOP
                } else {
                    messages::TABLE_COLUMN_BOTTOM
                });
                row = row.clamp(0, rows as isize - 1);
                col = col.clamp(0, cols as isize - 1);
                target = tree
                    .cell_at(table, row as usize, col as usize)?
                    .filter(|found| *found != cell);
                break;
            }

            let found = tree.cell_at(table, row as usize, col as usize)?;
            let keep_going = match found {
                None => true,
                Some(found) => {
                    found == cell || (ctx.settings.skip_blank_cells && classifier::is_blank_cell(ctx, found))
                }
            };
            if !keep_going || (dr, dc) == (0, 0) {
                target = found;
                break;
            }
            row += dr;
            col += dc;
        }

        let Some(target) = target else {
            return Ok(CellMoveResult::Stayed {
                cell,
                edge: edge.unwrap_or_else(|| direction.edge_message()),
            });
        };

        let desired = CellCoordinate::new(row as usize, col as usize);
        Ok(self.finish_move(ctx, table, (cell, current), (target, desired), edge))
    }

    fn finish_move(
        &mut self,
        ctx: &ClassifyContext,
        table: NodeId,
        (cell, current): (NodeId, CellCoordinate),
        (target, desired): (NodeId, CellCoordinate),
        edge: Option<&'static str>,
    ) -> CellMoveResult {
        let row_headers = if desired.row != current.row {
            new_headers(
                self.row_headers_at(ctx, table, cell, current),
                self.row_headers_at(ctx, table, target, desired),
            )
        } else {
            Vec::new()
        };
        let column_headers = if desired.col != current.col {
            new_headers(
                self.column_headers_at(ctx, table, cell, current),
                self.column_headers_at(ctx, table, target, desired),
            )
        } else {
            Vec::new()
        };

        self.last_visited = Some((table, desired));
        CellMoveResult::Moved(CellMove {
            table,
            cell: target,
            coordinate: Some(desired),
            extents: ctx.tree.cell_extents(target).ok(),
            edge,
            row_headers,
            column_headers,
        })
    }

    /// Row headers of `cell` at `at`; a dynamic header column wins over the
    /// tree's headers everywhere but in that column itself
    fn row_headers_at(&self, ctx: &ClassifyContext, table: NodeId, cell: NodeId, at: CellCoordinate) -> Vec<NodeId> {
        match self.row_headers_columns.get(&table) {
            Some(&col) if col != at.col => ctx.tree.cell_at(table, at.row, col).ok().flatten().into_iter().collect(),
            _ => ctx.tree.row_headers(cell).unwrap_or_default(),
        }
    }

    fn column_headers_at(
        &self,
        ctx: &ClassifyContext,
        table: NodeId,
        cell: NodeId,
        at: CellCoordinate,
    ) -> Vec<NodeId> {
        match self.column_headers_rows.get(&table) {
            Some(&row) if row != at.row => ctx.tree.cell_at(table, row, at.col).ok().flatten().into_iter().collect(),
            _ => ctx.tree.column_headers(cell).unwrap_or_default(),
        }
    }

    fn move_in_order(
        &mut self,
        ctx: &ClassifyContext,
        table: NodeId,
        cell: NodeId,
        direction: CellDirection,
    ) -> CellMoveResult {
        let cells = match finder::traverse(ctx, table, |id| classifier::is_table_cell(ctx, id)) {
            Ok(cells) if !cells.is_empty() => cells,
            Ok(_) => return CellMoveResult::NotInTable,
            Err(e) => {
                log::debug!("Cannot list cells of table {}: {}", table, e);
                return CellMoveResult::NotInTable;
            }
        };
        let Some(index) = cells.iter().position(|id| *id == cell) else {
            return CellMoveResult::NotInTable;
        };

        let last = cells.len() - 1;
        let target = match direction {
            CellDirection::First => Some(0),
            CellDirection::Last => Some(last),
            CellDirection::StartOfRow | CellDirection::TopOfColumn => Some(0).filter(|i| *i != index),
            CellDirection::EndOfRow | CellDirection::BottomOfColumn => Some(last).filter(|i| *i != index),
            CellDirection::Left | CellDirection::Up => index.checked_sub(1),
            CellDirection::Right | CellDirection::Down => Some(index + 1).filter(|i| *i <= last),
        };

        match target {
            Some(target) => {
                self.last_visited = None;
                CellMoveResult::Moved(CellMove {
                    table,
                    cell: cells[target],
                    coordinate: None,
                    extents: None,
                    edge: None,
                    row_headers: Vec::new(),
                    column_headers: Vec::new(),
                })
            }
            None => CellMoveResult::Stayed {
                cell,
                edge: direction.edge_message(),
            },
        }
    }
}

fn new_headers(old: Vec<NodeId>, new: Vec<NodeId>) -> Vec<NodeId> {
    new.into_iter().filter(|header| !old.contains(header)).collect()
}
