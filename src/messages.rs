//! User-facing message catalogue

pub const STRUCTURAL_NAVIGATION_KEYS_OFF: &str = "Structural navigation keys off.";
pub const STRUCTURAL_NAVIGATION_KEYS_DOCUMENT: &str = "Structural navigation keys for document content.";
pub const STRUCTURAL_NAVIGATION_KEYS_GUI: &str = "Structural navigation keys for GUI.";
pub const STRUCTURAL_NAVIGATION_NOT_SUPPORTED_FULL: &str =
    "Structural navigation is not supported here. Navigation may be slow.";
pub const STRUCTURAL_NAVIGATION_NOT_SUPPORTED_BRIEF: &str = "Not supported";
pub const STRUCTURAL_NAVIGATION_NOT_FOUND: &str = "Not found";

pub const WRAPPING_TO_TOP: &str = "Wrapping to top.";
pub const WRAPPING_TO_BOTTOM: &str = "Wrapping to bottom.";
pub const NOT_FOCUSED: &str = "Object could not be focused.";

pub const CONTAINER_NOT_IN_A: &str = "Not in a container.";
pub const LIVE_REGIONS_OFF: &str = "Live region support is off";

pub const TABLE_NOT_IN_A: &str = "Not in a table.";
pub const TABLE_ROW_BEGINNING: &str = "Beginning of row.";
pub const TABLE_ROW_END: &str = "End of row.";
pub const TABLE_COLUMN_TOP: &str = "Top of column.";
pub const TABLE_COLUMN_BOTTOM: &str = "Bottom of column.";
pub const DYNAMIC_COLUMN_HEADER_CLEARED: &str = "Dynamic column header cleared.";
pub const DYNAMIC_ROW_HEADER_CLEARED: &str = "Dynamic row header cleared.";

pub const NO_MORE_BLOCKQUOTES: &str = "No more blockquotes.";
pub const NO_MORE_BUTTONS: &str = "No more buttons.";
pub const NO_MORE_CHECK_BOXES: &str = "No more check boxes.";
pub const NO_MORE_COMBO_BOXES: &str = "No more combo boxes.";
pub const NO_MORE_ENTRIES: &str = "No more entries.";
pub const NO_MORE_FORM_FIELDS: &str = "No more form fields.";
pub const NO_MORE_HEADINGS: &str = "No more headings.";
pub const NO_MORE_IFRAMES: &str = "No more internal frames.";
pub const NO_MORE_IMAGES: &str = "No more images.";
pub const NO_LANDMARK_FOUND: &str = "No landmark found.";
pub const NO_MORE_LINKS: &str = "No more links.";
pub const NO_MORE_VISITED_LINKS: &str = "No more visited links.";
pub const NO_MORE_UNVISITED_LINKS: &str = "No more unvisited links.";
pub const NO_MORE_LISTS: &str = "No more lists.";
pub const NO_MORE_LIST_ITEMS: &str = "No more list items.";
pub const NO_MORE_LIVE_REGIONS: &str = "No more live regions.";
pub const NO_MORE_PARAGRAPHS: &str = "No more paragraphs.";
pub const NO_MORE_RADIO_BUTTONS: &str = "No more radio buttons.";
pub const NO_MORE_SEPARATORS: &str = "No more separators.";
pub const NO_MORE_TABLES: &str = "No more tables.";
pub const NO_MORE_LARGE_OBJECTS: &str = "No more large objects.";
pub const NO_MORE_CLICKABLES: &str = "No more clickables.";

// Titles of the object list dialogs
pub const LIST_BLOCKQUOTES: &str = "Blockquotes";
pub const LIST_BUTTONS: &str = "Buttons";
pub const LIST_CHECK_BOXES: &str = "Check Boxes";
pub const LIST_COMBO_BOXES: &str = "Combo Boxes";
pub const LIST_ENTRIES: &str = "Entries";
pub const LIST_FORM_FIELDS: &str = "Form Fields";
pub const LIST_HEADINGS: &str = "Headings";
pub const LIST_IFRAMES: &str = "Internal Frames";
pub const LIST_IMAGES: &str = "Images";
pub const LIST_LANDMARKS: &str = "Landmarks";
pub const LIST_LINKS: &str = "Links";
pub const LIST_VISITED_LINKS: &str = "Visited Links";
pub const LIST_UNVISITED_LINKS: &str = "Unvisited Links";
pub const LIST_LISTS: &str = "Lists";
pub const LIST_LIST_ITEMS: &str = "List Items";
pub const LIST_PARAGRAPHS: &str = "Paragraphs";
pub const LIST_RADIO_BUTTONS: &str = "Radio Buttons";
pub const LIST_TABLES: &str = "Tables";
pub const LIST_LARGE_OBJECTS: &str = "Large Objects";
pub const LIST_CLICKABLES: &str = "Clickables";

pub const STATE_CHECKED: &str = "checked";
pub const STATE_NOT_CHECKED: &str = "not checked";
pub const STATE_PARTIALLY_CHECKED: &str = "partially checked";
pub const STATE_ON: &str = "on";
pub const STATE_OFF: &str = "off";
pub const STATE_SELECTED: &str = "selected";
pub const STATE_NOT_SELECTED: &str = "not selected";
pub const STATE_VISITED: &str = "visited";
pub const STATE_UNVISITED: &str = "unvisited";

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// "3 items found"
pub fn items_found(count: usize) -> String {
    format!("{} found", plural(count, "item", "items"))
}

/// "List with 3 items"
pub fn list_item_count(count: usize) -> String {
    format!("List with {}", plural(count, "item", "items"))
}

/// "Nested list with 3 items"
pub fn nested_list_item_count(count: usize) -> String {
    format!("Nested list with {}", plural(count, "item", "items"))
}

/// "Description list with 2 terms"
pub fn description_list_term_count(count: usize) -> String {
    format!("Description list with {}", plural(count, "term", "terms"))
}

/// "Tab list with 4 tabs"
pub fn tab_list_item_count(count: usize) -> String {
    format!("Tab list with {}", plural(count, "tab", "tabs"))
}

/// "table with 2 rows 3 columns"
pub fn table_size(rows: usize, columns: usize) -> String {
    format!(
        "table with {} {}",
        plural(rows, "row", "rows"),
        plural(columns, "column", "columns")
    )
}

/// "Row 2, column 1." (1-based)
pub fn table_cell_coordinates(row: usize, column: usize) -> String {
    format!("Row {}, column {}.", row + 1, column + 1)
}

/// "No more headings at level 2."
pub fn no_more_headings_at_level(level: u32) -> String {
    format!("No more headings at level {}.", level)
}

/// "Headings at Level 2"
pub fn headings_at_level(level: u32) -> String {
    format!("Headings at Level {}", level)
}

/// "Dynamic column header set for row 1" (1-based)
pub fn dynamic_column_header_set(row: usize) -> String {
    format!("Dynamic column header set for row {}", row + 1)
}

/// "Dynamic row header set for column 1" (1-based)
pub fn dynamic_row_header_set(column: usize) -> String {
    format!("Dynamic row header set for column {}", column + 1)
}

/// Span announcement, empty for a single-slot cell
pub fn cell_span(row_span: usize, col_span: usize) -> String {
    match (row_span > 1, col_span > 1) {
        (true, true) => format!(
            "Cell spans {} {}",
            plural(row_span, "row", "rows"),
            plural(col_span, "column", "columns")
        ),
        (false, true) => format!("Cell spans {}", plural(col_span, "column", "columns")),
        (true, false) => format!("Cell spans {}", plural(row_span, "row", "rows")),
        (false, false) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(items_found(1), "1 item found");
        assert_eq!(items_found(0), "0 items found");
        assert_eq!(list_item_count(3), "List with 3 items");
        assert_eq!(table_size(2, 1), "table with 2 rows 1 column");
    }

    #[test]
    fn test_cell_span() {
        assert_eq!(cell_span(1, 1), "");
        assert_eq!(cell_span(2, 1), "Cell spans 2 rows");
        assert_eq!(cell_span(1, 3), "Cell spans 3 columns");
        assert_eq!(cell_span(2, 2), "Cell spans 2 rows 2 columns");
    }

    #[test]
    fn test_coordinates_are_one_based() {
        assert_eq!(table_cell_coordinates(0, 4), "Row 1, column 5.");
        assert_eq!(dynamic_column_header_set(0), "Dynamic column header set for row 1");
        assert_eq!(dynamic_row_header_set(2), "Dynamic row header set for column 3");
    }
}
