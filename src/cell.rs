use serde::{Deserialize, Serialize};

/// Visual attributes carried by a cell. The SKU engine never reads these,
/// it only preserves them when it rewrites a cell's text.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CellStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// One grid cell: the raw value plus an optional formatted string.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Cell {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

/// A data row, aligned to the sheet's column list.
pub type Row = Vec<Cell>;

impl Cell {
    pub fn create(text: &str) -> Self {
        Cell {
            value: text.to_string(),
            display: None,
            style: None,
        }
    }

    pub fn empty() -> Self {
        Cell::default()
    }

    /// Text the user sees: the formatted string when present, otherwise the raw value.
    pub fn text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.value)
    }

    /// Replace the cell's text, keeping the raw and formatted strings in step.
    /// Style is left untouched.
    pub fn set_text(&mut self, text: &str) {
        self.value = text.to_string();
        if self.display.is_some() {
            self.display = Some(text.to_string());
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Build a row of `width` empty cells.
pub fn blank_row(width: usize) -> Row {
    vec![Cell::empty(); width]
}
