use serde::{Deserialize, Serialize};

use crate::specification::SpecId;

/// What a column holds.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// The derived SKU string.
    Sku,
    /// The selected value of one specification.
    Spec { spec_id: SpecId },
    /// Arbitrary text, ignored by SKU derivation.
    Free,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl Column {
    pub fn sku(title: &str) -> Self {
        Column {
            title: title.to_string(),
            kind: ColumnKind::Sku,
        }
    }

    pub fn spec(title: &str, spec_id: SpecId) -> Self {
        Column {
            title: title.to_string(),
            kind: ColumnKind::Spec { spec_id },
        }
    }

    pub fn free(title: &str) -> Self {
        Column {
            title: title.to_string(),
            kind: ColumnKind::Free,
        }
    }

    pub fn spec_id(&self) -> Option<SpecId> {
        match self.kind {
            ColumnKind::Spec { spec_id } => Some(spec_id),
            _ => None,
        }
    }

    pub fn is_sku(&self) -> bool {
        matches!(self.kind, ColumnKind::Sku)
    }
}

/// Index of the first SKU column, if the layout has one.
pub fn sku_column_index(columns: &[Column]) -> Option<usize> {
    columns.iter().position(Column::is_sku)
}

/// Index of the first column bound to `spec_id`.
pub fn spec_column_index(columns: &[Column], spec_id: SpecId) -> Option<usize> {
    columns.iter().position(|c| c.spec_id() == Some(spec_id))
}

/// Every column bound to `spec_id`, in layout order.
pub fn spec_column_indices(columns: &[Column], spec_id: SpecId) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.spec_id() == Some(spec_id))
        .map(|(i, _)| i)
        .collect()
}
