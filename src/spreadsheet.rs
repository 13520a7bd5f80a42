use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;

use crate::cell::{Cell, Row};
use crate::changes::{SpecChanges, detect_changes};
use crate::column::{Column, sku_column_index, spec_column_index};
use crate::combinations::{GenerationOrder, generate_combinations};
use crate::error::SpecError;
use crate::regenerate::regenerate;
use crate::settings::SkuSettings;
use crate::specification::{
    SpecId, SpecValue, Specification, SpecificationStore, ValueId, ValueUpdate,
};
use crate::updater::update_row_sku;

pub type SheetId = Uuid;

/// Where auto-populated rows go.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Drop every existing data row first. Column titles are kept.
    Replace,
    /// Add below the existing rows.
    Append,
}

/// One product table: column layout, data rows and the sheet's own
/// specifications.
///
/// The `Sheet` methods that edit specifications are the mutation sites: each
/// one performs the store edit, works out what changed and runs a bulk
/// regeneration, so SKU cells never drift from their derivation. Failed edits
/// leave both the store and the rows untouched.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub specifications: SpecificationStore,
}

impl Sheet {
    /// A sheet with a single SKU column and no rows.
    pub fn create(name: &str) -> Self {
        Self::with_columns(name, vec![Column::sku("SKU")])
    }

    pub fn with_columns(name: &str, columns: Vec<Column>) -> Self {
        Sheet {
            id: Uuid::new_v4(),
            name: name.to_string(),
            columns,
            rows: Vec::new(),
            specifications: SpecificationStore::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn sku_column(&self) -> Option<usize> {
        sku_column_index(&self.columns)
    }

    pub fn spec_column(&self, spec_id: SpecId) -> Option<usize> {
        spec_column_index(&self.columns, spec_id)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Text of a cell, empty when the cell doesn't exist.
    pub fn cell_text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map(Cell::text).unwrap_or("")
    }

    /// SKU of a data row, empty when the row or the SKU column is missing.
    pub fn sku(&self, row: usize) -> &str {
        match self.sku_column() {
            Some(col) => self.cell_text(row, col),
            None => "",
        }
    }

    /// Write a cell as the grid editor would, growing the sheet as needed.
    /// Editing a spec cell re-derives that row's SKU. Writes to the SKU
    /// column are ignored while the sheet has specifications.
    ///
    /// # Returns
    /// * `bool` - Whether the write was applied
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        settings: &SkuSettings,
    ) -> bool {
        let Some(column) = self.columns.get(col) else {
            return false;
        };
        if column.is_sku() && !self.specifications.is_empty() {
            return false;
        }
        let rederive = column.spec_id().is_some();

        let width = self.width();
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, || vec![Cell::empty(); width]);
        }
        let target = &mut self.rows[row];
        if target.len() < width {
            target.resize(width, Cell::empty());
        }
        target[col].set_text(text);

        if rederive {
            update_row_sku(target, &self.columns, self.specifications.as_slice(), settings);
        }
        true
    }

    /// Insert rows, padding or truncating each to the column count.
    ///
    /// # Returns
    /// * `Range<usize>` - Indices of the inserted rows
    pub fn insert_rows(&mut self, rows: Vec<Row>, mode: InsertMode) -> Range<usize> {
        let width = self.width();
        let rows = rows.into_iter().map(|mut r| {
            r.resize(width, Cell::empty());
            r
        });
        match mode {
            InsertMode::Replace => {
                self.rows = rows.collect();
                0..self.rows.len()
            }
            InsertMode::Append => {
                let start = self.rows.len();
                self.rows.extend(rows);
                start..self.rows.len()
            }
        }
    }

    /// Generate every value combination for `order` and insert the rows with
    /// their SKUs already derived.
    ///
    /// # Returns
    /// * `usize` - Rows inserted; zero when any planned specification has no
    ///   values, in which case the sheet is unchanged
    pub fn auto_populate(
        &mut self,
        order: &GenerationOrder,
        mode: InsertMode,
        settings: &SkuSettings,
    ) -> usize {
        let specs = self.specifications.as_slice();
        let plan = order.resolve(specs);
        let mut rows = generate_combinations(&plan, &self.columns);
        if rows.is_empty() {
            return 0;
        }
        for row in rows.iter_mut() {
            update_row_sku(row, &self.columns, specs, settings);
        }
        let inserted = self.insert_rows(rows, mode);
        debug!(
            "auto-populated {} rows into sheet '{}' ({:?})",
            inserted.len(),
            self.name,
            mode
        );
        inserted.len()
    }

    /// Add a specification and a column bound to it.
    pub fn add_specification(
        &mut self,
        name: &str,
        settings: &SkuSettings,
    ) -> Result<SpecId, SpecError> {
        let id = self.specifications.add_specification(name)?;
        let title = self
            .specifications
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.columns.push(Column::spec(&title, id));
        let width = self.width();
        for row in self.rows.iter_mut() {
            row.resize(width, Cell::empty());
        }
        regenerate(self, settings, &SpecChanges::structural());
        Ok(id)
    }

    /// Rename a specification and retitle its bound columns. SKUs don't
    /// depend on specification names, so no regeneration happens.
    pub fn rename_specification(&mut self, id: SpecId, name: &str) -> Result<(), SpecError> {
        let old = self
            .specifications
            .get(id)
            .map(|s| s.name.clone())
            .ok_or(SpecError::SpecificationNotFound(id))?;
        self.specifications.rename_specification(id, name)?;
        let new = self
            .specifications
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        for column in self.columns.iter_mut() {
            if column.spec_id() == Some(id) && column.title == old {
                column.title = new.clone();
            }
        }
        Ok(())
    }

    /// Remove a specification together with its bound columns and their cells.
    pub fn remove_specification(
        &mut self,
        id: SpecId,
        settings: &SkuSettings,
    ) -> Result<Specification, SpecError> {
        let removed = self.specifications.remove_specification(id)?;
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| c.spec_id() != Some(id))
            .collect();
        self.columns.retain(|c| c.spec_id() != Some(id));
        for row in self.rows.iter_mut() {
            let mut index = 0;
            row.retain(|_| {
                let kept = keep.get(index).copied().unwrap_or(true);
                index += 1;
                kept
            });
        }
        regenerate(self, settings, &SpecChanges::structural());
        Ok(removed)
    }

    pub fn reorder_specification(
        &mut self,
        id: SpecId,
        target_order: usize,
        settings: &SkuSettings,
    ) -> Result<(), SpecError> {
        self.specifications.reorder_specification(id, target_order)?;
        regenerate(self, settings, &SpecChanges::structural());
        Ok(())
    }

    pub fn add_value(
        &mut self,
        spec_id: SpecId,
        display_value: &str,
        sku_fragment: &str,
        settings: &SkuSettings,
    ) -> Result<ValueId, SpecError> {
        let id = self
            .specifications
            .add_value(spec_id, display_value, sku_fragment)?;
        regenerate(self, settings, &SpecChanges::structural());
        Ok(id)
    }

    /// Edit a value's label and/or fragment. Renamed labels are carried into
    /// the grid before SKUs are re-derived.
    ///
    /// # Returns
    /// * `SpecChanges` - What the edit changed, as seen by the regenerator
    pub fn update_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
        update: ValueUpdate,
        settings: &SkuSettings,
    ) -> Result<SpecChanges, SpecError> {
        let before = self.specifications.snapshot();
        self.specifications.update_value(spec_id, value_id, update)?;
        let changes = detect_changes(&before, self.specifications.as_slice());
        regenerate(self, settings, &changes);
        Ok(changes)
    }

    pub fn remove_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
        settings: &SkuSettings,
    ) -> Result<SpecValue, SpecError> {
        let removed = self.specifications.remove_value(spec_id, value_id)?;
        regenerate(self, settings, &SpecChanges::structural());
        Ok(removed)
    }

    /// Change a value's display position; SKUs are unaffected.
    pub fn move_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
        target_index: usize,
    ) -> Result<(), SpecError> {
        self.specifications.move_value(spec_id, value_id, target_index)
    }

    /// Replace the whole specification list (e.g. an edit made against a
    /// detached copy) and reconcile the rows with whatever changed.
    pub fn replace_specifications(
        &mut self,
        next: SpecificationStore,
        settings: &SkuSettings,
    ) -> SpecChanges {
        let mut changes = detect_changes(self.specifications.as_slice(), next.as_slice());
        if structure_differs(self.specifications.as_slice(), next.as_slice()) {
            changes.structural = true;
        }
        self.specifications = next;
        regenerate(self, settings, &changes);
        changes
    }

    /// Convert a column index to spreadsheet letters (0 -> "A", 26 -> "AA").
    pub fn col_to_letter(col: usize) -> String {
        let mut col = col + 1;
        let mut result = String::new();
        while col > 0 {
            col -= 1;
            result.push(((col % 26) as u8 + b'A') as char);
            col /= 26;
        }
        result.chars().rev().collect()
    }
}

/// Whether two snapshots differ by added or removed specifications or values.
fn structure_differs(prev: &[Specification], next: &[Specification]) -> bool {
    let ids = |specs: &[Specification]| {
        let mut ids: Vec<Uuid> = specs
            .iter()
            .flat_map(|s| std::iter::once(s.id).chain(s.values.iter().map(|v| v.id)))
            .collect();
        ids.sort();
        ids
    };
    ids(prev) != ids(next)
}
