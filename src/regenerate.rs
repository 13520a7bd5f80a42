use log::{debug, warn};
use std::collections::HashMap;

use crate::cell::Row;
use crate::changes::{DisplayValueChange, SpecChanges};
use crate::column::{Column, sku_column_index};
use crate::settings::SkuSettings;
use crate::specification::SpecId;
use crate::spreadsheet::Sheet;
use crate::updater::update_row_sku;

/// Counts from one bulk pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegenerationReport {
    pub rows_scanned: usize,
    /// Spec cells whose text was replaced by a renamed display value.
    pub renamed_cells: usize,
    /// Rows whose SKU cell content changed.
    pub updated_skus: usize,
}

/// Apply `changes` to every data row of `sheet`, using the sheet's own
/// specifications.
///
/// Renamed display values are written into the spec cells first. Only then,
/// and only when the changes affect SKUs (fragment edit, order change or a
/// structural operation), is every row's SKU re-derived, so SKU matching sees
/// the already-renamed text. All work happens on a copy of the rows which
/// replaces `sheet.rows` in one assignment at the end.
pub fn regenerate(
    sheet: &mut Sheet,
    settings: &SkuSettings,
    changes: &SpecChanges,
) -> RegenerationReport {
    let mut report = RegenerationReport {
        rows_scanned: sheet.rows.len(),
        ..RegenerationReport::default()
    };
    if changes.is_empty() {
        return report;
    }

    let mut rows = sheet.rows.clone();
    report.renamed_cells =
        apply_display_value_changes(&mut rows, &sheet.columns, &changes.display_value_changes);

    if changes.needs_sku_regeneration() {
        if sku_column_index(&sheet.columns).is_none() && !sheet.specifications.is_empty() {
            warn!(
                "sheet '{}' has specifications but no SKU column; SKUs not derived",
                sheet.name
            );
        }
        let specs = sheet.specifications.as_slice();
        for row in rows.iter_mut() {
            if update_row_sku(row, &sheet.columns, specs, settings) {
                report.updated_skus += 1;
            }
        }
    }

    sheet.rows = rows;
    debug!(
        "regenerated sheet '{}': {} rows, {} renamed cells, {} SKUs updated",
        sheet.name, report.rows_scanned, report.renamed_cells, report.updated_skus
    );
    report
}

/// Re-derive every SKU in the sheet, e.g. after the delimiter, prefix or
/// suffix changed.
pub fn regenerate_skus(sheet: &mut Sheet, settings: &SkuSettings) -> RegenerationReport {
    regenerate(sheet, settings, &SpecChanges::structural())
}

/// Rewrite spec cells whose text is exactly a renamed value's old label.
///
/// Each cell is matched against its original text only, so a swap
/// (Red -> Blue together with Blue -> Red) does not chain.
///
/// # Returns
/// * `usize` - Number of cells rewritten
pub fn apply_display_value_changes(
    rows: &mut [Row],
    columns: &[Column],
    changes: &[DisplayValueChange],
) -> usize {
    if changes.is_empty() {
        return 0;
    }

    let mut renames: HashMap<SpecId, HashMap<&str, &str>> = HashMap::new();
    for change in changes {
        renames
            .entry(change.spec_id)
            .or_default()
            .entry(change.old_display_value.as_str())
            .or_insert(change.new_display_value.as_str());
    }

    let bound: Vec<(usize, &HashMap<&str, &str>)> = columns
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.spec_id().and_then(|id| renames.get(&id)).map(|r| (i, r)))
        .collect();

    let mut renamed = 0;
    for row in rows.iter_mut() {
        for &(index, spec_renames) in &bound {
            let Some(cell) = row.get_mut(index) else {
                continue;
            };
            let replacement = spec_renames.get(cell.text()).map(|s| s.to_string());
            if let Some(new_text) = replacement {
                cell.set_text(&new_text);
                renamed += 1;
            }
        }
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use uuid::Uuid;

    #[test]
    fn swap_renames_do_not_chain() {
        let spec_id = Uuid::new_v4();
        let columns = vec![Column::spec("Color", spec_id)];
        let mut rows = vec![vec![Cell::create("Red")], vec![Cell::create("Blue")]];
        let changes = vec![
            DisplayValueChange {
                spec_id,
                spec_name: "Color".to_string(),
                old_display_value: "Red".to_string(),
                new_display_value: "Blue".to_string(),
            },
            DisplayValueChange {
                spec_id,
                spec_name: "Color".to_string(),
                old_display_value: "Blue".to_string(),
                new_display_value: "Red".to_string(),
            },
        ];

        let renamed = apply_display_value_changes(&mut rows, &columns, &changes);

        assert_eq!(renamed, 2);
        assert_eq!(rows[0][0].value, "Blue");
        assert_eq!(rows[1][0].value, "Red");
    }

    #[test]
    fn renames_only_touch_columns_of_the_renamed_specification() {
        let color = Uuid::new_v4();
        let trim = Uuid::new_v4();
        let columns = vec![
            Column::spec("Color", color),
            Column::spec("Trim", trim),
            Column::free("Notes"),
        ];
        let mut rows = vec![vec![
            Cell::create("Red"),
            Cell::create("Red"),
            Cell::create("Red"),
        ]];
        let changes = vec![DisplayValueChange {
            spec_id: color,
            spec_name: "Color".to_string(),
            old_display_value: "Red".to_string(),
            new_display_value: "Crimson".to_string(),
        }];

        apply_display_value_changes(&mut rows, &columns, &changes);

        assert_eq!(rows[0][0].value, "Crimson");
        assert_eq!(rows[0][1].value, "Red");
        assert_eq!(rows[0][2].value, "Red");
    }

    #[test]
    fn rename_match_is_exact() {
        let color = Uuid::new_v4();
        let columns = vec![Column::spec("Color", color)];
        let mut rows = vec![vec![Cell::create(" Red")], vec![Cell::create("red")]];
        let changes = vec![DisplayValueChange {
            spec_id: color,
            spec_name: "Color".to_string(),
            old_display_value: "Red".to_string(),
            new_display_value: "Crimson".to_string(),
        }];

        assert_eq!(apply_display_value_changes(&mut rows, &columns, &changes), 0);
    }
}
