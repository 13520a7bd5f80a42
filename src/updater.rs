use crate::cell::{Cell, Row};
use crate::column::{Column, sku_column_index};
use crate::composer::compose_sku;
use crate::settings::SkuSettings;
use crate::specification::{SpecId, Specification};

/// Resolve the fragment each specification contributes to `row`.
///
/// Walks the `spec` columns, reads the bound cell and matches its trimmed
/// text against the specification's display values. Cells that are empty,
/// missing or don't name a known value resolve to an empty fragment.
/// A specification bound to several columns is read from the first one.
/// The result is sorted by specification `order`.
pub fn resolve_fragments<'a>(
    row: &[Cell],
    columns: &[Column],
    specs: &'a [Specification],
) -> Vec<&'a str> {
    let mut seen: Vec<SpecId> = Vec::new();
    let mut resolved: Vec<(usize, &'a str)> = Vec::new();

    for (index, column) in columns.iter().enumerate() {
        let Some(spec_id) = column.spec_id() else {
            continue;
        };
        if seen.contains(&spec_id) {
            continue;
        }
        let Some(spec) = specs.iter().find(|s| s.id == spec_id) else {
            continue;
        };
        seen.push(spec_id);

        let fragment = row
            .get(index)
            .and_then(|cell| spec.match_cell_text(cell.text()))
            .map(|value| value.sku_fragment.as_str())
            .unwrap_or("");
        resolved.push((spec.order, fragment));
    }

    resolved.sort_by_key(|(order, _)| *order);
    resolved.into_iter().map(|(_, fragment)| fragment).collect()
}

/// The SKU `row` should carry, without touching the row.
pub fn compute_row_sku(
    row: &[Cell],
    columns: &[Column],
    specs: &[Specification],
    settings: &SkuSettings,
) -> String {
    compose_sku(&resolve_fragments(row, columns, specs), settings)
}

/// Recompute and write the SKU cell of one row.
///
/// Only the SKU cell is modified; its raw and formatted strings are both
/// replaced. A row shorter than the layout is padded with empty cells up to
/// the SKU column. Layouts without a SKU column are left alone.
///
/// # Returns
/// * `bool` - Whether the SKU cell's content changed
pub fn update_row_sku(
    row: &mut Row,
    columns: &[Column],
    specs: &[Specification],
    settings: &SkuSettings,
) -> bool {
    let Some(sku_index) = sku_column_index(columns) else {
        return false;
    };

    let sku = compute_row_sku(row, columns, specs, settings);
    if row.len() <= sku_index {
        row.resize(sku_index + 1, Cell::empty());
    }

    let cell = &mut row[sku_index];
    let unchanged = cell.value == sku && cell.display.as_ref().is_none_or(|d| *d == sku);
    if unchanged {
        return false;
    }
    cell.set_text(&sku);
    true
}
