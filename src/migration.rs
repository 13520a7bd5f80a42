//! One-time conversion of the legacy workbook-wide specification set into
//! per-sheet specifications.

use log::{debug, info};

use crate::column::Column;
use crate::specification::Specification;
use crate::spreadsheet::Sheet;

/// Copy `global` into every sheet that has no specifications of its own.
///
/// Sheets that already carry local specifications are left alone. Ids are
/// preserved, so `spec` columns that referenced the shared set keep resolving
/// after the copy. Sheets with no `spec` column at all get one appended per
/// specification.
///
/// # Returns
/// * `usize` - Number of sheets migrated
pub fn migrate_global_specifications(global: &[Specification], sheets: &mut [Sheet]) -> usize {
    if global.is_empty() {
        return 0;
    }

    let mut ordered: Vec<&Specification> = global.iter().collect();
    ordered.sort_by_key(|s| s.order);

    let mut migrated = 0;
    for sheet in sheets.iter_mut() {
        if !sheet.specifications.is_empty() {
            debug!("sheet '{}' already has local specifications", sheet.name);
            continue;
        }

        for spec in &ordered {
            if let Err(e) = sheet.specifications.insert_specification((*spec).clone()) {
                debug!("skipping '{}' on sheet '{}': {}", spec.name, sheet.name, e);
            }
        }

        let has_spec_columns = sheet.columns.iter().any(|c| c.spec_id().is_some());
        let width_before = sheet.columns.len();
        if !has_spec_columns {
            for spec in sheet.specifications.iter() {
                sheet.columns.push(Column::spec(&spec.name, spec.id));
            }
        }
        if sheet.columns.len() != width_before {
            let width = sheet.columns.len();
            for row in sheet.rows.iter_mut() {
                row.resize(width, Default::default());
            }
        }
        migrated += 1;
    }

    info!("migrated shared specifications into {} sheets", migrated);
    migrated
}
