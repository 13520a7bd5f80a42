use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::specification::{SpecId, SpecValue, Specification, ValueId};

/// A value whose label changed between two snapshots.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DisplayValueChange {
    pub spec_id: SpecId,
    /// Name of the owning specification, taken from the newer snapshot.
    pub spec_name: String,
    pub old_display_value: String,
    pub new_display_value: String,
}

/// What a specification edit means for the sheet's rows.
///
/// `fragment_changed` and `display_value_changes` come from diffing two
/// snapshots. `order_changed` is also diff-derived. `structural` is never
/// produced by the diff: the operation that adds, removes or reorders sets it
/// itself.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct SpecChanges {
    pub fragment_changed: bool,
    pub order_changed: bool,
    pub structural: bool,
    pub display_value_changes: Vec<DisplayValueChange>,
}

impl SpecChanges {
    /// Changes from an add, remove or reorder: every SKU is re-derived.
    pub fn structural() -> Self {
        SpecChanges {
            structural: true,
            ..SpecChanges::default()
        }
    }

    pub fn needs_sku_regeneration(&self) -> bool {
        self.fragment_changed || self.order_changed || self.structural
    }

    pub fn is_empty(&self) -> bool {
        !self.needs_sku_regeneration() && self.display_value_changes.is_empty()
    }
}

/// Compare two snapshots of one sheet's specifications.
///
/// Entities are matched by id, never by position. Values or specifications
/// present in only one snapshot produce nothing here; the operation that
/// added or removed them is responsible for flagging a structural change.
///
/// # Arguments
/// * `prev` - Specifications before the edit
/// * `next` - Specifications after the edit
///
/// # Returns
/// * `SpecChanges` - Fragment/order flags plus one record per renamed value
pub fn detect_changes(prev: &[Specification], next: &[Specification]) -> SpecChanges {
    let mut changes = SpecChanges::default();
    if prev.is_empty() || next.is_empty() {
        return changes;
    }

    let prev_specs: HashMap<SpecId, &Specification> = prev.iter().map(|s| (s.id, s)).collect();
    let prev_values: HashMap<ValueId, &SpecValue> = prev
        .iter()
        .flat_map(|s| s.values.iter())
        .map(|v| (v.id, v))
        .collect();

    for spec in next {
        if let Some(before) = prev_specs.get(&spec.id) {
            if before.order != spec.order {
                changes.order_changed = true;
            }
        }

        for value in &spec.values {
            let Some(before) = prev_values.get(&value.id) else {
                continue;
            };
            if before.sku_fragment != value.sku_fragment {
                changes.fragment_changed = true;
            }
            if before.display_value != value.display_value {
                changes.display_value_changes.push(DisplayValueChange {
                    spec_id: spec.id,
                    spec_name: spec.name.clone(),
                    old_display_value: before.display_value.clone(),
                    new_display_value: value.display_value.clone(),
                });
            }
        }
    }

    changes
}
