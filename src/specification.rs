use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SpecError;

pub type SpecId = Uuid;
pub type ValueId = Uuid;

/// One selectable option of a specification: the label shown in the grid
/// and the code it contributes to the SKU.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SpecValue {
    pub id: ValueId,
    pub display_value: String,
    /// May be empty, in which case the value contributes nothing to the SKU.
    #[serde(default)]
    pub sku_fragment: String,
}

impl SpecValue {
    pub fn new(display_value: &str, sku_fragment: &str) -> Self {
        Self::with_id(Uuid::new_v4(), display_value, sku_fragment)
    }

    pub fn with_id(id: ValueId, display_value: &str, sku_fragment: &str) -> Self {
        SpecValue {
            id,
            display_value: display_value.to_string(),
            sku_fragment: sku_fragment.to_string(),
        }
    }
}

/// A named attribute category (Color, Size, ...) scoped to one sheet.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Specification {
    pub id: SpecId,
    pub name: String,
    /// Dense zero-based rank among the sheet's specifications. Drives
    /// fragment concatenation order.
    pub order: usize,
    /// Display order; SKU composition never depends on it.
    #[serde(default)]
    pub values: Vec<SpecValue>,
}

impl Specification {
    pub fn new(name: &str, order: usize) -> Self {
        Self::with_id(Uuid::new_v4(), name, order)
    }

    pub fn with_id(id: SpecId, name: &str, order: usize) -> Self {
        Specification {
            id,
            name: name.to_string(),
            order,
            values: Vec::new(),
        }
    }

    /// Append a value without validation. Meant for building fixtures and
    /// already-validated imports; interactive edits go through
    /// [`SpecificationStore::add_value`].
    pub fn with_value(mut self, display_value: &str, sku_fragment: &str) -> Self {
        self.values.push(SpecValue::new(display_value, sku_fragment));
        self
    }

    pub fn value(&self, id: ValueId) -> Option<&SpecValue> {
        self.values.iter().find(|v| v.id == id)
    }

    pub fn value_by_display(&self, display_value: &str) -> Option<&SpecValue> {
        self.values
            .iter()
            .find(|v| v.display_value == display_value)
    }

    /// Resolve a cell's text to one of this specification's values.
    /// Both sides are trimmed, then compared exactly.
    pub fn match_cell_text(&self, text: &str) -> Option<&SpecValue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.values
            .iter()
            .find(|v| v.display_value.trim() == text)
    }

    /// Whether `fragment` is already used by a value other than `except`.
    /// Exact, case-sensitive comparison.
    pub fn fragment_taken(&self, fragment: &str, except: Option<ValueId>) -> bool {
        self.values
            .iter()
            .any(|v| Some(v.id) != except && v.sku_fragment == fragment)
    }
}

/// Partial edit of a [`SpecValue`]. `None` fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueUpdate {
    pub display_value: Option<String>,
    pub sku_fragment: Option<String>,
}

impl ValueUpdate {
    pub fn display(display_value: &str) -> Self {
        ValueUpdate {
            display_value: Some(display_value.to_string()),
            sku_fragment: None,
        }
    }

    pub fn fragment(sku_fragment: &str) -> Self {
        ValueUpdate {
            display_value: None,
            sku_fragment: Some(sku_fragment.to_string()),
        }
    }

    pub fn both(display_value: &str, sku_fragment: &str) -> Self {
        ValueUpdate {
            display_value: Some(display_value.to_string()),
            sku_fragment: Some(sku_fragment.to_string()),
        }
    }
}

/// The specification list of one sheet.
///
/// Specifications are held sorted by `order`, and `order` is re-packed to
/// `0..len` after every mutation, so the slice returned by
/// [`SpecificationStore::as_slice`] is always in SKU composition order.
/// Every mutation either succeeds completely or returns an error and leaves
/// the store untouched.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(from = "Vec<Specification>", into = "Vec<Specification>")]
pub struct SpecificationStore {
    specs: Vec<Specification>,
}

impl From<Vec<Specification>> for SpecificationStore {
    fn from(specs: Vec<Specification>) -> Self {
        let mut store = SpecificationStore { specs };
        store.repack();
        store
    }
}

impl From<SpecificationStore> for Vec<Specification> {
    fn from(store: SpecificationStore) -> Self {
        store.specs
    }
}

impl SpecificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Specification] {
        &self.specs
    }

    /// Owned copy of the current list, for diffing against a later state.
    pub fn snapshot(&self) -> Vec<Specification> {
        self.specs.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Specification> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, id: SpecId) -> Option<&Specification> {
        self.specs.iter().find(|s| s.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Specification> {
        let needle = name.trim().to_lowercase();
        self.specs
            .iter()
            .find(|s| s.name.trim().to_lowercase() == needle)
    }

    /// Create a specification at the end of the order.
    pub fn add_specification(&mut self, name: &str) -> Result<SpecId, SpecError> {
        let name = self.validate_name(name, None)?;
        let spec = Specification::new(&name, self.specs.len());
        let id = spec.id;
        self.specs.push(spec);
        Ok(id)
    }

    /// Insert a fully built specification (used by migration and imports).
    /// It is placed at the end of the order regardless of its `order` field.
    pub fn insert_specification(&mut self, mut spec: Specification) -> Result<SpecId, SpecError> {
        spec.name = self.validate_name(&spec.name, None)?;
        if self.get(spec.id).is_some() {
            spec.id = Uuid::new_v4();
        }
        spec.order = self.specs.len();
        let id = spec.id;
        self.specs.push(spec);
        Ok(id)
    }

    pub fn rename_specification(&mut self, id: SpecId, name: &str) -> Result<(), SpecError> {
        let name = self.validate_name(name, Some(id))?;
        let spec = self.spec_mut(id)?;
        spec.name = name;
        Ok(())
    }

    /// Delete a specification and close the gap it leaves in `order`.
    pub fn remove_specification(&mut self, id: SpecId) -> Result<Specification, SpecError> {
        let index = self.position(id)?;
        let removed = self.specs.remove(index);
        self.repack();
        Ok(removed)
    }

    /// Move a specification to `target_order`, shifting its siblings.
    /// Targets past the end are clamped to the last position.
    pub fn reorder_specification(
        &mut self,
        id: SpecId,
        target_order: usize,
    ) -> Result<(), SpecError> {
        let index = self.position(id)?;
        let target = target_order.min(self.specs.len() - 1);
        let spec = self.specs.remove(index);
        self.specs.insert(target, spec);
        for (order, spec) in self.specs.iter_mut().enumerate() {
            spec.order = order;
        }
        Ok(())
    }

    pub fn add_value(
        &mut self,
        spec_id: SpecId,
        display_value: &str,
        sku_fragment: &str,
    ) -> Result<ValueId, SpecError> {
        let spec = self.spec_mut(spec_id)?;
        let display_value = display_value.trim();
        if display_value.is_empty() {
            return Err(SpecError::EmptyDisplayValue);
        }
        if spec.fragment_taken(sku_fragment, None) {
            return Err(SpecError::DuplicateFragment {
                fragment: sku_fragment.to_string(),
                specification: spec.name.clone(),
            });
        }
        let value = SpecValue::new(display_value, sku_fragment);
        let id = value.id;
        spec.values.push(value);
        Ok(id)
    }

    pub fn update_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
        update: ValueUpdate,
    ) -> Result<(), SpecError> {
        let spec = self.spec_mut(spec_id)?;
        if spec.value(value_id).is_none() {
            return Err(SpecError::ValueNotFound(value_id));
        }

        let display_value = match update.display_value {
            Some(display) => {
                let display = display.trim().to_string();
                if display.is_empty() {
                    return Err(SpecError::EmptyDisplayValue);
                }
                Some(display)
            }
            None => None,
        };
        if let Some(fragment) = update.sku_fragment.as_deref() {
            if spec.fragment_taken(fragment, Some(value_id)) {
                return Err(SpecError::DuplicateFragment {
                    fragment: fragment.to_string(),
                    specification: spec.name.clone(),
                });
            }
        }

        let Some(value) = spec.values.iter_mut().find(|v| v.id == value_id) else {
            return Err(SpecError::ValueNotFound(value_id));
        };
        if let Some(display) = display_value {
            value.display_value = display;
        }
        if let Some(fragment) = update.sku_fragment {
            value.sku_fragment = fragment;
        }
        Ok(())
    }

    pub fn remove_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
    ) -> Result<SpecValue, SpecError> {
        let spec = self.spec_mut(spec_id)?;
        let index = spec
            .values
            .iter()
            .position(|v| v.id == value_id)
            .ok_or(SpecError::ValueNotFound(value_id))?;
        Ok(spec.values.remove(index))
    }

    /// Change a value's display position. Has no effect on SKUs.
    pub fn move_value(
        &mut self,
        spec_id: SpecId,
        value_id: ValueId,
        target_index: usize,
    ) -> Result<(), SpecError> {
        let spec = self.spec_mut(spec_id)?;
        let index = spec
            .values
            .iter()
            .position(|v| v.id == value_id)
            .ok_or(SpecError::ValueNotFound(value_id))?;
        let value = spec.values.remove(index);
        let target = target_index.min(spec.values.len());
        spec.values.insert(target, value);
        Ok(())
    }

    fn position(&self, id: SpecId) -> Result<usize, SpecError> {
        self.specs
            .iter()
            .position(|s| s.id == id)
            .ok_or(SpecError::SpecificationNotFound(id))
    }

    fn spec_mut(&mut self, id: SpecId) -> Result<&mut Specification, SpecError> {
        self.specs
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SpecError::SpecificationNotFound(id))
    }

    /// Trimmed, non-empty and unique (case-insensitive) among the other
    /// specifications.
    fn validate_name(&self, name: &str, except: Option<SpecId>) -> Result<String, SpecError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        let lowered = name.to_lowercase();
        let clash = self
            .specs
            .iter()
            .any(|s| Some(s.id) != except && s.name.trim().to_lowercase() == lowered);
        if clash {
            return Err(SpecError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    // Stable sort keeps insertion order among equal ranks in imported data.
    fn repack(&mut self) {
        self.specs.sort_by_key(|s| s.order);
        for (order, spec) in self.specs.iter_mut().enumerate() {
            spec.order = order;
        }
    }
}
