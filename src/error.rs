use thiserror::Error;

use crate::specification::{SpecId, ValueId};

/// Rejections raised by the specification store. Every variant leaves the
/// store exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("specification name cannot be empty")]
    EmptyName,
    #[error("a specification named '{0}' already exists in this sheet")]
    DuplicateName(String),
    #[error("specification {0} not found")]
    SpecificationNotFound(SpecId),
    #[error("value {0} not found")]
    ValueNotFound(ValueId),
    #[error("display value cannot be empty")]
    EmptyDisplayValue,
    #[error("SKU fragment '{fragment}' is already used by another value of '{specification}'")]
    DuplicateFragment {
        fragment: String,
        specification: String,
    },
}
