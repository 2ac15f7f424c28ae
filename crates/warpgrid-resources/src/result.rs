//! The allocation result handed back to the scheduler.

use serde::{Deserialize, Serialize};

use crate::request::ResourceName;

/// `index` value of a result that picked no slot.
pub const NO_SLOT_INDEX: i64 = -1;

/// Outcome of a score-only or committing selection.
///
/// Serialized with the field names used by scheduling-decision records
/// (`index`, `attrName`, `resName`, `fitness`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Index of the chosen slot, or [`NO_SLOT_INDEX`].
    pub index: i64,
    pub attr_name: Option<String>,
    pub res_name: Option<ResourceName>,
    /// Fitness in `[0.0, 1.0]`; `0.0` means nothing fits.
    pub fitness: f64,
}

impl AllocationResult {
    pub(crate) fn chosen(index: usize, attr_name: &str, res_name: Option<ResourceName>, fitness: f64) -> Self {
        Self {
            index: index as i64,
            attr_name: Some(attr_name.to_string()),
            res_name,
            fitness,
        }
    }

    pub(crate) fn none() -> Self {
        Self {
            index: NO_SLOT_INDEX,
            attr_name: None,
            res_name: None,
            fitness: 0.0,
        }
    }

    /// The chosen slot index, if any slot fit.
    pub fn slot_index(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }

    pub fn is_fit(&self) -> bool {
        self.fitness > 0.0
    }
}
