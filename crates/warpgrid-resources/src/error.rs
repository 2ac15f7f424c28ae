//! Allocation error types.

use thiserror::Error;

use crate::request::ResourceName;

/// Contract violations raised on the commit path.
///
/// Every variant means the caller committed without a positive score from
/// [`ResourceSet::fitness`](crate::ResourceSet::fitness) for the same
/// request. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceSetError {
    #[error("{attribute}[{slot}] is bound to {bound}, can't consume for {requested}")]
    IncompatibleBinding {
        attribute: String,
        slot: usize,
        bound: ResourceName,
        requested: ResourceName,
    },

    #[error("{attribute}[{slot}] has {used} of {limit} sub-resources in use, can't consume {requested} more")]
    CapacityExceeded {
        attribute: String,
        slot: usize,
        used: f64,
        requested: f64,
        limit: u32,
    },

    #[error("invalid sub-resource quantity {requested} for {attribute} from task {consumer}")]
    InvalidQuantity {
        attribute: String,
        consumer: String,
        requested: f64,
    },

    #[error("no available slot in {attribute} for task {consumer}")]
    NoAvailableSlot { attribute: String, consumer: String },
}

pub type ResourceSetResult<T> = Result<T, ResourceSetError>;
