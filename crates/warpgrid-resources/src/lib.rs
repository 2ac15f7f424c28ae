//! warpgrid-resources — preferential named consumable resources.
//!
//! A preferential named consumable resource is a two-level resource on a
//! host. The host exposes a fixed number of interchangeable slots (network
//! interfaces, GPU groups, port ranges). Each slot is bound to a single
//! name the first time a task consumes it and stays bound until the last
//! task using it is released. A bound slot then offers a pool of
//! sub-resources shared by every task requesting that same name.
//!
//! This crate does NOT pick hosts. It answers two questions for one host:
//! how well would a task fit here ([`ResourceSet::fitness`]), and which slot
//! does the task get once the host is chosen ([`ResourceSet::consume`]).
//!
//! # Components
//!
//! - **`request`** — What a task asks for (`TaskRequest`, `ResourceName`)
//! - **`slot`** — A single bindable slot with sub-resource accounting
//! - **`set`** — A family of slots and best-fit selection
//! - **`result`** — The `AllocationResult` data contract
//! - **`error`** — Contract violations on the commit path

pub mod error;
pub mod request;
pub mod result;
pub mod set;
pub mod slot;

pub use error::{ResourceSetError, ResourceSetResult};
pub use request::{NamedResourceRequest, ResourceName, TaskRequest, TaskSpec, UNSPECIFIED_NAME};
pub use result::{AllocationResult, NO_SLOT_INDEX};
pub use set::ResourceSet;
pub use slot::{Slot, UNBOUND_USED_COUNT};
