//! warpgrid-hostres — resource families defined on a host.
//!
//! Loads the host's `[[resource_set]]` definitions from TOML and builds one
//! [`ResourceSet`](warpgrid_resources::ResourceSet) per family. The
//! registry routes task requests to the right family; it does not compare
//! hosts (that belongs to the placement layer).

pub mod config;
pub mod error;
pub mod registry;

pub use config::{HostResourceConfig, ResourceSetConfig};
pub use error::{HostResError, HostResResult};
pub use registry::{FamilySnapshot, HostResourceSets};
