//! Host resource error types.

use thiserror::Error;
use warpgrid_resources::ResourceSetError;

pub type HostResResult<T> = Result<T, HostResError>;

#[derive(Debug, Error)]
pub enum HostResError {
    #[error("unknown resource family: {0}")]
    UnknownFamily(String),

    #[error("invalid resource config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse resource config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read resource config: {0}")]
    Io(#[from] std::io::Error),

    #[error("allocation error: {0}")]
    Allocation(#[from] ResourceSetError),
}
