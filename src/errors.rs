use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum LoadgenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load failed: {0}")]
    Load(#[from] DomainError),
}
