use thiserror::Error;

use crate::config::ConfigError;
use crate::providers::ovh::OvhClientError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] OvhClientError),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to publish output: {0}")]
    Output(#[from] std::io::Error),
}
