use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, Error)]
pub enum RouterdError {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("server error: {0}")]
    ServerError(String),
}
