use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, PartialEq, Error)]
pub enum CommonError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("wiring error: {0}")]
    WiringError(String),

    #[error("unroutable message: {0}")]
    UnroutableMessage(String),

    #[error("transport error: {0}")]
    TransportError(String),
}

pub trait ToValidate {
    fn validate(&self) -> Result<(), CommonError>;
}
