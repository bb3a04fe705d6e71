use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

use crate::didcomm::DIDCommMsg;
use crate::router::types::{ConnectionID, ConnectionState};

/// `ConfirmationError` covers the failures observed while waiting for convergence
#[derive(Debug, PartialEq, Error, Clone)]
pub enum ConfirmationError {
    #[error("exhausted all [{attempts}] attempts, last error: {last}")]
    ConvergenceTimeoutError { attempts: u32, last: String },

    #[error("expected={expected} actual={actual}")]
    StateMismatch {
        expected: ConnectionState,
        actual: ConnectionState,
    },

    #[error("unknown connection state: {0}")]
    UnknownStateError(String),

    #[error("query error: {0}")]
    QueryError(String),

    #[error("failed pull topics, cause : {0}")]
    TopicPullError(String),
}

/// `TopicNotification` is a single notification pulled from a push style source
///
/// A notification whose `message` is missing or empty means the topic exists but its
/// payload has not been delivered yet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(crate = "self::serde")]
pub struct TopicNotification {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub topic: String,

    #[serde(default)]
    pub message: Option<DIDCommMsg>,
}

/// `StatusQueryBuilder` returns the current state of a connection
#[async_trait]
pub trait StatusQueryBuilder: Send + Sync {
    async fn query_connection(&self, id: &ConnectionID)
        -> Result<ConnectionState, ConfirmationError>;
}

/// `TopicSourceBuilder` returns the next notification from a push style source
#[async_trait]
pub trait TopicSourceBuilder: Send + Sync {
    async fn check_topics(&self) -> Result<TopicNotification, ConfirmationError>;
}
