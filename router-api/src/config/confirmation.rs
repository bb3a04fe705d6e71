use std::time::Duration;

use rst_common::standard::serde::{self, Deserialize};

use hubrouter_core::confirmation::status::{DEFAULT_STATUS_ATTEMPTS, DEFAULT_STATUS_INTERVAL};
use hubrouter_core::confirmation::topic::{DEFAULT_TOPIC_ATTEMPTS, DEFAULT_TOPIC_WAIT};
use hubrouter_core::confirmation::{StatusPoller, TopicPoller};

use crate::common::types::{CommonError, ToValidate};

fn default_status_interval_ms() -> u64 {
    DEFAULT_STATUS_INTERVAL.as_millis() as u64
}

fn default_status_attempts() -> u32 {
    DEFAULT_STATUS_ATTEMPTS
}

fn default_topic_wait_ms() -> u64 {
    DEFAULT_TOPIC_WAIT.as_millis() as u64
}

fn default_topic_attempts() -> u32 {
    DEFAULT_TOPIC_ATTEMPTS
}

/// `Confirmation` tunes both polling loops used by clients to confirm a connection
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Confirmation {
    #[serde(default = "default_status_interval_ms")]
    pub(super) status_interval_ms: u64,

    #[serde(default = "default_status_attempts")]
    pub(super) status_attempts: u32,

    #[serde(default = "default_topic_wait_ms")]
    pub(super) topic_wait_ms: u64,

    #[serde(default = "default_topic_attempts")]
    pub(super) topic_attempts: u32,
}

impl Confirmation {
    pub fn status_poller(&self) -> StatusPoller {
        StatusPoller::new(
            Duration::from_millis(self.status_interval_ms),
            self.status_attempts,
        )
    }

    pub fn topic_poller(&self) -> TopicPoller {
        TopicPoller::new(Duration::from_millis(self.topic_wait_ms), self.topic_attempts)
    }
}

impl Default for Confirmation {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval_ms(),
            status_attempts: default_status_attempts(),
            topic_wait_ms: default_topic_wait_ms(),
            topic_attempts: default_topic_attempts(),
        }
    }
}

impl ToValidate for Confirmation {
    fn validate(&self) -> Result<(), CommonError> {
        if self.status_attempts == 0 {
            return Err(CommonError::ValidationError(
                "config: confirmation:status_attempts must be greater than zero".to_string(),
            ));
        }

        if self.topic_attempts == 0 {
            return Err(CommonError::ValidationError(
                "config: confirmation:topic_attempts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
