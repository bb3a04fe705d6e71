use std::time::Duration;

use rst_common::with_logging::log::debug;
use rst_common::with_tokio::tokio::time::sleep;

use crate::didcomm::DIDCommMsg;

use super::types::{ConfirmationError, TopicSourceBuilder};

pub const DEFAULT_TOPIC_WAIT: Duration = Duration::from_millis(200);
pub const DEFAULT_TOPIC_ATTEMPTS: u32 = 5000 / 200;

/// `TopicPoller` drains a push style notification source until a notification for the
/// requested topic carries a message
///
/// A notification for another topic restarts the loop right away, without sleeping and
/// without consuming an attempt. Only a matched topic with an empty payload sleeps and
/// counts as an attempt.
#[derive(Debug, Clone)]
pub struct TopicPoller {
    wait: Duration,
    attempts: u32,
}

impl Default for TopicPoller {
    fn default() -> Self {
        Self {
            wait: DEFAULT_TOPIC_WAIT,
            attempts: DEFAULT_TOPIC_ATTEMPTS,
        }
    }
}

impl TopicPoller {
    pub fn new(wait: Duration, attempts: u32) -> Self {
        Self { wait, attempts }
    }

    pub fn get_wait(&self) -> Duration {
        self.wait
    }

    pub fn get_attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn pull<TSource: TopicSourceBuilder>(
        &self,
        source: &TSource,
        topic: &str,
    ) -> Result<DIDCommMsg, ConfirmationError> {
        let mut attempt = 0;

        while attempt < self.attempts {
            let incoming = source
                .check_topics()
                .await
                .map_err(|err| ConfirmationError::TopicPullError(err.to_string()))?;

            if incoming.topic != topic {
                continue;
            }

            if let Some(message) = incoming.message.filter(|msg| !msg.is_empty()) {
                return Ok(message);
            }

            attempt += 1;
            debug!("topic [{}] still empty, attempt {}/{}", topic, attempt, self.attempts);
            sleep(self.wait).await;
        }

        Err(ConfirmationError::ConvergenceTimeoutError {
            attempts: self.attempts,
            last: format!("no message pulled for topic {}", topic),
        })
    }
}
