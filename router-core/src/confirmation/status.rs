use std::time::Duration;

use rst_common::with_logging::log::warn;
use rst_common::with_tokio::tokio::time::sleep;

use crate::router::types::{ConnectionID, ConnectionState};

use super::types::{ConfirmationError, StatusQueryBuilder};

pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_STATUS_ATTEMPTS: u32 = 30;

/// `StatusPoller` waits until a connection reaches an expected state by querying its
/// status at a constant interval
#[derive(Debug, Clone)]
pub struct StatusPoller {
    interval: Duration,
    attempts: u32,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_STATUS_INTERVAL,
            attempts: DEFAULT_STATUS_ATTEMPTS,
        }
    }
}

impl StatusPoller {
    pub fn new(interval: Duration, attempts: u32) -> Self {
        Self { interval, attempts }
    }

    pub fn get_interval(&self) -> Duration {
        self.interval
    }

    pub fn get_attempts(&self) -> u32 {
        self.attempts
    }

    /// `confirm_state` takes the expected state as its wire string, an unknown state fails
    /// before any query is made
    pub async fn confirm_state<TQuery: StatusQueryBuilder>(
        &self,
        query: &TQuery,
        id: &ConnectionID,
        expected: &str,
    ) -> Result<u32, ConfirmationError> {
        let expected = ConnectionState::try_from(expected)
            .map_err(|_| ConfirmationError::UnknownStateError(expected.to_string()))?;

        self.confirm(query, id, expected).await
    }

    /// `confirm` logs each pending attempt at `warn` level
    pub async fn confirm<TQuery: StatusQueryBuilder>(
        &self,
        query: &TQuery,
        id: &ConnectionID,
        expected: ConnectionState,
    ) -> Result<u32, ConfirmationError> {
        self.confirm_notify(query, id, expected, |err, wait| {
            warn!(
                "validate connection : sleeping for {:?} before trying again : {}",
                wait, err
            )
        })
        .await
    }

    /// `confirm_notify` returns the attempt number at which the expected state was
    /// observed. Query failures count as pending attempts. The `notify` callback is
    /// called before each sleep, no sleep happens after the last attempt.
    pub async fn confirm_notify<TQuery, TNotify>(
        &self,
        query: &TQuery,
        id: &ConnectionID,
        expected: ConnectionState,
        mut notify: TNotify,
    ) -> Result<u32, ConfirmationError>
    where
        TQuery: StatusQueryBuilder,
        TNotify: FnMut(&ConfirmationError, Duration),
    {
        let mut last = String::new();

        for attempt in 1..=self.attempts {
            let pending = match query.query_connection(id).await {
                Ok(actual) if actual == expected => return Ok(attempt),
                Ok(actual) => ConfirmationError::StateMismatch { expected, actual },
                Err(err) => err,
            };

            last = pending.to_string();
            if attempt < self.attempts {
                notify(&pending, self.interval);
                sleep(self.interval).await;
            }
        }

        Err(ConfirmationError::ConvergenceTimeoutError {
            attempts: self.attempts,
            last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use rst_common::standard::async_trait::async_trait;
    use rst_common::with_tokio::tokio;

    mock!(
        FakeQuery{}

        #[async_trait]
        impl StatusQueryBuilder for FakeQuery {
            async fn query_connection(&self, id: &ConnectionID) -> Result<ConnectionState, ConfirmationError>;
        }
    );

    fn converging_query(converge_at: u32) -> (MockFakeQuery, Arc<AtomicU32>) {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let mut query = MockFakeQuery::new();
        query.expect_query_connection().returning(move |_| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt >= converge_at {
                Ok(ConnectionState::Completed)
            } else {
                Ok(ConnectionState::Requested)
            }
        });

        (query, counter)
    }

    #[tokio::test]
    async fn test_confirm_at_attempt() {
        let (query, counter) = converging_query(4);
        let poller = StatusPoller::new(Duration::from_millis(1), DEFAULT_STATUS_ATTEMPTS);

        let mut pending = 0;
        let confirmed = poller
            .confirm_notify(&query, &ConnectionID::generate(), ConnectionState::Completed, |err, _| {
                assert!(err.to_string().contains("expected=completed actual=requested"));
                pending += 1;
            })
            .await;

        assert_eq!(confirmed, Ok(4));
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert_eq!(pending, 3);
    }

    #[tokio::test]
    async fn test_confirm_first_attempt() {
        let (query, counter) = converging_query(1);
        let poller = StatusPoller::new(Duration::from_millis(1), DEFAULT_STATUS_ATTEMPTS);

        let confirmed = poller
            .confirm(&query, &ConnectionID::generate(), ConnectionState::Completed)
            .await;
        assert_eq!(confirmed, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_confirm_at_last_attempt() {
        let (query, _) = converging_query(DEFAULT_STATUS_ATTEMPTS);
        let poller = StatusPoller::new(Duration::from_millis(1), DEFAULT_STATUS_ATTEMPTS);

        let confirmed = poller
            .confirm(&query, &ConnectionID::generate(), ConnectionState::Completed)
            .await;
        assert_eq!(confirmed, Ok(DEFAULT_STATUS_ATTEMPTS));
    }

    #[tokio::test]
    async fn test_confirm_timeout_after_exact_attempts() {
        let mut query = MockFakeQuery::new();
        query
            .expect_query_connection()
            .times(DEFAULT_STATUS_ATTEMPTS as usize)
            .returning(|_| Ok(ConnectionState::Responded));

        let poller = StatusPoller::new(Duration::from_millis(1), DEFAULT_STATUS_ATTEMPTS);

        let mut pending = 0;
        let confirmed = poller
            .confirm_notify(&query, &ConnectionID::generate(), ConnectionState::Completed, |_, wait| {
                assert_eq!(wait, Duration::from_millis(1));
                pending += 1;
            })
            .await;

        assert_eq!(
            confirmed.unwrap_err(),
            ConfirmationError::ConvergenceTimeoutError {
                attempts: DEFAULT_STATUS_ATTEMPTS,
                last: "expected=completed actual=responded".to_string(),
            }
        );
        assert_eq!(pending, DEFAULT_STATUS_ATTEMPTS - 1);
    }

    #[tokio::test]
    async fn test_confirm_query_errors_are_pending() {
        let counter = Arc::new(AtomicU32::new(0));
        let calls = counter.clone();

        let mut query = MockFakeQuery::new();
        query.expect_query_connection().returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ConfirmationError::QueryError("connection not found".to_string()))
            } else {
                Ok(ConnectionState::Completed)
            }
        });

        let poller = StatusPoller::new(Duration::from_millis(1), 3);
        let confirmed = poller
            .confirm(&query, &ConnectionID::generate(), ConnectionState::Completed)
            .await;
        assert_eq!(confirmed, Ok(2));
    }

    #[test]
    fn test_default_budget() {
        let poller = StatusPoller::default();
        assert_eq!(poller.interval, Duration::from_secs(1));
        assert_eq!(poller.attempts, 30);
    }

    #[tokio::test]
    async fn test_confirm_state_string() {
        let (query, counter) = converging_query(2);
        let poller = StatusPoller::new(Duration::from_millis(1), DEFAULT_STATUS_ATTEMPTS);

        let confirmed = poller
            .confirm_state(&query, &ConnectionID::generate(), "completed")
            .await;

        assert_eq!(confirmed, Ok(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_confirm_unknown_state_string() {
        let mut query = MockFakeQuery::new();
        query.expect_query_connection().times(0);

        let poller = StatusPoller::default();
        let confirmed = poller
            .confirm_state(&query, &ConnectionID::generate(), "abandoned")
            .await;

        assert_eq!(
            confirmed,
            Err(ConfirmationError::UnknownStateError("abandoned".to_string()))
        );
    }
}
