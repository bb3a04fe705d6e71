use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::uuid::Uuid;
use rst_common::with_logging::log::warn;
use rst_common::with_tokio::tokio::sync::{Mutex, Notify};
use rst_common::with_tokio::tokio::time::timeout;

use hubrouter_core::confirmation::{ConfirmationError, TopicNotification, TopicSourceBuilder};
use hubrouter_core::didcomm::DIDCommMsg;

pub const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(100);
pub const DEFAULT_TOPIC_CAPACITY: usize = 1024;

/// `TopicQueue` is a push style notification source backed by an in-memory queue
///
/// `check_topics` long-polls: when the queue is empty it waits at most `idle_wait` for a
/// new notification, then returns a notification without topic so callers keep looping.
/// A [`hubrouter_core::confirmation::TopicPoller`] waiting for a topic that is never
/// published does not consume its attempts on those, bound it with a timeout.
///
/// The queue keeps at most `capacity` notifications, publishing on a full queue drops
/// the oldest one
#[derive(Clone)]
pub struct TopicQueue {
    queue: Arc<Mutex<VecDeque<TopicNotification>>>,
    notify: Arc<Notify>,
    idle_wait: Duration,
    capacity: usize,
}

impl Default for TopicQueue {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_WAIT)
    }
}

impl TopicQueue {
    pub fn new(idle_wait: Duration) -> Self {
        Self::with_capacity(idle_wait, DEFAULT_TOPIC_CAPACITY)
    }

    pub fn with_capacity(idle_wait: Duration, capacity: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            idle_wait,
            capacity: capacity.max(1),
        }
    }

    pub async fn publish(&self, topic: &str, message: Option<DIDCommMsg>) {
        let notification = TopicNotification {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            message,
        };

        let mut queue = self.queue.lock().await;
        while queue.len() >= self.capacity {
            if let Some(dropped) = queue.pop_front() {
                warn!(
                    "topic notification dropped: id=[{}] topic=[{}]",
                    dropped.id, dropped.topic
                );
            }
        }

        queue.push_back(notification);
        drop(queue);

        self.notify.notify_one();
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }

    async fn pop(&self) -> Option<TopicNotification> {
        self.queue.lock().await.pop_front()
    }
}

#[async_trait]
impl TopicSourceBuilder for TopicQueue {
    async fn check_topics(&self) -> Result<TopicNotification, ConfirmationError> {
        if let Some(notification) = self.pop().await {
            return Ok(notification);
        }

        let _ = timeout(self.idle_wait, self.notify.notified()).await;
        Ok(self.pop().await.unwrap_or_default())
    }
}
