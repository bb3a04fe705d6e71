//! `confirmation` provides the pollers external callers use after triggering a handshake
//!
//! Both pollers block the calling task for at most `interval x attempts`, there is no
//! internal cancellation token.
pub mod status;
pub mod topic;
pub mod types;

pub use status::StatusPoller;
pub use topic::TopicPoller;
pub use types::{ConfirmationError, StatusQueryBuilder, TopicNotification, TopicSourceBuilder};
