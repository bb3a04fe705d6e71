//! # Router Module
//!
//! The `router` module is the event dispatching engine of the hub router.
//!
//! ## Module Structure
//!
//! - [`types`] - Errors, dispatch tables, wire formats and collaborator traits
//! - [`identity`] - Peer identity minted per accepted request
//! - [`connection`] - Connection entity binding a minted identity with a remote document
//! - [`invitation`] - Out-of-band invitation and its issuer
//! - [`establish`] - Provisioner of the `establish-connection` protocol
//! - [`action`] - Action event dispatcher
//! - [`message`] - Message event dispatcher
//!
//! ## Event Flow
//!
//! ```text
//! transport ── action channel (depth 1) ──> ActionDispatcher ── continue / stop
//! transport ── message channel (depth 1) ─> MessageDispatcher
//!                                            ├── Provisioner
//!                                            │    ├── IdentityRegistryBuilder::create
//!                                            │    └── ConnectionManagerBuilder::create_connection
//!                                            └── MessengerBuilder::reply_to
//! ```
//!
//! Each dispatcher fully processes one event before reading the next one. The two loops are
//! independent of each other, there is no lock shared between them.
pub mod action;
pub mod connection;
pub mod establish;
pub mod identity;
pub mod invitation;
pub mod message;
pub mod types;

pub use action::ActionDispatcher;
pub use connection::Connection;
pub use establish::Provisioner;
pub use identity::PeerIdentity;
pub use invitation::{Invitation, InvitationIssuer};
pub use message::MessageDispatcher;
