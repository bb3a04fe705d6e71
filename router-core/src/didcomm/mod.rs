//! `didcomm` provides the plaintext message model and the inbound event types
//! delivered by the transport layer
pub mod events;
pub mod types;

pub use events::{ActionEvent, Decision};
pub use types::{DIDCommError, DIDCommMsg};
