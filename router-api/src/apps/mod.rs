//! In-process adapters for every collaborator the router engine depends on
mod connections;
pub use connections::ConnectionStore;

mod invitation;
pub use invitation::OutOfBandFactory;

mod registry;
pub use registry::PeerRegistry;

mod topics;
pub use topics::TopicQueue;

mod transport;
pub use transport::{Delivery, LocalTransport, Protocol, ProtocolClient};
