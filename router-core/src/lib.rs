//! `hubrouter-core` holds the business logic of the hub router, an intermediary that lets
//! two independent `DID` agents establish a mediated connection without manual intervention.
//!
//! There are three sub-domains in it:
//!
//! - `didcomm`
//! - `router`
//! - `confirmation`
//!
//! ---
//!
//! The `didcomm` sub-domain provides the message model shared by every other module: a plaintext
//! `DIDComm` message map, the protocol type constants, and the two kinds of inbound events emitted
//! by the transport layer. An *action event* requires an accept or reject decision before a
//! handshake may proceed, while a *message event* carries already delivered application content.
//!
//! ---
//!
//! The `router` sub-domain is the event dispatching engine. It auto-accepts inbound `DID Exchange`
//! and mediation requests, and implements the `establish-connection` sub-protocol: for each
//! correlated request carrying a remote `DID Doc`, it mints a fresh peer identity, creates a
//! connection binding both identities and replies with the newly minted document.
//!
//! The transport, the identity registry and the connection manager are external collaborators,
//! consumed through the traits defined at [`router::types`].
//!
//! ---
//!
//! The `confirmation` sub-domain provides the pollers used by external callers to wait until an
//! asynchronous connection state, or a pushed topic notification, has converged.
pub mod confirmation;
pub mod didcomm;
pub mod router;
