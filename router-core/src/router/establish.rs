use rst_common::with_logging::log::{debug, warn};

use crate::didcomm::DIDCommMsg;

use super::types::{
    ConnectionManagerBuilder, EstablishConn, IdentityOptions, IdentityRegistryBuilder,
    RouterError, PEER_DID_KIND,
};

/// `Provisioner` handles a single `establish-conn-req`
///
/// For each valid request it mints exactly one peer identity, creates exactly one
/// connection between that identity and the embedded remote document, and builds the
/// `establish-conn-resp` carrying the new document.
///
/// There is no rollback: when the connection cannot be created after the identity has
/// been minted, the identity stays orphaned in the registry.
pub struct Provisioner<TRegistry, TConnection>
where
    TRegistry: IdentityRegistryBuilder,
    TConnection: ConnectionManagerBuilder,
{
    registry: TRegistry,
    connections: TConnection,
}

impl<TRegistry, TConnection> Provisioner<TRegistry, TConnection>
where
    TRegistry: IdentityRegistryBuilder,
    TConnection: ConnectionManagerBuilder,
{
    pub fn new(registry: TRegistry, connections: TConnection) -> Self {
        Self {
            registry,
            connections,
        }
    }

    pub async fn establish(&self, msg: &DIDCommMsg) -> Result<DIDCommMsg, RouterError> {
        let request: EstablishConn = msg
            .decode()
            .map_err(|err| RouterError::ValidationError(err.to_string()))?;

        let remote_doc = request
            .did_doc()
            .ok_or(RouterError::ValidationError("did document mandatory".to_string()))?;

        // mediated identity, never directly reachable
        let identity = self
            .registry
            .create(PEER_DID_KIND, IdentityOptions::with_service_endpoint(""))
            .await?;

        let connection_id = self
            .connections
            .create_connection(identity.get_did(), remote_doc)
            .await
            .map_err(|err| {
                warn!(
                    "orphaned peer identity: did=[{}] id=[{}]",
                    identity.get_did(),
                    msg.id()
                );
                err
            })?;

        debug!(
            "connection created: id=[{}] connID=[{}] did=[{}]",
            msg.id(),
            connection_id,
            identity.get_did()
        );

        let response = EstablishConn::response(identity.get_doc());
        let reply = DIDCommMsg::new(&response)?;
        Ok(reply)
    }
}
