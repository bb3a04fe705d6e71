use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::debug;

use prople_did_core::did::DID;
use prople_did_core::doc::types::ToDoc;

use hubrouter_core::router::types::{
    IdentityOptions, IdentityRegistryBuilder, RouterError, PEER_DID_KIND,
};
use hubrouter_core::router::PeerIdentity;

/// `PeerRegistry` mints new `DID` peer identities and keeps them in memory
///
/// Cloning the registry shares the same underlying storage
#[derive(Clone, Default)]
pub struct PeerRegistry {
    identities: Arc<RwLock<HashMap<String, PeerIdentity>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_identity(&self, did: &str) -> Result<Option<PeerIdentity>, RouterError> {
        let identities = self
            .identities
            .read()
            .map_err(|err| RouterError::IdentityError(err.to_string()))?;

        Ok(identities.get(did).cloned())
    }

    pub fn count(&self) -> Result<usize, RouterError> {
        let identities = self
            .identities
            .read()
            .map_err(|err| RouterError::IdentityError(err.to_string()))?;

        Ok(identities.len())
    }
}

#[async_trait]
impl IdentityRegistryBuilder for PeerRegistry {
    async fn create(
        &self,
        kind: &str,
        options: IdentityOptions,
    ) -> Result<PeerIdentity, RouterError> {
        if kind != PEER_DID_KIND {
            return Err(RouterError::IdentityError(format!(
                "unsupported did kind: {}",
                kind
            )));
        }

        let did = DID::new();
        let mut identity = did
            .identity()
            .map_err(|err| RouterError::IdentityError(err.to_string()))?;

        let doc = identity
            .build_auth_method()
            .build_assertion_method()
            .to_doc();

        let peer = PeerIdentity::new(identity.value(), doc, options.service_endpoint);

        let mut identities = self
            .identities
            .write()
            .map_err(|err| RouterError::IdentityError(err.to_string()))?;

        identities.insert(peer.get_did(), peer.clone());
        debug!("peer identity minted: did=[{}]", peer.get_did());

        Ok(peer)
    }
}
