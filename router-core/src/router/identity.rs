use prople_did_core::doc::types::Doc;

use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

/// `PeerIdentity` is an identity minted by the router for a single accepted
/// `establish-connection` request
///
/// It is never reused across requests and never modified after creation, so all
/// fields are only reachable through getters
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct PeerIdentity {
    did: String,
    doc: Doc,
    service_endpoint: Option<String>,

    #[serde(with = "ts_seconds")]
    created_at: DateTime<Utc>,
}

impl PeerIdentity {
    /// An empty service endpoint means the identity is only reachable through mediation
    pub fn new(did: String, doc: Doc, service_endpoint: Option<String>) -> Self {
        Self {
            did,
            doc,
            service_endpoint: service_endpoint.filter(|endpoint| !endpoint.is_empty()),
            created_at: Utc::now(),
        }
    }

    pub fn get_did(&self) -> String {
        self.did.to_owned()
    }

    pub fn get_doc(&self) -> Doc {
        self.doc.to_owned()
    }

    pub fn get_service_endpoint(&self) -> Option<String> {
        self.service_endpoint.to_owned()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at.to_owned()
    }
}

impl ToJSON for PeerIdentity {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}
