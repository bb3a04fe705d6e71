use prople_did_core::doc::types::Doc;

use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use super::types::{ConnectionID, ConnectionState};

/// `Connection` binds an identity minted by the router with the requester's document
///
/// A connection always starts at [`ConnectionState::Requested`]. Later transitions happen
/// outside of the router engine and are only observed through polling
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Connection {
    id: ConnectionID,
    state: ConnectionState,
    local_did: String,
    remote_doc: Doc,

    #[serde(with = "ts_seconds")]
    created_at: DateTime<Utc>,

    #[serde(with = "ts_seconds")]
    updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(local_did: String, remote_doc: Doc) -> Self {
        Self {
            id: ConnectionID::generate(),
            state: ConnectionState::Requested,
            local_did,
            remote_doc,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn update_state(&mut self, state: ConnectionState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    pub fn get_id(&self) -> ConnectionID {
        self.id.to_owned()
    }

    pub fn get_state(&self) -> ConnectionState {
        self.state
    }

    pub fn get_local_did(&self) -> String {
        self.local_did.to_owned()
    }

    pub fn get_remote_doc(&self) -> Doc {
        self.remote_doc.to_owned()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at.to_owned()
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at.to_owned()
    }
}

impl ToJSON for Connection {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}
