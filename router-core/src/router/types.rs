use std::fmt;

use derive_more::{AsRef, Display, From, Into};

use prople_did_core::doc::types::Doc;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::uuid::Uuid;
use rst_common::with_errors::thiserror::{self, Error};
use rst_common::with_tokio::tokio::sync::mpsc::Sender;

use crate::didcomm::types::{
    DIDCommError, DIDCommMsg, DIDEXCHANGE_REQUEST_MSG_TYPE, ESTABLISH_CONN_REQ_MSG_TYPE,
    ESTABLISH_CONN_REQ_PURPOSE, ESTABLISH_CONN_RESP_MSG_TYPE, ESTABLISH_CONN_RESP_PURPOSE,
    MEDIATOR_REQUEST_MSG_TYPE,
};
use crate::didcomm::ActionEvent;

use super::identity::PeerIdentity;
use super::invitation::Invitation;

/// The `DID` method used for every identity minted by the router
pub const PEER_DID_KIND: &str = "peer";

pub const MSG_SERVICE_ESTABLISH_CONN: &str = "establish-connection";

/// `RouterError` is a base error types for the `router` domain
///
/// The dispatch loops never abort because of these errors, they are logged and the
/// loop continues with the next event
#[derive(Debug, PartialEq, Error, Clone)]
pub enum RouterError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("identity error: {0}")]
    IdentityError(String),

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("unsupported message type : {0}")]
    UnsupportedTypeError(String),

    #[error("reply error: {0}")]
    ReplyError(String),

    #[error("invitation error: {0}")]
    InvitationError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("registration error: {0}")]
    RegistrationError(String),
}

impl From<DIDCommError> for RouterError {
    fn from(err: DIDCommError) -> Self {
        match err {
            DIDCommError::DecodeError(msg) => RouterError::DecodeError(msg),
            DIDCommError::EncodeError(msg) => RouterError::DecodeError(msg),
        }
    }
}

/// `ActionType` is the closed set of action messages the router knows how to decide on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    DIDExchangeRequest,
    MediationRequest,
}

impl ActionType {
    pub fn msg_type(&self) -> &'static str {
        match self {
            ActionType::DIDExchangeRequest => DIDEXCHANGE_REQUEST_MSG_TYPE,
            ActionType::MediationRequest => MEDIATOR_REQUEST_MSG_TYPE,
        }
    }
}

impl TryFrom<&str> for ActionType {
    type Error = RouterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            DIDEXCHANGE_REQUEST_MSG_TYPE => Ok(ActionType::DIDExchangeRequest),
            MEDIATOR_REQUEST_MSG_TYPE => Ok(ActionType::MediationRequest),
            _ => Err(RouterError::UnsupportedTypeError(value.to_string())),
        }
    }
}

/// `MessageType` is the closed set of application messages handled by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    EstablishConnRequest,
}

impl MessageType {
    pub fn msg_type(&self) -> &'static str {
        match self {
            MessageType::EstablishConnRequest => ESTABLISH_CONN_REQ_MSG_TYPE,
        }
    }
}

impl TryFrom<&str> for MessageType {
    type Error = RouterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            ESTABLISH_CONN_REQ_MSG_TYPE => Ok(MessageType::EstablishConnRequest),
            _ => Err(RouterError::UnsupportedTypeError(value.to_string())),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, AsRef, Display,
)]
#[serde(crate = "self::serde")]
#[display("{_0}")]
pub struct ConnectionID(String);

impl ConnectionID {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// `ConnectionState` represents the handshake stage of a connection
///
/// Transitions are driven by the transport layer, the router only observes them
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde", rename_all = "lowercase")]
pub enum ConnectionState {
    Requested,
    Responded,
    Completed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            ConnectionState::Requested => "requested",
            ConnectionState::Responded => "responded",
            ConnectionState::Completed => "completed",
        };

        write!(f, "{}", state)
    }
}

impl TryFrom<&str> for ConnectionState {
    type Error = RouterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "requested" => Ok(ConnectionState::Requested),
            "responded" => Ok(ConnectionState::Responded),
            "completed" => Ok(ConnectionState::Completed),
            _ => Err(RouterError::ValidationError(format!(
                "unknown connection state: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityOptions {
    pub service_endpoint: Option<String>,
}

impl IdentityOptions {
    pub fn with_service_endpoint(endpoint: &str) -> Self {
        Self {
            service_endpoint: Some(endpoint.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvitationOptions {
    pub label: Option<String>,
}

impl InvitationOptions {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
        }
    }
}

/// `EstablishConnData` carries the `DID Doc` exchanged by the `establish-connection` protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct EstablishConnData {
    #[serde(rename = "didDoc", default, skip_serializing_if = "Option::is_none")]
    pub did_doc: Option<Doc>,
}

/// `EstablishConn` is the wire format of both the request and the response of the
/// `establish-connection` protocol
///
/// ```json
/// {"@id": "<uuid>", "@type": ".../router/1.0/establish-conn-req", "~purpose": ["establish-conn-req"], "data": {"didDoc": {}}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct EstablishConn {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@type")]
    pub msg_type: String,

    #[serde(rename = "~purpose", default, skip_serializing_if = "Vec::is_empty")]
    pub purpose: Vec<String>,

    #[serde(default)]
    pub data: Option<EstablishConnData>,
}

impl EstablishConn {
    pub fn request(doc: Option<Doc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            msg_type: ESTABLISH_CONN_REQ_MSG_TYPE.to_string(),
            purpose: vec![ESTABLISH_CONN_REQ_PURPOSE.to_string()],
            data: Some(EstablishConnData { did_doc: doc }),
        }
    }

    pub fn response(doc: Doc) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            msg_type: ESTABLISH_CONN_RESP_MSG_TYPE.to_string(),
            purpose: vec![ESTABLISH_CONN_RESP_PURPOSE.to_string()],
            data: Some(EstablishConnData { did_doc: Some(doc) }),
        }
    }

    /// `did_doc` returns the embedded document, consuming the message
    pub fn did_doc(self) -> Option<Doc> {
        self.data.and_then(|data| data.did_doc)
    }
}

/// `MsgService` describes which inbound application messages should be delivered
/// to the given channel
#[derive(Debug, Clone)]
pub struct MsgService {
    pub name: String,
    pub msg_type: String,
    pub purpose: Vec<String>,
    pub channel: Sender<DIDCommMsg>,
}

impl MsgService {
    pub fn new(name: &str, msg_type: &str, purpose: &str, channel: Sender<DIDCommMsg>) -> Self {
        Self {
            name: name.to_string(),
            msg_type: msg_type.to_string(),
            purpose: vec![purpose.to_string()],
            channel,
        }
    }

    /// `accepts` checks the message type and, when the message declares any, its purposes
    pub fn accepts(&self, msg: &DIDCommMsg) -> bool {
        if msg.msg_type() != self.msg_type {
            return false;
        }

        let purposes = msg.purpose();
        purposes.is_empty() || purposes.iter().any(|p| self.purpose.contains(p))
    }
}

/// `IdentityRegistryBuilder` is the `DID` registry used to mint new identities
#[async_trait]
pub trait IdentityRegistryBuilder: Send + Sync {
    async fn create(&self, kind: &str, options: IdentityOptions)
        -> Result<PeerIdentity, RouterError>;
}

/// `ConnectionManagerBuilder` creates connection records between a local identity and
/// a remote document
#[async_trait]
pub trait ConnectionManagerBuilder: Send + Sync {
    async fn create_connection(
        &self,
        local_did: String,
        remote_doc: Doc,
    ) -> Result<ConnectionID, RouterError>;
}

/// `MessengerBuilder` sends a reply correlated with a previously received message
#[async_trait]
pub trait MessengerBuilder: Send + Sync {
    async fn reply_to(&self, msg_id: String, reply: DIDCommMsg) -> Result<(), RouterError>;
}

/// `InvitationFactoryBuilder` builds out-of-band invitations
#[async_trait]
pub trait InvitationFactoryBuilder: Send + Sync {
    async fn create_invitation(
        &self,
        protocols: Vec<String>,
        options: InvitationOptions,
    ) -> Result<Invitation, RouterError>;
}

/// `ActionRegistrarBuilder` is implemented by protocol clients able to emit [`ActionEvent`]
pub trait ActionRegistrarBuilder: Send + Sync {
    fn register_action_event(&self, channel: Sender<ActionEvent>) -> Result<(), RouterError>;
}

/// `MsgServiceRegistrarBuilder` registers application message services on the transport
pub trait MsgServiceRegistrarBuilder: Send + Sync {
    fn register(&self, service: MsgService) -> Result<(), RouterError>;
}
