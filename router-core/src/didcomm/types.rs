use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Map, Value};
use rst_common::with_errors::thiserror::{self, Error};

pub const DIDEXCHANGE_PROTOCOL: &str = "https://didcomm.org/didexchange/1.0";
pub const DIDEXCHANGE_REQUEST_MSG_TYPE: &str = "https://didcomm.org/didexchange/1.0/request";

pub const MEDIATOR_PROTOCOL: &str = "https://didcomm.org/coordinatemediation/1.0";
pub const MEDIATOR_REQUEST_MSG_TYPE: &str =
    "https://didcomm.org/coordinatemediation/1.0/mediate-request";

pub const ESTABLISH_CONN_REQ_MSG_TYPE: &str = "https://didcomm.org/router/1.0/establish-conn-req";
pub const ESTABLISH_CONN_RESP_MSG_TYPE: &str =
    "https://didcomm.org/router/1.0/establish-conn-resp";
pub const ESTABLISH_CONN_REQ_PURPOSE: &str = "establish-conn-req";
pub const ESTABLISH_CONN_RESP_PURPOSE: &str = "establish-conn-resp";

pub const OOB_INVITATION_MSG_TYPE: &str = "https://didcomm.org/oob-invitation/1.0/invitation";

const FIELD_ID: &str = "@id";
const FIELD_TYPE: &str = "@type";
const FIELD_PURPOSE: &str = "~purpose";
const FIELD_THREAD: &str = "~thread";
const FIELD_THREAD_ID: &str = "thid";

/// `DIDCommError` covers failures while building or decoding a plaintext message
#[derive(Debug, PartialEq, Error, Clone)]
pub enum DIDCommError {
    #[error("encode error: {0}")]
    EncodeError(String),

    #[error("decode error: {0}")]
    DecodeError(String),
}

/// `DIDCommMsg` is a plaintext `DIDComm` message kept as a raw JSON object
///
/// The message is intentionally schemaless, known headers like `@id`, `@type` and `~purpose`
/// are exposed through accessors, and the whole body can be decoded into a typed structure
/// through [`DIDCommMsg::decode`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(crate = "self::serde", transparent)]
pub struct DIDCommMsg(Map<String, Value>);

impl DIDCommMsg {
    /// `new` builds a message from any serializable payload, the payload must be
    /// serialized as a JSON object
    pub fn new<T: Serialize>(payload: &T) -> Result<Self, DIDCommError> {
        let value =
            serde_json::to_value(payload).map_err(|err| DIDCommError::EncodeError(err.to_string()))?;

        Self::try_from(value)
    }

    pub fn id(&self) -> String {
        self.get_str(FIELD_ID)
    }

    pub fn msg_type(&self) -> String {
        self.get_str(FIELD_TYPE)
    }

    pub fn purpose(&self) -> Vec<String> {
        self.0
            .get(FIELD_PURPOSE)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn thread_id(&self) -> Option<String> {
        self.0
            .get(FIELD_THREAD)
            .and_then(|thread| thread.get(FIELD_THREAD_ID))
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// `with_thread_id` sets `~thread.thid`, keeping any other thread decorator field
    pub fn with_thread_id(mut self, thid: &str) -> Self {
        let thread = self
            .0
            .entry(FIELD_THREAD)
            .or_insert_with(|| Value::Object(Map::new()));

        if !thread.is_object() {
            *thread = Value::Object(Map::new());
        }

        if let Value::Object(fields) = thread {
            fields.insert(FIELD_THREAD_ID.to_string(), Value::String(thid.to_string()));
        }

        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DIDCommError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|err| DIDCommError::DecodeError(err.to_string()))
    }

    fn get_str(&self, key: &str) -> String {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_default()
    }
}

impl TryFrom<Value> for DIDCommMsg {
    type Error = DIDCommError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DIDCommError::EncodeError(
                "didcomm message must be a json object".to_string(),
            )),
        }
    }
}

impl TryFrom<&[u8]> for DIDCommMsg {
    type Error = DIDCommError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let json: Value = serde_json::from_slice(value)
            .map_err(|err| DIDCommError::DecodeError(err.to_string()))?;

        Self::try_from(json).map_err(|err| DIDCommError::DecodeError(err.to_string()))
    }
}

impl From<DIDCommMsg> for Value {
    fn from(msg: DIDCommMsg) -> Self {
        Value::Object(msg.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rst_common::standard::serde_json::json;

    #[derive(Deserialize, Serialize)]
    #[serde(crate = "self::serde")]
    struct Ping {
        #[serde(rename = "@id")]
        id: String,

        #[serde(rename = "@type")]
        msg_type: String,
    }

    #[test]
    fn test_headers() {
        let msg = DIDCommMsg::try_from(json!({
            "@id": "msg-1",
            "@type": ESTABLISH_CONN_REQ_MSG_TYPE,
            "~purpose": [ESTABLISH_CONN_REQ_PURPOSE],
            "~thread": {"thid": "thread-1"}
        }))
        .unwrap();

        assert_eq!(msg.id(), "msg-1");
        assert_eq!(msg.msg_type(), ESTABLISH_CONN_REQ_MSG_TYPE);
        assert_eq!(msg.purpose(), vec![ESTABLISH_CONN_REQ_PURPOSE.to_string()]);
        assert_eq!(msg.thread_id(), Some("thread-1".to_string()));
    }

    #[test]
    fn test_missing_headers() {
        let msg = DIDCommMsg::try_from(json!({"data": null})).unwrap();
        assert!(msg.id().is_empty());
        assert!(msg.msg_type().is_empty());
        assert!(msg.purpose().is_empty());
        assert!(msg.thread_id().is_none());
    }

    #[test]
    fn test_decode_typed() {
        let msg = DIDCommMsg::new(&Ping {
            id: "ping-1".to_string(),
            msg_type: "https://didcomm.org/trust_ping/1.0/ping".to_string(),
        })
        .unwrap();

        let ping: Ping = msg.decode().unwrap();
        assert_eq!(ping.id, "ping-1");
        assert_eq!(msg.msg_type(), ping.msg_type);
    }

    #[test]
    fn test_non_object_rejected() {
        let msg = DIDCommMsg::try_from(json!(["not", "an", "object"]));
        assert!(matches!(msg.unwrap_err(), DIDCommError::EncodeError(_)));

        let raw = DIDCommMsg::try_from("\"plain\"".as_bytes());
        assert!(matches!(raw.unwrap_err(), DIDCommError::DecodeError(_)));
    }

    #[test]
    fn test_with_thread_id() {
        let msg = DIDCommMsg::try_from(json!({"@id": "msg-2", "~thread": {"pthid": "parent"}}))
            .unwrap()
            .with_thread_id("thread-2");

        assert_eq!(msg.thread_id(), Some("thread-2".to_string()));

        let value: Value = msg.into();
        assert_eq!(value["~thread"]["pthid"], "parent");

        let replaced = DIDCommMsg::try_from(json!({"~thread": "broken"}))
            .unwrap()
            .with_thread_id("thread-3");
        assert_eq!(replaced.thread_id(), Some("thread-3".to_string()));
    }
}
