use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};

use hubrouter_core::router::Invitation;

pub const HEALTH_STATUS_SUCCESS: &str = "success";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct HealthCheckResp {
    pub status: String,

    #[serde(rename = "currentTime")]
    pub current_time: DateTime<Utc>,
}

impl HealthCheckResp {
    pub fn success() -> Self {
        Self {
            status: HEALTH_STATUS_SUCCESS.to_string(),
            current_time: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct DIDCommInvitationResp {
    pub invitation: Invitation,
}

/// `MessageAcceptedResp` reports how an inbound message has been routed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct MessageAcceptedResp {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct ErrorResponse {
    #[serde(rename = "errMessage")]
    pub err_message: String,
}

impl ErrorResponse {
    pub fn new(err_message: String) -> Self {
        Self { err_message }
    }
}
