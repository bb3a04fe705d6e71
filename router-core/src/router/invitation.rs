use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::Value;
use rst_common::standard::uuid::Uuid;

use crate::didcomm::types::OOB_INVITATION_MSG_TYPE;

use super::types::{InvitationFactoryBuilder, InvitationOptions, RouterError};

pub const DEFAULT_ROUTER_LABEL: &str = "hub-router";

/// `Invitation` is an out-of-band invitation
///
/// Beside its type, the content is opaque for the router: services and protocols are
/// filled in by the [`InvitationFactoryBuilder`] implementation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Invitation {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@type")]
    pub invitation_type: String,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "service", default)]
    pub services: Vec<Value>,

    #[serde(default)]
    pub protocols: Vec<String>,
}

impl Invitation {
    pub fn new(label: String, services: Vec<Value>, protocols: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invitation_type: OOB_INVITATION_MSG_TYPE.to_string(),
            label,
            services,
            protocols,
        }
    }

    /// `validate` checks the invitation type against the out-of-band invitation constant
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.invitation_type != OOB_INVITATION_MSG_TYPE {
            return Err(RouterError::ValidationError(format!(
                "invalid invitation type : expected={} actual={}",
                OOB_INVITATION_MSG_TYPE, self.invitation_type
            )));
        }

        Ok(())
    }
}

/// `InvitationIssuer` produces a new invitation on each call, it holds no state
/// beside its collaborators
pub struct InvitationIssuer<TFactory>
where
    TFactory: InvitationFactoryBuilder,
{
    factory: TFactory,
    label: String,
}

impl<TFactory> InvitationIssuer<TFactory>
where
    TFactory: InvitationFactoryBuilder,
{
    pub fn new(factory: TFactory, label: String) -> Self {
        Self { factory, label }
    }

    pub async fn issue(&self) -> Result<Invitation, RouterError> {
        self.factory
            .create_invitation(Vec::new(), InvitationOptions::with_label(&self.label))
            .await
    }
}
