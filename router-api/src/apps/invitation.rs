use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::json;

use hubrouter_core::didcomm::types::DIDEXCHANGE_PROTOCOL;
use hubrouter_core::router::invitation::DEFAULT_ROUTER_LABEL;
use hubrouter_core::router::types::{InvitationFactoryBuilder, InvitationOptions, RouterError};
use hubrouter_core::router::Invitation;

pub const DIDCOMM_SERVICE_TYPE: &str = "did-communication";

/// `OutOfBandFactory` builds invitations advertising a single inline service
#[derive(Clone, Debug)]
pub struct OutOfBandFactory {
    service_endpoint: String,
}

impl OutOfBandFactory {
    pub fn new(service_endpoint: String) -> Self {
        Self { service_endpoint }
    }
}

#[async_trait]
impl InvitationFactoryBuilder for OutOfBandFactory {
    async fn create_invitation(
        &self,
        protocols: Vec<String>,
        options: InvitationOptions,
    ) -> Result<Invitation, RouterError> {
        if self.service_endpoint.is_empty() {
            return Err(RouterError::InvitationError(
                "missing service endpoint".to_string(),
            ));
        }

        // no explicit protocol means the default handshake
        let protocols = if protocols.is_empty() {
            vec![DIDEXCHANGE_PROTOCOL.to_string()]
        } else {
            protocols
        };

        let label = options
            .label
            .unwrap_or_else(|| DEFAULT_ROUTER_LABEL.to_string());

        let service = json!({
            "id": "#inline",
            "type": DIDCOMM_SERVICE_TYPE,
            "serviceEndpoint": self.service_endpoint,
        });

        let invitation = Invitation::new(label, vec![service], protocols);
        invitation.validate()?;
        Ok(invitation)
    }
}
