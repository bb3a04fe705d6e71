use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::{error, info};
use rst_common::with_tokio::tokio::sync::mpsc::Receiver;

use crate::didcomm::ActionEvent;

use super::types::{ActionType, RouterError};

/// `ActionDispatcher` drains the action channel and decides on each event, one at a time
///
/// The decision policy is an explicit auto-accept: any party able to reach the handshake
/// stage is trusted for `DID Exchange` and mediation requests, every other message type
/// is rejected.
pub struct ActionDispatcher {
    channel: Receiver<ActionEvent>,
}

impl ActionDispatcher {
    pub fn new(channel: Receiver<ActionEvent>) -> Self {
        Self { channel }
    }

    /// `run` keeps processing events until every sender has been dropped
    pub async fn run(mut self) {
        while let Some(event) = self.channel.recv().await {
            Self::handle(event);
        }

        info!("action channel closed, dispatcher stopped");
    }

    /// `decide` resolves the arguments used to continue a handshake
    pub fn decide(msg_type: &str) -> Result<Option<Value>, RouterError> {
        match ActionType::try_from(msg_type)? {
            ActionType::DIDExchangeRequest => Ok(None),
            ActionType::MediationRequest => Ok(None),
        }
    }

    fn handle(event: ActionEvent) {
        let msg_type = event.message().msg_type();
        let msg_id = event.message().id();

        match Self::decide(&msg_type) {
            Ok(args) => {
                info!("msgType=[{}] id=[{}] msg=[{}]", msg_type, msg_id, "success");
                event.continue_with(args);
            }
            Err(err) => {
                error!("msgType=[{}] id=[{}] errMsg=[{}]", msg_type, msg_id, err);
                event.stop(format!("handle {} : {}", msg_type, err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rst_common::standard::serde_json::json;
    use rst_common::with_tokio::tokio;
    use rst_common::with_tokio::tokio::sync::mpsc;

    use crate::didcomm::types::{
        DIDEXCHANGE_REQUEST_MSG_TYPE, ESTABLISH_CONN_REQ_MSG_TYPE, MEDIATOR_REQUEST_MSG_TYPE,
    };
    use crate::didcomm::{DIDCommMsg, Decision};

    fn build_event(msg_type: &str) -> (ActionEvent, tokio::sync::oneshot::Receiver<Decision>) {
        let msg = DIDCommMsg::try_from(json!({"@id": "action-id", "@type": msg_type})).unwrap();
        ActionEvent::new(msg)
    }

    #[tokio::test]
    async fn test_accept_known_requests() {
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = tokio::spawn(ActionDispatcher::new(rx).run());

        for msg_type in [DIDEXCHANGE_REQUEST_MSG_TYPE, MEDIATOR_REQUEST_MSG_TYPE] {
            let (event, decision) = build_event(msg_type);
            tx.send(event).await.unwrap();
            assert_eq!(decision.await.unwrap(), Decision::Continue(None));
        }

        drop(tx);
        dispatcher.await.unwrap();
    }

    #[tokio::test]
    async fn test_reject_unknown_requests() {
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = tokio::spawn(ActionDispatcher::new(rx).run());

        let unknown = [
            "https://didcomm.org/didexchange/1.0/response",
            ESTABLISH_CONN_REQ_MSG_TYPE,
            "",
        ];

        for msg_type in unknown {
            let (event, decision) = build_event(msg_type);
            tx.send(event).await.unwrap();

            match decision.await.unwrap() {
                Decision::Stop(reason) => {
                    assert!(reason.starts_with(&format!("handle {} :", msg_type)));
                    assert!(reason.contains("unsupported message type"));
                }
                Decision::Continue(_) => panic!("unexpected accept for {}", msg_type),
            }
        }

        drop(tx);
        dispatcher.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_does_not_stop_loop() {
        let (tx, rx) = mpsc::channel(1);
        let dispatcher = tokio::spawn(ActionDispatcher::new(rx).run());

        let (rejected, rejected_decision) = build_event("unknown");
        tx.send(rejected).await.unwrap();
        assert!(matches!(rejected_decision.await.unwrap(), Decision::Stop(_)));

        let (accepted, accepted_decision) = build_event(DIDEXCHANGE_REQUEST_MSG_TYPE);
        tx.send(accepted).await.unwrap();
        assert_eq!(accepted_decision.await.unwrap(), Decision::Continue(None));

        drop(tx);
        dispatcher.await.unwrap();
    }

    #[test]
    fn test_decide() {
        assert_eq!(ActionDispatcher::decide(DIDEXCHANGE_REQUEST_MSG_TYPE), Ok(None));
        assert_eq!(ActionDispatcher::decide(MEDIATOR_REQUEST_MSG_TYPE), Ok(None));
        assert!(matches!(
            ActionDispatcher::decide("unknown").unwrap_err(),
            RouterError::UnsupportedTypeError(_)
        ));
    }
}
