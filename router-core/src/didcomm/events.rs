use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::debug;
use rst_common::with_tokio::tokio::sync::oneshot;

use super::types::DIDCommMsg;

/// `Decision` is the outcome of an [`ActionEvent`], sent back to the protocol service
/// that raised it
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The handshake continues, with optional protocol specific arguments
    Continue(Option<Value>),

    /// The handshake stops, the value is the human readable reason
    Stop(String),
}

/// `ActionEvent` is an inbound protocol message that needs an explicit accept or reject
/// decision before the protocol state machine is allowed to proceed
///
/// Both [`ActionEvent::continue_with`] and [`ActionEvent::stop`] consume the event, so
/// each event is decided exactly once
#[derive(Debug)]
pub struct ActionEvent {
    message: DIDCommMsg,
    decision: oneshot::Sender<Decision>,
}

impl ActionEvent {
    /// `new` builds an event and returns the receiver the protocol service waits on
    pub fn new(message: DIDCommMsg) -> (Self, oneshot::Receiver<Decision>) {
        let (decision, rx) = oneshot::channel();
        (Self { message, decision }, rx)
    }

    pub fn message(&self) -> &DIDCommMsg {
        &self.message
    }

    pub fn continue_with(self, args: Option<Value>) {
        self.decide(Decision::Continue(args))
    }

    pub fn stop(self, reason: String) {
        self.decide(Decision::Stop(reason))
    }

    fn decide(self, decision: Decision) {
        let msg_id = self.message.id();
        if self.decision.send(decision).is_err() {
            debug!("action decision dropped, protocol service gone: id=[{}]", msg_id);
        }
    }
}
