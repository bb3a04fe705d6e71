use rst_common::with_logging::log::{error, info};
use rst_common::with_tokio::tokio::sync::mpsc::Receiver;

use crate::didcomm::DIDCommMsg;

use super::establish::Provisioner;
use super::types::{
    ConnectionManagerBuilder, IdentityRegistryBuilder, MessageType, MessengerBuilder, RouterError,
};

/// `MessageDispatcher` drains inbound application messages one at a time
///
/// `establish-conn-req` messages are delegated to the [`Provisioner`], and a successful
/// provisioning is answered with exactly one reply correlated to the request id. When the
/// provisioning fails nothing is sent back, the requester only observes a timeout.
pub struct MessageDispatcher<TRegistry, TConnection, TMessenger>
where
    TRegistry: IdentityRegistryBuilder,
    TConnection: ConnectionManagerBuilder,
    TMessenger: MessengerBuilder,
{
    provisioner: Provisioner<TRegistry, TConnection>,
    messenger: TMessenger,
}

impl<TRegistry, TConnection, TMessenger> MessageDispatcher<TRegistry, TConnection, TMessenger>
where
    TRegistry: IdentityRegistryBuilder,
    TConnection: ConnectionManagerBuilder,
    TMessenger: MessengerBuilder,
{
    pub fn new(provisioner: Provisioner<TRegistry, TConnection>, messenger: TMessenger) -> Self {
        Self {
            provisioner,
            messenger,
        }
    }

    /// `run` keeps processing messages until every sender has been dropped, a failing
    /// message never stops the loop
    pub async fn run(self, mut channel: Receiver<DIDCommMsg>) {
        while let Some(msg) = channel.recv().await {
            match self.handle(&msg).await {
                Ok(_) => info!(
                    "msgType=[{}] id=[{}] msg=[{}]",
                    msg.msg_type(),
                    msg.id(),
                    "success"
                ),
                Err(RouterError::ReplyError(err)) => error!(
                    "sendReply : msgType=[{}] id=[{}] errMsg=[{}]",
                    msg.msg_type(),
                    msg.id(),
                    err
                ),
                Err(err) => error!(
                    "msgType=[{}] id=[{}] errMsg=[{}]",
                    msg.msg_type(),
                    msg.id(),
                    err
                ),
            }
        }

        info!("message channel closed, dispatcher stopped");
    }

    pub async fn handle(&self, msg: &DIDCommMsg) -> Result<(), RouterError> {
        let reply = match MessageType::try_from(msg.msg_type().as_str())? {
            MessageType::EstablishConnRequest => self.provisioner.establish(msg).await?,
        };

        self.messenger.reply_to(msg.id(), reply).await
    }
}
