//! `operation` wires the router engine with the in-process adapters and exposes it
//! through the HTTP surface
use std::sync::Arc;

use rst_common::with_http_tokio::axum::routing::{get, post};
use rst_common::with_http_tokio::axum::Router;
use rst_common::with_logging::log::debug;
use rst_common::with_tokio::tokio;
use rst_common::with_tokio::tokio::sync::mpsc::{self, Receiver};
use rst_common::with_tokio::tokio::task::JoinHandle;

use hubrouter_core::confirmation::{ConfirmationError, TopicNotification, TopicSourceBuilder};
use hubrouter_core::didcomm::types::{ESTABLISH_CONN_REQ_MSG_TYPE, ESTABLISH_CONN_REQ_PURPOSE};
use hubrouter_core::didcomm::{ActionEvent, DIDCommMsg};
use hubrouter_core::router::types::{
    ActionRegistrarBuilder, MsgService, MsgServiceRegistrarBuilder, RouterError,
    MSG_SERVICE_ESTABLISH_CONN,
};
use hubrouter_core::router::{
    ActionDispatcher, Invitation, InvitationIssuer, MessageDispatcher, Provisioner,
};

use crate::apps::{ConnectionStore, Delivery, LocalTransport, OutOfBandFactory, PeerRegistry, Protocol};
use crate::common::types::CommonError;

pub mod handlers;
pub mod types;

pub const ACTION_CHANNEL_DEPTH: usize = 1;
pub const MESSAGE_CHANNEL_DEPTH: usize = 1;

pub const ROUTE_HEALTH_CHECK: &str = "/healthcheck";
pub const ROUTE_INVITATION: &str = "/didcomm/invitation";
pub const ROUTE_MESSAGE: &str = "/didcomm/message";
pub const ROUTE_CHECK_TOPICS: &str = "/checktopics";

pub type RouterMessageDispatcher = MessageDispatcher<PeerRegistry, ConnectionStore, LocalTransport>;

/// `Dispatchers` holds both consumer loops until they are spawned
pub struct Dispatchers {
    action: ActionDispatcher,
    message: RouterMessageDispatcher,
    messages: Receiver<DIDCommMsg>,
}

impl Dispatchers {
    pub fn spawn(self) -> (JoinHandle<()>, JoinHandle<()>) {
        let action = tokio::spawn(self.action.run());
        let message = tokio::spawn(self.message.run(self.messages));
        (action, message)
    }
}

#[derive(Clone)]
pub struct Operation {
    issuer: Arc<InvitationIssuer<OutOfBandFactory>>,
    transport: LocalTransport,
}

impl Operation {
    /// `new` registers both protocol clients against the same action channel and the
    /// `establish-connection` message service, any registration failure aborts the wiring
    pub fn new(
        transport: LocalTransport,
        registry: PeerRegistry,
        connections: ConnectionStore,
        factory: OutOfBandFactory,
        label: String,
    ) -> Result<(Self, Dispatchers), CommonError> {
        let (action_tx, action_rx) = mpsc::channel::<ActionEvent>(ACTION_CHANNEL_DEPTH);
        for protocol in [Protocol::DIDExchange, Protocol::Mediator] {
            transport
                .client(protocol)
                .register_action_event(action_tx.clone())
                .map_err(|err| CommonError::WiringError(err.to_string()))?;

            debug!("action event registered: protocol=[{}]", protocol);
        }

        let (msg_tx, msg_rx) = mpsc::channel::<DIDCommMsg>(MESSAGE_CHANNEL_DEPTH);
        let service = MsgService::new(
            MSG_SERVICE_ESTABLISH_CONN,
            ESTABLISH_CONN_REQ_MSG_TYPE,
            ESTABLISH_CONN_REQ_PURPOSE,
            msg_tx,
        );

        transport
            .register(service)
            .map_err(|err| CommonError::WiringError(err.to_string()))?;

        let provisioner = Provisioner::new(registry, connections);
        let dispatchers = Dispatchers {
            action: ActionDispatcher::new(action_rx),
            message: MessageDispatcher::new(provisioner, transport.clone()),
            messages: msg_rx,
        };

        let operation = Self {
            issuer: Arc::new(InvitationIssuer::new(factory, label)),
            transport,
        };

        Ok((operation, dispatchers))
    }

    pub async fn issue_invitation(&self) -> Result<Invitation, RouterError> {
        self.issuer.issue().await
    }

    pub async fn deliver(&self, msg: DIDCommMsg) -> Result<Delivery, CommonError> {
        self.transport.deliver(msg).await
    }

    /// `check_topics` drains the next published notification, an idle queue yields a
    /// notification without topic
    pub async fn check_topics(&self) -> Result<TopicNotification, ConfirmationError> {
        self.transport.get_topics().check_topics().await
    }

    pub fn routes(self) -> Router {
        Router::new()
            .route(ROUTE_HEALTH_CHECK, get(handlers::health_check))
            .route(ROUTE_INVITATION, get(handlers::generate_invitation))
            .route(ROUTE_MESSAGE, post(handlers::receive_message))
            .route(ROUTE_CHECK_TOPICS, get(handlers::check_topics))
            .with_state(self)
    }
}
