use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::{debug, info, warn};
use rst_common::with_tokio::tokio::sync::mpsc::Sender;

use hubrouter_core::didcomm::types::{DIDEXCHANGE_PROTOCOL, MEDIATOR_PROTOCOL};
use hubrouter_core::didcomm::{ActionEvent, DIDCommMsg, Decision};
use hubrouter_core::router::types::{
    ActionRegistrarBuilder, ActionType, MessengerBuilder, MsgService, MsgServiceRegistrarBuilder,
    RouterError,
};

use crate::common::types::CommonError;

use super::topics::TopicQueue;

pub const DEFAULT_PENDING_REPLIES: usize = 1024;

/// `Protocol` lists the protocol clients able to emit action events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    DIDExchange,
    Mediator,
}

impl Protocol {
    pub fn uri(&self) -> &'static str {
        match self {
            Protocol::DIDExchange => DIDEXCHANGE_PROTOCOL,
            Protocol::Mediator => MEDIATOR_PROTOCOL,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

impl From<ActionType> for Protocol {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::DIDExchangeRequest => Protocol::DIDExchange,
            ActionType::MediationRequest => Protocol::Mediator,
        }
    }
}

/// `Delivery` is the outcome of an inbound message handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// an action event has been decided by its consumer
    Decided(Decision),

    /// the message was queued on a registered message service
    Queued,
}

/// `PendingReplies` remembers the inbound message ids still waiting for a reply
///
/// It holds at most `capacity` ids, the oldest one is forgotten first
struct PendingReplies {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl PendingReplies {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            ids: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, id: String) {
        if self.ids.contains(&id) {
            return;
        }

        while self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                warn!("pending reply evicted: id=[{}]", evicted);
                self.ids.remove(&evicted);
            }
        }

        self.ids.insert(id.clone());
        self.order.push_back(id);
    }

    fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }

        self.order.retain(|pending| pending != id);
        true
    }
}

struct Registry {
    actions: RwLock<HashMap<Protocol, Sender<ActionEvent>>>,
    services: RwLock<Vec<MsgService>>,
    pending_replies: Mutex<PendingReplies>,
}

impl Registry {
    fn new(capacity: usize) -> Self {
        Self {
            actions: RwLock::new(HashMap::new()),
            services: RwLock::new(Vec::new()),
            pending_replies: Mutex::new(PendingReplies::new(capacity)),
        }
    }
}

/// `LocalTransport` is an in-process stand-in for the `DIDComm` framework
///
/// Inbound messages go through [`LocalTransport::deliver`]. Replies sent through the
/// [`MessengerBuilder`] implementation are published on the [`TopicQueue`] under the reply
/// message type.
#[derive(Clone)]
pub struct LocalTransport {
    registry: Arc<Registry>,
    topics: TopicQueue,
}

impl LocalTransport {
    pub fn new(topics: TopicQueue) -> Self {
        Self::with_capacity(topics, DEFAULT_PENDING_REPLIES)
    }

    /// `with_capacity` bounds how many delivered messages can wait for a reply at once
    pub fn with_capacity(topics: TopicQueue, capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry::new(capacity)),
            topics,
        }
    }

    pub fn client(&self, protocol: Protocol) -> ProtocolClient {
        ProtocolClient {
            protocol,
            registry: self.registry.clone(),
        }
    }

    pub fn get_topics(&self) -> TopicQueue {
        self.topics.clone()
    }

    pub async fn deliver(&self, msg: DIDCommMsg) -> Result<Delivery, CommonError> {
        let msg_type = msg.msg_type();

        if let Ok(action) = ActionType::try_from(msg_type.as_str()) {
            let protocol = Protocol::from(action);
            let channel = self.action_channel(protocol)?;

            let (event, decision) = ActionEvent::new(msg);
            channel
                .send(event)
                .await
                .map_err(|err| CommonError::TransportError(err.to_string()))?;

            let decided = decision
                .await
                .map_err(|err| CommonError::TransportError(err.to_string()))?;

            debug!("action decided: protocol=[{}] msgType=[{}]", protocol, msg_type);
            return Ok(Delivery::Decided(decided));
        }

        let channel = self
            .service_channel(&msg)?
            .ok_or(CommonError::UnroutableMessage(msg_type.clone()))?;

        if msg.id().is_empty() {
            return Err(CommonError::ValidationError(
                "missing message id".to_string(),
            ));
        }

        // registered before sending, the consumer may reply as soon as it receives
        let msg_id = msg.id();
        self.pending()?.insert(msg_id.clone());

        if let Err(err) = channel.send(msg).await {
            self.pending()?.remove(&msg_id);
            return Err(CommonError::TransportError(err.to_string()));
        }

        Ok(Delivery::Queued)
    }

    fn pending(&self) -> Result<MutexGuard<'_, PendingReplies>, CommonError> {
        self.registry
            .pending_replies
            .lock()
            .map_err(|err| CommonError::TransportError(err.to_string()))
    }

    fn action_channel(&self, protocol: Protocol) -> Result<Sender<ActionEvent>, CommonError> {
        let actions = self
            .registry
            .actions
            .read()
            .map_err(|err| CommonError::TransportError(err.to_string()))?;

        actions.get(&protocol).cloned().ok_or(CommonError::WiringError(format!(
            "no action channel registered for protocol: {}",
            protocol
        )))
    }

    fn service_channel(&self, msg: &DIDCommMsg) -> Result<Option<Sender<DIDCommMsg>>, CommonError> {
        let services = self
            .registry
            .services
            .read()
            .map_err(|err| CommonError::TransportError(err.to_string()))?;

        Ok(services
            .iter()
            .find(|svc| svc.accepts(msg))
            .map(|svc| svc.channel.clone()))
    }
}

impl MsgServiceRegistrarBuilder for LocalTransport {
    fn register(&self, service: MsgService) -> Result<(), RouterError> {
        let mut services = self
            .registry
            .services
            .write()
            .map_err(|err| RouterError::RegistrationError(err.to_string()))?;

        if services.iter().any(|svc| svc.name == service.name) {
            return Err(RouterError::RegistrationError(format!(
                "message service already registered: {}",
                service.name
            )));
        }

        info!(
            "message service registered: name=[{}] msgType=[{}]",
            service.name, service.msg_type
        );

        services.push(service);
        Ok(())
    }
}

#[async_trait]
impl MessengerBuilder for LocalTransport {
    async fn reply_to(&self, msg_id: String, reply: DIDCommMsg) -> Result<(), RouterError> {
        let known = self
            .registry
            .pending_replies
            .lock()
            .map_err(|err| RouterError::ReplyError(err.to_string()))?
            .remove(&msg_id);

        if !known {
            return Err(RouterError::ReplyError(format!(
                "unknown inbound message: {}",
                msg_id
            )));
        }

        let reply = reply.with_thread_id(&msg_id);
        let topic = reply.msg_type();
        self.topics.publish(&topic, Some(reply)).await;
        Ok(())
    }
}

/// `ProtocolClient` registers action channels on behalf of a single protocol
pub struct ProtocolClient {
    protocol: Protocol,
    registry: Arc<Registry>,
}

impl ActionRegistrarBuilder for ProtocolClient {
    fn register_action_event(&self, channel: Sender<ActionEvent>) -> Result<(), RouterError> {
        let mut actions = self
            .registry
            .actions
            .write()
            .map_err(|err| RouterError::RegistrationError(err.to_string()))?;

        if actions.contains_key(&self.protocol) {
            return Err(RouterError::RegistrationError(format!(
                "action event already registered for protocol: {}",
                self.protocol
            )));
        }

        actions.insert(self.protocol, channel);
        Ok(())
    }
}
