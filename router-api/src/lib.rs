//! `hubrouter-api` provides the runtime side of the hub router: configuration, in-process
//! adapters for every collaborator used by `hubrouter-core`, and the HTTP operations
//!
//! [`HubRouter`] is the main entrypoint, it loads the configuration and wires everything
//! together:
//!
//! ```no_run
//! use hubrouter_api::HubRouter;
//!
//! # async fn run() -> Result<(), hubrouter_api::common::types::CommonError> {
//! let router = HubRouter::new("./config.toml")?;
//! let (operation, dispatchers) = router.build_operation()?;
//! let _ = dispatchers.spawn();
//! let _app = operation.routes();
//! # Ok(())
//! # }
//! ```
use rstdev_config::types::ConfigError;

use hubrouter_core::confirmation::{StatusPoller, TopicPoller};

pub mod apps;
pub mod common;
pub mod operation;

mod config;
pub use config::{
    App as AppConfig, Config, Confirmation as ConfirmationConfig, Router as RouterConfig,
};

use config::Parser as ConfigManager;

use apps::{ConnectionStore, LocalTransport, OutOfBandFactory, PeerRegistry, TopicQueue};
use common::helpers;
use common::types::CommonError;
use operation::{Dispatchers, Operation};

/// `HubRouter` owns the parsed configuration and the shared adapters
///
/// Adapters are cheap handles over shared storage, cloning them out of the builder
/// gives access to the same state the dispatchers work on
pub struct HubRouter {
    config: Config,
    registry: PeerRegistry,
    connections: ConnectionStore,
    transport: LocalTransport,
}

impl HubRouter {
    pub fn new(conf_file: &str) -> Result<Self, CommonError> {
        let config = ConfigManager::new(conf_file.to_string())
            .parse()
            .map_err(|err: ConfigError| CommonError::ConfigError(err.to_string()))?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, CommonError> {
        helpers::validate(config.clone())?;

        Ok(Self {
            config,
            registry: PeerRegistry::new(),
            connections: ConnectionStore::new(),
            transport: LocalTransport::new(TopicQueue::default()),
        })
    }

    pub fn build_app_config(&self) -> Result<AppConfig, CommonError> {
        Ok(self.config.app().to_owned())
    }

    pub fn build_operation(&self) -> Result<(Operation, Dispatchers), CommonError> {
        let router = self.config.router();
        let factory = OutOfBandFactory::new(router.get_service_endpoint());

        Operation::new(
            self.transport.clone(),
            self.registry.clone(),
            self.connections.clone(),
            factory,
            router.get_label(),
        )
    }

    pub fn status_poller(&self) -> StatusPoller {
        self.config.confirmation().status_poller()
    }

    pub fn topic_poller(&self) -> TopicPoller {
        self.config.confirmation().topic_poller()
    }

    pub fn get_registry(&self) -> PeerRegistry {
        self.registry.clone()
    }

    pub fn get_connections(&self) -> ConnectionStore {
        self.connections.clone()
    }

    pub fn get_transport(&self) -> LocalTransport {
        self.transport.clone()
    }

    pub fn get_topics(&self) -> TopicQueue {
        self.transport.get_topics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::helpers::fixtures;

    #[test]
    fn test_build_from_file() {
        let router = HubRouter::new(&fixtures::fixture_path("config.toml"));
        assert!(!router.is_err());

        let router = router.unwrap();
        let app = router.build_app_config().unwrap();
        assert_eq!(app.get_listen_addr(), "localhost:10200");

        let poller = router.status_poller();
        assert_eq!(poller.get_attempts(), 30);
        assert_eq!(poller.get_interval().as_millis(), 10);

        let topic = router.topic_poller();
        assert_eq!(topic.get_attempts(), 25);
        assert_eq!(topic.get_wait().as_millis(), 20);
    }

    #[test]
    fn test_build_missing_file() {
        let router = HubRouter::new(&fixtures::fixture_path("missing.toml"));
        assert!(matches!(router.err(), Some(CommonError::ConfigError(_))));
    }

    #[test]
    fn test_build_invalid_config() {
        let router = HubRouter::from_config(Config::default());
        assert!(matches!(
            router.err(),
            Some(CommonError::ValidationError(_))
        ));
    }
}
