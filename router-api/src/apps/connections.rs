use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::debug;

use prople_did_core::doc::types::Doc;

use hubrouter_core::confirmation::{ConfirmationError, StatusQueryBuilder};
use hubrouter_core::router::types::{
    ConnectionID, ConnectionManagerBuilder, ConnectionState, RouterError,
};
use hubrouter_core::router::Connection;

/// `ConnectionStore` keeps connection records in memory
///
/// The router only creates records, state transitions come from the transport side
/// through [`ConnectionStore::update_state`]
#[derive(Clone, Default)]
pub struct ConnectionStore {
    connections: Arc<RwLock<HashMap<ConnectionID, Connection>>>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_connection(&self, id: &ConnectionID) -> Result<Connection, RouterError> {
        let connections = self
            .connections
            .read()
            .map_err(|err| RouterError::ConnectionError(err.to_string()))?;

        connections
            .get(id)
            .cloned()
            .ok_or(RouterError::ConnectionError(format!(
                "connection not found: {}",
                id
            )))
    }

    pub fn update_state(
        &self,
        id: &ConnectionID,
        state: ConnectionState,
    ) -> Result<(), RouterError> {
        let mut connections = self
            .connections
            .write()
            .map_err(|err| RouterError::ConnectionError(err.to_string()))?;

        let connection = connections
            .get_mut(id)
            .ok_or(RouterError::ConnectionError(format!(
                "connection not found: {}",
                id
            )))?;

        connection.update_state(state);
        debug!("connection state updated: connID=[{}] state=[{}]", id, state);
        Ok(())
    }

    pub fn list_by_state(&self, state: ConnectionState) -> Result<Vec<Connection>, RouterError> {
        let connections = self
            .connections
            .read()
            .map_err(|err| RouterError::ConnectionError(err.to_string()))?;

        Ok(connections
            .values()
            .filter(|conn| conn.get_state() == state)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ConnectionManagerBuilder for ConnectionStore {
    async fn create_connection(
        &self,
        local_did: String,
        remote_doc: Doc,
    ) -> Result<ConnectionID, RouterError> {
        if local_did.is_empty() {
            return Err(RouterError::ConnectionError(
                "missing local did".to_string(),
            ));
        }

        let connection = Connection::new(local_did, remote_doc);
        let id = connection.get_id();

        let mut connections = self
            .connections
            .write()
            .map_err(|err| RouterError::ConnectionError(err.to_string()))?;

        connections.insert(id.clone(), connection);
        Ok(id)
    }
}

#[async_trait]
impl StatusQueryBuilder for ConnectionStore {
    async fn query_connection(
        &self,
        id: &ConnectionID,
    ) -> Result<ConnectionState, ConfirmationError> {
        self.get_connection(id)
            .map(|conn| conn.get_state())
            .map_err(|err| ConfirmationError::QueryError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rst_common::with_tokio::tokio;

    use prople_did_core::did::DID;
    use prople_did_core::doc::types::ToDoc;

    fn remote_doc() -> Doc {
        DID::new().identity().unwrap().to_doc()
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let store = ConnectionStore::new();
        let id = store
            .create_connection("did:prople:local".to_string(), remote_doc())
            .await
            .unwrap();

        let state = store.query_connection(&id).await.unwrap();
        assert_eq!(state, ConnectionState::Requested);

        store.update_state(&id, ConnectionState::Completed).unwrap();
        let state = store.query_connection(&id).await.unwrap();
        assert_eq!(state, ConnectionState::Completed);

        let completed = store.list_by_state(ConnectionState::Completed).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].get_local_did(), "did:prople:local");
    }

    #[tokio::test]
    async fn test_missing_local_did() {
        let store = ConnectionStore::new();
        let created = store.create_connection("".to_string(), remote_doc()).await;
        assert!(matches!(
            created.unwrap_err(),
            RouterError::ConnectionError(_)
        ));
    }

    #[tokio::test]
    async fn test_query_unknown_connection() {
        let store = ConnectionStore::new();
        let state = store.query_connection(&ConnectionID::generate()).await;
        assert!(matches!(
            state.unwrap_err(),
            ConfirmationError::QueryError(_)
        ));

        let updated = store.update_state(&ConnectionID::generate(), ConnectionState::Responded);
        assert!(updated.is_err());
    }
}
