use std::path::PathBuf;
use std::time::Duration;

use rst_common::standard::serde_json::{self, json};
use rst_common::with_tokio::tokio;

use prople_did_core::did::DID;
use prople_did_core::doc::types::{Doc, ToDoc};

use hubrouter_api::apps::Delivery;
use hubrouter_api::HubRouter;
use hubrouter_core::confirmation::ConfirmationError;
use hubrouter_core::didcomm::types::{
    ESTABLISH_CONN_REQ_MSG_TYPE, ESTABLISH_CONN_REQ_PURPOSE, ESTABLISH_CONN_RESP_MSG_TYPE,
    ESTABLISH_CONN_RESP_PURPOSE,
};
use hubrouter_core::didcomm::DIDCommMsg;
use hubrouter_core::router::types::{ConnectionState, EstablishConn};

fn config_path() -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("src/config/fixtures/config.toml");
    format!("{}", path.display())
}

fn remote_doc() -> Doc {
    DID::new().identity().unwrap().to_doc()
}

fn doc_value(doc: &Doc) -> serde_json::Value {
    serde_json::to_value(doc).unwrap()
}

#[tokio::test]
async fn test_establish_connection_flow() {
    let router = HubRouter::new(&config_path()).unwrap();
    let (operation, dispatchers) = router.build_operation().unwrap();
    let _ = dispatchers.spawn();

    let remote = remote_doc();
    let request = DIDCommMsg::new(&EstablishConn::request(Some(remote.clone()))).unwrap();

    let delivery = operation.deliver(request.clone()).await.unwrap();
    assert_eq!(delivery, Delivery::Queued);

    let topics = router.get_topics();
    let reply = router
        .topic_poller()
        .pull(&topics, ESTABLISH_CONN_RESP_MSG_TYPE)
        .await
        .unwrap();

    assert_ne!(reply.id(), request.id());
    assert_eq!(reply.thread_id(), Some(request.id()));
    assert_eq!(reply.purpose(), vec![ESTABLISH_CONN_RESP_PURPOSE.to_string()]);

    let response: EstablishConn = reply.decode().unwrap();
    let minted = response.did_doc().unwrap();
    assert_ne!(doc_value(&minted), doc_value(&remote));
    assert_eq!(router.get_registry().count().unwrap(), 1);

    let connections = router.get_connections();
    let requested = connections
        .list_by_state(ConnectionState::Requested)
        .unwrap();
    assert_eq!(requested.len(), 1);
    assert_eq!(doc_value(&requested[0].get_remote_doc()), doc_value(&remote));

    let conn_id = requested[0].get_id();
    let updater = connections.clone();
    let updated_id = conn_id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        updater
            .update_state(&updated_id, ConnectionState::Completed)
            .unwrap();
    });

    let attempt = router
        .status_poller()
        .confirm_state(&connections, &conn_id, "completed")
        .await
        .unwrap();
    assert!(attempt > 1);
}

#[tokio::test]
async fn test_identical_requests_mint_distinct_identities() {
    let router = HubRouter::new(&config_path()).unwrap();
    let (operation, dispatchers) = router.build_operation().unwrap();
    let _ = dispatchers.spawn();

    let remote = remote_doc();
    let topics = router.get_topics();
    let poller = router.topic_poller();

    let mut minted = Vec::new();
    for _ in 0..2 {
        let request = DIDCommMsg::new(&EstablishConn::request(Some(remote.clone()))).unwrap();
        operation.deliver(request).await.unwrap();

        let reply = poller
            .pull(&topics, ESTABLISH_CONN_RESP_MSG_TYPE)
            .await
            .unwrap();
        let response: EstablishConn = reply.decode().unwrap();
        minted.push(doc_value(&response.did_doc().unwrap()));
    }

    assert_ne!(minted[0], minted[1]);
    assert_eq!(router.get_registry().count().unwrap(), 2);

    let requested = router
        .get_connections()
        .list_by_state(ConnectionState::Requested)
        .unwrap();
    assert_eq!(requested.len(), 2);
}

#[tokio::test]
async fn test_missing_did_doc_gets_no_reply() {
    let router = HubRouter::new(&config_path()).unwrap();
    let (operation, dispatchers) = router.build_operation().unwrap();
    let _ = dispatchers.spawn();

    let request = DIDCommMsg::try_from(json!({
        "@id": "req-without-doc",
        "@type": ESTABLISH_CONN_REQ_MSG_TYPE,
        "~purpose": [ESTABLISH_CONN_REQ_PURPOSE],
        "data": null
    }))
    .unwrap();

    let delivery = operation.deliver(request).await.unwrap();
    assert_eq!(delivery, Delivery::Queued);

    // nothing is ever published, the poller keeps waiting for its topic
    let pulled = tokio::time::timeout(
        Duration::from_millis(300),
        router
            .topic_poller()
            .pull(&router.get_topics(), ESTABLISH_CONN_RESP_MSG_TYPE),
    )
    .await;

    assert!(pulled.is_err());
    assert_eq!(router.get_registry().count().unwrap(), 0);
    assert!(router
        .get_connections()
        .list_by_state(ConnectionState::Requested)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_status_poller_times_out() {
    let router = HubRouter::new(&config_path()).unwrap();
    let (operation, dispatchers) = router.build_operation().unwrap();
    let _ = dispatchers.spawn();

    let request = DIDCommMsg::new(&EstablishConn::request(Some(remote_doc()))).unwrap();
    operation.deliver(request).await.unwrap();
    router
        .topic_poller()
        .pull(&router.get_topics(), ESTABLISH_CONN_RESP_MSG_TYPE)
        .await
        .unwrap();

    let connections = router.get_connections();
    let conn_id = connections
        .list_by_state(ConnectionState::Requested)
        .unwrap()[0]
        .get_id();

    let confirmed = router
        .status_poller()
        .confirm(&connections, &conn_id, ConnectionState::Completed)
        .await;

    assert!(matches!(
        confirmed.unwrap_err(),
        ConfirmationError::ConvergenceTimeoutError { attempts: 30, .. }
    ));
}
