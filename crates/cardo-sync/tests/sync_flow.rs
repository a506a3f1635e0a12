//! End-to-end tests: a session talking to a live relay on loopback.
//!
//! The relay is bound to an ephemeral port, so tests can run in parallel.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use cardo_relay::RelayState;
use cardo_store::{Action, MutationKind, State};
use cardo_sync::{Session, SyncConfig};
use tokio::net::TcpListener;

/// Polls before [`eventually`] gives up (5s at 20ms).
const POLLS: u32 = 250;

async fn start_relay() -> (Arc<RelayState>, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let relay = Arc::new(RelayState::new());
    tokio::spawn(cardo_relay::serve(listener, Arc::clone(&relay)));
    (relay, url)
}

/// Poll `check` every 20ms until it holds or [`POLLS`] run out.
async fn eventually<F>(mut check: F) -> bool
where
    F: AsyncFnMut() -> bool,
{
    for _ in 0..POLLS {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn message_round_trips_through_relay_once() {
    let (relay, url) = start_relay().await;
    let session = Session::start(&SyncConfig::for_server(url), State::new()).unwrap();

    assert!(
        eventually(async || relay.subscriber_count() >= 1).await,
        "session never opened the event stream"
    );

    session
        .dispatch(Action::AddMessage("hello".to_owned()))
        .await
        .unwrap();

    assert!(
        eventually(async || {
            session
                .read(|state| state.messages() == ["hello", "hello"])
                .await
        })
        .await,
        "relayed message never came back"
    );

    let store = session.store();
    {
        let guard = store.read().await;
        let log = guard.store().log();
        assert_eq!(log.count_of(MutationKind::AddMessage), 1);
        assert_eq!(log.count_of(MutationKind::CheckIn), 1);
        assert_eq!(log.count_of(MutationKind::AddLogLine), 1);
        assert!(
            guard
                .state()
                .logs()
                .last()
                .is_some_and(|line| line.ends_with(": hello"))
        );
    }
    drop(store);

    // The echo is not forwarded again.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(relay.entries_received(), 1);

    session.shutdown().await;
}

#[tokio::test]
async fn local_only_actions_are_not_posted() {
    let (relay, url) = start_relay().await;
    let session = Session::start(&SyncConfig::for_server(url), State::seeded()).unwrap();
    assert!(eventually(async || relay.subscriber_count() >= 1).await);

    session
        .dispatch(Action::AddLogLine("local".to_owned()))
        .await
        .unwrap();
    session
        .dispatch_named(
            "cards_upsertFieldOnCard",
            serde_json::json!({"field": "priority", "value": 2, "card_id": "1"}),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(relay.entries_received(), 0);
    assert!(session.is_streaming());

    session.shutdown().await;
}

#[tokio::test]
async fn unreachable_server_leaves_local_state_intact() {
    let session = Session::start(&SyncConfig::for_server("http://127.0.0.1:9"), State::new()).unwrap();

    session
        .dispatch(Action::AddMessage("offline".to_owned()))
        .await
        .unwrap();

    assert!(eventually(async || !session.is_streaming()).await);
    assert_eq!(session.read(|state| state.messages().to_vec()).await, ["offline"]);

    session.shutdown().await;
}

#[tokio::test]
async fn shutdown_returns_while_store_handle_is_held() {
    let (relay, url) = start_relay().await;
    let session = Session::start(&SyncConfig::for_server(url), State::new()).unwrap();
    assert!(eventually(async || relay.subscriber_count() >= 1).await);

    let store = session.store();
    let finished = tokio::time::timeout(Duration::from_secs(5), session.shutdown()).await;
    assert!(finished.is_ok(), "shutdown waited on an outstanding store handle");

    // The handle still works locally; nothing more is forwarded.
    store
        .write()
        .await
        .dispatch(Action::AddMessage("after shutdown".to_owned()))
        .unwrap();
    assert_eq!(store.read().await.state().messages(), ["after shutdown"]);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(relay.entries_received(), 0);
}
