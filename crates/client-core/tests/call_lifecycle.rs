//! End-to-end call lifecycle scenarios driven through the dispatcher

mod common;

use std::time::Duration;

use common::{connected_harness, discovered_harness};
use tokio_test::assert_ok;
use ringline_client_core::{
    AttributeKind, AttributeValue, CallState, CallStateUpdate, ClientError, ClientEvent,
    ControlOp, DiscoveryState, SentRequest, GENERIC_BEARER_INDEX,
};

/// The reference scenario: discover, originate, follow the call through
/// hold and retrieve, then read the provider name
#[tokio::test]
async fn full_call_lifecycle() {
    let h = connected_harness().await;
    let session = h.session_id;

    // Discovery: request goes out, completion unlocks the session
    h.client.discover(session).await.unwrap();
    assert_eq!(
        h.transport.take_requests(),
        vec![SentRequest::Discover { session_id: session }]
    );
    h.observer.on_discovery_complete(session, 0, 1, true).await;
    assert_eq!(
        h.client.discovery_state(session).unwrap(),
        DiscoveryState::Complete {
            bearer_count: 1,
            generic_bearer: true
        }
    );
    let state = h
        .client
        .wait_for_discovery(session, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(state.is_complete());

    // Place the call
    h.client
        .originate(session, GENERIC_BEARER_INDEX, "tel:123456789012")
        .await
        .unwrap();
    let sent = h.transport.take_requests();
    assert_eq!(
        sent,
        vec![SentRequest::Control {
            session_id: session,
            bearer_index: GENERIC_BEARER_INDEX,
            op: ControlOp::Originate {
                uri: "tel:123456789012".to_string()
            },
        }]
    );

    // Call transitions:
    // 1) Dialing
    // 2) Alerting
    // 3) Active
    // 4) Remotely held
    for state in [
        CallState::Dialing,
        CallState::Alerting,
        CallState::Active,
        CallState::RemotelyHeld,
    ] {
        h.observer
            .on_call_states(session, 0, vec![CallStateUpdate::new(0, state)])
            .await;
    }
    assert_eq!(
        h.client.get_call(session, 0).unwrap().state,
        CallState::RemotelyHeld
    );
    h.client
        .wait_for_call_state(session, 0, CallState::RemotelyHeld, Duration::from_secs(1))
        .await
        .unwrap();

    // Hold; the peer walks through both-held to locally-held
    tokio_test::assert_ok!(h.client.hold(session, GENERIC_BEARER_INDEX, 0).await);
    for state in [CallState::LocallyAndRemotelyHeld, CallState::LocallyHeld] {
        h.observer
            .on_call_states(session, 0, vec![CallStateUpdate::new(0, state)])
            .await;
    }
    assert_eq!(
        h.client.get_call(session, 0).unwrap().state,
        CallState::LocallyHeld
    );

    // Retrieve back to active
    tokio_test::assert_ok!(h.client.retrieve(session, GENERIC_BEARER_INDEX, 0).await);
    h.observer
        .on_call_states(session, 0, vec![CallStateUpdate::new(0, CallState::Active)])
        .await;
    h.client
        .wait_for_call_state(session, 0, CallState::Active, Duration::from_secs(1))
        .await
        .unwrap();

    // Read the provider name; the value lands in the cache
    h.client
        .read_bearer_attribute(session, GENERIC_BEARER_INDEX, AttributeKind::ProviderName)
        .await
        .unwrap();
    h.observer
        .on_attribute_read(
            session,
            GENERIC_BEARER_INDEX,
            AttributeKind::ProviderName,
            0,
            Some(AttributeValue::Text("Bearer1".to_string())),
        )
        .await;
    let cached = h
        .client
        .cached_attribute(session, GENERIC_BEARER_INDEX, AttributeKind::ProviderName)
        .expect("provider name should be cached");
    assert_eq!(cached.value.as_text(), Some("Bearer1"));

    // The observer saw the whole story, starting from the connect event
    let events = h.log.events();
    assert!(matches!(events[0], ClientEvent::SessionConnected { .. }));
    assert_eq!(
        h.log
            .count_matching(|e| matches!(e, ClientEvent::DiscoveryCompleted { .. })),
        1
    );
    assert!(
        h.log
            .count_matching(|e| matches!(e, ClientEvent::CallStateChanged { .. }))
            >= 7
    );
    assert_eq!(
        h.log
            .count_matching(|e| matches!(e, ClientEvent::AttributeRead { .. })),
        1
    );
}

/// A failed discovery resets the session and keeps the issuer blocked
#[tokio::test]
async fn discovery_failure_keeps_operations_blocked() {
    let h = connected_harness().await;
    let session = h.session_id;

    h.client.discover(session).await.unwrap();
    h.observer.on_discovery_complete(session, 1, 0, false).await;

    assert_eq!(
        h.client.discovery_state(session).unwrap(),
        DiscoveryState::NotStarted
    );
    assert!(matches!(
        h.client.originate(session, 0, "tel:123456789012").await,
        Err(ClientError::DiscoveryNotComplete { .. })
    ));

    // The failure reached observers as an explicit error event
    assert_eq!(
        h.log.count_matching(|e| matches!(
            e,
            ClientEvent::ClientError {
                error: ClientError::DiscoveryFailed { code: 1 },
                ..
            }
        )),
        1
    );

    // And discovery may be attempted again after the failure
    h.client.discover(session).await.unwrap();
    h.observer.on_discovery_complete(session, 0, 2, false).await;
    assert_eq!(
        h.client.discovery_state(session).unwrap(),
        DiscoveryState::Complete {
            bearer_count: 2,
            generic_bearer: false
        }
    );
}

/// A discovery failure arriving mid-wait fails the waiter explicitly
#[tokio::test]
async fn wait_for_discovery_observes_a_concurrent_failure() {
    let h = connected_harness().await;
    let session = h.session_id;

    h.client.discover(session).await.unwrap();

    let observer = h.observer.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        observer.on_discovery_complete(session, 4, 0, false).await;
    });

    let result = h
        .client
        .wait_for_discovery(session, Duration::from_secs(2))
        .await;
    assert!(matches!(
        result,
        Err(ClientError::DiscoveryFailed { code: 4 })
    ));
}

/// Incoming calls surface as events and can be accepted and ended
#[tokio::test]
async fn accept_and_terminate_an_incoming_call() {
    let h = discovered_harness().await;
    let session = h.session_id;

    h.observer
        .on_call_states(session, 0, vec![CallStateUpdate::new(3, CallState::Incoming)])
        .await;
    assert_eq!(
        h.log
            .count_matching(|e| matches!(e, ClientEvent::IncomingCall { .. })),
        1
    );

    h.client
        .accept(session, GENERIC_BEARER_INDEX, 3)
        .await
        .unwrap();
    h.observer
        .on_call_states(session, 0, vec![CallStateUpdate::new(3, CallState::Active)])
        .await;
    assert_eq!(
        h.client.get_call(session, 3).unwrap().state,
        CallState::Active
    );

    h.client
        .terminate(session, GENERIC_BEARER_INDEX, 3)
        .await
        .unwrap();
    let sent = h.transport.take_requests();
    assert!(sent.iter().any(|r| matches!(
        r,
        SentRequest::Control {
            op: ControlOp::Terminate { call_index: 3 },
            ..
        }
    )));
}

/// Send failures surface as transport errors and touch no state
#[tokio::test]
async fn send_failures_surface_after_retries() {
    let h = discovered_harness().await;
    let session = h.session_id;

    h.observer
        .on_call_states(session, 0, vec![CallStateUpdate::new(0, CallState::Active)])
        .await;

    h.transport.set_fail_sends(true);
    let result = h.client.hold(session, GENERIC_BEARER_INDEX, 0).await;
    assert!(matches!(
        result,
        Err(ClientError::TransportSendFailed { .. })
    ));

    // Nothing was recorded by the transport and the registry is untouched
    assert!(h.transport.sent_requests().is_empty());
    assert_eq!(
        h.client.get_call(session, 0).unwrap().state,
        CallState::Active
    );
}
