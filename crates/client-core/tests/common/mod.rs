//! Shared helpers for the integration suites

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ringline_client_core::{
    ClientBuilder, ClientEvent, ClientEventHandler, ClientManager, NullTransport, SessionId,
    TransportObserver,
};

/// Initialize tracing once per test binary; respects RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Event handler that records every event it sees
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<ClientEvent>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_matching(&self, predicate: impl Fn(&ClientEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

#[async_trait]
impl ClientEventHandler for EventLog {
    async fn on_client_event(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A started client with a recording transport, an event log, and one
/// connected session
pub struct Harness {
    pub client: Arc<ClientManager>,
    pub transport: Arc<NullTransport>,
    pub observer: Arc<dyn TransportObserver>,
    pub log: Arc<EventLog>,
    pub session_id: SessionId,
}

/// Build a started client with one connected (but undiscovered) session
pub async fn connected_harness() -> Harness {
    init_tracing();

    let transport = Arc::new(NullTransport::new());
    let log = EventLog::new();
    let client = ClientBuilder::new()
        .client_name("integration-tests")
        .transport(transport.clone())
        .build()
        .await
        .expect("client creation failed");
    client.set_event_handler(log.clone()).await;
    client.start().await.expect("client start failed");

    let observer = client.transport_observer();
    let session_id = uuid::Uuid::new_v4();
    observer.on_session_connected(session_id).await;

    Harness {
        client,
        transport,
        observer,
        log,
        session_id,
    }
}

/// Build a started client with one discovered session (generic bearer found)
pub async fn discovered_harness() -> Harness {
    let harness = connected_harness().await;
    harness
        .client
        .discover(harness.session_id)
        .await
        .expect("discover failed");
    harness
        .observer
        .on_discovery_complete(harness.session_id, 0, 1, true)
        .await;
    harness.transport.take_requests();
    harness
}
