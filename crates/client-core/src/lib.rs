//! Client-core: high-level call-control client coordination layer
//!
//! This crate provides the client-side state machine for a remote telephone
//! call-control service: service discovery sequencing, per-call state
//! tracking driven by asynchronous notifications, control operations gated
//! on discovery completion, and the event contract between the transport
//! layer and the application.
//!
//! ## Proper Layer Separation
//! ```text
//! application -> client-core -> bearer-core <- transport backend
//! ```
//!
//! Client-core focuses on:
//! - Discovery sequencing and gating of control operations
//! - The call registry: the sole source of truth for which calls exist
//! - Event handling for application integration
//! - Configuration management
//!
//! Connection establishment and the byte-level notification machinery are
//! the transport backend's job; client-core only consumes its events and
//! hands it requests.
//!
//! # Basic Flow
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ringline_client_core::{ClientBuilder, CallState, NullTransport};
//! use ringline_client_core::GENERIC_BEARER_INDEX;
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create and start the client with a transport backend
//!     let transport = Arc::new(NullTransport::new());
//!     let client = ClientBuilder::new()
//!         .client_name("MyHeadset/1.0")
//!         .transport(transport.clone())
//!         .build()
//!         .await?;
//!     client.start().await?;
//!
//!     // 2. Hand the dispatcher to the transport driver
//!     let observer = client.transport_observer();
//!     let session_id = uuid::Uuid::new_v4();
//!     observer.on_session_connected(session_id).await;
//!
//!     // 3. Discover the peer's bearer services, then wait for completion
//!     client.discover(session_id).await?;
//!     client.wait_for_discovery(session_id, Duration::from_secs(5)).await?;
//!
//!     // 4. Place a call and follow it through the registry
//!     client.originate(session_id, GENERIC_BEARER_INDEX, "tel:123456789012").await?;
//!     client
//!         .wait_for_call_state(session_id, 0, CallState::Active, Duration::from_secs(30))
//!         .await?;
//!
//!     client.hold(session_id, GENERIC_BEARER_INDEX, 0).await?;
//!     Ok(())
//! }
//! ```

pub mod call;
pub mod client;
pub mod error;
pub mod events;
pub mod transport;

// Public API exports (only high-level client-core types)
pub use call::CallInfo;
pub use client::{
    ClientBuilder, ClientConfig, ClientManager, ClientSessionHandler, ClientStats, DiscoveryState,
};
pub use error::{ClientError, ClientResult};
pub use events::{
    AttributeReadInfo, CallStatusInfo, ClientEvent, ClientEventHandler, DiscoveryInfo,
    EventFilter, EventPriority, IncomingCallInfo, TerminationInfo,
};
pub use transport::{NullTransport, SentRequest};

// Re-export the protocol vocabulary from bearer-core (for convenience)
pub use ringline_bearer_core::{
    AttributeKind, AttributeValue, BearerIndex, BearerTransport, CallIndex, CallState,
    CallStateUpdate, ControlOp, SessionId, TerminationReason, TransportError, TransportObserver,
    GENERIC_BEARER_INDEX,
};

/// Client-core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
