//! High-level call-control client implementation
//!
//! This module is organized into several sub-modules:
//!
//! - **`manager`** - The main ClientManager that coordinates all operations
//! - **`handler`** - The event dispatcher fed by the transport backend
//! - **`discovery`** - Service discovery sequencing
//! - **`calls`** - Control operations and registry queries
//! - **`attributes`** - Bearer attribute reads and the attribute cache
//! - **`config`** / **`builder`** - Configuration and construction
//! - **`recovery`** - Retry and timeout helpers
//!
//! # Usage Guide
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # use ringline_client_core::{ClientBuilder, ClientEvent, CallState, NullTransport};
//! # use ringline_client_core::GENERIC_BEARER_INDEX;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Create and start the client
//! let client = ClientBuilder::new()
//!     .client_name("MyApp/1.0")
//!     .transport(Arc::new(NullTransport::new()))
//!     .build()
//!     .await?;
//! client.start().await?;
//!
//! // 2. Subscribe to events
//! let mut events = client.subscribe_events();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let ClientEvent::CallStateChanged { info, .. } = event {
//!             match info.new_state {
//!                 CallState::Active => println!("call connected!"),
//!                 CallState::Terminated => break,
//!                 _ => {}
//!             }
//!         }
//!     }
//! });
//!
//! // 3. The transport driver feeds the dispatcher; once a session is
//! //    connected and discovered, control operations are unlocked
//! let session_id = uuid::Uuid::new_v4();
//! client.transport_observer().on_session_connected(session_id).await;
//! client.discover(session_id).await?;
//! client.wait_for_discovery(session_id, Duration::from_secs(5)).await?;
//! client.originate(session_id, GENERIC_BEARER_INDEX, "tel:123456789012").await?;
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod builder;
pub mod calls;
pub mod config;
pub mod discovery;
pub mod handler;
pub mod manager;
pub mod recovery;
pub mod types;


pub use builder::ClientBuilder;
pub use config::ClientConfig;
pub use handler::ClientSessionHandler;
pub use manager::ClientManager;

// Re-export all types from types.rs
pub use types::{AttributeRead, ClientStats, DiscoveryState, SessionInfo};

// Re-export recovery utilities
pub use recovery::{retry_with_backoff, with_timeout, ErrorContext, RetryConfig};

// Type alias for convenient use
pub type Client = ClientManager;
