//! Client builder for creating call-control clients

use std::sync::Arc;

use ringline_bearer_core::BearerTransport;

use crate::client::ClientManager;
use crate::error::{ClientError, ClientResult};
use crate::ClientConfig;

/// Builder for creating a call-control client
///
/// # Examples
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use ringline_client_core::{ClientBuilder, NullTransport};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ClientBuilder::new()
///     .client_name("MyHeadset/1.0")
///     .max_concurrent_calls(2)
///     .transport(Arc::new(NullTransport::new()))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn BearerTransport>>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Set the client name used in logs
    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.config.client_name = client_name.into();
        self
    }

    /// Set the maximum number of concurrent originated calls per session
    pub fn max_concurrent_calls(mut self, max_concurrent_calls: usize) -> Self {
        self.config.max_concurrent_calls = max_concurrent_calls;
        self
    }

    /// Set the capacity of the broadcast event channel
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.config.event_buffer_size = event_buffer_size;
        self
    }

    /// Send control operations for unknown call indices instead of
    /// rejecting them locally
    pub fn lax_call_validation(mut self) -> Self {
        self.config.strict_call_validation = false;
        self
    }

    /// Set the transport backend (required)
    pub fn transport(mut self, transport: Arc<dyn BearerTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub async fn build(self) -> ClientResult<Arc<ClientManager>> {
        let transport = self.transport.ok_or_else(|| ClientError::InvalidConfiguration {
            field: "transport".to_string(),
            reason: "a transport backend is required".to_string(),
        })?;
        ClientManager::new(self.config, transport).await
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
