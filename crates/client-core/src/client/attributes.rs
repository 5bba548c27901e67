//! Bearer attribute operations
//!
//! Attribute reads are asynchronous: `read_bearer_attribute` reports the
//! send outcome, the value arrives later through the attribute-read event
//! and lands in the per-session cache. Re-issuing a read before the prior
//! one completes is harmless - the cache always reflects the latest
//! completed read.

use ringline_bearer_core::{AttributeKind, BearerIndex, SessionId};

use crate::error::{ClientError, ClientResult};

use super::recovery::{retry_with_backoff, RetryConfig};
use super::types::AttributeRead;

/// Attribute operations implementation for ClientManager
impl super::manager::ClientManager {
    /// Request an asynchronous read of a bearer attribute.
    ///
    /// Completion is delivered through the `AttributeRead` event; the value
    /// is then available from [`ClientManager::cached_attribute`].
    ///
    /// # Errors
    ///
    /// * `ClientError::DiscoveryNotComplete` - discovery has not finished
    /// * `ClientError::TransportSendFailed` - the send failed after retries
    pub async fn read_bearer_attribute(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;

        tracing::debug!(
            session_id = %session_id,
            bearer_index = bearer_index,
            kind = ?kind,
            "Requesting attribute read"
        );

        retry_with_backoff("read_bearer_attribute", RetryConfig::quick(), || async {
            self.transport
                .read_attribute(session_id, bearer_index, kind)
                .await
                .map_err(ClientError::from)
        })
        .await
    }

    /// The latest completed read of an attribute, if any.
    ///
    /// `None` means the attribute was never read (or its session is gone) -
    /// not that the attribute is empty.
    pub fn cached_attribute(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
    ) -> Option<AttributeRead> {
        self.attributes
            .get(&(session_id, bearer_index, kind))
            .map(|entry| entry.value().clone())
    }
}
