//! Bearer-core: shared vocabulary for telephone-bearer call control
//!
//! This crate defines the protocol-level types exchanged between a
//! call-control client and the transport backend that carries its requests
//! and notifications: call lifecycle states, call and bearer indices,
//! control operations, readable bearer attributes, termination reasons, and
//! the transport traits that tie the two layers together.
//!
//! ## Proper Layer Separation
//! ```text
//! client-core -> bearer-core <- transport backend
//! ```
//!
//! Bearer-core carries no policy and no mutable state. The client layer
//! decides *when* an operation is valid; a transport backend decides *how*
//! a request reaches the peer. Both speak the types defined here.
//!
//! # Examples
//!
//! ```rust
//! use ringline_bearer_core::{CallState, validate_target_uri};
//!
//! assert!(CallState::RemotelyHeld.is_held());
//! assert!(!CallState::Terminated.is_in_progress());
//! assert!(validate_target_uri("tel:123456789012").is_ok());
//! assert!(validate_target_uri("no-scheme-here").is_err());
//! ```

pub mod attribute;
pub mod call;
pub mod control;
pub mod transport;
pub mod uri;

pub use attribute::{AttributeKind, AttributeValue};
pub use call::{
    BearerIndex, CallIndex, CallState, CallStateUpdate, TerminationReason, GENERIC_BEARER_INDEX,
};
pub use control::ControlOp;
pub use transport::{
    BearerTransport, SessionId, TransportError, TransportObserver, TransportResult,
};
pub use uri::{uri_scheme, validate_target_uri, UriError};

/// Bearer-core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
