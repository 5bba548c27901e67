//! Control operations sent to a telephone bearer
//!
//! A control operation is a request only: the peer confirms (or refuses)
//! asynchronously through the call-state feed, never through the send path.

use serde::{Deserialize, Serialize};

use crate::call::CallIndex;

/// One call-control request addressed at a bearer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlOp {
    /// Place an outgoing call to the given target URI
    Originate { uri: String },
    /// Accept an incoming call
    Accept { call_index: CallIndex },
    /// Put a call on (local) hold
    Hold { call_index: CallIndex },
    /// Retrieve a locally held call
    Retrieve { call_index: CallIndex },
    /// End a call
    Terminate { call_index: CallIndex },
    /// Merge two or more calls into one conversation
    Join { call_indices: Vec<CallIndex> },
    /// Set the signal-strength reporting interval, in seconds
    SetSignalReportingInterval { seconds: u8 },
}

impl ControlOp {
    /// Stable operation name for structured logging
    pub fn name(&self) -> &'static str {
        match self {
            ControlOp::Originate { .. } => "originate",
            ControlOp::Accept { .. } => "accept",
            ControlOp::Hold { .. } => "hold",
            ControlOp::Retrieve { .. } => "retrieve",
            ControlOp::Terminate { .. } => "terminate",
            ControlOp::Join { .. } => "join",
            ControlOp::SetSignalReportingInterval { .. } => "set_signal_reporting_interval",
        }
    }

    /// Call indices this operation targets, in request order
    pub fn target_indices(&self) -> Vec<CallIndex> {
        match self {
            ControlOp::Originate { .. } | ControlOp::SetSignalReportingInterval { .. } => {
                Vec::new()
            }
            ControlOp::Accept { call_index }
            | ControlOp::Hold { call_index }
            | ControlOp::Retrieve { call_index }
            | ControlOp::Terminate { call_index } => vec![*call_index],
            ControlOp::Join { call_indices } => call_indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(
            ControlOp::Originate {
                uri: "tel:123".to_string()
            }
            .name(),
            "originate"
        );
        assert_eq!(ControlOp::Hold { call_index: 3 }.name(), "hold");
        assert_eq!(
            ControlOp::Join {
                call_indices: vec![1, 2]
            }
            .name(),
            "join"
        );
    }

    #[test]
    fn target_indices_cover_every_shape() {
        let originate = ControlOp::Originate {
            uri: "tel:123".to_string(),
        };
        assert!(originate.target_indices().is_empty());
        assert_eq!(ControlOp::Terminate { call_index: 7 }.target_indices(), [7]);
        assert_eq!(
            ControlOp::Join {
                call_indices: vec![1, 4]
            }
            .target_indices(),
            [1, 4]
        );
    }
}
