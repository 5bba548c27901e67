//! Readable bearer attributes
//!
//! Attribute reads are asynchronous: the client requests a read and the
//! value arrives later in a completion notification. The concrete encoding
//! of each value (text, scalar, flag word) is treated as opaque payload and
//! passed through unchanged.

use serde::{Deserialize, Serialize};

/// Attributes a telephone bearer exposes for reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Human-readable name of the telephony provider
    ProviderName,
    /// Uniform caller identifier of the bearer
    Uci,
    /// Bearer technology (cellular generation, land line, ...)
    Technology,
    /// URI schemes the bearer can originate calls with
    UriSchemes,
    /// Current signal strength, 0-100 plus "unavailable"
    SignalStrength,
    /// Interval between signal-strength reports, in seconds
    SignalReportingInterval,
    /// Feature status flags of the bearer
    StatusFlags,
    /// Content-control identifier of the bearer service
    ContentControlId,
}

/// Value of a bearer attribute, shaped by its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Free-form text (provider name, UCI, ...)
    Text(String),
    /// Small unsigned scalar (signal strength, reporting interval, ...)
    Unsigned(u8),
    /// List of text entries (supported URI schemes)
    TextList(Vec<String>),
    /// Bit-flag word (status flags)
    Flags(u16),
}

impl AttributeValue {
    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The value as an unsigned scalar, if it is one
    pub fn as_unsigned(&self) -> Option<u8> {
        match self {
            AttributeValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the value as a text list, if it is one
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::TextList(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// The value as a flag word, if it is one
    pub fn as_flags(&self) -> Option<u16> {
        match self {
            AttributeValue::Flags(bits) => Some(*bits),
            _ => None,
        }
    }
}
