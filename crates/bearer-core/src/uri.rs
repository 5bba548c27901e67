//! Target-URI validation
//!
//! Originate requests carry an opaque `scheme:payload` URI (commonly
//! `tel:` or `sip:`). The client validates the shape before spending a
//! transport send; the peer remains free to refuse the target anyway.

use thiserror::Error;

/// Why a target URI was rejected locally
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("URI is empty")]
    Empty,

    #[error("URI has no scheme separator")]
    MissingScheme,

    #[error("URI scheme is not valid: {scheme}")]
    InvalidScheme { scheme: String },

    #[error("URI has no payload after the scheme")]
    EmptyPayload,
}

/// Validate the `scheme:payload` shape of a call target URI.
pub fn validate_target_uri(uri: &str) -> Result<(), UriError> {
    if uri.is_empty() {
        return Err(UriError::Empty);
    }

    let (scheme, payload) = uri.split_once(':').ok_or(UriError::MissingScheme)?;

    let scheme_ok = scheme
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return Err(UriError::InvalidScheme {
            scheme: scheme.to_string(),
        });
    }

    if payload.is_empty() {
        return Err(UriError::EmptyPayload);
    }

    Ok(())
}

/// The scheme of a target URI, if it has a valid one.
pub fn uri_scheme(uri: &str) -> Option<&str> {
    validate_target_uri(uri).ok()?;
    uri.split_once(':').map(|(scheme, _)| scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_targets() {
        assert!(validate_target_uri("tel:123456789012").is_ok());
        assert!(validate_target_uri("sip:alice@example.com").is_ok());
        assert!(validate_target_uri("skype:user").is_ok());
    }

    #[test]
    fn rejects_malformed_targets() {
        assert_eq!(validate_target_uri(""), Err(UriError::Empty));
        assert_eq!(validate_target_uri("123456"), Err(UriError::MissingScheme));
        assert_eq!(validate_target_uri("tel:"), Err(UriError::EmptyPayload));
        assert!(matches!(
            validate_target_uri("9tel:123"),
            Err(UriError::InvalidScheme { .. })
        ));
        assert!(matches!(
            validate_target_uri(":123"),
            Err(UriError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn scheme_extraction() {
        assert_eq!(uri_scheme("tel:555"), Some("tel"));
        assert_eq!(uri_scheme("not-a-uri"), None);
    }
}
