//! Error taxonomy for DeepTalk.
//!
//! Decode failures are not represented here at all: the chunk decoder
//! swallows them and yields an empty delta, so they never cross a module
//! boundary. Cancellation is likewise not an error -- it is a requested
//! early termination, reported through the generation outcome.

use thiserror::Error;

/// Structural errors in the tag-delimited stream.
///
/// Either variant terminates the generation; no partial assistant turn is
/// committed. The display strings are stable and surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A closing marker arrived before any opening marker was ever seen.
    #[error("errant closing tag")]
    ErrantClosingTag,

    /// The stream ended while still inside the reasoning span.
    #[error("reasoning span never closed")]
    UnclosedReasoning,
}

/// Failures in the HTTP transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint URL '{0}': must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Connect(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("stream error: {0}")]
    Stream(String),
}

/// Failures loading, parsing, or updating the session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a home directory for config storage")]
    NoHomeDir,

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("unknown config key: '{0}'")]
    UnknownKey(String),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_reason_strings_are_stable() {
        assert_eq!(
            StructuralError::ErrantClosingTag.to_string(),
            "errant closing tag"
        );
        assert_eq!(
            StructuralError::UnclosedReasoning.to_string(),
            "reasoning span never closed"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");

        let err = TransportError::InvalidEndpoint("linux-ai.local:5000".to_string());
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "temperature".to_string(),
            reason: "not a number".to_string(),
        };
        assert!(err.to_string().contains("temperature"));
        assert!(err.to_string().contains("not a number"));
    }
}
