//! Session configuration for DeepTalk.
//!
//! `SessionConfig` represents the on-disk `config.toml`. Every field has a
//! default, so a partial (or empty) file materializes field-wise rather
//! than failing to parse.

use serde::{Deserialize, Serialize};

/// Configuration read at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Chat completion endpoint (OpenAI-compatible, streaming).
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Model identifier sent in every request.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Context budget: maximum serialized size of the outgoing message
    /// set, in bytes. Older turns are evicted from the payload (never
    /// from the store) once the estimate exceeds this.
    #[serde(default = "default_max_context")]
    pub max_context: usize,

    /// Optional bearer credential for the endpoint.
    ///
    /// Held as a plain string only for (de)serialization; it is wrapped
    /// in `secrecy::SecretString` the moment the transport is built and
    /// must never be logged or echoed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Enables diagnostic tracing of raw stream output and payloads.
    #[serde(default)]
    pub debug: bool,

    /// When set, a `{role: system, content: "<think>\n"}` message is
    /// prepended to every payload to force fresh reasoning generation.
    /// The message is never stored and never evicted.
    #[serde(default = "default_prepend_think")]
    pub prepend_think: bool,
}

fn default_api_endpoint() -> String {
    "http://linux-ai.local:5000/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-reasoner".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_context() -> usize {
    32_768
}

fn default_prepend_think() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_context: default_max_context(),
            api_key: None,
            debug: false,
            prepend_think: default_prepend_think(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SessionConfig::default();
        assert_eq!(config.model, "deepseek-reasoner");
        assert!((config.temperature - 0.6).abs() < f64::EPSILON);
        assert!((config.top_p - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.max_context, 32_768);
        assert!(config.api_key.is_none());
        assert!(!config.debug);
        assert!(config.prepend_think);
    }

    #[test]
    fn test_empty_file_materializes_defaults() {
        let config: SessionConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_endpoint, default_api_endpoint());
        assert_eq!(config.max_context, 32_768);
    }

    #[test]
    fn test_partial_file_falls_back_field_wise() {
        let toml_str = r#"
model = "deepseek-r1-distill"
max_context = 8192
debug = true
"#;
        let config: SessionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "deepseek-r1-distill");
        assert_eq!(config.max_context, 8192);
        assert!(config.debug);
        // Untouched fields keep their defaults.
        assert!((config.temperature - 0.6).abs() < f64::EPSILON);
        assert!(config.prepend_think);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = SessionConfig::default();
        config.api_key = Some("sk-test".to_string());
        config.temperature = 0.8;

        let serialized = toml::to_string(&config).unwrap();
        let parsed: SessionConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("sk-test"));
        assert!((parsed.temperature - 0.8).abs() < f64::EPSILON);
    }
}
