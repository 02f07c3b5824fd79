//! Streaming HTTP transport for OpenAI-compatible completion endpoints.
//!
//! Performs the POST and yields the response body as line frames -- the
//! unit the core decoder consumes. No SSE interpretation happens here:
//! keep-alives, framing prefixes, and payload parsing are core concerns.
//!
//! # Credential handling
//!
//! The bearer credential is held as a [`SecretString`] and exposed only
//! while the Authorization header is built. `HttpChatTransport` does not
//! derive `Debug`, so the credential cannot leak through debug formatting.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use deeptalk_core::transport::ChatTransport;
use deeptalk_types::error::TransportError;
use deeptalk_types::llm::CompletionRequest;

/// Timeout covering the whole streamed response, not just the connect.
/// Reasoning models can think for a long time before the first token.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Chat transport over reqwest with streaming response bodies.
pub struct HttpChatTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl HttpChatTransport {
    /// Create a transport for the given endpoint.
    ///
    /// The endpoint must carry an explicit scheme; anything else is
    /// rejected up front rather than failing deep inside a request.
    pub fn new(endpoint: &str, api_key: Option<SecretString>) -> Result<Self, TransportError> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(TransportError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }

    fn map_status(status: u16, body: String) -> TransportError {
        match status {
            401 | 403 => TransportError::AuthenticationFailed,
            429 => TransportError::RateLimited {
                retry_after_ms: None,
            },
            _ => TransportError::Status { status, body },
        }
    }
}

impl ChatTransport for HttpChatTransport {
    fn send(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        // The stream must be 'static; expose the credential into an owned
        // string that lives exactly as long as the request is being built.
        let bearer = self.api_key.as_ref().map(|k| k.expose_secret().to_string());

        Box::pin(async_stream::try_stream! {
            let mut builder = client
                .post(&endpoint)
                .header("content-type", "application/json")
                .json(&request);
            if let Some(ref bearer) = bearer {
                builder = builder.bearer_auth(bearer);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Connect(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                Err(HttpChatTransport::map_status(status.as_u16(), body))?;
            } else {
                debug!(%status, "streaming response started");

                // Re-frame the body into lines: network chunks split lines at
                // arbitrary byte positions, but the decoder expects one SSE
                // line per frame.
                let mut body = response.bytes_stream();
                let mut buffer: Vec<u8> = Vec::new();
                while let Some(chunk) = body.next().await {
                    let chunk = chunk.map_err(|e| TransportError::Stream(e.to_string()))?;
                    buffer.extend_from_slice(&chunk);
                    while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                        let line: Vec<u8> = buffer.drain(..=newline).collect();
                        yield Bytes::from(line);
                    }
                }
                if !buffer.is_empty() {
                    yield Bytes::from(buffer);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_endpoint_without_scheme() {
        let err = match HttpChatTransport::new("linux-ai.local:5000/v1/chat", None) {
            Ok(_) => panic!("expected InvalidEndpoint error"),
            Err(e) => e,
        };
        assert!(matches!(err, TransportError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_accepts_http_and_https_endpoints() {
        assert!(HttpChatTransport::new("http://localhost:5000/v1/chat/completions", None).is_ok());
        assert!(HttpChatTransport::new("https://api.example.com/v1", None).is_ok());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            HttpChatTransport::map_status(401, String::new()),
            TransportError::AuthenticationFailed
        ));
        assert!(matches!(
            HttpChatTransport::map_status(429, String::new()),
            TransportError::RateLimited { .. }
        ));
        assert!(matches!(
            HttpChatTransport::map_status(503, String::new()),
            TransportError::Status { status: 503, .. }
        ));
    }
}
