// Remote processor - forwards text to an HTTP processing endpoint
//
// Wire format (shared with `textproc serve`):
//   POST {endpoint}   {"text": "..."}
//   200               {"result": "..."}
//   4xx/5xx           {"error": "..."}

use super::Processor;
use crate::session::ProcessingError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for the processing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub text: String,
}

/// Success body from the processing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub result: String,
}

/// Error body from the processing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Processor backed by a remote HTTP endpoint
#[derive(Debug, Clone)]
pub struct RemoteProcessor {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl RemoteProcessor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Processor for RemoteProcessor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn process(&self, text: &str) -> Result<String, ProcessingError> {
        let body = ProcessRequest {
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProcessingError::Timeout(self.timeout)
                } else {
                    ProcessingError::Backend(format!("request to {} failed: {}", self.endpoint, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Keep the server's reason for the logs; it never reaches the user
            let reason = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(ProcessingError::Backend(format!("{}: {}", status, reason)));
        }

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| ProcessingError::InvalidResponse(e.to_string()))?;

        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_backend_error() {
        // Port 9 (discard) on localhost is reliably closed in test environments
        let processor =
            RemoteProcessor::new("http://127.0.0.1:9/api/process", Duration::from_secs(2))
                .unwrap();

        let err = processor.process("hello").await.unwrap_err();
        assert!(
            matches!(err, ProcessingError::Backend(_) | ProcessingError::Timeout(_)),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_subsecond_timeout_keeps_its_duration() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let processor = RemoteProcessor::new(
            format!("http://{}/api/process", addr),
            Duration::from_millis(200),
        )
        .unwrap();

        let err = processor.process("hello").await.unwrap_err();
        assert_eq!(err, ProcessingError::Timeout(Duration::from_millis(200)));
        assert_eq!(err.to_string(), "processor timed out after 200ms");
    }

    #[test]
    fn test_wire_format_field_names() {
        let req = serde_json::to_value(ProcessRequest {
            text: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(req, serde_json::json!({"text": "hi"}));

        let resp: ProcessResponse = serde_json::from_str(r#"{"result":"ok"}"#).unwrap();
        assert_eq!(resp.result, "ok");
    }
}
