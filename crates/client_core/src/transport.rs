//! Single-round-trip HTTP transport for serialized evaluation requests.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};
use shared::error::{ErrorBody, SessionError};

const OCTET_STREAM: &str = "application/octet-stream";

/// One blocking round trip; no retries. Retry policy, were there any,
/// would belong to the orchestrator.
#[async_trait]
pub trait EvaluationTransport: Send + Sync {
    async fn send(&self, request: &[u8]) -> Result<Vec<u8>, SessionError>;
}

pub struct HttpEvaluationTransport {
    http: Client,
    endpoint: Url,
}

impl HttpEvaluationTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl EvaluationTransport for HttpEvaluationTransport {
    async fn send(&self, request: &[u8]) -> Result<Vec<u8>, SessionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(request.to_vec())
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| synthesized_status_message(status));
            return Err(SessionError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        Ok(body.to_vec())
    }
}

fn synthesized_status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("evaluation endpoint returned {} {reason}", status.as_u16()),
        None => format!("evaluation endpoint returned status {}", status.as_u16()),
    }
}
