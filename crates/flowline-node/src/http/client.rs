//! Thin reqwest wrapper with a process-wide timeout and bounded retries.

use std::time::Duration;

use reqwest::header::HOST;
use serde::Serialize;

use flowline_core::error::{FlowlineError, Result};

/// Outcome of an outbound call: HTTP status and body text.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlowlineError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { inner })
    }

    pub async fn get_text(&self, url: &str) -> Result<HttpReply> {
        self.get_text_with_host(url, None).await
    }

    /// GET with an optional Host header override (ingress-routed endpoints).
    pub async fn get_text_with_host(&self, url: &str, host: Option<&str>) -> Result<HttpReply> {
        let mut req = self.inner.get(url);
        if let Some(h) = host {
            req = req.header(HOST, h);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("GET {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("GET {url} body read failed: {e}")))?;
        Ok(HttpReply { status, body })
    }

    /// GET with retries on transport failure. `retries` is the number of
    /// additional attempts after the first.
    pub async fn get_with_retries(&self, url: &str, retries: u32) -> Result<HttpReply> {
        let mut attempt = 0;
        loop {
            match self.get_text(url).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < retries => {
                    attempt += 1;
                    tracing::warn!(%url, attempt, error = %e, "retrying outbound request");
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<HttpReply> {
        let resp = self
            .inner
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("POST {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("POST {url} body read failed: {e}")))?;
        Ok(HttpReply { status, body })
    }

    /// GET with query parameters, decoded as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        let resp = self
            .inner
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("GET {url} failed: {e}")))?;
        resp.json()
            .await
            .map_err(|e| FlowlineError::Upstream(format!("GET {url} invalid json: {e}")))
    }
}
