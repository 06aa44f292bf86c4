//! HTTP client wrapper for the carbon intelligence API.
//!
//! Normalizes every failure mode into [`ApiError`]: transport failures,
//! non-2xx statuses, and malformed JSON all surface as one typed error with a
//! human-readable message. No retries; a failed call is the caller's to render.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::logging::{json_log, obj, v_num, v_str};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("HTTP {code}: {reason}")]
    Status { code: u16, reason: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    fn transport(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        // A trailing slash makes Url::join treat the base path as a directory.
        let normalized = if base.ends_with('/') { base.to_string() } else { format!("{}/", base) };
        let base = Url::parse(&normalized)?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("bad path {}: {}", path, e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.client.get(url).send().await.map_err(ApiError::transport)?;
        self.decode("GET", path, resp).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::transport)?;
        self.decode("POST", path, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        resp: Response,
    ) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            json_log(
                "api_request",
                obj(&[
                    ("method", v_str(method)),
                    ("path", v_str(path)),
                    ("status", v_num(f64::from(status.as_u16()))),
                    ("result", v_str("error")),
                ]),
            );
            return Err(ApiError::Status { code: status.as_u16(), reason });
        }
        let body = resp.text().await.map_err(ApiError::transport)?;
        let value = serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        json_log(
            "api_request",
            obj(&[
                ("method", v_str(method)),
                ("path", v_str(path)),
                ("status", v_num(f64::from(status.as_u16()))),
                ("result", v_str("ok")),
            ]),
        );
        Ok(value)
    }
}
