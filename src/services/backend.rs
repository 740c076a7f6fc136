// src/services/backend.rs
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, ConfigError};
use crate::message::AnswerResponse;
use crate::routes::{Method, Route};

/// The EduMate HTTP collaborator. Every endpoint answers `{ "answer": ... }`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn call(&self, route: Route, body: Option<Value>) -> Result<AnswerResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, base_url: config.api_url.clone() })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, route: Route, body: Option<Value>) -> Result<AnswerResponse, ClientError> {
        let url = route.url(&self.base_url);
        debug!(method = %route.method, %url, "calling backend");

        let request = match route.method {
            Method::Get => self.http.get(&url),
            // `json` sets Content-Type: application/json
            Method::Post => self.http.post(&url).json(&body.unwrap_or(Value::Null)),
        };

        let response = request.send().await.map_err(|source| {
            warn!(path = route.path, error = %source, "backend request failed");
            ClientError::Transport { path: route.path, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = route.path, status = status.as_u16(), "backend returned error status");
            return Err(ClientError::Status { path: route.path, status: status.as_u16() });
        }

        response.json::<AnswerResponse>().await.map_err(|e| {
            warn!(path = route.path, error = %e, "backend response was not {{answer}}");
            ClientError::Decode(e.to_string())
        })
    }
}
