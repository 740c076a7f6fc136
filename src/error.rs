// src/error.rs
use thiserror::Error;

use crate::routes::Intent;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned status {status}")]
    Status { path: &'static str, status: u16 },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("{0:?} is not a feature request")]
    NotAFeature(Intent),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("diagram source is empty")]
    Empty,

    #[error("unknown diagram type: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech command failed: {0}")]
    Command(#[from] std::io::Error),

    #[error("speech command exited with status {0}")]
    ExitStatus(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ClientError::Status { path: "/ask", status: 502 };
        assert_eq!(err.to_string(), "/ask returned status 502");

        let err = ClientError::NotAFeature(Intent::Ask);
        assert_eq!(err.to_string(), "Ask is not a feature request");

        let err = DiagramError::UnknownKind("hello".into());
        assert_eq!(err.to_string(), "unknown diagram type: hello");
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
