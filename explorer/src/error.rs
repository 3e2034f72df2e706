//! Error types for the explorer

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rpc_core::RpcError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("explorer has not completed a refresh yet")]
    NotSynced,

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExplorerError::NotSynced => StatusCode::SERVICE_UNAVAILABLE,
            ExplorerError::Rpc(RpcError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ExplorerError::Rpc(RpcError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ExplorerError::Rpc(RpcError::Protocol(_) | RpcError::Rpc(_)) => StatusCode::BAD_GATEWAY,
            ExplorerError::NotFound(_) => StatusCode::NOT_FOUND,
            ExplorerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ExplorerError::Config(_) | ExplorerError::Io(_) | ExplorerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable kind for the JSON body.
    pub fn kind(&self) -> &'static str {
        match self {
            ExplorerError::NotSynced => "not_synced",
            ExplorerError::Rpc(RpcError::Connection(_)) => "node_unavailable",
            ExplorerError::Rpc(RpcError::Timeout(_)) => "node_timeout",
            ExplorerError::Rpc(RpcError::Protocol(_)) => "node_protocol_error",
            ExplorerError::Rpc(RpcError::Rpc(_)) => "node_error",
            ExplorerError::NotFound(_) => "not_found",
            ExplorerError::InvalidInput(_) => "invalid_input",
            ExplorerError::Config(_) => "config_error",
            ExplorerError::Io(_) => "io_error",
            ExplorerError::Internal(_) => "internal_error",
        }
    }
}

impl From<QueryRejection> for ExplorerError {
    fn from(rejection: QueryRejection) -> Self {
        ExplorerError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("request failed with {}: {}", status, self);
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
