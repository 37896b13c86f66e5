//! View-function calls against a Movement node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Lookup error.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Node returned HTTP {0}")]
    Status(u16),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Body of a `POST /view` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl ViewRequest {
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn type_argument(mut self, type_argument: impl Into<String>) -> Self {
        self.type_arguments.push(type_argument.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }
}

/// Read-only calls against node state.
#[async_trait]
pub trait ViewClient: Send + Sync {
    /// Call a view function on the node at `node_url`.
    ///
    /// # Errors
    /// Returns `Status` for non-success responses, `Transport` when the node
    /// is unreachable and `Decode` when the body is not JSON.
    async fn view(&self, node_url: &str, request: &ViewRequest) -> Result<Value, LookupError>;
}

/// [`ViewClient`] over the node REST API.
#[derive(Debug, Clone, Default)]
pub struct HttpViewClient {
    client: reqwest::Client,
}

impl HttpViewClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewClient for HttpViewClient {
    async fn view(&self, node_url: &str, request: &ViewRequest) -> Result<Value, LookupError> {
        let url = format!("{}/view", node_url.trim_end_matches('/'));
        tracing::debug!(%url, function = %request.function, "View call");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}
