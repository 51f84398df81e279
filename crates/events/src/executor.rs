//! Action execution over a shared HTTP client.
//!
//! [`ActionExecutor`] owns the `reqwest::Client` used for every
//! outbound action call. The client is connection-pool-safe for
//! concurrent use, so one executor serves all workers of a publish.

use std::time::Duration;

/// Normalized outcome of executing one action.
///
/// A non-2xx status is surfaced here as data, not as an error; the
/// caller decides how to log or count it.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub status_code: u16,
    pub body: String,
}

impl RunResult {
    /// Whether the endpoint reported HTTP-level success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Errors from executing a built request.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The request never produced a response (DNS, connection refused,
    /// timeout, TLS).
    #[error("Cannot perform request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response arrived but its body could not be fully read.
    #[error("Cannot read response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

/// Executes built requests and normalizes the outcome.
pub struct ActionExecutor {
    client: reqwest::Client,
}

impl ActionExecutor {
    /// Create an executor whose client enforces `request_timeout` per
    /// attempt.
    pub fn new(request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Create an executor reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The shared client, for request construction.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send one request and read the full response body.
    ///
    /// The connection is released on every exit path: `text()` drains
    /// the body on success, and dropping the response returns the
    /// connection to the pool otherwise.
    pub async fn execute(&self, request: reqwest::Request) -> Result<RunResult, ExecuteError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(ExecuteError::Transport)?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(ExecuteError::ReadBody)?;

        Ok(RunResult { status_code, body })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
