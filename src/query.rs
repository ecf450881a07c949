//! Query service abstraction
//!
//! The remote service receives text, an optional file and the session id,
//! and answers with generated text plus an optional session id.

mod client;
mod error;
mod types;

pub use client::HttpQueryClient;
pub use error::QueryError;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for query backends
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Send one submission and wait for the answer
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError>;

    /// Where requests go (for logs and the status line)
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        (**self).query(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for query services
pub struct LoggingQueryService<S> {
    inner: S,
}

impl<S: QueryService> LoggingQueryService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: QueryService> QueryService for LoggingQueryService<S> {
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        let start = std::time::Instant::now();
        let result = self.inner.query(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    has_file = request.file.is_some(),
                    answer_len = answer.answer.len(),
                    session_issued = answer.session_id.is_some(),
                    "Query completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Query failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
