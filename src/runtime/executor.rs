//! Query executor

use crate::conversation::PendingQuery;
use crate::query::{QueryAnswer, QueryError, QueryService};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one outbound request, tagged with the request it belongs to
#[derive(Debug, Clone)]
pub struct Completion {
    pub request_id: String,
    pub outcome: Result<QueryAnswer, QueryError>,
}

/// Runs each query on its own task and reports the outcome on a channel
pub struct QueryExecutor<Q: QueryService + 'static> {
    service: Arc<Q>,
    completion_tx: mpsc::UnboundedSender<Completion>,
}

impl<Q: QueryService + 'static> QueryExecutor<Q> {
    pub fn new(service: Q, completion_tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self {
            service: Arc::new(service),
            completion_tx,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.service.endpoint()
    }

    /// Fire the request. There is no cancellation: the task always runs to
    /// completion and reports back.
    pub fn dispatch(&self, pending: PendingQuery) {
        let service = Arc::clone(&self.service);
        let completion_tx = self.completion_tx.clone();

        tokio::spawn(async move {
            let PendingQuery {
                request_id,
                request,
            } = pending;
            let outcome = service.query(&request).await;

            if completion_tx
                .send(Completion {
                    request_id,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!("Conversation closed before query completed");
            }
        });
    }
}
