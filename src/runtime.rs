//! Runtime for driving a conversation against a query service
//!
//! The controller is owned by whoever drives the UI; each accepted
//! submission runs as its own task and reports back through a channel, so
//! transitions are still applied one at a time on the owner's side.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::{Completion, QueryExecutor};

use crate::conversation::{ConversationController, PendingQuery, SubmitError};
use crate::input::InputCollector;
use crate::query::QueryService;
use tokio::sync::mpsc;

pub struct ConversationRuntime<Q: QueryService + 'static> {
    controller: ConversationController,
    executor: QueryExecutor<Q>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<Q: QueryService + 'static> ConversationRuntime<Q> {
    pub fn new(service: Q) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            controller: ConversationController::new(),
            executor: QueryExecutor::new(service, completion_tx),
            completion_rx,
        }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn input_mut(&mut self) -> &mut InputCollector {
        self.controller.input_mut()
    }

    pub fn endpoint(&self) -> &str {
        self.executor.endpoint()
    }

    /// Submit whatever is pending in the input collector
    pub fn submit_input(&mut self) -> Result<(), SubmitError> {
        let pending = self.controller.submit_input()?;
        self.dispatch(pending);
        Ok(())
    }

    pub fn submit_suggestion(&mut self, index: usize) -> Result<(), SubmitError> {
        let pending = self.controller.submit_suggestion(index)?;
        self.dispatch(pending);
        Ok(())
    }

    /// Start over. An outstanding request keeps running; its answer is dropped.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Wait for the next request to finish. Cancel-safe, so it can sit in a
    /// `select!` next to terminal input.
    pub async fn recv_completion(&mut self) -> Option<Completion> {
        self.completion_rx.recv().await
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        self.controller
            .complete(&completion.request_id, completion.outcome);
    }

    /// Wait for one completion and apply it
    #[cfg(test)]
    pub async fn process_next(&mut self) -> bool {
        match self.recv_completion().await {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    fn dispatch(&self, pending: PendingQuery) {
        tracing::debug!(request_id = %pending.request_id, "Dispatching query");
        self.executor.dispatch(pending);
    }
}
