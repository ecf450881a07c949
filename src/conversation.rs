//! Conversation controller
//!
//! Owns the message log, the session id and the pending input, and applies
//! state machine transitions to them. Outbound requests are handed back to
//! the caller; nothing here performs I/O.

use crate::attachment::Attachment;
use crate::input::{InputCollector, InputRejected, Submission};
use crate::query::{QueryAnswer, QueryError, QueryRequest};
use crate::state_machine::{
    transition, ConvContext, ConvState, Effect, Event, Message, TransitionError,
};
use thiserror::Error;

/// A request the caller must send for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub request_id: String,
    pub request: QueryRequest,
}

/// Why a submission did not go out. Either way the conversation is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Input(#[from] InputRejected),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Default)]
pub struct ConversationController {
    state: ConvState,
    messages: Vec<Message>,
    session_id: Option<String>,
    input: InputCollector,
}

impl ConversationController {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn input(&self) -> &InputCollector {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputCollector {
        &mut self.input
    }

    pub fn suggestions_visible(&self) -> bool {
        self.messages.is_empty() && self.input.suggestions_visible()
    }

    /// Clearing is only offered once there is something to clear
    pub fn can_reset(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Submit explicit text and/or file
    pub fn submit(
        &mut self,
        text: Option<String>,
        file: Option<Attachment>,
    ) -> Result<PendingQuery, TransitionError> {
        let pending = self.apply(Event::submit(text, file))?;
        // Idle + Submit always yields a SendQuery
        pending.ok_or(TransitionError::EmptySubmission)
    }

    pub fn submit_submission(
        &mut self,
        submission: Submission,
    ) -> Result<PendingQuery, TransitionError> {
        self.submit(submission.text, submission.file)
    }

    /// Submit whatever the input collector currently holds
    pub fn submit_input(&mut self) -> Result<PendingQuery, SubmitError> {
        let submission = self.input.submission(self.is_busy())?;
        Ok(self.submit_submission(submission)?)
    }

    /// Submit one of the suggested prompts
    pub fn submit_suggestion(&mut self, index: usize) -> Result<PendingQuery, SubmitError> {
        let busy = self.is_busy();
        let submission = self.input.select_suggestion(index, busy)?;
        Ok(self.submit_submission(submission)?)
    }

    /// Reconcile the outcome of a request into the log
    pub fn complete(&mut self, request_id: &str, outcome: Result<QueryAnswer, QueryError>) {
        let event = Event::QueryCompleted {
            request_id: request_id.to_string(),
            outcome,
        };
        if let Err(e) = self.apply(event) {
            // Completions never fail to transition
            tracing::warn!(error = %e, request_id, "Completion rejected");
        }
    }

    /// Fresh conversation: no messages, no pending input, no session
    pub fn reset(&mut self) {
        if let Err(e) = self.apply(Event::Reset) {
            tracing::warn!(error = %e, "Reset rejected");
        }
    }

    fn apply(&mut self, event: Event) -> Result<Option<PendingQuery>, TransitionError> {
        let context = ConvContext::new(self.session_id.clone());
        let result = transition(&self.state, &context, event)?;
        let previous = std::mem::replace(&mut self.state, result.new_state);

        let mut outbound = None;
        for effect in result.effects {
            match effect {
                Effect::AppendUserMessage { id, content } => {
                    self.messages.push(Message::user(id, content));
                }
                Effect::AppendAssistantMessage { content } => {
                    self.messages.push(Message::assistant(content));
                }
                Effect::ClearInput => self.input.clear(),
                Effect::AdoptSession { session_id } => {
                    tracing::info!(session_id = %session_id, "Adopted session");
                    self.session_id = Some(session_id);
                }
                Effect::SendQuery {
                    request_id,
                    request,
                } => {
                    outbound = Some(PendingQuery {
                        request_id,
                        request,
                    });
                }
                Effect::ResetConversation => {
                    tracing::info!(
                        messages = self.messages.len(),
                        abandoned = ?previous.in_flight(),
                        "Conversation cleared"
                    );
                    self.messages.clear();
                    self.session_id = None;
                    self.input.reset();
                }
                // The service wrapper already logged the failure itself
                Effect::LogFailure { request_id, error } => {
                    tracing::warn!(
                        request_id = %request_id,
                        kind = ?error.kind,
                        "Replied with error message"
                    );
                }
                Effect::DiscardStale { request_id } => {
                    tracing::debug!(request_id = %request_id, "Dropping response for abandoned request");
                }
            }
        }

        Ok(outbound)
    }
}
