//! Effects produced by state transitions

use super::transition::ERROR_REPLY;
use crate::query::{QueryError, QueryRequest};

/// Effects to be executed after state transition
#[derive(Debug, Clone)]
pub enum Effect {
    /// Append the user's message to the log
    AppendUserMessage { id: String, content: String },

    /// Append an assistant message with a fresh id
    AppendAssistantMessage { content: String },

    /// Drop pending text and attachment
    ClearInput,

    /// Remember the session id the service handed out
    AdoptSession { session_id: String },

    /// Issue the single outbound request for a submission
    SendQuery {
        request_id: String,
        request: QueryRequest,
    },

    /// Empty the log, pending input and session
    ResetConversation,

    /// Record a failed query for diagnostics
    LogFailure {
        request_id: String,
        error: QueryError,
    },

    /// A completion arrived for a request the conversation no longer waits on
    DiscardStale { request_id: String },
}

impl Effect {
    pub fn assistant_reply(content: impl Into<String>) -> Self {
        Effect::AppendAssistantMessage {
            content: content.into(),
        }
    }

    pub fn error_reply() -> Self {
        Self::assistant_reply(ERROR_REPLY)
    }
}
