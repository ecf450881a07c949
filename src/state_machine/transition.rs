//! Pure state transition function

use super::{ConvContext, ConvState, Effect, Event};
use crate::query::QueryRequest;
use thiserror::Error;

/// Assistant reply recorded when a query fails for any reason
pub const ERROR_REPLY: &str = "Sorry, there was an error processing your message.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. Both are user-facing and leave
/// the conversation untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Please wait for the model to finish its response!")]
    Busy,
    #[error("Type a message or attach a file before sending")]
    EmptySubmission,
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// described by the returned effects.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================

        // Only one request per conversation may be outstanding
        (ConvState::Submitting { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // Idle + Submit -> Submitting
        (
            ConvState::Idle,
            Event::Submit {
                message_id,
                text,
                file,
            },
        ) => {
            let text = text.filter(|t| !t.is_empty());
            if text.is_none() && file.is_none() {
                return Err(TransitionError::EmptySubmission);
            }

            let user_content = user_message_content(
                text.as_deref(),
                file.as_ref().map(crate::attachment::Attachment::file_name),
            );
            let request = QueryRequest {
                query: text,
                file,
                session_id: context.session_id.clone(),
            };

            Ok(TransitionResult::new(ConvState::Submitting {
                request_id: message_id.clone(),
            })
            .with_effect(Effect::AppendUserMessage {
                id: message_id.clone(),
                content: user_content,
            })
            .with_effect(Effect::ClearInput)
            .with_effect(Effect::SendQuery {
                request_id: message_id,
                request,
            }))
        }

        // ============================================================
        // Query completion
        // ============================================================
        (
            ConvState::Submitting { request_id },
            Event::QueryCompleted {
                request_id: completed,
                outcome,
            },
        ) if *request_id == completed => match outcome {
            Ok(answer) => {
                let mut result = TransitionResult::new(ConvState::Idle);
                if context.session_id.is_none() {
                    if let Some(session_id) = answer.session_id.filter(|s| !s.is_empty()) {
                        result = result.with_effect(Effect::AdoptSession { session_id });
                    }
                }
                Ok(result.with_effect(Effect::assistant_reply(answer.answer)))
            }
            Err(error) => Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::LogFailure {
                    request_id: completed,
                    error,
                })
                .with_effect(Effect::error_reply())),
        },

        // Completion for a request that was abandoned by a reset
        (_, Event::QueryCompleted { request_id, .. }) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::DiscardStale { request_id }))
        }

        // ============================================================
        // Reset
        // ============================================================
        (_, Event::Reset) => {
            Ok(TransitionResult::new(ConvState::Idle).with_effect(Effect::ResetConversation))
        }
    }
}

/// Text shown for the user's side of a submission
pub fn user_message_content(text: Option<&str>, file_name: Option<&str>) -> String {
    match (text, file_name) {
        (Some(text), Some(name)) => format!("{text}\n\nFile: {name}"),
        (None, Some(name)) => format!("File: {name}"),
        (Some(text), None) => text.to_string(),
        (None, None) => String::new(),
    }
}
