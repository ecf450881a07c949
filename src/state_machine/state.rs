//! Conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Messages
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Assistant replies always get a fresh identifier
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Conversation state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready for user input, no request outstanding
    #[default]
    Idle,

    /// One query is in flight; `request_id` is the id of the user message
    /// that started it
    Submitting { request_id: String },
}

impl ConvState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ConvState::Submitting { .. })
    }

    /// Id of the outstanding request, if any
    pub fn in_flight(&self) -> Option<&str> {
        match self {
            ConvState::Idle => None,
            ConvState::Submitting { request_id } => Some(request_id),
        }
    }
}

/// Read-only view of the conversation the transition function consults
#[derive(Debug, Clone, Default)]
pub struct ConvContext {
    pub session_id: Option<String>,
}

impl ConvContext {
    pub fn new(session_id: Option<String>) -> Self {
        Self { session_id }
    }
}
