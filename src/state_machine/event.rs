//! Events that can occur in a conversation

use crate::attachment::Attachment;
use crate::query::{QueryAnswer, QueryError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        /// Identifier for the user message; doubles as the request id
        message_id: String,
        text: Option<String>,
        file: Option<Attachment>,
    },
    Reset,

    // Query service events
    QueryCompleted {
        request_id: String,
        outcome: Result<QueryAnswer, QueryError>,
    },
}

impl Event {
    /// Submission with a freshly generated message id
    pub fn submit(text: Option<String>, file: Option<Attachment>) -> Self {
        Event::Submit {
            message_id: uuid::Uuid::new_v4().to_string(),
            text,
            file,
        }
    }
}
