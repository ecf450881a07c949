//! Wire types for the query service

use crate::attachment::Attachment;
use serde::{Deserialize, Serialize};

/// Multipart field carrying the attachment
pub const FILE_FIELD: &str = "file";
/// Multipart field carrying the user's text
pub const QUERY_FIELD: &str = "query";
/// Multipart field carrying the session id
pub const SESSION_FIELD: &str = "session_id";

/// One outbound submission. At least one of `query` and `file` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryRequest {
    pub query: Option<String>,
    pub file: Option<Attachment>,
    pub session_id: Option<String>,
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[cfg(test)]
impl QueryAnswer {
    pub fn new(answer: impl Into<String>, session_id: Option<&str>) -> Self {
        Self {
            answer: answer.into(),
            session_id: session_id.map(str::to_string),
        }
    }
}
