//! Runtime configuration from the environment

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_QUERY_URL: &str = "http://localhost:8000/query";
const DEFAULT_NOTICE_SECS: u64 = 4;
const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 25 * 1024 * 1024;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Query service endpoint (`SCHOLAR_QUERY_URL`)
    pub query_url: String,
    /// Log file; the terminal belongs to the UI (`SCHOLAR_LOG_PATH`)
    pub log_path: PathBuf,
    /// How long transient notices stay visible (`SCHOLAR_NOTICE_SECS`)
    pub notice_duration: Duration,
    /// Largest file accepted as an attachment (`SCHOLAR_MAX_ATTACHMENT_BYTES`)
    pub max_attachment_bytes: u64,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_path = lookup("SCHOLAR_LOG_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.scholar-chat/scholar-chat.log"))
            },
            PathBuf::from,
        );

        let notice_secs = lookup("SCHOLAR_NOTICE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_NOTICE_SECS);

        let max_attachment_bytes = lookup("SCHOLAR_MAX_ATTACHMENT_BYTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTACHMENT_BYTES);

        Self {
            query_url: lookup("SCHOLAR_QUERY_URL")
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_QUERY_URL.to_string()),
            log_path,
            notice_duration: Duration::from_secs(notice_secs),
            max_attachment_bytes,
        }
    }
}
