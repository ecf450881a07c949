//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::ConversationRuntime;
use crate::query::{QueryAnswer, QueryError, QueryRequest, QueryService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock Query Service
// ============================================================================

/// Mock query service that returns queued responses
#[derive(Default)]
pub struct MockQueryService {
    responses: Mutex<VecDeque<Result<QueryAnswer, QueryError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<QueryRequest>>,
}

#[allow(dead_code)]
impl MockQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn queue_answer(&self, answer: &str, session_id: Option<&str>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(QueryAnswer::new(answer, session_id)));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: QueryError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<QueryAnswer, QueryError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QueryError::network("No mock response queued")))
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    fn endpoint(&self) -> &'static str {
        "mock://query"
    }
}

// ============================================================================
// Gated Mock Query Service (for in-flight testing)
// ============================================================================

/// Mock query service whose requests block until the test releases them
#[derive(Default)]
pub struct GatedMockQueryService {
    inner: MockQueryService,
    /// Notified when a request starts
    pub request_started: Arc<Notify>,
    /// Notify once per request to let it finish
    pub release: Arc<Notify>,
}

impl GatedMockQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_answer(&self, answer: &str, session_id: Option<&str>) {
        self.inner.queue_answer(answer, session_id);
    }

    pub fn recorded_requests(&self) -> Vec<QueryRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl QueryService for GatedMockQueryService {
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_response()
    }

    fn endpoint(&self) -> &'static str {
        "mock://gated"
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

/// Process completions until the conversation is idle, with a timeout
pub async fn wait_for_idle<Q: QueryService + 'static>(
    rt: &mut ConversationRuntime<Q>,
    timeout: std::time::Duration,
) -> bool {
    let finished = tokio::time::timeout(timeout, async {
        while rt.controller().is_busy() {
            if !rt.process_next().await {
                break;
            }
        }
    })
    .await
    .is_ok();
    finished && !rt.controller().is_busy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;
    use crate::conversation::SubmitError;
    use crate::input::InputRejected;
    use crate::state_machine::transition::ERROR_REPLY;
    use crate::state_machine::Role;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    fn send<Q: QueryService + 'static>(
        rt: &mut ConversationRuntime<Q>,
        text: &str,
    ) -> Result<(), SubmitError> {
        rt.input_mut().set_text(text);
        rt.submit_input()
    }

    #[tokio::test]
    async fn test_mock_query_service() {
        let mock = MockQueryService::new();
        mock.queue_answer("Hello", None);

        let request = QueryRequest {
            query: Some("Hi".to_string()),
            ..QueryRequest::default()
        };
        let answer = mock.query(&request).await.unwrap();
        assert_eq!(answer.answer, "Hello");

        // Second call should fail (no more responses)
        assert!(mock.query(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    /// Integration test: one round trip
    #[tokio::test]
    async fn test_simple_round_trip() {
        let service = Arc::new(MockQueryService::new());
        service.queue_answer("Cloudy, 12 degrees.", Some("sess-1"));

        let mut rt = ConversationRuntime::new(service.clone());
        send(&mut rt, "How is the weather in Vienna today?").unwrap();
        assert!(rt.controller().is_busy());

        assert!(wait_for_idle(&mut rt, WAIT).await);

        let msgs = rt.controller().messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].content, "How is the weather in Vienna today?");
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "Cloudy, 12 degrees.");
        assert_eq!(rt.controller().session_id(), Some("sess-1"));
    }

    /// Integration test: session id rides along on every later request
    #[tokio::test]
    async fn test_session_attached_to_later_requests() {
        let service = Arc::new(MockQueryService::new());
        service.queue_answer("first", Some("sess-1"));
        service.queue_answer("second", Some("sess-other"));
        service.queue_answer("third", None);

        let mut rt = ConversationRuntime::new(service.clone());
        for prompt in ["one", "two", "three"] {
            send(&mut rt, prompt).unwrap();
            assert!(wait_for_idle(&mut rt, WAIT).await);
        }

        let requests = service.recorded_requests();
        assert_eq!(requests[0].session_id, None);
        assert_eq!(requests[1].session_id.as_deref(), Some("sess-1"));
        assert_eq!(requests[2].session_id.as_deref(), Some("sess-1"));
        assert_eq!(rt.controller().messages().len(), 6);
    }

    /// Integration test: transport failure becomes the fixed reply
    #[tokio::test]
    async fn test_failure_reply() {
        let service = Arc::new(MockQueryService::new());
        service.queue_error(QueryError::status(500, "HTTP 500"));

        let mut rt = ConversationRuntime::new(service);
        rt.input_mut()
            .set_file(Some(Attachment::new("data.csv", b"1,2".to_vec())));
        rt.submit_input().unwrap();

        assert!(wait_for_idle(&mut rt, WAIT).await);
        let msgs = rt.controller().messages();
        assert_eq!(msgs[0].content, "File: data.csv");
        assert_eq!(msgs[1].content, ERROR_REPLY);
        assert_eq!(rt.controller().session_id(), None);
    }

    /// Integration test: second submit while the first is in flight
    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let service = Arc::new(GatedMockQueryService::new());
        service.queue_answer("first answer", None);

        let mut rt = ConversationRuntime::new(service.clone());
        send(&mut rt, "first").unwrap();
        service.request_started.notified().await;

        let err = send(&mut rt, "second").unwrap_err();
        assert_eq!(err, SubmitError::Input(InputRejected::Busy));
        // The rejected text stays in the input
        assert_eq!(rt.controller().input().text(), "second");

        assert_eq!(rt.controller().messages().len(), 1);

        service.release.notify_one();
        assert!(wait_for_idle(&mut rt, WAIT).await);

        assert_eq!(service.recorded_requests().len(), 1);
        assert_eq!(rt.controller().messages().len(), 2);
        assert_eq!(rt.controller().messages()[1].content, "first answer");
    }

    /// Integration test: answer for a request abandoned by reset is dropped
    #[tokio::test]
    async fn test_reset_while_in_flight_drops_answer() {
        let service = Arc::new(GatedMockQueryService::new());
        service.queue_answer("stale answer", Some("sess-stale"));

        let mut rt = ConversationRuntime::new(service.clone());
        send(&mut rt, "question").unwrap();
        service.request_started.notified().await;

        rt.reset();
        assert!(rt.controller().messages().is_empty());
        assert!(!rt.controller().is_busy());

        service.release.notify_one();
        assert!(rt.process_next().await);

        assert!(rt.controller().messages().is_empty());
        assert_eq!(rt.controller().session_id(), None);
    }

    /// Integration test: suggestion goes out as a normal submission
    #[tokio::test]
    async fn test_suggestion_round_trip() {
        let service = Arc::new(MockQueryService::new());
        service.queue_answer("Pandas spend most of the day eating.", None);

        let mut rt = ConversationRuntime::new(service.clone());
        assert!(rt.controller().suggestions_visible());
        rt.submit_suggestion(1).unwrap();
        assert!(wait_for_idle(&mut rt, WAIT).await);

        assert_eq!(
            service.recorded_requests()[0].query.as_deref(),
            Some("Tell me an interesting fact about pandas")
        );
        assert!(!rt.controller().suggestions_visible());

        rt.reset();
        assert!(rt.controller().suggestions_visible());
    }
}
