//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary operation
//! sequences, driven through the conversation controller.

use super::*;
use crate::attachment::Attachment;
use crate::conversation::{ConversationController, PendingQuery};
use crate::query::{QueryAnswer, QueryError};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Submit {
        text: Option<String>,
        file: Option<String>,
    },
    Succeed {
        session_id: Option<String>,
    },
    Fail,
    Reset,
}

fn arb_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z ?]{1,30}".prop_map(Some),
    ]
}

fn arb_file_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        1 => "[a-z]{1,8}\\.(pdf|csv|txt)".prop_map(Some),
    ]
}

fn arb_session_id() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "sess-[a-z0-9]{4}".prop_map(Some)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_text(), arb_file_name()).prop_map(|(text, file)| Op::Submit { text, file }),
        3 => arb_session_id().prop_map(|session_id| Op::Succeed { session_id }),
        1 => Just(Op::Fail),
        1 => Just(Op::Reset),
    ]
}

fn answer(session_id: Option<String>) -> QueryAnswer {
    QueryAnswer {
        answer: "answer".to_string(),
        session_id,
    }
}

/// Controller plus every request it has handed out
#[derive(Default)]
struct Harness {
    conv: ConversationController,
    sent: Vec<PendingQuery>,
}

impl Harness {
    fn submit(&mut self, text: Option<String>, file: Option<String>) -> bool {
        let file = file.map(|name| Attachment::new(name, b"data".to_vec()));
        match self.conv.submit(text, file) {
            Ok(pending) => {
                self.sent.push(pending);
                true
            }
            Err(_) => false,
        }
    }

    /// Complete the most recent request, in flight or already abandoned
    fn complete(&mut self, outcome: Result<QueryAnswer, QueryError>) {
        if let Some(last) = self.sent.last() {
            let request_id = last.request_id.clone();
            self.conv.complete(&request_id, outcome);
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The log never shrinks except through reset
    #[test]
    fn prop_log_is_append_only(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut h = Harness::default();
        for op in ops {
            let before: Vec<Message> = h.conv.messages().to_vec();
            let is_reset = matches!(op, Op::Reset);
            match op {
                Op::Submit { text, file } => { h.submit(text, file); }
                Op::Succeed { session_id } => h.complete(Ok(answer(session_id))),
                Op::Fail => h.complete(Err(QueryError::network("down"))),
                Op::Reset => h.conv.reset(),
            }
            if is_reset {
                prop_assert!(h.conv.messages().is_empty());
            } else {
                prop_assert!(h.conv.messages().len() >= before.len());
                prop_assert_eq!(&h.conv.messages()[..before.len()], &before[..]);
            }
        }
    }

    /// Submitting while busy appends nothing and sends nothing
    #[test]
    fn prop_busy_submit_is_rejected(
        first in "[a-z]{1,10}",
        text in arb_text(),
        file in arb_file_name(),
    ) {
        let mut h = Harness::default();
        prop_assert!(h.submit(Some(first), None));
        prop_assert!(h.conv.is_busy());

        let accepted = h.submit(text, file);
        prop_assert!(!accepted);
        prop_assert_eq!(h.conv.messages().len(), 1);
        prop_assert_eq!(h.sent.len(), 1);
    }

    /// Empty submissions never touch the log
    #[test]
    fn prop_empty_submit_is_rejected(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let mut h = Harness::default();
        for op in ops {
            match op {
                Op::Submit { text, file } => { h.submit(text, file); }
                Op::Succeed { session_id } => h.complete(Ok(answer(session_id))),
                Op::Fail => h.complete(Err(QueryError::network("down"))),
                Op::Reset => h.conv.reset(),
            }
        }

        let len = h.conv.messages().len();
        let sent = h.sent.len();
        prop_assert!(!h.submit(None, None));
        prop_assert!(!h.submit(Some(String::new()), None));
        prop_assert_eq!(h.conv.messages().len(), len);
        prop_assert_eq!(h.sent.len(), sent);
    }

    /// N round trips yield 2N messages alternating user/assistant
    #[test]
    fn prop_round_trips_alternate(
        rounds in proptest::collection::vec((arb_text(), arb_file_name(), any::<bool>()), 0..15),
    ) {
        let mut h = Harness::default();
        let mut completed = 0;
        for (text, file, succeed) in rounds {
            if h.submit(text, file) {
                if succeed {
                    h.complete(Ok(answer(None)));
                } else {
                    h.complete(Err(QueryError::malformed("no answer")));
                }
                completed += 1;
            }
        }

        let msgs = h.conv.messages();
        prop_assert_eq!(msgs.len(), 2 * completed);
        for (i, msg) in msgs.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(msg.role, expected);
        }
        prop_assert!(!h.conv.is_busy());
    }

    /// Once adopted, the session id goes out on every request until reset
    #[test]
    fn prop_session_sticks_until_reset(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut h = Harness::default();
        for op in ops {
            let held = h.conv.session_id().map(str::to_string);
            match op {
                Op::Submit { text, file } => {
                    let sent_before = h.sent.len();
                    if h.submit(text, file) {
                        prop_assert_eq!(h.sent.len(), sent_before + 1);
                        let request = &h.sent[sent_before].request;
                        prop_assert_eq!(request.session_id.clone(), held);
                    }
                }
                Op::Succeed { session_id } => {
                    h.complete(Ok(answer(session_id)));
                    if held.is_some() {
                        prop_assert_eq!(h.conv.session_id().map(str::to_string), held);
                    }
                }
                Op::Fail => {
                    h.complete(Err(QueryError::network("down")));
                    prop_assert_eq!(h.conv.session_id().map(str::to_string), held);
                }
                Op::Reset => {
                    h.conv.reset();
                    prop_assert_eq!(h.conv.session_id(), None);
                    prop_assert_eq!(h.conv.state(), &ConvState::Idle);
                    prop_assert_eq!(h.conv.input().text(), "");
                    prop_assert!(h.conv.input().file().is_none());
                }
            }
        }
    }
}
