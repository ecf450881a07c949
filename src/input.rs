//! Input collector: pending text, at most one attachment, and the suggested
//! prompts shown on an empty conversation.

use crate::attachment::Attachment;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

/// A canned prompt offered before the first message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub title: &'static str,
    pub label: &'static str,
    pub action: &'static str,
}

pub const SUGGESTED_PROMPTS: &[Suggestion] = &[
    Suggestion {
        title: "How is the weather",
        label: "in Vienna?",
        action: "How is the weather in Vienna today?",
    },
    Suggestion {
        title: "Tell me a fun fact",
        label: "about pandas",
        action: "Tell me an interesting fact about pandas",
    },
];

/// Snapshot of what the user wants to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: Option<String>,
    pub file: Option<Attachment>,
}

/// Why the collector refused to hand out a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("Please wait for the model to finish its response!")]
    Busy,
    #[error("Nothing to send")]
    Empty,
    #[error("No suggestion at position {0}")]
    UnknownSuggestion(usize),
}

/// What a key press did to the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Text changed
    Edited,
    /// Primary submit key pressed with something to send
    Submit,
    /// Submit key pressed but submission is not allowed right now
    Rejected(InputRejected),
    /// Not an input key
    Ignored,
}

#[derive(Debug, Default)]
pub struct InputCollector {
    text: String,
    file: Option<Attachment>,
    suggestions_dismissed: bool,
}

impl InputCollector {

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> Option<&Attachment> {
        self.file.as_ref()
    }

    /// Replace the pending text; no validation
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace or clear the pending attachment
    /// Insert pasted text verbatim. Line breaks stay in the text; only
    /// carriage returns are normalized.
    pub fn paste(&mut self, pasted: &str) {
        let pasted = pasted.replace("\r\n", "\n").replace('\r', "\n");
        let text = format!("{}{pasted}", self.text);
        self.set_text(text);
    }

    pub fn set_file(&mut self, file: Option<Attachment>) {
        self.file = file;
    }

    /// Whether the submit affordance is live
    pub fn can_submit(&self, busy: bool) -> bool {
        !busy && self.has_content()
    }

    fn has_content(&self) -> bool {
        !self.text.is_empty() || self.file.is_some()
    }

    /// Snapshot the pending input for dispatch. The input is left in place;
    /// the controller clears it once the submission is accepted.
    pub fn submission(&self, busy: bool) -> Result<Submission, InputRejected> {
        if busy {
            return Err(InputRejected::Busy);
        }
        if !self.has_content() {
            return Err(InputRejected::Empty);
        }
        Ok(Submission {
            text: Some(self.text.clone()).filter(|t| !t.is_empty()),
            file: self.file.clone(),
        })
    }

    /// Suggestions show only while nothing is attached and none was picked
    pub fn suggestions_visible(&self) -> bool {
        !self.suggestions_dismissed && self.file.is_none()
    }

    /// Submission for a suggested prompt. Picking one hides the panel until
    /// the conversation is reset.
    pub fn select_suggestion(
        &mut self,
        index: usize,
        busy: bool,
    ) -> Result<Submission, InputRejected> {
        let suggestion = SUGGESTED_PROMPTS
            .get(index)
            .ok_or(InputRejected::UnknownSuggestion(index))?;
        if busy {
            return Err(InputRejected::Busy);
        }
        self.suggestions_dismissed = true;
        Ok(Submission {
            text: Some(suggestion.action.to_string()),
            file: None,
        })
    }

    /// Drop pending text and attachment
    pub fn clear(&mut self) {
        self.text.clear();
        self.file = None;
    }

    /// Back to a fresh collector, suggestions included
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a key press. Enter submits; Enter with Shift or Alt inserts a
    /// newline instead.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.text.push('\n');
                KeyOutcome::Edited
            }
            KeyCode::Enter => match self.submission(busy) {
                Ok(_) => KeyOutcome::Submit,
                // Inert when there is nothing to send
                Err(InputRejected::Empty) => KeyOutcome::Ignored,
                Err(rejected) => KeyOutcome::Rejected(rejected),
            },
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.text.push(c);
                KeyOutcome::Edited
            }
            KeyCode::Backspace => {
                self.text.pop();
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
