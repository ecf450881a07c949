//! Terminal application state and key handling

use crate::attachment::Attachment;
use crate::config::ChatConfig;
use crate::conversation::ConversationController;
use crate::input::KeyOutcome;
use crate::query::QueryService;
use crate::runtime::{Completion, ConversationRuntime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What the bottom input box is editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Composing a message
    Compose,
    /// Typing the path of a file to attach
    Attach { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Short-lived status line message
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    expires_at: Instant,
}

pub struct App<Q: QueryService + 'static> {
    runtime: ConversationRuntime<Q>,
    mode: Mode,
    notice: Option<Notice>,
    notice_duration: Duration,
    max_attachment_bytes: u64,
    should_quit: bool,
}

impl<Q: QueryService + 'static> App<Q> {
    pub fn new(config: &ChatConfig, service: Q) -> Self {
        Self {
            runtime: ConversationRuntime::new(service),
            mode: Mode::Compose,
            notice: None,
            notice_duration: config.notice_duration,
            max_attachment_bytes: config.max_attachment_bytes,
            should_quit: false,
        }
    }

    pub fn conversation(&self) -> &ConversationController {
        self.runtime.controller()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn endpoint(&self) -> &str {
        self.runtime.endpoint()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The current notice, unless it has expired
    pub fn notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.expires_at > Instant::now())
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
            expires_at: Instant::now() + self.notice_duration,
        });
    }

    pub async fn recv_completion(&mut self) -> Option<Completion> {
        self.runtime.recv_completion().await
    }

    pub fn on_completion(&mut self, completion: Completion) {
        self.runtime.apply_completion(completion);
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if matches!(self.mode, Mode::Attach { .. }) {
                    self.mode = Mode::Compose;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if let Mode::Attach { path } = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let path = PathBuf::from(std::mem::take(path).trim());
                    self.mode = Mode::Compose;
                    self.attach(path).await;
                }
                KeyCode::Backspace => {
                    path.pop();
                }
                KeyCode::Char(c) if !ctrl => path.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('o') if ctrl => {
                self.mode = Mode::Attach {
                    path: String::new(),
                };
            }
            KeyCode::Char('x') if ctrl => self.runtime.input_mut().set_file(None),
            KeyCode::Char('l') if ctrl => {
                if self.conversation().can_reset() {
                    self.runtime.reset();
                    self.notice = None;
                }
            }
            KeyCode::F(n) if self.conversation().suggestions_visible() => {
                let index = usize::from(n).saturating_sub(1);
                if let Err(e) = self.runtime.submit_suggestion(index) {
                    self.notify(NoticeLevel::Warning, e.to_string());
                }
            }
            _ => {
                let busy = self.conversation().is_busy();
                match self.runtime.input_mut().handle_key(key, busy) {
                    KeyOutcome::Submit => {
                        if let Err(e) = self.runtime.submit_input() {
                            self.notify(NoticeLevel::Warning, e.to_string());
                        }
                    }
                    KeyOutcome::Rejected(rejected) => {
                        self.notify(NoticeLevel::Warning, rejected.to_string());
                    }
                    KeyOutcome::Edited | KeyOutcome::Ignored => {}
                }
            }
        }
    }

    /// Bracketed paste: the text lands as-is, so embedded newlines never
    /// act as the submit key
    pub fn handle_paste(&mut self, pasted: &str) {
        match &mut self.mode {
            Mode::Compose => self.runtime.input_mut().paste(pasted),
            Mode::Attach { path } => {
                path.extend(pasted.chars().filter(|&c| !matches!(c, '\r' | '\n')));
            }
        }
    }

    async fn attach(&mut self, path: PathBuf) {
        if path.as_os_str().is_empty() {
            return;
        }
        match Attachment::load(&path, self.max_attachment_bytes).await {
            Ok(attachment) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("Attached {}", attachment.file_name()),
                );
                self.runtime.input_mut().set_file(Some(attachment));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Attachment refused");
                self.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }
}
