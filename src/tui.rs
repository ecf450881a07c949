//! Terminal front-end
//!
//! One loop owns the conversation: terminal input, query completions and a
//! redraw tick are multiplexed with `select!`, so every transition happens
//! on this task.

mod app;
mod render;

use app::App;
use crate::config::ChatConfig;
use crate::query::QueryService;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as TermEvent, EventStream,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(250);

/// Raw mode, alternate screen and bracketed paste, undone on drop
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Run the chat until the user quits
pub async fn run<Q: QueryService + 'static>(config: &ChatConfig, service: Q) -> io::Result<()> {
    let mut app = App::new(config, service);
    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    while !app.should_quit() {
        guard.terminal.draw(|frame| render::draw(frame, &app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) => app.handle_key(key).await,
                Some(Ok(TermEvent::Paste(pasted))) => app.handle_paste(&pasted),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Terminal input failed");
                    return Err(e);
                }
                None => break,
            },
            Some(completion) = app.recv_completion() => {
                app.on_completion(completion);
            }
            // Expires notices
            _ = tick.tick() => {}
        }
    }

    tracing::info!(
        messages = app.conversation().messages().len(),
        "Chat closed"
    );
    Ok(())
}
