// src/status/console.rs

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::text::truncate_with_ellipsis;
use super::{StatusAction, StatusSurface};
use crate::engine::RelayEvent;
use crate::icon::Icon;

const LINE_SEPARATOR: &str = " | ";

/// Status surface on the controlling terminal.
///
/// - Status text is kept on a single, continually rewritten stderr line
///   when stderr is a terminal, and logged at debug otherwise.
/// - Registered actions can be invoked by typing their key on stdin
///   (`d`/`details`, `q`/`exit`), when stdin is a terminal.
/// - Errors go to stderr.
pub struct ConsoleSurface {
    events: mpsc::Sender<RelayEvent>,
    text_limit: usize,
    actions: Vec<StatusAction>,
    visible: bool,
    live_line: bool,
    reader: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ConsoleSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSurface")
            .field("actions", &self.actions)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl ConsoleSurface {
    /// `text_limit` caps the rendered line, separators included.
    pub fn new(events: mpsc::Sender<RelayEvent>, text_limit: usize) -> Self {
        Self {
            events,
            text_limit,
            actions: Vec::new(),
            visible: false,
            live_line: std::io::stderr().is_terminal(),
            reader: None,
        }
    }

    fn render(&self, text: &str) {
        let line = single_line(text, self.text_limit);
        if self.live_line {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "\r\x1b[2K{line}");
            let _ = err.flush();
        } else {
            debug!(status = %line, "status text");
        }
    }

    fn clear_line(&self) {
        if self.live_line {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        }
    }

    fn spawn_action_reader(&mut self) {
        if self.reader.is_some() || self.actions.is_empty() || !std::io::stdin().is_terminal() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }

        let actions: Arc<[StatusAction]> = self.actions.clone().into();
        let events = self.events.clone();
        self.reader = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let Some(action) = action_for_input(&line) else {
                    continue;
                };
                if !actions.contains(&action) {
                    continue;
                }
                if events.send(RelayEvent::ActionInvoked(action)).await.is_err() {
                    break;
                }
            }
        }));
    }
}

/// Join the status lines with ` | ` for a one-line display, cut again to
/// `limit` since the separators are longer than the newlines they replace.
pub fn single_line(text: &str, limit: usize) -> String {
    truncate_with_ellipsis(&text.replace('\n', LINE_SEPARATOR), limit)
}

/// Map a line typed on stdin to an action.
pub fn action_for_input(line: &str) -> Option<StatusAction> {
    match line.trim().to_ascii_lowercase().as_str() {
        "d" | "details" => Some(StatusAction::ShowDetails),
        "q" | "exit" | "quit" => Some(StatusAction::Exit),
        _ => None,
    }
}

impl StatusSurface for ConsoleSurface {
    fn show(&mut self, icon: &Icon, text: &str) {
        self.visible = true;
        info!(icon = ?icon.origin(), "status surface shown");
        self.spawn_action_reader();
        self.render(text);
    }

    fn set_text(&mut self, text: &str) {
        if self.visible {
            self.render(text);
        }
    }

    fn register_action(&mut self, action: StatusAction) {
        if !self.actions.contains(&action) {
            debug!(action = action.label(), "status action registered");
            self.actions.push(action);
        }
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        error!(%title, %message, "relay error");
        self.clear_line();
        eprintln!("{title}: {message}");
    }

    fn show_details(&mut self, title: &str, lines: &[String]) {
        self.clear_line();
        eprintln!("{title}");
        for line in lines {
            eprintln!("  {line}");
        }
    }

    fn hide(&mut self) {
        if self.visible {
            self.clear_line();
            self.visible = false;
        }
    }

    fn dispose(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.actions.clear();
    }
}
