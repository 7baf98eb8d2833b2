//! Operator notifications
//!
//! Message and error notices that bypass channel capture and go straight to the
//! operator. [`TerminalAlert`] draws a framed box on the real stderr and, when stdin
//! is an interactive terminal, blocks until Enter is pressed.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::style::{Color, Stylize};

/// Kind of notice, which picks the frame color and default title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Message,
    Error,
}

impl AlertKind {
    fn default_title(&self) -> &'static str {
        match self {
            AlertKind::Message => "Message",
            AlertKind::Error => "ERROR",
        }
    }

    fn color(&self) -> Color {
        match self {
            AlertKind::Message => Color::Cyan,
            AlertKind::Error => Color::Red,
        }
    }
}

/// Something that can put a notice in front of the operator
pub trait Alert: Send + Sync {
    /// Show a notice and return once it has been acknowledged
    fn show(&self, kind: AlertKind, title: Option<&str>, message: &str);

    /// Show an informational notice
    fn message(&self, message: &str) {
        self.show(AlertKind::Message, None, message);
    }

    /// Show an error notice
    fn error(&self, title: Option<&str>, message: &str) {
        self.show(AlertKind::Error, title, message);
    }
}

/// Framed notice on the process's real stderr
#[derive(Debug, Clone, Default)]
pub struct TerminalAlert {
    /// Never wait for Enter, even on an interactive terminal
    pub non_blocking: bool,
}

impl TerminalAlert {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Render the framed notice text
pub fn render_frame(title: &str, message: &str) -> String {
    let lines: Vec<&str> = message.lines().collect();
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);

    let border = format!("+{}+", "-".repeat(width + 2));
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format!("| {:<width$} |\n", title, width = width));
    out.push_str(&border);
    out.push('\n');
    for line in lines {
        out.push_str(&format!("| {:<width$} |\n", line, width = width));
    }
    out.push_str(&border);
    out.push('\n');
    out
}

impl Alert for TerminalAlert {
    fn show(&self, kind: AlertKind, title: Option<&str>, message: &str) {
        let title = title.unwrap_or_else(|| kind.default_title());
        let frame = render_frame(title, message);

        // Written to the real stderr so the notice is never swallowed by a capture.
        let mut stderr = io::stderr().lock();
        let interactive = !self.non_blocking && io::stdin().is_terminal();
        let result = if stderr.is_terminal() {
            write!(stderr, "{}", frame.with(kind.color()))
        } else {
            write!(stderr, "{}", frame)
        };
        if let Err(e) = result.and_then(|_| stderr.flush()) {
            tracing::error!("Failed to show {:?} notice: {}", kind, e);
            return;
        }

        if interactive {
            let prompt = write!(stderr, "Press Enter to continue...").and_then(|_| stderr.flush());
            if let Err(e) = prompt {
                tracing::debug!("Failed to write notice prompt: {}", e);
            }
            drop(stderr);
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                tracing::debug!("Failed to read notice acknowledgement: {}", e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every notice instead of showing it
    #[derive(Debug, Default)]
    pub struct RecordingAlert {
        pub shown: Mutex<Vec<(AlertKind, String, String)>>,
    }

    impl Alert for RecordingAlert {
        fn show(&self, kind: AlertKind, title: Option<&str>, message: &str) {
            self.shown.lock().unwrap().push((
                kind,
                title.unwrap_or_else(|| kind.default_title()).to_string(),
                message.to_string(),
            ));
        }
    }
}
