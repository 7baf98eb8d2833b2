//! Timestamped, colorized console messages
//!
//! [`Console`] renders `[time]\tmessage` lines and writes them through a channel
//! registry, so it never knows whether a capture is active.

mod style;

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::style::Stylize;

use crate::capture::{Channel, ChannelRegistry};

pub use style::{ConsoleColor, ConsoleStyle, Palette, TimeFormat};

/// The four message categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Normal,
    Info,
    Warn,
    Error,
}

impl Category {
    /// Channel the category is written to
    pub fn channel(&self) -> Channel {
        match self {
            Category::Normal | Category::Info | Category::Warn => Channel::Stdout,
            Category::Error => Channel::Stderr,
        }
    }

    fn color(&self, palette: &Palette) -> ConsoleColor {
        match self {
            Category::Normal => palette.normal,
            Category::Info => palette.info,
            Category::Warn => palette.warn,
            Category::Error => palette.error,
        }
    }
}

/// Message formatter bound to a channel registry
#[derive(Debug, Clone)]
pub struct Console {
    registry: Arc<ChannelRegistry>,
    style: ConsoleStyle,
}

impl Console {
    pub fn new(registry: Arc<ChannelRegistry>, style: ConsoleStyle) -> Self {
        Self { registry, style }
    }

    /// Console writing through the process-wide registry
    pub fn global(style: ConsoleStyle) -> Self {
        Self::new(ChannelRegistry::global(), style)
    }

    pub fn style(&self) -> &ConsoleStyle {
        &self.style
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Render one line (with trailing newline) for `category` at `now`
    pub fn format_line(
        &self,
        category: Category,
        message: &dyn Display,
        now: &DateTime<Local>,
    ) -> String {
        let body = format!("[{}]\t{}", self.style.time_format.render(now), message);

        if self.style.colors {
            let color = category.color(&self.style.palette).to_crossterm();
            format!("{}\n", body.with(color))
        } else {
            format!("{}\n", body)
        }
    }

    /// Write a message of `category` to its channel
    pub fn emit(&self, category: Category, message: impl Display) {
        let line = self.format_line(category, &message, &Local::now());
        if let Err(e) = self.registry.write(category.channel(), line.as_bytes()) {
            tracing::debug!(channel = %category.channel(), "Console write failed: {}", e);
        }
    }

    /// Plain message on stdout
    pub fn log(&self, message: impl Display) {
        self.emit(Category::Normal, message);
    }

    /// Informational message on stdout
    pub fn info(&self, message: impl Display) {
        self.emit(Category::Info, message);
    }

    /// Warning on stdout
    pub fn warn(&self, message: impl Display) {
        self.emit(Category::Warn, message);
    }

    /// Error on stderr
    pub fn err(&self, message: impl Display) {
        self.emit(Category::Error, message);
    }
}
