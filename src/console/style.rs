//! Colors and display time formats for console messages
//!
//! Styling is a plain value handed to [`super::Console`] at construction, so two
//! consoles in one process can format differently.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use crossterm::style::Color;
use serde::{Deserialize, Serialize};

/// The sixteen standard terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    White,
    BlackBright,
    RedBright,
    GreenBright,
    YellowBright,
    BlueBright,
    PurpleBright,
    CyanBright,
    WhiteBright,
}

impl ConsoleColor {
    /// Matching crossterm color
    pub fn to_crossterm(self) -> Color {
        match self {
            ConsoleColor::Black => Color::Black,
            ConsoleColor::Red => Color::DarkRed,
            ConsoleColor::Green => Color::DarkGreen,
            ConsoleColor::Yellow => Color::DarkYellow,
            ConsoleColor::Blue => Color::DarkBlue,
            ConsoleColor::Purple => Color::DarkMagenta,
            ConsoleColor::Cyan => Color::DarkCyan,
            ConsoleColor::White => Color::Grey,
            ConsoleColor::BlackBright => Color::DarkGrey,
            ConsoleColor::RedBright => Color::Red,
            ConsoleColor::GreenBright => Color::Green,
            ConsoleColor::YellowBright => Color::Yellow,
            ConsoleColor::BlueBright => Color::Blue,
            ConsoleColor::PurpleBright => Color::Magenta,
            ConsoleColor::CyanBright => Color::Cyan,
            ConsoleColor::WhiteBright => Color::White,
        }
    }
}

/// Per-category colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_normal")]
    pub normal: ConsoleColor,
    #[serde(default = "default_info")]
    pub info: ConsoleColor,
    #[serde(default = "default_warn")]
    pub warn: ConsoleColor,
    #[serde(default = "default_error")]
    pub error: ConsoleColor,
}

fn default_normal() -> ConsoleColor {
    ConsoleColor::WhiteBright
}

fn default_info() -> ConsoleColor {
    ConsoleColor::CyanBright
}

fn default_warn() -> ConsoleColor {
    ConsoleColor::YellowBright
}

fn default_error() -> ConsoleColor {
    ConsoleColor::RedBright
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: default_normal(),
            info: default_info(),
            warn: default_warn(),
            error: default_error(),
        }
    }
}

/// How the timestamp prefix of a console message is rendered
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `HH:mm:ss`
    #[default]
    HourMinuteSecond,
    /// `hh:mm:ss AM`
    HourMinuteSecond12h,
    MonthDayHourMinuteSecond,
    MonthDayHourMinuteSecond12h,
    DayMonthHourMinuteSecond,
    DayMonthHourMinuteSecond12h,
    YearMonthDayHourMinuteSecond,
    YearMonthDayHourMinuteSecond12h,
    YearDayMonthHourMinuteSecond,
    YearDayMonthHourMinuteSecond12h,
    MonthDayYearHourMinuteSecond,
    MonthDayYearHourMinuteSecond12h,
    DayMonthYearHourMinuteSecond,
    DayMonthYearHourMinuteSecond12h,
    /// Any chrono strftime pattern
    Custom(String),
}

impl TimeFormat {
    /// The strftime pattern for this format
    pub fn pattern(&self) -> &str {
        match self {
            TimeFormat::HourMinuteSecond => "%H:%M:%S",
            TimeFormat::HourMinuteSecond12h => "%I:%M:%S %p",
            TimeFormat::MonthDayHourMinuteSecond => "%m/%d %H:%M:%S",
            TimeFormat::MonthDayHourMinuteSecond12h => "%m/%d %I:%M:%S %p",
            TimeFormat::DayMonthHourMinuteSecond => "%d/%m %H:%M:%S",
            TimeFormat::DayMonthHourMinuteSecond12h => "%d/%m %I:%M:%S %p",
            TimeFormat::YearMonthDayHourMinuteSecond => "%Y/%m/%d %H:%M:%S",
            TimeFormat::YearMonthDayHourMinuteSecond12h => "%Y/%m/%d %I:%M:%S %p",
            TimeFormat::YearDayMonthHourMinuteSecond => "%Y/%d/%m %H:%M:%S",
            TimeFormat::YearDayMonthHourMinuteSecond12h => "%Y/%d/%m %I:%M:%S %p",
            TimeFormat::MonthDayYearHourMinuteSecond => "%m/%d/%Y %H:%M:%S",
            TimeFormat::MonthDayYearHourMinuteSecond12h => "%m/%d/%Y %I:%M:%S %p",
            TimeFormat::DayMonthYearHourMinuteSecond => "%d/%m/%Y %H:%M:%S",
            TimeFormat::DayMonthYearHourMinuteSecond12h => "%d/%m/%Y %I:%M:%S %p",
            TimeFormat::Custom(pattern) => pattern,
        }
    }

    /// Check that the pattern only uses valid strftime specifiers
    pub fn is_valid(&self) -> bool {
        !StrftimeItems::new(self.pattern()).any(|item| matches!(item, Item::Error))
    }

    /// Render `time`, falling back to `HH:mm:ss` for an invalid custom pattern
    pub fn render(&self, time: &DateTime<Local>) -> String {
        let mut out = String::new();
        if self.is_valid() && write!(out, "{}", time.format(self.pattern())).is_ok() {
            return out;
        }
        time.format(TimeFormat::HourMinuteSecond.pattern()).to_string()
    }
}

/// Everything that shapes a rendered console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleStyle {
    pub palette: Palette,
    pub time_format: TimeFormat,
    /// Emit color escape sequences
    pub colors: bool,
}

impl Default for ConsoleStyle {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            time_format: TimeFormat::default(),
            colors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn afternoon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 11, 5, 14, 7, 3).unwrap()
    }

    #[test]
    fn test_time_formats() {
        let t = afternoon();
        assert_eq!(TimeFormat::HourMinuteSecond.render(&t), "14:07:03");
        assert_eq!(TimeFormat::HourMinuteSecond12h.render(&t), "02:07:03 PM");
        assert_eq!(
            TimeFormat::YearMonthDayHourMinuteSecond.render(&t),
            "2024/11/05 14:07:03"
        );
        assert_eq!(
            TimeFormat::DayMonthYearHourMinuteSecond12h.render(&t),
            "05/11/2024 02:07:03 PM"
        );
        assert_eq!(TimeFormat::MonthDayHourMinuteSecond.render(&t), "11/05 14:07:03");
    }

    #[test]
    fn test_custom_format() {
        let t = afternoon();
        let format = TimeFormat::Custom("%Y-%m-%d".to_string());
        assert!(format.is_valid());
        assert_eq!(format.render(&t), "2024-11-05");
    }

    #[test]
    fn test_invalid_custom_format_falls_back() {
        let format = TimeFormat::Custom("%Q broken".to_string());
        assert!(!format.is_valid());
        assert_eq!(format.render(&afternoon()), "14:07:03");
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.normal, ConsoleColor::WhiteBright);
        assert_eq!(palette.info, ConsoleColor::CyanBright);
        assert_eq!(palette.warn, ConsoleColor::YellowBright);
        assert_eq!(palette.error, ConsoleColor::RedBright);
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(ConsoleColor::Red.to_crossterm(), Color::DarkRed);
        assert_eq!(ConsoleColor::RedBright.to_crossterm(), Color::Red);
        assert_eq!(ConsoleColor::BlackBright.to_crossterm(), Color::DarkGrey);
    }
}
