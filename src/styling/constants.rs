//! Message symbols and formatting helpers
//!
//! Use `cformat!` with HTML-like tags for user-facing messages:
//!
//! ```
//! use color_print::cformat;
//! use newtab::styling::success_message;
//!
//! let id = 3;
//! let msg = success_message(cformat!("Opened tab in window <bold>{id}</>"));
//! ```
//!
//! Semantic mapping: errors red, warnings yellow, hints dim, prompts cyan,
//! success green.

use std::fmt;

use anstyle::{AnsiColor, Color, Style};
use color_print::{cformat, cstr};

/// Style for the default choice in window listings.
pub const DEFAULT_CHOICE: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Success symbol (green ✓)
pub const SUCCESS_SYMBOL: &str = cstr!("<green>✓</>");

/// Error symbol (red ✗)
pub const ERROR_SYMBOL: &str = cstr!("<red>✗</>");

/// Warning symbol (yellow ▲)
pub const WARNING_SYMBOL: &str = cstr!("<yellow>▲</>");

/// Hint symbol (dim ↳)
pub const HINT_SYMBOL: &str = cstr!("<dim>↳</>");

/// Info symbol (dim ○)
pub const INFO_SYMBOL: &str = cstr!("<dim>○</>");

/// Prompt symbol (cyan ❯) - for questions requiring user input
pub const PROMPT_SYMBOL: &str = cstr!("<cyan>❯</>");

/// A message that has already been formatted with a symbol and styling.
///
/// `FormattedMessage` does not implement `AsRef<str>`, so passing one to a
/// message function is a compile error:
///
/// ```compile_fail
/// use newtab::styling::error_message;
///
/// let msg = error_message("first error");
/// let double = error_message(msg);
/// ```
#[derive(Debug, Clone)]
pub struct FormattedMessage(String);

impl FormattedMessage {
    /// Borrow the inner string (e.g., in tests).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format an error message with symbol and red styling
///
/// Content can include inner styling like `<bold>`:
/// ```
/// use color_print::cformat;
/// use newtab::styling::error_message;
///
/// let path = "/tmp/missing.sh";
/// println!("{}", error_message(cformat!("Script <bold>{path}</> not found")));
/// ```
pub fn error_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{ERROR_SYMBOL} <red>{}</>", content.as_ref()))
}

/// Format a hint message with symbol and dim styling
pub fn hint_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{HINT_SYMBOL} <dim>{}</>", content.as_ref()))
}

/// Format a warning message with symbol and yellow styling
pub fn warning_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{WARNING_SYMBOL} <yellow>{}</>", content.as_ref()))
}

/// Format a success message with symbol and green styling
pub fn success_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{SUCCESS_SYMBOL} <green>{}</>", content.as_ref()))
}

/// Format an info message with symbol (no color on text - neutral status)
pub fn info_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(format!("{INFO_SYMBOL} {}", content.as_ref()))
}

/// Format a prompt message with symbol
pub fn prompt_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(format!("{PROMPT_SYMBOL} {}", content.as_ref()))
}
