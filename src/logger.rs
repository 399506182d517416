//! Logging utilities with colored module prefixes.
//!
//! Provides the `log!` macro for formatted terminal output:
//!
//! ```ignore
//! log!("build"; "rendered {} pages", count);
//! // => [build] rendered 12 pages
//! ```
//!
//! Each module name gets a stable color so interleaved output from
//! parallel build workers stays readable.

use colored::{Color, Colorize};
use crossterm::terminal::size;
use std::sync::OnceLock;

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Colors cycled through for module prefixes.
const PREFIX_COLORS: &[Color] = &[
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
];

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Stable color for a module name.
fn pick_color(module: &str) -> Color {
    let sum: usize = module.bytes().map(usize::from).sum();
    PREFIX_COLORS[sum % PREFIX_COLORS.len()]
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print one log line, truncating to the terminal width.
pub fn log(module: &str, message: &str) {
    let bracketed = format!("[{module}]");
    let prefix = bracketed.as_str().color(pick_color(module)).bold();
    let width = get_terminal_width() as usize;

    // "[module] " + message
    let budget = width.saturating_sub(module.len() + 3);
    let shown: String = if message.chars().count() > budget && budget > 1 {
        let cut: String = message.chars().take(budget.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        message.to_owned()
    };

    println!("{prefix} {shown}");
}
