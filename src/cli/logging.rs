// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Console logging shared by the library and the CLI.
//!
//! Every message goes to stderr so that feature output on stdout stays
//! machine-readable. The macros exported here format their arguments and
//! hand them to [`emit`] with a [`Level`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

/// Global verbosity flag.
static VERBOSE: AtomicBool = AtomicBool::new(true);

/// Set the global verbosity flag.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Check if verbose output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Kind of console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
    Success,
    /// Progress detail, hidden unless verbose.
    Verbose,
    /// Heading, hidden unless verbose.
    Section,
}

impl Level {
    /// Whether messages at this level are suppressed when verbose output is off.
    #[must_use]
    pub const fn is_verbose_only(self) -> bool {
        matches!(self, Self::Verbose | Self::Section)
    }
}

/// Format a message with the prefix and colouring of its level.
#[must_use]
pub fn render(level: Level, message: &str) -> String {
    match level {
        Level::Warning => format!("{} {message}", "WARNING ⚠️".yellow().bold()),
        Level::Error => format!("{} {message}", "Error:".red().bold()),
        Level::Success => format!("{} {message}", "✅".green()),
        Level::Verbose => message.to_string(),
        Level::Section => format!("\n{}", message.cyan().bold()),
    }
}

/// Write a message to stderr unless its level is currently suppressed.
pub fn emit(level: Level, args: fmt::Arguments<'_>) {
    if level.is_verbose_only() && !is_verbose() {
        return;
    }
    eprintln!("{}", render(level, &args.to_string()));
}

/// Macro for warning messages.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Warning, format_args!($($arg)*))
    };
}

/// Macro for error messages.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Error, format_args!($($arg)*))
    };
}

/// Macro for success messages.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Success, format_args!($($arg)*))
    };
}

/// Macro for verbose messages.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Verbose, format_args!($($arg)*))
    };
}

/// Macro for section headers.
#[macro_export]
macro_rules! section {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Section, format_args!($($arg)*))
    };
}
