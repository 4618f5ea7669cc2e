//! Console output for a bigring run.
//!
//! A run prints one tree: the version header, a block per phase (location,
//! twilight window, weather history, ranking) with indented details, and a
//! block per recommended day. Warnings and errors are prefixed lines inside
//! that tree.
//!
//! Output can be switched off globally, which the tests do to keep their
//! output clean. Per-day and per-request details appear only in debug mode.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Prefix of a standalone message line.
#[derive(Debug)]
pub enum LogLevel {
    Warn, // skipped days, dropped years, ambiguous cities
    Err,  // the request failed
}

/// Printer for the output tree.
pub struct Log;

impl Log {
    /// Silence or restore all output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Turn `--debug` details on or off.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }

        let prefix = match level {
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
        };
        println!("{} {}", prefix, message);
    }

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    /// Indented line printed only with `--debug`, such as a day's raw features.
    pub fn log_detail(message: &str) {
        if Self::is_debug() {
            Self::log_indented(message);
        }
    }

    // ═══ Tree Drawing ═══

    /// A line under the current block: a coordinate, a score, a pink-time span.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    /// An empty stem between the tree and a final message.
    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Opens a block: one per request phase and one per recommended day.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Root of the tree.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ bigring v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Closes the tree after the report or an error.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}
