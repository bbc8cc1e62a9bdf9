//! Terminal logging with colored prefixes and a build progress line.
//!
//! - `log!` prints `[module] message` with a colored prefix
//! - `debug!` does the same, but only under `--verbose`
//! - `ProgressLine` keeps a single in-place line of counters while pages render
//!
//! ```ignore
//! log!("build"; "rendering {} pages", count);
//!
//! let progress = ProgressLine::new(&[("pages", 12)]);
//! progress.inc("pages");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Whether a progress line currently owns the last terminal row.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message only when --verbose is enabled
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Write one log line, keeping an active progress line below it.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    let progress = PROGRESS_ACTIVE.load(Ordering::SeqCst);
    if progress {
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Pick a prefix color by module name. Honors `--color`.
fn colorize_prefix(module: &str) -> String {
    let paint: fn(&String) -> String = match module.to_ascii_lowercase().as_str() {
        "serve" => |p| p.bright_blue().bold().to_string(),
        "build" => |p| p.bright_green().bold().to_string(),
        "error" => |p| p.bright_red().bold().to_string(),
        _ => |p| p.bright_yellow().bold().to_string(),
    };
    format!("[{module}]")
        .if_supports_color(Stream::Stdout, paint)
        .to_string()
}

// ============================================================================
// Progress Line
// ============================================================================

/// Single-line progress display: `[build] pages(42/69)`.
///
/// Counters update in place from worker threads. Refreshes use `try_lock`,
/// so a busy display skips a frame instead of blocking a renderer.
pub struct ProgressLine {
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a progress display. Counters with a zero total are omitted.
    pub fn new(items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);

        let progress = Self {
            counters,
            lock: Mutex::new(()),
        };
        progress.draw(false);
        progress
    }

    /// Increment the named counter.
    pub fn inc(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.current.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.lock.try_lock() {
            self.draw(false);
        }
    }

    /// Render the counters as `name(current/total)` pairs.
    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| {
                format!(
                    "{}({}/{})",
                    c.name,
                    c.current.load(Ordering::Relaxed),
                    c.total
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn draw(&self, newline: bool) {
        let prefix = colorize_prefix("build");
        let line = self.line();

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(stdout, "{prefix} {line}").ok();
        } else {
            write!(stdout, "{prefix} {line}").ok();
        }
        stdout.flush().ok();
    }

    /// Keep the final counts on screen and release the terminal row.
    pub fn finish(self) {
        {
            let _guard = self.lock.lock();
            self.draw(true);
        }
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        stdout.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_prefix_contains_module() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("serve"), "[serve]");
        assert_eq!(colorize_prefix("content"), "[content]");

        owo_colors::set_override(true);
        let colored = colorize_prefix("serve");
        owo_colors::set_override(false);
        assert!(colored.contains("[serve]"));
        assert!(colored.starts_with('\u{1b}'));
    }

    #[test]
    fn test_progress_line_skips_empty_counters() {
        let progress = ProgressLine {
            counters: vec![Counter {
                name: "pages",
                total: 3,
                current: AtomicUsize::new(0),
            }],
            lock: Mutex::new(()),
        };
        progress.counters[0].current.fetch_add(2, Ordering::Relaxed);
        assert_eq!(progress.line(), "pages(2/3)");
        std::mem::forget(progress);
    }
}
