//! Terminal output: prefixed log lines, a build progress line and the
//! overwriting status block used by `densify preview`.
//!
//! Log lines and the progress line go to stderr so stdout carries only
//! command output (`build --dry` JSON, preview XML).
//!
//! ```ignore
//! log!("build"; "{} sources", count);
//! debug!("cache"; "fresh {}", name);   // only with --verbose
//!
//! let progress = ProgressLine::new("exec", &[("raster", 8), ("post", 16)]);
//! progress.inc("post");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{Write, stderr, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Set by `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Lines currently occupied by a live progress display.
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, shown only with `--verbose`
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Print one prefixed line, keeping an active progress line below it.
#[allow(clippy::cast_possible_truncation)]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stderr = stderr().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stderr, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply `style` only when `stream` gets colors (`--color`, TTY detection).
pub fn paint(stream: Stream, text: impl fmt::Display, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

fn colorize_prefix(module: &str) -> String {
    let color = match module.to_ascii_lowercase().as_str() {
        "preview" | "watch" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warn" | "config" => Style::new().bright_magenta(),
        "cache" => Style::new().bright_blue(),
        _ => Style::new().bright_yellow(),
    };
    paint(Stream::Stderr, format!("[{module}]"), color.bold())
}

// ============================================================================
// Watch status
// ============================================================================

/// Wall-clock `HH:MM:SS` (UTC).
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Status block that replaces its previous output on every update.
pub struct WatchStatus {
    last_lines: usize,
}

static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus::new()));

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.display(paint(Stream::Stdout, "✓", Style::new().green()), message);
    }

    pub fn unchanged(&mut self, message: &str) {
        self.display(String::new(), &paint(Stream::Stdout, message, Style::new().dimmed()));
    }

    pub fn error(&mut self, summary: &str, detail: &str) {
        self.display(paint(Stream::Stdout, "✗", Style::new().red()), &join_detail(summary, detail));
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines.min(u16::MAX as usize) as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = paint(Stream::Stdout, format!("[{}]", now()), Style::new().dimmed());
        if symbol.is_empty() {
            writeln!(stdout, "{timestamp} {message}").ok();
        } else {
            writeln!(stdout, "{timestamp} {symbol} {message}").ok();
        }
        stdout.flush().ok();

        self.last_lines = line_count(message);
    }
}

fn join_detail(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

pub fn status_success(message: &str) {
    WATCH_STATUS.lock().success(message);
}

pub fn status_unchanged(message: &str) {
    WATCH_STATUS.lock().unchanged(message);
}

pub fn status_error(summary: &str, detail: &str) {
    WATCH_STATUS.lock().error(summary, detail);
}

// ============================================================================
// Progress line
// ============================================================================

/// Single-line counters on stderr, e.g. `[exec] vector(1/1) raster(2/2) post(4/8)`.
///
/// Updates use `try_lock`; a busy display skips the refresh instead of
/// blocking a worker thread.
pub struct ProgressLine {
    prefix: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Counters with a zero total are left out.
    pub fn new(prefix: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        BAR_COUNT.store(1, Ordering::SeqCst);
        let progress = Self {
            prefix,
            counters,
            lock: Mutex::new(()),
        };
        progress.display(false);
        progress
    }

    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            if let Some(_guard) = self.lock.try_lock() {
                self.display(false);
            }
        }
    }

    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn display(&self, newline: bool) {
        let line = format!("{} {}", colorize_prefix(self.prefix), self.render());
        let mut stderr = stderr().lock();
        execute!(stderr, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(stderr, "{line}").ok();
        } else {
            write!(stderr, "{line}").ok();
        }
        stderr.flush().ok();
    }

    /// Keep the final counts on screen.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.display(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        let mut stderr = stderr().lock();
        execute!(stderr, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        stderr.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_status_new() {
        assert_eq!(WatchStatus::new().last_lines, 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("converted icon.svg"), 1);
        assert_eq!(line_count(&join_detail("failed", "line 1\nline 2")), 3);
        assert_eq!(join_detail("failed", ""), "failed");
    }

    #[test]
    fn test_progress_render_skips_empty_counters() {
        let progress = ProgressLine::new("exec", &[("raster", 2), ("post", 0), ("optimize", 3)]);
        progress.inc("raster");
        progress.inc("post");
        progress.inc("missing");
        assert_eq!(progress.render(), "raster(1/2) optimize(0/3)");
        progress.finish();
    }

    #[test]
    fn test_color_never_leaves_plain_text() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("warn"), "[warn]");
        assert_eq!(paint(Stream::Stdout, "✓", Style::new().green()), "✓");
        owo_colors::unset_override();
    }

    #[test]
    fn test_now_format() {
        let t = now();
        assert_eq!(t.len(), 8);
        assert_eq!(t.matches(':').count(), 2);
    }
}
