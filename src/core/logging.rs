//! Logging Module
//!
//! Sets up structured logging for the command-line front end:
//! - JSON log file with daily rotation (tracing-appender)
//! - Human-readable stderr output, keeping stdout free for records
//! - `log` crate records bridged into `tracing`
//! - miette error reporting tuned to the terminal
//!
//! Library code only uses the `log` facade; nothing here is required to
//! call the extraction functions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use console::style;
use flate2::write::GzEncoder;
use flate2::Compression;
use supports_color::Stream;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::AppConfig;

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "compendium.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// Terminal color support levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// 24-bit TrueColor (16.7M colors)
    TrueColor,
    /// 256-color palette
    Ansi256,
    /// 16 ANSI colors
    Ansi16,
    /// No color support
    NoColor,
}

/// Detected capabilities of the stderr terminal.
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_level: ColorLevel,
    pub supports_unicode: bool,
    pub is_interactive: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities from environment
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color_level = match supports_color::on(Stream::Stderr) {
            Some(support) if support.has_16m => ColorLevel::TrueColor,
            Some(support) if support.has_256 => ColorLevel::Ansi256,
            Some(support) if support.has_basic => ColorLevel::Ansi16,
            _ => ColorLevel::NoColor,
        };

        let is_interactive = io::stderr().is_terminal();

        // Unicode support heuristic
        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            color_level,
            supports_unicode,
            is_interactive,
        }
    }

    /// Check if colors should be used
    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.color_level != ColorLevel::NoColor
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Initialize the logging system.
///
/// This sets up:
/// 1. A stderr logger (compact, colored when the terminal allows).
/// 2. A file logger (JSON formatted) in the configured log directory.
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for error reporting.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// run so buffered logs are flushed on exit.
pub fn init(config: &AppConfig) -> WorkerGuard {
    let log_dir = config.log_dir();

    let guard = match try_init(config) {
        Ok(guard) => guard,
        Err((guard, e)) => {
            eprintln!("Failed to initialize logging: {}", e);
            guard
        }
    };

    init_miette();

    // Compress old logs in background (after init so log macros work)
    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    log::debug!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}

/// Install the global subscriber.
///
/// `try_init` also installs the `log` bridge (tracing-subscriber's
/// `tracing-log` feature), so `log::` records from the library reach both
/// layers. On failure the writer guard is still returned so nothing buffered
/// is lost.
fn try_init(config: &AppConfig) -> Result<WorkerGuard, (WorkerGuard, TryInitError)> {
    let log_dir = config.log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter.clone());

    // Stderr Layer: records go to stdout, so diagnostics stay off it
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(get_terminal_caps().should_colorize())
        .compact()
        .with_filter(env_filter);

    match tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        Ok(()) => Ok(guard),
        Err(e) => Err((guard, e)),
    }
}

/// Whether a file in the log directory is a rolled log awaiting compression.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    let prefix = format!("{}.", LOG_FILE_NAME);
    name.starts_with(&prefix) && !name.ends_with(today_suffix) && !name.ends_with(".gz")
}

/// Compress rolled log files from previous days.
fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path: PathBuf = parent_dir.join(gz_path_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}

/// Initialize miette for error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(caps.color_level == ColorLevel::TrueColor)
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Console Output Utilities
// ============================================================================

fn status_prefix(unicode: &'static str, ascii: &'static str) -> &'static str {
    if get_terminal_caps().supports_unicode {
        unicode
    } else {
        ascii
    }
}

/// Print a success message to stderr
pub fn print_success(message: &str) {
    let prefix = status_prefix("✔", "[ok]");
    eprintln!("{} {}", style(prefix).green(), style(message).green());
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    let prefix = status_prefix("⚠", "[warn]");
    eprintln!(
        "{} {}",
        style(prefix).yellow(),
        style(message).yellow().bold()
    );
}

// ============================================================================
// Tests
// ============================================================================
