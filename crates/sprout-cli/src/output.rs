//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;

use sprout_core::{
    application::ports::{LifecycleReporter, ProgressSink},
    domain::LifecycleEvent,
};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Longest progress line shown next to the spinner.
const SPINNER_MESSAGE_CHARS: usize = 72;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Always written: the machine-readable payload for `--output-format json`
    /// or content the user asked for explicitly.
    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        Term::stderr().write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Command plus description, for "what next" listings.
    pub fn command(&self, command: &str, description: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("  {command}\n  {description}\n")
        } else {
            format!("  {}\n  {}\n", command.cyan(), description.dimmed())
        };
        self.term.write_line(&line)
    }

    /// A spinner for the install phase. It stays invisible until
    /// [`Spinner::start`], and forever when output is not interactive.
    pub fn spinner(&self, msg: &str) -> Spinner {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {prefix} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
        );
        bar.set_prefix(msg.to_string());
        Spinner {
            bar,
            interactive: !self.is_silent() && self.term.is_term(),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn is_silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }
}

/// Spinner that shows the latest package manager output.
#[derive(Clone)]
pub struct Spinner {
    bar: ProgressBar,
    interactive: bool,
    started: Arc<AtomicBool>,
}

impl Spinner {
    /// Begin drawing. Idempotent.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) || !self.interactive {
            return;
        }
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    pub fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }

    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for Spinner {
    fn report(&self, chunk: &str) {
        let line = chunk.trim();
        if line.is_empty() {
            return;
        }
        self.bar
            .set_message(line.chars().take(SPINNER_MESSAGE_CHARS).collect::<String>());
    }
}

/// Forwards every event to `inner` and starts the spinner once the
/// install begins, so nothing spins while files are written.
pub struct SpinnerReporter<R> {
    inner: R,
    spinner: Spinner,
}

impl<R> SpinnerReporter<R> {
    pub fn new(inner: R, spinner: Spinner) -> Self {
        Self { inner, spinner }
    }
}

impl<R: LifecycleReporter> LifecycleReporter for SpinnerReporter<R> {
    fn emit(&self, event: &LifecycleEvent) {
        self.inner.emit(event);
        if matches!(event, LifecycleEvent::InstallStarting { .. }) {
            self.spinner.start();
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
