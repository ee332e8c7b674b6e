//! Shell output and progress.
//!
//! Status lines go to stderr with right-aligned, colored verbs. JSON mode
//! silences them; the build runner then also sends the tool's stdout to
//! stderr so stdout carries a single JSON document. A spinner runs while the
//! native build tool works.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Where output goes: human status lines, or a single JSON document on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Human { verbosity: Verbosity },
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
        }
    }
}

/// How much the human mode prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Status lines and a spinner
    #[default]
    Normal,
    /// Status lines only; tool output and debug logs are the progress
    Verbose,
}

/// The verb in a status line; its color follows the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Packaged,
    Finished,

    // In progress (cyan)
    Building,
    Packaging,

    // Warning (yellow)
    Skipped,
    Warning,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Packaged => "Packaged",
            Status::Finished => "Finished",
            Status::Building => "Building",
            Status::Packaging => "Packaging",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Packaged | Status::Finished => "\x1b[1;32m",
            Status::Building | Status::Packaging => "\x1b[1;36m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Output sink shared by all commands.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
}

impl Shell {
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match mode {
            ShellMode::Json => false,
            ShellMode::Human { .. } => io::stderr().is_terminal(),
        };
        Shell { mode, use_color }
    }

    /// `--json` wins over `--verbose`.
    pub fn from_flags(verbose: bool, json: bool) -> Self {
        let mode = if json {
            ShellMode::Json
        } else if verbose {
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
            }
        } else {
            ShellMode::Human {
                verbosity: Verbosity::Normal,
            }
        };
        Shell::new(mode)
    }

    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose
            }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    /// Print a status line: `{status:>12} {message}`. Ignored in JSON mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Print a status line and start a spinner that runs until the returned
    /// guard is finished or dropped.
    ///
    /// The spinner only draws on a terminal in normal verbosity; otherwise
    /// the status line alone is printed.
    pub fn spinner(&self, status: Status, msg: impl Display) -> Spinner {
        let msg = msg.to_string();
        self.status(status, &msg);

        let pb = if self.use_color && !self.is_verbose() && !self.is_json() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed}") {
                pb.set_style(style);
            }
            pb.set_message(msg);
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        Spinner {
            pb,
            start: Instant::now(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// A running spinner; cleared on finish or drop.
pub struct Spinner {
    pb: Option<ProgressBar>,
    start: Instant,
}

impl Spinner {
    /// Clear the spinner and return how long it ran.
    pub fn finish(mut self) -> Duration {
        self.clear();
        self.start.elapsed()
    }

    fn clear(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Format a duration for status lines.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = duration.as_secs() / 60;
        let rem = duration.as_secs() % 60;
        format!("{}m {}s", mins, rem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert!(Shell::from_flags(false, true).is_json());
        assert!(Shell::from_flags(true, true).is_json());
        assert!(Shell::from_flags(true, false).is_verbose());
        assert!(!Shell::from_flags(false, false).is_verbose());
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell {
            mode: ShellMode::default(),
            use_color: false,
        };
        assert_eq!(shell.format_status(Status::Building), "    Building");
        assert_eq!(shell.format_status(Status::Packaged), "    Packaged");
    }

    #[test]
    fn test_spinner_without_terminal_is_noop() {
        let shell = Shell {
            mode: ShellMode::default(),
            use_color: false,
        };
        let spinner = shell.spinner(Status::Building, "gigamonkey");
        assert!(spinner.pb.is_none());
        spinner.finish();
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
