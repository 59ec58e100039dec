// ABOUTME: Output sink for build and deploy progress.
// ABOUTME: Writes to any stream in normal, quiet (CI), or JSON lines mode.

use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only results and problems)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Caller-supplied stream that builders and deployers report progress to.
///
/// Write failures are ignored: output is a side channel and never changes
/// the outcome of a build or deploy.
pub struct Output {
    mode: OutputMode,
    writer: Box<dyn Write + Send>,
    start_time: Option<Instant>,
}

impl Output {
    /// Output to stdout.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_writer(mode, io::stdout())
    }

    pub fn with_writer(mode: OutputMode, writer: impl Write + Send + 'static) -> Self {
        Self {
            mode,
            writer: Box::new(writer),
            start_time: None,
        }
    }

    /// Output that discards everything.
    pub fn sink() -> Self {
        Self::with_writer(OutputMode::Quiet, io::sink())
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&mut self, message: &str) {
        if self.mode == OutputMode::Normal {
            let _ = writeln!(self.writer, "{message}");
        }
    }

    /// Relay one line of a child process's output.
    pub fn line(&mut self, line: &str) {
        match self.mode {
            OutputMode::Normal => {
                let _ = writeln!(self.writer, "    {line}");
            }
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit("log", line),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&mut self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    let _ = writeln!(self.writer, "{message} ({:.1}s)", elapsed);
                } else {
                    let _ = writeln!(self.writer, "{message}");
                }
            }
            OutputMode::Quiet => {
                let _ = writeln!(self.writer, "{message}");
            }
            OutputMode::Json => self.emit("success", message),
        }
    }

    /// Print a warning message.
    pub fn warning(&mut self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                let _ = writeln!(self.writer, "Warning: {message}");
            }
            OutputMode::Json => self.emit("warning", message),
        }
    }

    /// Print an error message.
    pub fn error(&mut self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                let _ = writeln!(self.writer, "Error: {message}");
            }
            OutputMode::Json => self.emit("error", message),
        }
    }

    fn emit(&mut self, event: &str, message: &str) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            let _ = writeln!(self.writer, "{json}");
        }
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").field("mode", &self.mode).finish()
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
