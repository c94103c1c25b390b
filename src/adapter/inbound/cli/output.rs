//! Terminal output for CLI handlers.
//!
//! Every helper has two renderings. Human output goes to stdout with colored
//! marks and is suppressed by `--quiet`; in JSON mode each helper prints one
//! `{"type": ..., "payload": ...}` object per line instead, whatever the
//! quiet flag says.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Global output flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputConfig> {
    OUTPUT.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Install the flags parsed from the command line. Call once, first thing.
pub fn configure(config: OutputConfig) {
    match cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

/// How a helper should render right now.
enum Mode {
    Json,
    Human,
    Silent,
}

fn mode() -> Mode {
    let config = current();
    if config.json {
        Mode::Json
    } else if config.quiet {
        Mode::Silent
    } else {
        Mode::Human
    }
}

fn json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    match mode() {
        Mode::Json => json_line("field", json!({ "label": label, "value": value.to_string() })),
        Mode::Human => println!("  {:<14} {}", label.dimmed(), value),
        Mode::Silent => {}
    }
}

/// Print a success line.
pub fn success(message: &str) {
    match mode() {
        Mode::Json => json_line("success", json!({ "message": message })),
        Mode::Human => println!("  {} {}", "✓".green(), message),
        Mode::Silent => {}
    }
}

/// Print an error line to stderr. Never suppressed.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Print a section title preceded by a blank line.
pub fn section(title: &str) {
    match mode() {
        Mode::Json => json_line("section", json!({ "title": title })),
        Mode::Human => println!("\n{}", title.bold()),
        Mode::Silent => {}
    }
}

/// Print a dimmed note.
pub fn note(message: &str) {
    match mode() {
        Mode::Json => json_line("note", json!({ "message": message })),
        Mode::Human => println!("  {}", message.dimmed()),
        Mode::Silent => {}
    }
}

/// Print a `hint:` line.
pub fn hint(message: &str) {
    match mode() {
        Mode::Json => json_line("hint", json!({ "message": message })),
        Mode::Human => println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed()),
        Mode::Silent => {}
    }
}

/// Print a block of text, each line indented.
pub fn lines(content: &str) {
    match mode() {
        Mode::Json => json_line("lines", json!({ "content": content })),
        Mode::Human => content.lines().for_each(|line| println!("  {line}")),
        Mode::Silent => {}
    }
}

/// Emit one typed event line in JSON mode. No-op otherwise.
pub fn event(kind: &str, payload: Value) {
    if is_json() {
        json_line(kind, payload);
    }
}

/// Print a command's JSON result as-is.
pub fn json_output(value: Value) {
    println!("{value}");
}

const BRAILLE: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a braille spinner. Hidden in JSON and quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = match mode() {
        Mode::Human => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .tick_strings(BRAILLE)
                    .template("  {spinner:.cyan} {msg}")
                    .expect("spinner template is valid"),
            );
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        }
        Mode::Json | Mode::Silent => ProgressBar::hidden(),
    };
    pb.set_message(message.to_string());
    pb
}

/// Finish a spinner with a check mark.
pub fn spinner_success(pb: &ProgressBar, message: &str) {
    match mode() {
        Mode::Json => {
            json_line("spinner_success", json!({ "message": message }));
            pb.finish_and_clear();
        }
        Mode::Human => pb.finish_with_message(format!("{} {}", "✓".green(), message)),
        Mode::Silent => pb.finish_and_clear(),
    }
}

/// Finish a spinner with a failure mark. Shown in quiet mode too.
pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if is_json() {
        json_line("spinner_fail", json!({ "message": message }));
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "×".red(), message));
}

/// Cyan value, plain in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

/// Dimmed value, plain in JSON mode.
pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}

/// `✓` or `×`, or `ok` / `fail` in JSON mode.
pub fn status_mark(ok: bool) -> String {
    match (is_json(), ok) {
        (true, true) => "ok".into(),
        (true, false) => "fail".into(),
        (false, true) => "✓".green().to_string(),
        (false, false) => "×".red().to_string(),
    }
}
