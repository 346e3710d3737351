//! Console rendering for streaming chat output.
//!
//! This module provides the renderer the chat binary drives: streamed reply
//! text as it arrives, plus session listings and weather reports.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::StreamHandler;
use crate::types::{Session, WeatherReport};
use crate::utils::time::format_millis;

/// ANSI escape code for dim text (used for metadata lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for agent names).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Plain text renderer with optional ANSI styling.
///
/// Reply tokens go to stdout as they arrive; errors go to stderr. An
/// optional interrupt flag lets Ctrl-C stop a stream between events.
pub struct ChatRenderer {
    stdout: Stdout,
    use_color: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl ChatRenderer {
    /// Creates a new ChatRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
            interrupted: None,
        }
    }

    /// Creates a new ChatRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            interrupted: None,
        }
    }

    /// Attaches an interrupt flag to the renderer.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            format!("{ANSI_DIM}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    /// Prints an informational line.
    pub fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    /// Prints an error line to stderr.
    pub fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    /// Prints the interrupted marker after a stopped stream.
    pub fn print_interrupted(&mut self) {
        println!();
        println!("{}", self.dim("[interrupted]"));
        self.flush();
    }

    /// Prints a numbered session listing, most recent first.
    pub fn print_history(&mut self, sessions: &[Session]) {
        for (index, session) in sessions.iter().enumerate() {
            let when = self.dim(&format_millis(session.timestamp));
            println!("{:>3}. {}  {}", index + 1, session.title, when);
        }
        self.flush();
    }

    /// Prints a 7-day weather report.
    pub fn print_weather(&mut self, report: &WeatherReport) {
        if report.region.is_empty() {
            println!("{}", report.city);
        } else {
            println!("{} ({})", report.city, report.region);
        }
        if let Some(temperature) = report.current.temperature {
            let conditions = report
                .current
                .weather_code
                .map(weather_label)
                .filter(|label| !label.is_empty())
                .map(|label| format!(", {label}"))
                .unwrap_or_default();
            let wind = report
                .current
                .windspeed
                .map(|w| format!(", vent {w:.0} km/h"))
                .unwrap_or_default();
            println!("Actuellement: {temperature:.0}°C{wind}{conditions}");
        }
        for day in &report.forecast {
            let temps = match (day.temp_min, day.temp_max) {
                (Some(min), Some(max)) => format!("{min:.0}-{max:.0}°C"),
                (_, Some(max)) => format!("max {max:.0}°C"),
                _ => String::new(),
            };
            let rain = day
                .precipitation_mm
                .filter(|mm| *mm > 0.0)
                .map(|mm| format!("  pluie {mm:.1} mm"))
                .unwrap_or_default();
            let label = day
                .weather_code
                .map(weather_label)
                .filter(|label| !label.is_empty())
                .map(|label| format!("  {label}"))
                .unwrap_or_default();
            println!("  {}  {temps}{rain}{label}", day.date);
        }
        let summary = format!(
            "7 jours: {:.0} mm de pluie, {} jour(s) pluvieux, max {:.0}°C",
            report.summary.total_precipitation_mm,
            report.summary.rain_days,
            report.summary.max_temperature,
        );
        println!("{}", self.dim(&summary));
        self.flush();
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamHandler for ChatRenderer {
    fn on_routing(&mut self, agents: &[String]) {
        let list = agents.join(", ");
        if self.use_color {
            println!("{ANSI_CYAN}[{list}]{ANSI_RESET}");
        } else {
            println!("[{list}]");
        }
        self.flush();
    }

    fn on_token(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn on_done(&mut self, agents_used: &[String], language: &str) {
        println!();
        if !agents_used.is_empty() {
            let footer = format!("[{} · {language}]", agents_used.join(", "));
            println!("{}", self.dim(&footer));
        }
        self.flush();
    }

    fn on_error(&mut self, message: &str) {
        println!();
        self.print_error(message);
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// French label for a WMO weather interpretation code.
fn weather_label(code: i64) -> &'static str {
    match code {
        0 => "ciel dégagé",
        1..=3 => "nuageux",
        45 | 48 => "brouillard",
        51..=57 => "bruine",
        61..=67 => "pluie",
        71..=77 => "neige",
        80..=82 => "averses",
        85 | 86 => "averses de neige",
        95..=99 => "orage",
        _ => "",
    }
}
