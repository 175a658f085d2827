//! Colours, layout and progress for the `qa` terminal output

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use qaboard::{domain::Variant, session::Request, Backend, Notice, SimulatedBackend};

/// Tables drop their secondary columns below this width.
const NARROW_COLUMNS: u16 = 80;

/// `true` when the terminal is known to be narrower than a full table.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

/// Styling for the four kinds of text the CLI prints.
///
/// Styles are only applied when stdout supports colour.
pub trait Colorize: AsRef<str> {
    /// Green, for completed actions.
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().green())
    }
    /// Amber, for blocked actions and errors.
    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().yellow())
    }
    /// Blue, for tags and headings.
    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().bright_blue())
    }
    /// Dimmed, for metadata and hints.
    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}

fn paint(text: &str, style: Style) -> String {
    if supports_color::on_cached(supports_color::Stream::Stdout).is_some() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Prints a notice: informational ones to stdout, blocked actions to stderr.
pub fn print_notice(notice: &Notice) {
    match notice.variant {
        Variant::Default => println!("{}", format!("✅ {notice}").success()),
        Variant::Destructive => eprintln!("{}", format!("⚠️  {notice}").warning()),
    }
}

/// A [`SimulatedBackend`] that shows a spinner while it waits.
#[derive(Debug)]
pub struct SpinnerBackend {
    inner: SimulatedBackend,
}

impl SpinnerBackend {
    pub const fn new(delay: Duration) -> Self {
        Self {
            inner: SimulatedBackend::new(delay),
        }
    }
}

impl Backend for SpinnerBackend {
    fn round_trip(&self, request: Request) {
        if self.inner.delay().is_zero() {
            self.inner.round_trip(request);
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("{request}..."));
        spinner.enable_steady_tick(Duration::from_millis(80));

        self.inner.round_trip(request);

        spinner.finish_and_clear();
    }
}
