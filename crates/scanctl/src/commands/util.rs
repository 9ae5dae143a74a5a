//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use scanctl_core::model::{Filter, YesNo};

use crate::cli::GlobalOpts;

/// Parse an optional powerfilter flag. The filter grammar accepts any
/// token stream, so this never fails.
pub fn parse_filter(raw: Option<&str>) -> Option<Filter> {
    raw.map(|s| s.parse().unwrap_or_default())
}

/// Start a spinner on stderr while a fetch is in flight. Silent when
/// quiet or non-interactive.
pub fn spinner(message: &str, global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner().with_message(message.to_owned());
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("static template"));
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

pub fn finish_spinner(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

/// Format an optional timestamp for table cells.
pub fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Format an optional displayable value for table cells.
pub fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Format a tri-state flag for detail views.
pub fn fmt_yes_no(value: YesNo) -> &'static str {
    match value {
        YesNo::Yes => "yes",
        YesNo::No => "no",
    }
}
