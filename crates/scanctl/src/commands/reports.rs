//! Report command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::model::Report;
use scanctl_core::{LoadOptions, Session};

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Results")]
    results: String,
    #[tabled(rename = "Severity")]
    severity: String,
}

impl From<&Arc<Report>> for ReportRow {
    fn from(report: &Arc<Report>) -> Self {
        Self {
            id: util::fmt_opt(report.info.id.as_ref()),
            task: report
                .task
                .as_ref()
                .and_then(|t| t.name.clone())
                .unwrap_or_default(),
            status: util::fmt_opt(report.scan_run_status),
            timestamp: util::fmt_time(report.timestamp),
            results: report
                .result_count
                .map(|rc| format!("{}/{}", rc.filtered, rc.total))
                .unwrap_or_default(),
            severity: util::fmt_opt(report.severity),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// Paint a severity score with the conventional traffic-light scale.
fn severity_cell(severity: f64, color: bool) -> String {
    use owo_colors::OwoColorize;

    if !color {
        return severity.to_string();
    }
    if severity >= 7.0 {
        severity.red().to_string()
    } else if severity >= 4.0 {
        severity.yellow().to_string()
    } else {
        severity.green().to_string()
    }
}

fn report_detail(report: &Report, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", util::fmt_opt(report.info.id.as_ref()));
    if let Some(ref task) = report.task {
        let _ = writeln!(
            out,
            "Task:        {} ({})",
            task.name.as_deref().unwrap_or("-"),
            task.id
        );
    }
    let _ = writeln!(out, "Status:      {}", util::fmt_opt(report.scan_run_status));
    let _ = writeln!(out, "Timestamp:   {}", util::fmt_time(report.timestamp));
    if report.scan_start.is_some() {
        let _ = writeln!(out, "Scan start:  {}", util::fmt_time(report.scan_start));
    }
    if report.scan_end.is_some() {
        let _ = writeln!(out, "Scan end:    {}", util::fmt_time(report.scan_end));
    }
    if let Some(rc) = report.result_count {
        let _ = writeln!(out, "Results:     {} filtered / {} total", rc.filtered, rc.total);
    }
    if let Some(severity) = report.severity {
        let _ = writeln!(out, "Severity:    {}", severity_cell(severity, color));
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching reports...", global);
            let loaded = session.load_reports(filter, false).await;
            util::finish_spinner(bar);

            let Some(reports) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &reports,
                |r| ReportRow::from(r),
                |r| util::fmt_opt(r.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Get {
            id,
            delta,
            filter,
            details,
            summary,
        } => {
            let options = LoadOptions {
                filter: util::parse_filter(filter.as_deref()),
                details: None,
                force: false,
            };

            let bar = util::spinner("Fetching report...", global);
            let loaded = match delta {
                Some(ref delta_id) => session.load_report_delta(&id, delta_id, options).await,
                None if details => {
                    session
                        .load_report(
                            &id,
                            LoadOptions {
                                details: Some(true),
                                ..options
                            },
                        )
                        .await
                }
                None if summary => {
                    session
                        .load_report(
                            &id,
                            LoadOptions {
                                details: Some(false),
                                ..options
                            },
                        )
                        .await
                }
                // Default path: fetch the summary, upgrade when the
                // result count is affordable.
                None => session.load_report_with_threshold(&id, options).await,
            };
            util::finish_spinner(bar);

            let Some(report) = loaded? else { return Ok(()) };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                report.as_ref(),
                |r| report_detail(r, color),
                |r| util::fmt_opt(r.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
