//! Task command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::model::Task;
use scanctl_core::{LoadOptions, Session};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Reports")]
    reports: String,
    #[tabled(rename = "Last Report")]
    last_report: String,
}

impl From<&Arc<Task>> for TaskRow {
    fn from(task: &Arc<Task>) -> Self {
        Self {
            id: util::fmt_opt(task.info.id.as_ref()),
            name: task.info.name.clone().unwrap_or_default(),
            status: util::fmt_opt(task.status),
            trend: util::fmt_opt(task.trend),
            reports: task
                .report_count
                .and_then(|rc| rc.finished)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            last_report: util::fmt_time(task.last_report.as_ref().and_then(|r| r.timestamp)),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

pub(crate) fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", task.info.name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "ID:          {}", util::fmt_opt(task.info.id.as_ref()));
    let _ = writeln!(out, "Status:      {}", util::fmt_opt(task.status));
    if let Some(progress) = task.progress {
        let _ = writeln!(out, "Progress:    {progress}%");
    }
    if let Some(ref comment) = task.info.comment {
        let _ = writeln!(out, "Comment:     {comment}");
    }
    if let Some(ref owner) = task.info.owner {
        let _ = writeln!(out, "Owner:       {owner}");
    }
    let _ = writeln!(out, "Writable:    {}", util::fmt_yes_no(task.info.writable));
    if let Some(ref target) = task.target {
        let _ = writeln!(
            out,
            "Target:      {} ({})",
            target.name.as_deref().unwrap_or("-"),
            target.id
        );
    }
    if let Some(ref config) = task.config {
        let _ = writeln!(
            out,
            "Config:      {} ({})",
            config.name.as_deref().unwrap_or("-"),
            config.id
        );
    }
    if let Some(ref scanner) = task.scanner {
        let _ = writeln!(
            out,
            "Scanner:     {}{}",
            scanner.info.name.as_deref().unwrap_or("-"),
            scanner
                .scanner_type
                .map(|t| format!(" [{}]", t.display_name()))
                .unwrap_or_default()
        );
    }
    if let Some(ref schedule) = task.schedule {
        let _ = writeln!(
            out,
            "Schedule:    {} (next: {})",
            schedule.info.name.as_deref().unwrap_or("-"),
            util::fmt_time(schedule.first_run)
        );
    }
    if !task.alerts.is_empty() {
        let names: Vec<_> = task
            .alerts
            .iter()
            .map(|a| a.name.clone().unwrap_or_else(|| a.id.to_string()))
            .collect();
        let _ = writeln!(out, "Alerts:      {}", names.join(", "));
    }
    if let Some(min_qod) = task.min_qod {
        let _ = writeln!(out, "Min QoD:     {min_qod}%");
    }
    if let Some(ref order) = task.hosts_ordering {
        let _ = writeln!(out, "Host order:  {order}");
    }
    if let Some(max_hosts) = task.max_hosts {
        let _ = writeln!(out, "Max hosts:   {max_hosts}");
    }
    if let Some(auto_delete_data) = task.auto_delete_data {
        let _ = writeln!(out, "Keep reports: {auto_delete_data}");
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching tasks...", global);
            let loaded = session.load_tasks(filter, false).await;
            util::finish_spinner(bar);

            let Some(tasks) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &tasks,
                |t| TaskRow::from(t),
                |t| util::fmt_opt(t.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Get {
            id,
            filter,
            details,
        } => {
            let options = LoadOptions {
                filter: util::parse_filter(filter.as_deref()),
                details: details.then_some(true),
                force: false,
            };
            let bar = util::spinner("Fetching task...", global);
            let loaded = session.load_task(&id, options).await;
            util::finish_spinner(bar);

            let Some(task) = loaded? else { return Ok(()) };
            let out = output::render_single(
                &global.output,
                task.as_ref(),
                task_detail,
                |t| util::fmt_opt(t.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
