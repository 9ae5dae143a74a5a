//! Audit command handlers.
//!
//! Audits share the task model; the rows surface compliance-oriented
//! columns instead of severity trend.

use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::model::Task;
use scanctl_core::{LoadOptions, Session};

use crate::cli::{AuditsArgs, AuditsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::tasks::task_detail;
use super::util;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reports")]
    reports: String,
    #[tabled(rename = "Last Run")]
    last_run: String,
}

impl From<&Arc<Task>> for AuditRow {
    fn from(audit: &Arc<Task>) -> Self {
        Self {
            id: util::fmt_opt(audit.info.id.as_ref()),
            name: audit.info.name.clone().unwrap_or_default(),
            status: util::fmt_opt(audit.status),
            reports: audit
                .report_count
                .and_then(|rc| rc.finished)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            last_run: util::fmt_time(audit.last_report.as_ref().and_then(|r| r.timestamp)),
        }
    }
}

pub async fn handle(
    session: &Session,
    args: AuditsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuditsCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching audits...", global);
            let loaded = session.load_audits(filter, false).await;
            util::finish_spinner(bar);

            let Some(audits) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &audits,
                |a| AuditRow::from(a),
                |a| util::fmt_opt(a.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuditsCommand::Get { id } => {
            let bar = util::spinner("Fetching audit...", global);
            let loaded = session.load_audit(&id, LoadOptions::default()).await;
            util::finish_spinner(bar);

            let Some(audit) = loaded? else { return Ok(()) };
            let out = output::render_single(
                &global.output,
                audit.as_ref(),
                task_detail,
                |a| util::fmt_opt(a.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
