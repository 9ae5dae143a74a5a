//! Schedule command handlers.

use std::sync::Arc;

use tabled::Tabled;

use scanctl_core::Session;
use scanctl_core::model::{Recurrence, Schedule};

use crate::cli::{GlobalOpts, SchedulesArgs, SchedulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "First Run")]
    first_run: String,
    #[tabled(rename = "Recurrence")]
    recurrence: String,
    #[tabled(rename = "Timezone")]
    timezone: String,
}

fn recurrence_label(recurrence: Option<Recurrence>) -> &'static str {
    match recurrence {
        Some(Recurrence::Secondly) => "every second",
        Some(Recurrence::Minutely) => "every minute",
        Some(Recurrence::Hourly) => "hourly",
        Some(Recurrence::Daily) => "daily",
        Some(Recurrence::Weekly) => "weekly",
        Some(Recurrence::Monthly) => "monthly",
        Some(Recurrence::Yearly) => "yearly",
        None => "once",
    }
}

impl From<&Arc<Schedule>> for ScheduleRow {
    fn from(schedule: &Arc<Schedule>) -> Self {
        Self {
            id: util::fmt_opt(schedule.info.id.as_ref()),
            name: schedule.info.name.clone().unwrap_or_default(),
            first_run: util::fmt_time(schedule.first_run),
            recurrence: recurrence_label(schedule.recurrence).to_owned(),
            timezone: schedule.timezone.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    session: &Session,
    args: SchedulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SchedulesCommand::List(list) => {
            let filter = util::parse_filter(list.filter.as_deref());
            let bar = util::spinner("Fetching schedules...", global);
            let loaded = session.load_schedules(filter, false).await;
            util::finish_spinner(bar);

            let Some(schedules) = loaded? else { return Ok(()) };
            let out = output::render_list(
                &global.output,
                &schedules,
                |s| ScheduleRow::from(s),
                |s| util::fmt_opt(s.info.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
