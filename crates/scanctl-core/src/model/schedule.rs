// ── Schedule domain type ──
//
// Schedules carry their timing as iCalendar text. Only the first event's
// start and recurrence frequency matter to the console; malformed
// calendar data is logged and degrades to absent fields — it never fails
// the entity parse.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use scanctl_api::elements::ScheduleElement;

use super::entity::EntityInfo;

/// Recurrence frequency from the event's RRULE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    fn from_freq(freq: &str) -> Option<Self> {
        match freq {
            "SECONDLY" => Some(Self::Secondly),
            "MINUTELY" => Some(Self::Minutely),
            "HOURLY" => Some(Self::Hourly),
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// The canonical schedule type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub info: EntityInfo,
    pub timezone: Option<String>,
    /// Raw iCalendar text as received.
    pub icalendar: Option<String>,
    /// First event start, when the calendar parsed.
    pub first_run: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
}

impl Schedule {
    /// Build a schedule from a raw element. Absent input yields a fully
    /// defaulted instance.
    pub fn from_element(element: Option<ScheduleElement>) -> Self {
        let Some(element) = element else {
            return Self::default();
        };

        let info = EntityInfo::from_element(&element.base);

        let (first_run, recurrence) = match element.icalendar.as_deref() {
            Some(text) => match parse_icalendar(text) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    warn!(
                        schedule = %info.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                        reason = %reason,
                        "failed to parse schedule calendar"
                    );
                    (None, None)
                }
            },
            None => (None, None),
        };

        Self {
            info,
            timezone: element.timezone.clone().filter(|t| !t.is_empty()),
            icalendar: element.icalendar,
            first_run,
            recurrence,
        }
    }
}

/// Extract DTSTART and RRULE FREQ from iCalendar text.
///
/// A calendar without either property is valid (one-off schedules created
/// before timing was set); a property with an unparseable value is an
/// error for the caller to log.
fn parse_icalendar(
    text: &str,
) -> Result<(Option<DateTime<Utc>>, Option<Recurrence>), String> {
    let mut first_run = None;
    let mut recurrence = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("DTSTART") {
            // `DTSTART:...` or `DTSTART;TZID=...:...`
            let value = rest
                .rsplit_once(':')
                .map(|(_, v)| v)
                .ok_or_else(|| format!("malformed DTSTART line: {line}"))?;
            first_run = Some(parse_ical_datetime(value)?);
        } else if let Some(rest) = line.strip_prefix("RRULE:") {
            let freq = rest
                .split(';')
                .find_map(|param| param.strip_prefix("FREQ="))
                .ok_or_else(|| format!("RRULE without FREQ: {line}"))?;
            recurrence = Some(
                Recurrence::from_freq(freq)
                    .ok_or_else(|| format!("unknown RRULE frequency: {freq}"))?,
            );
        }
    }

    Ok((first_run, recurrence))
}

/// Parse an iCalendar date-time value (`20250601T102030Z` or the same
/// without the UTC suffix, interpreted as UTC).
fn parse_ical_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    let bare = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(bare, "%Y%m%dT%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("bad DTSTART value {value:?}: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schedule_from(value: serde_json::Value) -> Schedule {
        let element: ScheduleElement = serde_json::from_value(value).expect("schedule element");
        Schedule::from_element(Some(element))
    }

    const WEEKLY: &str = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\n\
        DTSTART:20250601T102030Z\nRRULE:FREQ=WEEKLY\nEND:VEVENT\nEND:VCALENDAR";

    #[test]
    fn calendar_parses_start_and_recurrence() {
        let schedule = schedule_from(json!({
            "_id": "sch1",
            "name": "Weekly window",
            "timezone": "UTC",
            "icalendar": WEEKLY,
        }));
        let start = schedule.first_run.unwrap();
        assert_eq!(start.to_rfc3339(), "2025-06-01T10:20:30+00:00");
        assert_eq!(schedule.recurrence, Some(Recurrence::Weekly));
    }

    #[test]
    fn tzid_parameter_is_tolerated() {
        let text = "BEGIN:VEVENT\nDTSTART;TZID=Europe/Berlin:20250601T102030\nEND:VEVENT";
        let schedule = schedule_from(json!({ "_id": "sch1", "icalendar": text }));
        assert!(schedule.first_run.is_some());
    }

    #[test]
    fn malformed_calendar_degrades_to_absent_fields() {
        let schedule = schedule_from(json!({
            "_id": "sch1",
            "icalendar": "BEGIN:VEVENT\nDTSTART:not-a-date\nEND:VEVENT",
        }));
        assert!(schedule.first_run.is_none());
        assert!(schedule.recurrence.is_none());
        // Raw text is still kept for display.
        assert!(schedule.icalendar.is_some());
    }

    #[test]
    fn missing_calendar_is_not_an_error() {
        let schedule = schedule_from(json!({ "_id": "sch1", "name": "no timing yet" }));
        assert!(schedule.icalendar.is_none());
        assert!(schedule.first_run.is_none());
    }

    #[test]
    fn unknown_frequency_degrades() {
        let text = "BEGIN:VEVENT\nDTSTART:20250601T102030Z\nRRULE:FREQ=FORTNIGHTLY\nEND:VEVENT";
        let schedule = schedule_from(json!({ "_id": "sch1", "icalendar": text }));
        // The whole parse is abandoned on a bad property.
        assert!(schedule.first_run.is_none());
        assert!(schedule.recurrence.is_none());
    }
}
