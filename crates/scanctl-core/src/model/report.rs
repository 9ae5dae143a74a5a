// ── Report domain type ──
//
// The daemon wraps a report's detailed payload in an inner `report`
// child of the same element shape; the outer element carries identity.
// Parsing resolves each field from the inner element first, falling back
// to the outer one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use scanctl_api::elements::ReportElement;

use super::entity::EntityInfo;
use super::entity_id::EntityId;
use super::parse::{parse_datetime, parse_float, parse_int};
use super::task::TaskStatus;

/// A report's reference to the task that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: EntityId,
    pub name: Option<String>,
}

/// Result counters for a report. `total` is the unfiltered count; the
/// threshold loader decides on `filtered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCount {
    pub total: i64,
    pub filtered: i64,
}

/// The canonical report type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub info: EntityInfo,
    pub timestamp: Option<DateTime<Utc>>,
    pub scan_start: Option<DateTime<Utc>>,
    pub scan_end: Option<DateTime<Utc>>,
    /// Run status of the producing scan; shares the task status
    /// vocabulary.
    pub scan_run_status: Option<TaskStatus>,
    pub task: Option<TaskRef>,
    pub result_count: Option<ResultCount>,
    /// Highest filtered severity in the report.
    pub severity: Option<f64>,
}

impl Report {
    /// Build a report from a raw element. Absent input yields a fully
    /// defaulted instance.
    pub fn from_element(element: Option<ReportElement>) -> Self {
        let Some(element) = element else {
            return Self::default();
        };

        // Detailed fields live on the inner element when present.
        let inner = element.report.as_deref().unwrap_or(&element);

        let task = inner.task.as_ref().or(element.task.as_ref()).and_then(|t| {
            let id = t.id.as_deref().filter(|s| !s.is_empty())?;
            Some(TaskRef {
                id: EntityId::from(id),
                name: t.name.clone(),
            })
        });

        let result_count = inner
            .result_count
            .as_ref()
            .or(element.result_count.as_ref())
            .map(|rc| ResultCount {
                total: parse_int(rc.full.as_deref()).unwrap_or(0),
                filtered: parse_int(rc.filtered.as_deref()).unwrap_or(0),
            });

        let severity = inner
            .severity
            .as_ref()
            .or(element.severity.as_ref())
            .and_then(|s| parse_float(s.filtered.as_deref().or(s.full.as_deref())));

        Self {
            info: EntityInfo::from_element(&element.base),
            timestamp: parse_datetime(
                inner
                    .timestamp
                    .as_deref()
                    .or(element.timestamp.as_deref()),
            ),
            scan_start: parse_datetime(
                inner
                    .scan_start
                    .as_deref()
                    .or(element.scan_start.as_deref()),
            ),
            scan_end: parse_datetime(
                inner.scan_end.as_deref().or(element.scan_end.as_deref()),
            ),
            scan_run_status: inner
                .scan_run_status
                .as_deref()
                .or(element.scan_run_status.as_deref())
                .and_then(|s| TaskStatus::from_str(s).ok()),
            task,
            result_count,
            severity,
        }
    }

    /// Filtered result count, defaulting to zero when the daemon sent
    /// none.
    pub fn filtered_result_count(&self) -> i64 {
        self.result_count.map_or(0, |rc| rc.filtered)
    }

    pub fn is_done(&self) -> bool {
        self.scan_run_status == Some(TaskStatus::Done)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report_from(value: serde_json::Value) -> Report {
        let element: ReportElement = serde_json::from_value(value).expect("report element");
        Report::from_element(Some(element))
    }

    #[test]
    fn absent_element_yields_defaults() {
        let report = Report::from_element(None);
        assert!(report.info.id.is_none());
        assert!(report.result_count.is_none());
        assert_eq!(report.filtered_result_count(), 0);
    }

    #[test]
    fn inner_report_fields_win() {
        let report = report_from(json!({
            "_id": "r1",
            "scan_run_status": "Running",
            "report": {
                "scan_run_status": "Done",
                "timestamp": "2025-06-01T10:20:30Z",
                "result_count": { "full": "1200", "filtered": "37" },
                "severity": { "full": "9.8", "filtered": "7.5" },
            },
        }));
        assert_eq!(report.info.id.as_ref().unwrap().to_string(), "r1");
        assert_eq!(report.scan_run_status, Some(TaskStatus::Done));
        assert_eq!(
            report.result_count,
            Some(ResultCount {
                total: 1200,
                filtered: 37,
            })
        );
        assert_eq!(report.severity, Some(7.5));
        assert!(report.is_done());
    }

    #[test]
    fn flat_element_parses_without_inner() {
        let report = report_from(json!({
            "_id": "r2",
            "timestamp": "2025-06-01T10:20:30Z",
            "scan_run_status": "Interrupted",
            "task": { "_id": "t1", "name": "Weekly scan" },
        }));
        assert_eq!(report.scan_run_status, Some(TaskStatus::Interrupted));
        assert_eq!(report.task.unwrap().name.as_deref(), Some("Weekly scan"));
    }

    #[test]
    fn unknown_scan_run_status_is_absent() {
        let report = report_from(json!({ "_id": "r3", "scan_run_status": "Levitating" }));
        assert!(report.scan_run_status.is_none());
    }

    #[test]
    fn task_ref_requires_non_empty_id() {
        let report = report_from(json!({
            "_id": "r4",
            "task": { "_id": "", "name": "orphaned" },
        }));
        assert!(report.task.is_none());
    }
}
