// Raw wire element types
//
// The gateway transcodes the scanner daemon's XML into JSON: element
// attributes become `_`-prefixed members, scalars stay strings ("0"/"1"
// booleans, stringified numbers), and a repeated child element arrives as
// an object when there is one occurrence and as an array when there are
// several. Fields use `#[serde(default)]` liberally because presence
// varies across daemon versions; everything unmodeled lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard gateway response envelope.
///
/// Every endpoint wraps its payload:
/// ```json
/// { "status": "200", "status_text": "OK", "data": ... }
/// ```
///
/// `data` stays a raw value here: error envelopes carry `null`, so the
/// payload is only deserialized after the status check passes.
#[derive(Debug, Deserialize)]
pub struct GmpResponse {
    pub status: String,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

// ── One-or-many normalization ────────────────────────────────────────

/// A child element that may arrive as a single object or as an array.
///
/// Normalize at the deserialization boundary with [`into_vec`], which
/// preserves source order and yields an empty sequence for absent input
/// (the `Default`).
///
/// [`into_vec`]: OneOrMany::into_vec
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Many(items) if items.is_empty())
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

// ── Shared base fields ───────────────────────────────────────────────

/// Owner sub-element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerElement {
    #[serde(default)]
    pub name: Option<String>,
}

/// Fields common to every entity element.
///
/// Flattened into each element struct. All booleans are string-coded
/// ("0"/"1"); timestamps are RFC 3339 strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseElement {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerElement>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub modification_time: Option<String>,
    #[serde(default)]
    pub writable: Option<String>,
    #[serde(default)]
    pub in_use: Option<String>,
    #[serde(default)]
    pub orphan: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub trash: Option<String>,
}

// ── Small reference elements ─────────────────────────────────────────

/// Minimal `{_id, name}` reference carried by parent elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefElement {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ── Task ─────────────────────────────────────────────────────────────

/// A single preference entry from a task's `preferences` list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceElement {
    /// Machine name used by the scanner (lifting key).
    #[serde(default)]
    pub scanner_name: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesElement {
    #[serde(default)]
    pub preference: OneOrMany<PreferenceElement>,
}

/// Report counts carried by a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportCountElement {
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub finished: Option<String>,
}

/// A task's reference to one of its reports (`last_report`/`current_report`).
///
/// The wire nests the brief under a `report` child.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRefElement {
    #[serde(default)]
    pub report: Option<ReportBriefElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportBriefElement {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub scan_run_status: Option<String>,
}

/// Full task object from `get_tasks`/`get_audits`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskElement {
    #[serde(flatten)]
    pub base: BaseElement,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    /// "scan" for plain tasks, "audit" for compliance audits.
    #[serde(default)]
    pub usage_type: Option<String>,
    #[serde(default)]
    pub alterable: Option<String>,
    #[serde(default)]
    pub hosts_ordering: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub average_duration: Option<String>,
    #[serde(default)]
    pub schedule_periods: Option<String>,
    #[serde(default)]
    pub target: Option<RefElement>,
    #[serde(default)]
    pub config: Option<RefElement>,
    #[serde(default)]
    pub scanner: Option<ScannerElement>,
    #[serde(default)]
    pub schedule: Option<ScheduleElement>,
    /// One alert arrives as an object, several as an array.
    #[serde(default)]
    pub alert: OneOrMany<RefElement>,
    #[serde(default)]
    pub last_report: Option<ReportRefElement>,
    #[serde(default)]
    pub current_report: Option<ReportRefElement>,
    #[serde(default)]
    pub report_count: Option<ReportCountElement>,
    #[serde(default)]
    pub preferences: Option<PreferencesElement>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Report ───────────────────────────────────────────────────────────

/// Result counts inside a report. `full` is the unfiltered total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultCountElement {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub filtered: Option<String>,
}

/// Severity summary inside a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityElement {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub filtered: Option<String>,
}

/// Report object from `get_reports`.
///
/// The daemon wraps the detailed payload in an inner `report` child of the
/// same shape; the outer element carries identity and envelope fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportElement {
    #[serde(flatten)]
    pub base: BaseElement,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub scan_run_status: Option<String>,
    #[serde(default)]
    pub scan_start: Option<String>,
    #[serde(default)]
    pub scan_end: Option<String>,
    #[serde(default)]
    pub task: Option<RefElement>,
    #[serde(default)]
    pub result_count: Option<ResultCountElement>,
    #[serde(default)]
    pub severity: Option<SeverityElement>,
    #[serde(default)]
    pub report: Option<Box<ReportElement>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Scanner ──────────────────────────────────────────────────────────

/// Scanner object from `get_scanners`, also nested inside tasks.
///
/// `type` is a numeric string code; unknown codes are tolerated here and
/// dropped during model conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerElement {
    #[serde(flatten)]
    pub base: BaseElement,
    #[serde(default, rename = "type")]
    pub scanner_type: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub ca_pub: Option<String>,
    #[serde(default)]
    pub credential: Option<RefElement>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Schedule ─────────────────────────────────────────────────────────

/// Schedule object from `get_schedules`, also nested inside tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleElement {
    #[serde(flatten)]
    pub base: BaseElement,
    #[serde(default)]
    pub icalendar: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Credential ───────────────────────────────────────────────────────

/// Credential object from `get_credentials`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialElement {
    #[serde(flatten)]
    pub base: BaseElement,
    #[serde(default, rename = "type")]
    pub credential_type: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub allow_insecure: Option<String>,
    #[serde(default)]
    pub auth_algorithm: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn one_or_many_single_object() {
        let parsed: OneOrMany<RefElement> =
            serde_json::from_value(json!({ "_id": "a1", "name": "alert" })).unwrap();
        let items = parsed.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some("a1"));
    }

    #[test]
    fn one_or_many_array_preserves_order() {
        let parsed: OneOrMany<RefElement> = serde_json::from_value(json!([
            { "_id": "a1" },
            { "_id": "a2" },
            { "_id": "a3" },
        ]))
        .unwrap();
        let ids: Vec<_> = parsed
            .into_vec()
            .into_iter()
            .map(|r| r.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn one_or_many_defaults_to_empty() {
        let task: TaskElement = serde_json::from_value(json!({ "_id": "t1" })).unwrap();
        assert!(task.alert.is_empty());
        assert!(task.alert.into_vec().is_empty());
    }

    #[test]
    fn task_element_tolerates_unknown_fields() {
        let task: TaskElement = serde_json::from_value(json!({
            "_id": "t1",
            "name": "weekly scan",
            "status": "Done",
            "undocumented_field": { "nested": true },
        }))
        .unwrap();
        assert_eq!(task.base.id.as_deref(), Some("t1"));
        assert_eq!(task.status.as_deref(), Some("Done"));
        assert!(task.extra.contains_key("undocumented_field"));
    }

    #[test]
    fn report_element_nests_inner_report() {
        let report: ReportElement = serde_json::from_value(json!({
            "_id": "r1",
            "report": {
                "scan_run_status": "Done",
                "result_count": { "full": "100", "filtered": "10" },
            },
        }))
        .unwrap();
        let inner = report.report.unwrap();
        assert_eq!(inner.scan_run_status.as_deref(), Some("Done"));
        assert_eq!(
            inner.result_count.unwrap().filtered.as_deref(),
            Some("10")
        );
    }
}
