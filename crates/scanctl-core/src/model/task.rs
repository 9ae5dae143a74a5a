// ── Task domain type ──
//
// Tasks are the scheduling unit of the scan manager. Audits share the
// wire shape and the parser; they differ only in `usage_type` and are
// cached in their own store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use scanctl_api::elements::{RefElement, ReportRefElement, TaskElement};

use super::entity::EntityInfo;
use super::entity_id::EntityId;
use super::parse::{has_id, parse_datetime, parse_float, parse_int, parse_yes_no, YesNo};
use super::scanner::Scanner;
use super::schedule::Schedule;

/// Retention count substituted when the daemon reports
/// `auto_delete_data = 0`, which means "use the default" rather than
/// "retain zero reports".
pub const DEFAULT_AUTO_DELETE_DATA: i64 = 5;

// ── Enumerations ────────────────────────────────────────────────────

/// Task run status, exactly as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TaskStatus {
    #[strum(serialize = "New")]
    New,
    #[strum(serialize = "Requested")]
    Requested,
    #[strum(serialize = "Queued")]
    Queued,
    #[strum(serialize = "Running")]
    Running,
    #[strum(serialize = "Processing")]
    Processing,
    #[strum(serialize = "Stop Requested")]
    StopRequested,
    #[strum(serialize = "Stopped")]
    Stopped,
    #[strum(serialize = "Delete Requested")]
    DeleteRequested,
    #[strum(serialize = "Done")]
    Done,
    #[strum(serialize = "Interrupted")]
    Interrupted,
    #[strum(serialize = "Container")]
    Container,
}

impl TaskStatus {
    /// Whether the scanner is still working on this task.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Requested | Self::Queued | Self::Running | Self::Processing | Self::StopRequested
        )
    }
}

/// Severity trend across a task's recent reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TaskTrend {
    Up,
    Down,
    More,
    Less,
    Same,
}

/// Order in which target hosts are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HostsOrdering {
    Sequential,
    Random,
    Reverse,
}

/// Distinguishes plain scan tasks from compliance audits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageType {
    #[default]
    Scan,
    Audit,
}

/// Report retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoDelete {
    Keep,
    No,
}

// ── Sub-models ──────────────────────────────────────────────────────

/// An alert attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: EntityId,
    pub name: Option<String>,
}

impl Alert {
    fn from_ref(element: &RefElement) -> Option<Self> {
        let id = element.id.as_deref().filter(|s| !s.is_empty())?;
        Some(Self {
            id: EntityId::from(id),
            name: element.name.clone(),
        })
    }
}

/// A task's scan target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: EntityId,
    pub name: Option<String>,
}

/// A task's scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfigRef {
    pub id: EntityId,
    pub name: Option<String>,
}

/// Reference to one of a task's reports (last or currently running).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRef {
    pub id: EntityId,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReportRef {
    fn from_wrap(wrap: Option<&ReportRefElement>) -> Option<Self> {
        let brief = wrap?.report.as_ref()?;
        let id = brief.id.as_deref().filter(|s| !s.is_empty())?;
        Some(Self {
            id: EntityId::from(id),
            timestamp: parse_datetime(brief.timestamp.as_deref()),
        })
    }
}

/// Report counters carried by a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCount {
    pub total: Option<i64>,
    pub finished: Option<i64>,
}

/// A preference the parser did not lift into a first-class field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPreference {
    pub scanner_name: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

// ── Task ────────────────────────────────────────────────────────────

/// The canonical task type.
///
/// Sub-models are owned by value and reconstructed fresh on every parse;
/// each is present iff the raw element carried a non-empty id for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub info: EntityInfo,
    pub status: Option<TaskStatus>,
    pub usage_type: UsageType,
    pub alterable: Option<YesNo>,
    pub hosts_ordering: Option<HostsOrdering>,
    pub trend: Option<TaskTrend>,
    pub progress: Option<f64>,
    pub average_duration_secs: Option<i64>,
    pub schedule_periods: Option<i64>,
    pub target: Option<TargetRef>,
    pub config: Option<ScanConfigRef>,
    pub scanner: Option<Scanner>,
    pub schedule: Option<Schedule>,
    pub alerts: Vec<Alert>,
    pub last_report: Option<ReportRef>,
    pub current_report: Option<ReportRef>,
    pub report_count: Option<ReportCount>,

    // Lifted preferences
    pub in_assets: Option<YesNo>,
    pub apply_overrides: Option<YesNo>,
    pub min_qod: Option<i64>,
    pub max_hosts: Option<i64>,
    pub max_checks: Option<i64>,
    pub auto_delete: Option<AutoDelete>,
    pub auto_delete_data: Option<i64>,
    /// Everything the lifting pass did not claim, in source order.
    pub preferences: Vec<TaskPreference>,
}

impl Task {
    /// Build a task from a raw element. Absent input yields a fully
    /// defaulted instance.
    pub fn from_element(element: Option<TaskElement>) -> Self {
        let Some(element) = element else {
            return Self::default();
        };

        let mut task = Self {
            info: EntityInfo::from_element(&element.base),
            status: element
                .status
                .as_deref()
                .and_then(|s| TaskStatus::from_str(s).ok()),
            usage_type: match element.usage_type.as_deref() {
                Some("audit") => UsageType::Audit,
                _ => UsageType::Scan,
            },
            alterable: parse_yes_no(element.alterable.as_deref()),
            hosts_ordering: element
                .hosts_ordering
                .as_deref()
                .and_then(|s| HostsOrdering::from_str(s).ok()),
            trend: element
                .trend
                .as_deref()
                .and_then(|s| TaskTrend::from_str(s).ok()),
            progress: parse_float(element.progress.as_deref()),
            average_duration_secs: parse_int(element.average_duration.as_deref()),
            schedule_periods: parse_int(element.schedule_periods.as_deref()),
            target: element.target.as_ref().and_then(|t| {
                let id = t.id.as_deref().filter(|s| !s.is_empty())?;
                Some(TargetRef {
                    id: EntityId::from(id),
                    name: t.name.clone(),
                })
            }),
            config: element.config.as_ref().and_then(|c| {
                let id = c.id.as_deref().filter(|s| !s.is_empty())?;
                Some(ScanConfigRef {
                    id: EntityId::from(id),
                    name: c.name.clone(),
                })
            }),
            scanner: element
                .scanner
                .filter(|s| has_id(s.base.id.as_deref()))
                .map(|s| Scanner::from_element(Some(s))),
            schedule: element
                .schedule
                .filter(|s| has_id(s.base.id.as_deref()))
                .map(|s| Schedule::from_element(Some(s))),
            alerts: element
                .alert
                .into_vec()
                .iter()
                .filter_map(Alert::from_ref)
                .collect(),
            last_report: ReportRef::from_wrap(element.last_report.as_ref()),
            current_report: ReportRef::from_wrap(element.current_report.as_ref()),
            report_count: element.report_count.as_ref().map(|rc| ReportCount {
                total: parse_int(rc.total.as_deref()),
                finished: parse_int(rc.finished.as_deref()),
            }),
            ..Self::default()
        };

        let raw_preferences = element
            .preferences
            .map(|p| p.preference.into_vec())
            .unwrap_or_default();
        task.lift_preferences(raw_preferences);
        task
    }

    /// Lift well-known preferences into typed fields; keep the rest in
    /// source order.
    fn lift_preferences(&mut self, raw: Vec<scanctl_api::elements::PreferenceElement>) {
        for pref in raw {
            let value = pref.value.as_deref();
            match pref.scanner_name.as_deref() {
                Some("in_assets") => self.in_assets = parse_yes_no(value),
                Some("apply_overrides") => self.apply_overrides = parse_yes_no(value),
                Some("min_qod") => self.min_qod = parse_int(value),
                Some("max_hosts") => self.max_hosts = parse_int(value),
                Some("max_checks") => self.max_checks = parse_int(value),
                Some("auto_delete") => {
                    self.auto_delete = match value {
                        Some("keep") => Some(AutoDelete::Keep),
                        Some("no") => Some(AutoDelete::No),
                        _ => None,
                    };
                }
                Some("auto_delete_data") => {
                    // 0 means "use the default retention count", not
                    // "retain zero reports".
                    self.auto_delete_data = parse_int(value).map(|n| {
                        if n == 0 {
                            DEFAULT_AUTO_DELETE_DATA
                        } else {
                            n
                        }
                    });
                }
                _ => self.preferences.push(TaskPreference {
                    scanner_name: pref.scanner_name,
                    name: pref.name,
                    value: pref.value,
                }),
            }
        }
    }

    pub fn is_audit(&self) -> bool {
        self.usage_type == UsageType::Audit
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some_and(TaskStatus::is_active)
    }

    pub fn is_container(&self) -> bool {
        self.status == Some(TaskStatus::Container)
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            info: EntityInfo::default(),
            status: None,
            usage_type: UsageType::Scan,
            alterable: None,
            hosts_ordering: None,
            trend: None,
            progress: None,
            average_duration_secs: None,
            schedule_periods: None,
            target: None,
            config: None,
            scanner: None,
            schedule: None,
            alerts: Vec::new(),
            last_report: None,
            current_report: None,
            report_count: None,
            in_assets: None,
            apply_overrides: None,
            min_qod: None,
            max_hosts: None,
            max_checks: None,
            auto_delete: None,
            auto_delete_data: None,
            preferences: Vec::new(),
        }
    }
}
