// ── Unified domain model ──
//
// Every type in this module is the canonical representation of a scan
// manager entity, parsed once per gateway response via `from_element` and
// immutable afterwards. A changed entity is a brand-new instance
// dispatched through the entity cache.

pub mod credential;
pub mod entity;
pub mod entity_id;
pub mod filter;
pub mod parse;
pub mod report;
pub mod scanner;
pub mod schedule;
pub mod task;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use scanctl_core::model::*` gives you everything.

// Core identity
pub use entity_id::EntityId;

// Shared parse primitives
pub use entity::EntityInfo;
pub use parse::YesNo;

// Filter
pub use filter::{Filter, FilterTerm, Relation};

// Task (audits are tasks with `UsageType::Audit`)
pub use task::{
    Alert, AutoDelete, HostsOrdering, ReportCount, ReportRef, ScanConfigRef, TargetRef, Task,
    TaskPreference, TaskStatus, TaskTrend, UsageType, DEFAULT_AUTO_DELETE_DATA,
};

// Report
pub use report::{Report, ResultCount, TaskRef};

// Scanner
pub use scanner::{CredentialRef, Scanner, ScannerType};

// Schedule
pub use schedule::{Recurrence, Schedule};

// Credential
pub use credential::{AuthAlgorithm, Credential, CredentialType};
