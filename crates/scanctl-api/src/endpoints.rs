// Entity endpoints
//
// Read endpoints for every entity the console caches. Single-entity
// fetches accept `GetOptions` (filter + details); list fetches accept an
// optional filter string. Audits are tasks with usage_type=audit on the
// daemon side; the gateway exposes them under their own path.

use tracing::debug;

use crate::client::{GetOptions, GmpClient};
use crate::elements::{
    CredentialElement, ReportElement, ScannerElement, ScheduleElement, TaskElement,
};
use crate::error::Error;

impl GmpClient {
    // ── Tasks ────────────────────────────────────────────────────────

    /// `GET /gmp/tasks/{id}`
    pub async fn get_task(&self, id: &str, options: &GetOptions) -> Result<TaskElement, Error> {
        let url = self.api_url(&format!("tasks/{id}"));
        debug!(id, "fetching task");
        self.get_with(url, options).await
    }

    /// `GET /gmp/tasks`
    pub async fn list_tasks(&self, filter: Option<&str>) -> Result<Vec<TaskElement>, Error> {
        let url = self.api_url("tasks");
        debug!("listing tasks");
        self.get_with(url, &list_options(filter)).await
    }

    // ── Audits ───────────────────────────────────────────────────────

    /// `GET /gmp/audits/{id}`
    pub async fn get_audit(&self, id: &str, options: &GetOptions) -> Result<TaskElement, Error> {
        let url = self.api_url(&format!("audits/{id}"));
        debug!(id, "fetching audit");
        self.get_with(url, options).await
    }

    /// `GET /gmp/audits`
    pub async fn list_audits(&self, filter: Option<&str>) -> Result<Vec<TaskElement>, Error> {
        let url = self.api_url("audits");
        debug!("listing audits");
        self.get_with(url, &list_options(filter)).await
    }

    // ── Reports ──────────────────────────────────────────────────────

    /// `GET /gmp/reports/{id}`
    pub async fn get_report(&self, id: &str, options: &GetOptions) -> Result<ReportElement, Error> {
        let url = self.api_url(&format!("reports/{id}"));
        debug!(id, "fetching report");
        self.get_with(url, options).await
    }

    /// `GET /gmp/reports/{id}/delta/{delta_id}`
    ///
    /// Compares two reports of the same task; the response carries the
    /// delta results between them.
    pub async fn get_report_delta(
        &self,
        id: &str,
        delta_id: &str,
        options: &GetOptions,
    ) -> Result<ReportElement, Error> {
        let url = self.api_url(&format!("reports/{id}/delta/{delta_id}"));
        debug!(id, delta_id, "fetching report delta");
        self.get_with(url, options).await
    }

    /// `GET /gmp/reports`
    pub async fn list_reports(&self, filter: Option<&str>) -> Result<Vec<ReportElement>, Error> {
        let url = self.api_url("reports");
        debug!("listing reports");
        self.get_with(url, &list_options(filter)).await
    }

    // ── Scanners ─────────────────────────────────────────────────────

    /// `GET /gmp/scanners/{id}`
    pub async fn get_scanner(
        &self,
        id: &str,
        options: &GetOptions,
    ) -> Result<ScannerElement, Error> {
        let url = self.api_url(&format!("scanners/{id}"));
        debug!(id, "fetching scanner");
        self.get_with(url, options).await
    }

    /// `GET /gmp/scanners`
    pub async fn list_scanners(&self, filter: Option<&str>) -> Result<Vec<ScannerElement>, Error> {
        let url = self.api_url("scanners");
        debug!("listing scanners");
        self.get_with(url, &list_options(filter)).await
    }

    // ── Schedules ────────────────────────────────────────────────────

    /// `GET /gmp/schedules/{id}`
    pub async fn get_schedule(
        &self,
        id: &str,
        options: &GetOptions,
    ) -> Result<ScheduleElement, Error> {
        let url = self.api_url(&format!("schedules/{id}"));
        debug!(id, "fetching schedule");
        self.get_with(url, options).await
    }

    /// `GET /gmp/schedules`
    pub async fn list_schedules(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<ScheduleElement>, Error> {
        let url = self.api_url("schedules");
        debug!("listing schedules");
        self.get_with(url, &list_options(filter)).await
    }

    // ── Credentials ──────────────────────────────────────────────────

    /// `GET /gmp/credentials/{id}`
    pub async fn get_credential(
        &self,
        id: &str,
        options: &GetOptions,
    ) -> Result<CredentialElement, Error> {
        let url = self.api_url(&format!("credentials/{id}"));
        debug!(id, "fetching credential");
        self.get_with(url, options).await
    }

    /// `GET /gmp/credentials`
    pub async fn list_credentials(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<CredentialElement>, Error> {
        let url = self.api_url("credentials");
        debug!("listing credentials");
        self.get_with(url, &list_options(filter)).await
    }
}

fn list_options(filter: Option<&str>) -> GetOptions {
    GetOptions {
        filter: filter.map(str::to_owned),
        details: None,
    }
}
