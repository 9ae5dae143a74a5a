// ── Session abstraction ──
//
// Lifecycle management for a gateway connection plus the loader family
// that populates the entity stores. Every load follows the same
// sequence: atomic in-flight guard, Request dispatch, client call, then
// exactly one Success or Error dispatch. Errors are never swallowed --
// they are both persisted into the store and returned to the caller.

use std::future::Future;
use std::sync::{Arc, RwLock};

use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use scanctl_api::client::GetOptions;
use scanctl_api::transport::{TlsMode, TransportConfig};
use scanctl_api::GmpClient;

use crate::config::{SessionConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Credential, Filter, Report, Scanner, Schedule, Task};
use crate::store::{CacheKey, EntityAction, EntityStore};

// ── Load options ─────────────────────────────────────────────────────

/// Options for a single-entity load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub filter: Option<Filter>,
    /// Request the expanded representation (`details=1`) or the summary
    /// (`details=0`). `None` leaves the choice to the gateway.
    pub details: Option<bool>,
    /// Bypass the in-flight guard.
    pub force: bool,
}

impl LoadOptions {
    fn to_get_options(&self) -> GetOptions {
        GetOptions {
            filter: self.filter.as_ref().map(Filter::to_filter_string),
            details: self.details,
        }
    }
}

// ── Store registry ───────────────────────────────────────────────────

/// One cache store per entity type. Audits share the task model but get
/// their own stores, preserving the distinct entity-type cache.
pub struct Stores {
    pub tasks: EntityStore<Task>,
    pub audits: EntityStore<Task>,
    pub reports: EntityStore<Report>,
    pub delta_reports: EntityStore<Report>,
    pub scanners: EntityStore<Scanner>,
    pub schedules: EntityStore<Schedule>,
    pub credentials: EntityStore<Credential>,

    pub task_lists: EntityStore<Vec<Arc<Task>>>,
    pub audit_lists: EntityStore<Vec<Arc<Task>>>,
    pub report_lists: EntityStore<Vec<Arc<Report>>>,
    pub scanner_lists: EntityStore<Vec<Arc<Scanner>>>,
    pub schedule_lists: EntityStore<Vec<Arc<Schedule>>>,
    pub credential_lists: EntityStore<Vec<Arc<Credential>>>,
}

impl Stores {
    fn new() -> Self {
        Self {
            tasks: EntityStore::new(),
            audits: EntityStore::new(),
            reports: EntityStore::new(),
            delta_reports: EntityStore::new(),
            scanners: EntityStore::new(),
            schedules: EntityStore::new(),
            credentials: EntityStore::new(),
            task_lists: EntityStore::new(),
            audit_lists: EntityStore::new(),
            report_lists: EntityStore::new(),
            scanner_lists: EntityStore::new(),
            schedule_lists: EntityStore::new(),
            credential_lists: EntityStore::new(),
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Owns the gateway client
/// and the per-entity stores; all cache writes flow through the loader
/// methods here.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    // Clone-out pattern: `GmpClient` is cheap to clone (reqwest clients
    // share their pool), so no lock is held across awaits.
    client: RwLock<Option<GmpClient>>,
    stores: Stores,
}

impl Session {
    /// Create a new session from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                client: RwLock::new(None),
                stores: Stores::new(),
            }),
        }
    }

    /// Access the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Access the entity stores (selectors live on their snapshots).
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Connect to the gateway: build the transport, authenticate, and
    /// keep the session cookie for subsequent loads.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);
        let client = GmpClient::new(config.url.clone(), &transport)?;

        client
            .login(
                &config.auth.username,
                config.auth.password.expose_secret(),
            )
            .await?;
        debug!("session authentication successful");

        *self
            .inner
            .client
            .write()
            .expect("client lock poisoned") = Some(client);

        info!("connected to gateway");
        Ok(())
    }

    /// End the session. Logs out best-effort and drops the client.
    pub async fn disconnect(&self) {
        let client = self
            .inner
            .client
            .write()
            .expect("client lock poisoned")
            .take();

        if let Some(client) = client {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        debug!("disconnected");
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: SessionConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let session = Session::new(config);
        session.connect().await?;
        let result = f(session.clone()).await;
        session.disconnect().await;
        result
    }

    fn client(&self) -> Result<GmpClient, CoreError> {
        self.inner
            .client
            .read()
            .expect("client lock poisoned")
            .clone()
            .ok_or(CoreError::NotConnected)
    }

    // ── Generic load sequence ────────────────────────────────────────

    /// Run one load against a store.
    ///
    /// Returns `Ok(None)` without calling the client when an identical
    /// fetch is already in flight and `force` is not set. There is no
    /// staleness check on Success: a forced fetch racing a prior
    /// in-flight fetch for the same key completes in either order and
    /// the last write wins.
    async fn load_with<T, El, F, Fut>(
        &self,
        store: &EntityStore<T>,
        key: CacheKey,
        force: bool,
        fetch: F,
        parse: impl FnOnce(El) -> T,
    ) -> Result<Option<Arc<T>>, CoreError>
    where
        F: FnOnce(GmpClient) -> Fut,
        Fut: Future<Output = Result<El, scanctl_api::Error>>,
    {
        let client = self.client()?;

        if !store.try_begin(&key, force) {
            debug!(key = %key.loading(), "load already in flight, skipping");
            return Ok(None);
        }

        match fetch(client).await {
            Ok(element) => {
                let data = Arc::new(parse(element));
                store.dispatch(EntityAction::Success {
                    key,
                    data: Arc::clone(&data),
                });
                Ok(Some(data))
            }
            Err(err) => {
                let error = Arc::new(CoreError::from(err));
                store.dispatch(EntityAction::Error {
                    key,
                    error: Arc::clone(&error),
                });
                Err((*error).clone())
            }
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn load_task(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Task>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.tasks,
            key,
            options.force,
            move |client| async move { client.get_task(&id, &get).await },
            |element| Task::from_element(Some(element)),
        )
        .await
    }

    /// Resolve from the cache when a payload exists for the simplified
    /// key; only fetch otherwise.
    pub async fn load_task_if_needed(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Task>>, CoreError> {
        if let Some(cached) = self
            .inner
            .stores
            .tasks
            .state()
            .entity(id, options.filter.as_ref())
        {
            return Ok(Some(cached));
        }
        self.load_task(id, options).await
    }

    pub async fn load_tasks(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Task>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.task_lists,
            key,
            force,
            move |client| async move { client.list_tasks(filter_string.as_deref()).await },
            collect_models(Task::from_element),
        )
        .await
    }

    // ── Audits ───────────────────────────────────────────────────────

    pub async fn load_audit(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Task>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.audits,
            key,
            options.force,
            move |client| async move { client.get_audit(&id, &get).await },
            |element| Task::from_element(Some(element)),
        )
        .await
    }

    pub async fn load_audits(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Task>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.audit_lists,
            key,
            force,
            move |client| async move { client.list_audits(filter_string.as_deref()).await },
            collect_models(Task::from_element),
        )
        .await
    }

    // ── Reports ──────────────────────────────────────────────────────

    pub async fn load_report(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Report>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.reports,
            key,
            options.force,
            move |client| async move { client.get_report(&id, &get).await },
            |element| Report::from_element(Some(element)),
        )
        .await
    }

    /// Resolve from the cache when a payload exists; only fetch
    /// otherwise.
    pub async fn load_report_if_needed(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Report>>, CoreError> {
        if let Some(cached) = self
            .inner
            .stores
            .reports
            .state()
            .entity(id, options.filter.as_ref())
        {
            return Ok(Some(cached));
        }
        self.load_report(id, options).await
    }

    /// Two-phase "fetch small, upgrade if affordable" load.
    ///
    /// Phase 1 fetches the summary (`details=0`). When the summary's
    /// filtered result count is below the configured threshold, a
    /// second forced fetch with `details=1` obtains the full
    /// representation. Each phase dispatches its own request/success
    /// (or error) pair; phase 1 completes before phase 2 begins.
    pub async fn load_report_with_threshold(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Report>>, CoreError> {
        let threshold = self.inner.config.report_results_threshold;

        let summary = self
            .load_report(
                id,
                LoadOptions {
                    details: Some(false),
                    ..options.clone()
                },
            )
            .await?;

        let Some(report) = summary else {
            return Ok(None);
        };

        let filtered = u64::try_from(report.filtered_result_count()).unwrap_or(0);
        if filtered < threshold {
            debug!(
                id,
                filtered, threshold, "upgrading report summary to detailed fetch"
            );
            return self
                .load_report(
                    id,
                    LoadOptions {
                        details: Some(true),
                        force: true,
                        ..options
                    },
                )
                .await;
        }

        Ok(Some(report))
    }

    /// Load the comparison of two reports of the same task. Cached
    /// under the concatenated pair identifier.
    pub async fn load_report_delta(
        &self,
        id: &str,
        delta_id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Report>>, CoreError> {
        let key = CacheKey::delta(id, delta_id);
        let get = options.to_get_options();
        let id = id.to_owned();
        let delta_id = delta_id.to_owned();
        self.load_with(
            &self.inner.stores.delta_reports,
            key,
            options.force,
            move |client| async move { client.get_report_delta(&id, &delta_id, &get).await },
            |element| Report::from_element(Some(element)),
        )
        .await
    }

    pub async fn load_reports(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Report>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.report_lists,
            key,
            force,
            move |client| async move { client.list_reports(filter_string.as_deref()).await },
            collect_models(Report::from_element),
        )
        .await
    }

    // ── Scanners ─────────────────────────────────────────────────────

    pub async fn load_scanner(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Scanner>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.scanners,
            key,
            options.force,
            move |client| async move { client.get_scanner(&id, &get).await },
            |element| Scanner::from_element(Some(element)),
        )
        .await
    }

    pub async fn load_scanners(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Scanner>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.scanner_lists,
            key,
            force,
            move |client| async move { client.list_scanners(filter_string.as_deref()).await },
            collect_models(Scanner::from_element),
        )
        .await
    }

    // ── Schedules ────────────────────────────────────────────────────

    pub async fn load_schedule(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Schedule>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.schedules,
            key,
            options.force,
            move |client| async move { client.get_schedule(&id, &get).await },
            |element| Schedule::from_element(Some(element)),
        )
        .await
    }

    pub async fn load_schedules(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Schedule>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.schedule_lists,
            key,
            force,
            move |client| async move { client.list_schedules(filter_string.as_deref()).await },
            collect_models(Schedule::from_element),
        )
        .await
    }

    // ── Credentials ──────────────────────────────────────────────────

    pub async fn load_credential(
        &self,
        id: &str,
        options: LoadOptions,
    ) -> Result<Option<Arc<Credential>>, CoreError> {
        let key = CacheKey::entity(id, options.filter.clone());
        let get = options.to_get_options();
        let id = id.to_owned();
        self.load_with(
            &self.inner.stores.credentials,
            key,
            options.force,
            move |client| async move { client.get_credential(&id, &get).await },
            |element| Credential::from_element(Some(element)),
        )
        .await
    }

    pub async fn load_credentials(
        &self,
        filter: Option<Filter>,
        force: bool,
    ) -> Result<Option<Arc<Vec<Arc<Credential>>>>, CoreError> {
        let key = CacheKey::collection(filter.clone());
        let filter_string = filter.as_ref().map(Filter::to_filter_string);
        self.load_with(
            &self.inner.stores.credential_lists,
            key,
            force,
            move |client| async move { client.list_credentials(filter_string.as_deref()).await },
            collect_models(Credential::from_element),
        )
        .await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Build the per-element parse step for a collection load.
fn collect_models<El, T>(
    from_element: impl Fn(Option<El>) -> T,
) -> impl FnOnce(Vec<El>) -> Vec<Arc<T>> {
    move |elements| {
        elements
            .into_iter()
            .map(|el| Arc::new(from_element(Some(el))))
            .collect()
    }
}

/// Build a [`TransportConfig`] from the session configuration.
fn build_transport(config: &SessionConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None, // GmpClient::new adds one automatically
    }
}
