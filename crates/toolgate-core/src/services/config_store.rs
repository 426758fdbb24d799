//! Config store - client-side owner of the tool-server settings.
//!
//! The store loads and persists the settings record through a
//! `SettingsRepository` and routes every configuration change through the
//! discovery port, so persisted settings always correspond to a
//! configuration the gateway accepted.
//!
//! # Caller contract
//!
//! - Call [`ConfigStore::initialize`] once and await it before anything else.
//!   Concurrent first-time initialization is not guarded.
//! - [`ConfigStore::update_settings`] is single-flight: a call made while
//!   another update is pending returns [`UpdateOutcome::Skipped`] without
//!   touching any state. Callers should disable their update controls while
//!   [`ConfigStore::is_updating`] is true.
//! - Discovery makes the new configuration the gateway's active one before
//!   the record is saved. If saving fails, the store asks the gateway to
//!   discover the previous configuration again so its availability view
//!   matches the settings the store still holds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::domain::ServerTools;
use crate::ports::{CoreError, RepositoryError, SettingsRepository, ToolDiscoveryPort};
use crate::settings::{Settings, validate_settings};

/// Result of an update attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The new settings were accepted, persisted and adopted.
    Applied(ServerTools),
    /// Another update was in flight; nothing changed.
    Skipped,
}

#[derive(Debug, Default)]
struct StoreState {
    settings: Settings,
    server_tools: ServerTools,
    last_error: Option<String>,
}

/// Clears the in-progress flag when the update ends, however it ends.
struct UpdateGuard<'a>(&'a AtomicBool);

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Client-facing holder of the current settings and discovered tools.
pub struct ConfigStore {
    repo: Arc<dyn SettingsRepository>,
    discovery: Arc<dyn ToolDiscoveryPort>,
    state: RwLock<StoreState>,
    initialized: AtomicBool,
    updating: AtomicBool,
}

impl ConfigStore {
    /// Create a store holding compiled-in defaults until initialized.
    pub fn new(repo: Arc<dyn SettingsRepository>, discovery: Arc<dyn ToolDiscoveryPort>) -> Self {
        Self {
            repo,
            discovery,
            state: RwLock::new(StoreState::default()),
            initialized: AtomicBool::new(false),
            updating: AtomicBool::new(false),
        }
    }

    /// Load persisted settings (or persist defaults) and discover their tools.
    ///
    /// Failures are recorded in [`ConfigStore::last_error`] rather than
    /// returned; the store always ends up initialized. A second call is a
    /// no-op returning the already-loaded settings.
    pub async fn initialize(&self) -> Settings {
        if self.is_initialized() {
            return self.settings();
        }

        match self.repo.load_record().await {
            Ok(Some(record)) => self.adopt_record(&record).await,
            Ok(None) => self.persist_defaults().await,
            Err(e) => {
                warn!(error = %e, "Failed to load stored settings, using defaults");
                self.record_error(format!("Failed to load settings: {e}"));
            }
        }

        self.initialized.store(true, Ordering::Release);
        self.settings()
    }

    async fn adopt_record(&self, record: &str) {
        // In both failure cases defaults stay in place and the stored record
        // is left untouched.
        let settings = match Settings::from_record(record) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Stored settings are corrupt, keeping defaults");
                self.record_error(format!("Stored settings are invalid: {e}"));
                return;
            }
        };
        if let Err(e) = validate_settings(&settings) {
            warn!(error = %e, "Stored settings fail validation, keeping defaults");
            self.record_error(format!("Stored settings are invalid: {e}"));
            return;
        }

        self.write_state().settings = settings.clone();

        match self.discovery.discover(&settings.tool_config).await {
            Ok(tools) => {
                info!(
                    servers = settings.tool_config.len(),
                    available = tools.len(),
                    "Loaded stored settings"
                );
                self.write_state().server_tools = tools;
            }
            Err(e) => {
                warn!(error = %e, "Tool discovery failed during initialization");
                self.record_error(format!("Tool discovery failed: {e}"));
            }
        }
    }

    async fn persist_defaults(&self) {
        let defaults = self.settings();
        let result = match defaults.to_record() {
            Ok(record) => self.repo.save_record(&record).await,
            Err(e) => Err(RepositoryError::Serialization(e.to_string())),
        };

        match result {
            Ok(()) => debug!("No stored settings, persisted defaults"),
            Err(e) => {
                warn!(error = %e, "Failed to persist default settings");
                self.record_error(format!("Failed to save default settings: {e}"));
            }
        }
    }

    /// Apply new settings through discovery, then persist and adopt them.
    ///
    /// Returns [`UpdateOutcome::Skipped`] immediately if another update is in
    /// flight. On any failure the previous settings remain in effect.
    pub async fn update_settings(&self, new_settings: Settings) -> Result<UpdateOutcome, CoreError> {
        if self.updating.swap(true, Ordering::AcqRel) {
            debug!("Settings update already in progress, dropping request");
            return Ok(UpdateOutcome::Skipped);
        }
        let _guard = UpdateGuard(&self.updating);

        validate_settings(&new_settings)?;

        let tools = self.discovery.discover(&new_settings.tool_config).await?;

        let record = new_settings
            .to_record()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        if let Err(e) = self.repo.save_record(&record).await {
            warn!(error = %e, "Failed to save settings, restoring previous configuration");
            self.restore_active_config().await;
            return Err(e.into());
        }

        info!(
            servers = new_settings.tool_config.len(),
            available = tools.len(),
            max_steps = new_settings.max_steps,
            "Settings updated"
        );

        let mut state = self.write_state();
        state.settings = new_settings;
        state.server_tools = tools.clone();
        state.last_error = None;
        drop(state);

        Ok(UpdateOutcome::Applied(tools))
    }

    async fn restore_active_config(&self) {
        let previous = self.settings().tool_config;
        if let Err(e) = self.discovery.discover(&previous).await {
            warn!(error = %e, "Failed to restore previous tool configuration");
        }
    }

    /// Refresh the discovered tools without touching persisted settings.
    pub async fn check_servers_availabilities(&self) -> Result<ServerTools, CoreError> {
        let tools = self.discovery.availability().await?;
        self.write_state().server_tools = tools.clone();
        Ok(tools)
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.read_state().settings.clone()
    }

    /// Tools from the most recent successful discovery.
    pub fn server_tools(&self) -> ServerTools {
        self.read_state().server_tools.clone()
    }

    /// Most recent absorbed error, if any.
    pub fn last_error(&self) -> Option<String> {
        self.read_state().last_error.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Whether an update is currently in flight.
    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    fn record_error(&self, message: String) {
        self.write_state().last_error = Some(message);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServerDefinition, ToolConfig, ToolDescriptor};
    use crate::ports::TransportError;
    use crate::ports::tool_discovery::MockToolDiscoveryPort;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct MemorySettingsRepo {
        record: Mutex<Option<String>>,
        loads: AtomicUsize,
        saves: AtomicUsize,
    }

    impl MemorySettingsRepo {
        fn with_record(record: Option<&str>) -> Self {
            Self {
                record: Mutex::new(record.map(str::to_string)),
                loads: AtomicUsize::new(0),
                saves: AtomicUsize::new(0),
            }
        }

        fn stored(&self) -> Option<String> {
            self.record.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SettingsRepository for MemorySettingsRepo {
        async fn load_record(&self) -> Result<Option<String>, RepositoryError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored())
        }

        async fn save_record(&self, record: &str) -> Result<(), RepositoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.record.lock().unwrap() = Some(record.to_string());
            Ok(())
        }
    }

    /// Loads nothing and refuses every save.
    struct FailingSaveRepo;

    #[async_trait]
    impl SettingsRepository for FailingSaveRepo {
        async fn load_record(&self) -> Result<Option<String>, RepositoryError> {
            Ok(None)
        }

        async fn save_record(&self, _record: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("disk full".into()))
        }
    }

    /// Discovery that blocks until released, to hold an update in flight.
    struct GatedDiscovery {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    impl GatedDiscovery {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ToolDiscoveryPort for GatedDiscovery {
        async fn discover(&self, config: &ToolConfig) -> Result<ServerTools, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(tools_for(config))
        }

        async fn availability(&self) -> Result<ServerTools, TransportError> {
            Ok(ServerTools::new())
        }
    }

    fn tools_for(config: &ToolConfig) -> ServerTools {
        config
            .iter()
            .map(|(name, _)| (name.clone(), vec![ToolDescriptor::new(format!("{name}_tool"))]))
            .collect()
    }

    fn settings_with(server: &str, max_steps: u32) -> Settings {
        Settings {
            tool_config: ToolConfig::new()
                .with_server(server, ServerDefinition::stdio("npx", vec!["-y".into()])),
            max_steps,
        }
    }

    #[tokio::test]
    async fn test_initialize_persists_defaults_when_absent() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_discover().never();

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        let settings = store.initialize().await;

        assert_eq!(settings, Settings::with_defaults());
        assert!(store.is_initialized());
        let stored = Settings::from_record(&repo.stored().unwrap()).unwrap();
        assert_eq!(stored, Settings::with_defaults());
    }

    #[tokio::test]
    async fn test_initialize_adopts_stored_settings_and_discovers() {
        let stored = settings_with("github", 7);
        let repo = Arc::new(MemorySettingsRepo::with_record(Some(
            &stored.to_record().unwrap(),
        )));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery
            .expect_discover()
            .withf(|config: &ToolConfig| config.get("github").is_some())
            .times(1)
            .returning(|config| Ok(tools_for(config)));

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        let settings = store.initialize().await;

        assert_eq!(settings, stored);
        assert!(store.server_tools().contains_server("github"));
        assert_eq!(store.last_error(), None);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_initialize_twice_loads_once() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let store = ConfigStore::new(repo.clone(), Arc::new(MockToolDiscoveryPort::new()));

        let first = store.initialize().await;
        let second = store.initialize().await;

        assert_eq!(first, second);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_initialize_keeps_defaults_on_corrupt_record() {
        let repo = Arc::new(MemorySettingsRepo::with_record(Some("{\"maxSteps\": \"many\"")));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_discover().never();

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        let settings = store.initialize().await;

        assert_eq!(settings, Settings::with_defaults());
        assert!(store.is_initialized());
        assert!(store.last_error().unwrap().contains("invalid"));
        // The corrupt record is not overwritten with defaults.
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
        assert_eq!(repo.stored().as_deref(), Some("{\"maxSteps\": \"many\""));
    }

    #[tokio::test]
    async fn test_initialize_rejects_stored_settings_that_fail_validation() {
        let record = r#"{"maxSteps":0,"toolConfig":{"bad":{"executablePath":"npx -y srv"}}}"#;
        let repo = Arc::new(MemorySettingsRepo::with_record(Some(record)));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_discover().never();

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        let settings = store.initialize().await;

        assert_eq!(settings, Settings::with_defaults());
        assert!(validate_settings(&store.settings()).is_ok());
        assert!(store.last_error().unwrap().contains("invalid"));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
        assert_eq!(repo.stored().as_deref(), Some(record));
    }

    #[tokio::test]
    async fn test_update_save_failure_restores_previous_config() {
        let repo = Arc::new(FailingSaveRepo);
        let mut discovery = MockToolDiscoveryPort::new();
        let mut seq = mockall::Sequence::new();
        discovery
            .expect_discover()
            .withf(|config: &ToolConfig| config.get("github").is_some())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|config| Ok(tools_for(config)));
        discovery
            .expect_discover()
            .withf(|config: &ToolConfig| config.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|config| Ok(tools_for(config)));

        let store = ConfigStore::new(repo, Arc::new(discovery));
        let result = store.update_settings(settings_with("github", 5)).await;

        assert!(matches!(result, Err(CoreError::Repository(_))));
        assert_eq!(store.settings(), Settings::with_defaults());
        assert!(store.server_tools().is_empty());
        assert!(!store.is_updating());
    }

    #[tokio::test]
    async fn test_initialize_records_discovery_failure() {
        let stored = settings_with("github", 3);
        let repo = Arc::new(MemorySettingsRepo::with_record(Some(
            &stored.to_record().unwrap(),
        )));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery
            .expect_discover()
            .returning(|_| Err(TransportError::Unreachable("connection refused".into())));

        let store = ConfigStore::new(repo, Arc::new(discovery));
        let settings = store.initialize().await;

        assert_eq!(settings, stored);
        assert!(store.is_initialized());
        assert!(store.last_error().unwrap().contains("connection refused"));
        assert!(store.server_tools().is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_and_persists() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery
            .expect_discover()
            .times(1)
            .returning(|config| Ok(tools_for(config)));

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        store.initialize().await;

        let new_settings = settings_with("github", 20);
        let outcome = store.update_settings(new_settings.clone()).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Applied(ref tools) if tools.contains_server("github")));
        assert_eq!(store.settings(), new_settings);
        assert!(!store.is_updating());
        let stored = Settings::from_record(&repo.stored().unwrap()).unwrap();
        assert_eq!(stored, new_settings);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_previous_settings() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_discover().returning(|_| {
            Err(TransportError::Status {
                status: 500,
                message: "boom".into(),
            })
        });

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        store.initialize().await;
        let saves_before = repo.saves.load(Ordering::SeqCst);

        let result = store.update_settings(settings_with("github", 5)).await;

        assert!(matches!(result, Err(CoreError::Transport(_))));
        assert_eq!(store.settings(), Settings::with_defaults());
        assert_eq!(repo.saves.load(Ordering::SeqCst), saves_before);
        assert!(!store.is_updating(), "flag must be cleared on failure");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_settings_without_discovery() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_discover().never();

        let store = ConfigStore::new(repo, Arc::new(discovery));
        let result = store
            .update_settings(Settings {
                max_steps: 0,
                ..Settings::with_defaults()
            })
            .await;

        assert!(matches!(result, Err(CoreError::Settings(_))));
        assert!(!store.is_updating());
    }

    #[tokio::test]
    async fn test_concurrent_update_is_dropped() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let discovery = Arc::new(GatedDiscovery::new());
        let store = Arc::new(ConfigStore::new(repo.clone(), discovery.clone()));

        let first_settings = settings_with("first", 11);
        let first = {
            let store = Arc::clone(&store);
            let settings = first_settings.clone();
            tokio::spawn(async move { store.update_settings(settings).await })
        };

        // Wait until the first update is parked inside discovery.
        discovery.entered.notified().await;
        assert!(store.is_updating());

        let second = store
            .update_settings(settings_with("second", 22))
            .await
            .unwrap();
        assert_eq!(second, UpdateOutcome::Skipped);

        discovery.release.notify_one();
        let first = first.await.unwrap().unwrap();

        assert!(matches!(first, UpdateOutcome::Applied(_)));
        assert_eq!(store.settings(), first_settings);
        assert!(store.server_tools().contains_server("first"));
        assert!(!store.server_tools().contains_server("second"));
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
        assert!(!store.is_updating());
    }

    #[tokio::test]
    async fn test_availability_refresh_leaves_settings_alone() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery.expect_availability().returning(|| {
            let mut tools = ServerTools::new();
            tools.insert("github", vec![ToolDescriptor::new("search_issues")]);
            Ok(tools)
        });

        let store = ConfigStore::new(repo.clone(), Arc::new(discovery));
        store.initialize().await;
        let saves_before = repo.saves.load(Ordering::SeqCst);

        let tools = store.check_servers_availabilities().await.unwrap();

        assert_eq!(tools.tool_count(), 1);
        assert_eq!(store.server_tools(), tools);
        assert_eq!(store.settings(), Settings::with_defaults());
        assert_eq!(repo.saves.load(Ordering::SeqCst), saves_before);
    }

    #[tokio::test]
    async fn test_availability_surfaces_transport_failure() {
        let repo = Arc::new(MemorySettingsRepo::with_record(None));
        let mut discovery = MockToolDiscoveryPort::new();
        discovery
            .expect_availability()
            .returning(|| Err(TransportError::Unreachable("timeout".into())));

        let store = ConfigStore::new(repo, Arc::new(discovery));
        let result = store.check_servers_availabilities().await;

        assert!(matches!(
            result,
            Err(CoreError::Transport(TransportError::Unreachable(_)))
        ));
    }
}
