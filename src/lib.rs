//! Local-first work-hour tracking core.
//!
//! The UI layer (forms, lists, charts, auth screens) lives elsewhere and
//! consumes this crate through [`WorklogApp`]: a record store mirrored to
//! an on-device cache and, when configured and signed in, to a remote
//! record service; pure statistics over the same records; and persisted
//! display preferences.

pub mod auth;
pub mod models;
pub mod remote;
pub mod settings;
pub mod stats;
pub mod store;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use log::{info, warn};

pub use auth::{AuthSession, SessionStore};
pub use models::{NewWorkRecord, WorkRecord};
pub use remote::{RemoteConfig, RemoteStore, RemoteStoreError, RestRemoteStore};
pub use settings::{DisplayPreferences, PreferencesStore, RecordView};
pub use store::{RecordCache, RecordStore, StoreSnapshot, SyncOutcome};

const RECORD_CACHE_FILE: &str = "work_records.json";
const PREFERENCES_FILE: &str = "settings.json";

/// Application composition root. Built once at startup and handed to the
/// UI; every consumer shares the same stores instead of reaching for
/// module-level state.
pub struct WorklogApp {
    pub records: RecordStore,
    pub preferences: PreferencesStore,
    pub session: SessionStore,
}

impl WorklogApp {
    /// Wire the stores against `data_dir`, creating it if needed. The
    /// remote store is optional: without `WORKLOG_REMOTE_URL` and
    /// `WORKLOG_REMOTE_ANON_KEY` in the environment the app runs
    /// local-only.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let cache = RecordCache::new(data_dir.join(RECORD_CACHE_FILE));
        let preferences = PreferencesStore::new(data_dir.join(PREFERENCES_FILE))?;
        let session = SessionStore::new();

        let remote: Option<Arc<dyn RemoteStore>> = match RemoteConfig::from_env() {
            Some(config) => match RestRemoteStore::new(config) {
                Ok(store) => Some(Arc::new(store)),
                Err(err) => {
                    warn!("remote store disabled: {err}");
                    None
                }
            },
            None => {
                info!("remote store not configured; running local-only");
                None
            }
        };

        let records = RecordStore::new(cache, remote, session.clone());

        Ok(Self {
            records,
            preferences,
            session,
        })
    }
}

/// Initialize logging (reads RUST_LOG env var). Safe to call more than
/// once; only the first call takes effect.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
