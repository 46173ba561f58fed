//! Local-first record store.
//!
//! The store owns the canonical in-memory record list. Every mutation lands
//! in memory and the on-disk cache first; the remote side is best-effort.
//! Remote failures never surface as `Err` to the UI — they degrade the
//! operation to its local-only effect and leave a message in `last_error`.

mod cache;

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::{AuthSession, SessionStore};
use crate::models::{NewWorkRecord, WorkRecord};
use crate::remote::RemoteStore;

pub use cache::RecordCache;

/// Point-in-time view of the store for the UI layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub records: Vec<WorkRecord>,
    pub last_error: Option<String>,
    pub is_loading: bool,
    pub is_syncing: bool,
}

/// Aggregate result of [`RecordStore::sync_to_remote`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub success: bool,
    pub message: String,
}

impl SyncOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

struct StoreState {
    records: Vec<WorkRecord>,
    last_error: Option<String>,
    is_loading: bool,
    is_syncing: bool,
}

/// Single source of truth for the current record set, mirrored to the local
/// cache on every mutation and to the remote store when one is configured
/// and a session exists.
#[derive(Clone)]
pub struct RecordStore {
    state: Arc<Mutex<StoreState>>,
    cache: RecordCache,
    remote: Option<Arc<dyn RemoteStore>>,
    session: SessionStore,
}

impl RecordStore {
    /// Build the store and seed the in-memory list from the cache so the UI
    /// has data before the first fetch resolves.
    pub fn new(
        cache: RecordCache,
        remote: Option<Arc<dyn RemoteStore>>,
        session: SessionStore,
    ) -> Self {
        let records = cache.load();
        Self {
            state: Arc::new(Mutex::new(StoreState {
                records,
                last_error: None,
                is_loading: false,
                is_syncing: false,
            })),
            cache,
            remote,
            session,
        }
    }

    pub async fn records(&self) -> Vec<WorkRecord> {
        self.state.lock().await.records.clone()
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock().await;
        StoreSnapshot {
            records: state.records.clone(),
            last_error: state.last_error.clone(),
            is_loading: state.is_loading,
            is_syncing: state.is_syncing,
        }
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.last_error = None;
    }

    /// Refresh the record list. With a configured remote and a session the
    /// remote copy wins and overwrites the cache; otherwise (or on remote
    /// failure) the cache is the source.
    pub async fn fetch(&self) -> Vec<WorkRecord> {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.last_error = None;
        }

        let remote_result = match self.remote_session() {
            Some((remote, session)) => Some(remote.select_records(&session).await),
            None => None,
        };

        let mut state = self.state.lock().await;
        state.is_loading = false;
        match remote_result {
            Some(Ok(records)) => {
                state.records = records;
                self.cache.save(&state.records);
            }
            Some(Err(err)) => {
                warn!("remote fetch failed, falling back to cache: {err}");
                state.records = self.cache.load();
                state.last_error = Some(err.to_string());
            }
            None => {
                state.records = self.cache.load();
            }
        }
        state.records.clone()
    }

    /// Add a record. With a remote session the server issues the id and its
    /// returned row is kept; otherwise, or when the insert fails, a local
    /// timestamp id is synthesized. The caller-visible flow never fails.
    pub async fn add(&self, record: NewWorkRecord) {
        let mut remote_error = None;
        let stored = match self.remote_session() {
            Some((remote, session)) => match remote.insert_record(&session, &record).await {
                Ok(inserted) => inserted,
                Err(err) => {
                    warn!("remote insert failed, keeping record locally: {err}");
                    remote_error = Some(err.to_string());
                    record.with_id(local_record_id())
                }
            },
            None => record.with_id(local_record_id()),
        };

        let mut state = self.state.lock().await;
        state.records.insert(0, stored);
        if let Some(message) = remote_error {
            state.last_error = Some(message);
        }
        self.cache.save(&state.records);
    }

    /// Replace the record with a matching id, locally first (optimistic),
    /// then best-effort on the remote side. An unknown id is a no-op.
    pub async fn update(&self, record: WorkRecord) {
        {
            let mut state = self.state.lock().await;
            if let Some(slot) = state.records.iter_mut().find(|r| r.id == record.id) {
                *slot = record.clone();
                self.cache.save(&state.records);
            }
        }

        if let Some((remote, session)) = self.remote_session() {
            if let Err(err) = remote.update_record(&session, &record).await {
                warn!("remote update failed for record {}: {err}", record.id);
                self.record_error(err.to_string()).await;
            }
        }
    }

    /// Remove the record with a matching id, locally first, then best-effort
    /// on the remote side. Remote failure does not restore the record.
    pub async fn delete(&self, id: &str) {
        {
            let mut state = self.state.lock().await;
            let before = state.records.len();
            state.records.retain(|record| record.id != id);
            if state.records.len() != before {
                self.cache.save(&state.records);
            }
        }

        if let Some((remote, session)) = self.remote_session() {
            if let Err(err) = remote.delete_record(&session, id).await {
                warn!("remote delete failed for record {id}: {err}");
                self.record_error(err.to_string()).await;
            }
        }
    }

    /// Push every locally-held record to the remote store. Records whose id
    /// is server-issued are updated in place; locally-minted ids are
    /// inserted and rewritten to the server's UUID. Requires a configured
    /// remote and a session; otherwise fails without mutating anything.
    pub async fn sync_to_remote(&self) -> SyncOutcome {
        if self.remote.is_none() {
            return SyncOutcome::failure("sync unavailable: remote store not configured");
        }
        let Some((remote, session)) = self.remote_session() else {
            return SyncOutcome::failure("sync unavailable: not signed in");
        };

        let snapshot = {
            let mut state = self.state.lock().await;
            state.is_syncing = true;
            state.records.clone()
        };

        let total = snapshot.len();
        let mut synced = Vec::with_capacity(total);
        let mut failed = 0usize;

        for record in snapshot {
            if is_server_issued(&record.id) {
                match remote.update_record(&session, &record).await {
                    Ok(()) => synced.push(record),
                    Err(err) => {
                        warn!("sync update failed for record {}: {err}", record.id);
                        failed += 1;
                        synced.push(record);
                    }
                }
            } else {
                let local_id = record.id.clone();
                match remote.insert_record(&session, &record.clone().into_draft()).await {
                    Ok(inserted) => {
                        info!("record {local_id} assigned server id {}", inserted.id);
                        synced.push(inserted);
                    }
                    Err(err) => {
                        warn!("sync insert failed for record {local_id}: {err}");
                        failed += 1;
                        synced.push(record);
                    }
                }
            }
        }

        let mut state = self.state.lock().await;
        state.records = synced;
        state.is_syncing = false;
        self.cache.save(&state.records);

        if failed == 0 {
            SyncOutcome {
                success: true,
                message: if total == 0 {
                    "nothing to sync".to_string()
                } else {
                    format!("synced {total} records")
                },
            }
        } else {
            let message = format!("synced {} of {total} records, {failed} failed", total - failed);
            state.last_error = Some(message.clone());
            SyncOutcome::failure(message)
        }
    }

    fn remote_session(&self) -> Option<(Arc<dyn RemoteStore>, AuthSession)> {
        let remote = self.remote.clone()?;
        let session = self.session.current()?;
        Some((remote, session))
    }

    async fn record_error(&self, message: String) {
        self.state.lock().await.last_error = Some(message);
    }
}

fn local_record_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Id provenance heuristic: hyphenated UUID text marks a server-issued id.
/// Locally-minted ids are millisecond timestamps and never match.
fn is_server_issued(id: &str) -> bool {
    id.len() == 36 && Uuid::try_parse(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_uuids_are_server_issued() {
        assert!(is_server_issued("0b8f4a3e-7a1d-4a52-9d6e-1f2b3c4d5e6f"));
    }

    #[test]
    fn timestamp_ids_are_local() {
        assert!(!is_server_issued("1745000000000"));
    }

    #[test]
    fn non_hyphenated_uuid_text_is_not_server_issued() {
        // Uuid::try_parse accepts the simple format; the length guard pins
        // the heuristic to the exact shape the server hands out.
        assert!(!is_server_issued("0b8f4a3e7a1d4a529d6e1f2b3c4d5e6f"));
        assert!(!is_server_issued("{0b8f4a3e-7a1d-4a52-9d6e-1f2b3c4d5e6f}"));
    }

    #[test]
    fn local_ids_are_numeric_timestamps() {
        let id = local_record_id();
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        assert!(!is_server_issued(&id));
    }
}
