//! Remote record service boundary.
//!
//! The store talks to the remote side through the [`RemoteStore`] trait so
//! tests can substitute an in-memory double; [`RestRemoteStore`] is the
//! production adapter speaking a PostgREST-style table protocol.

mod dto;
mod rest;

use std::env;

use async_trait::async_trait;
use log::warn;
use reqwest::Url;
use thiserror::Error;

use crate::auth::AuthSession;
use crate::models::{NewWorkRecord, WorkRecord};

pub use rest::RestRemoteStore;

pub const REMOTE_URL_ENV: &str = "WORKLOG_REMOTE_URL";
pub const REMOTE_ANON_KEY_ENV: &str = "WORKLOG_REMOTE_ANON_KEY";

#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("remote request failed: {0}")]
    Transport(String),

    #[error("remote rejected request with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("remote insert returned no rows")]
    EmptyInsertReply,
}

/// REST-like table interface over the per-user `work_records` partition.
/// Every call carries the session so the server only ever sees rows scoped
/// to the authenticated user.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All records for the session user, ordered by start date descending.
    async fn select_records(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<WorkRecord>, RemoteStoreError>;

    /// Insert a new record and return the stored row, including the
    /// server-issued id.
    async fn insert_record(
        &self,
        session: &AuthSession,
        record: &NewWorkRecord,
    ) -> Result<WorkRecord, RemoteStoreError>;

    /// Update the row matching both the record id and the session user.
    async fn update_record(
        &self,
        session: &AuthSession,
        record: &WorkRecord,
    ) -> Result<(), RemoteStoreError>;

    /// Delete the row matching both id and the session user.
    async fn delete_record(&self, session: &AuthSession, id: &str)
        -> Result<(), RemoteStoreError>;
}

/// Endpoint and anonymous API key for the remote service. Absent or blank
/// environment variables simply mean the app runs local-only.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub url: Url,
    pub anon_key: String,
}

impl RemoteConfig {
    pub fn new(url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            url,
            anon_key: anon_key.into(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let url = non_empty_env(REMOTE_URL_ENV)?;
        let anon_key = non_empty_env(REMOTE_ANON_KEY_ENV)?;

        match Url::parse(&url) {
            Ok(url) => Some(Self { url, anon_key }),
            Err(err) => {
                warn!("ignoring invalid {REMOTE_URL_ENV} value: {err}");
                None
            }
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
