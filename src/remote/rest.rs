//! Reqwest-backed remote store adapter.
//!
//! Owns transport details only: URL construction, auth headers, status and
//! decode error mapping. The table protocol is PostgREST-style — row
//! filters as `column=eq.value` query pairs, inserts answered with the
//! stored representation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};

use super::dto::{RemoteRecordInsert, RemoteRecordPatch, RemoteWorkRecord};
use super::{RemoteConfig, RemoteStore, RemoteStoreError};
use crate::auth::AuthSession;
use crate::models::{NewWorkRecord, WorkRecord};

const RECORDS_TABLE: &str = "work_records";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestRemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RestRemoteStore {
    /// Build the adapter with a bounded request timeout so a hung remote
    /// call cannot pin a loading state forever.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteStoreError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        config: RemoteConfig,
        timeout: Duration,
    ) -> Result<Self, RemoteStoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RemoteStoreError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn table_url(&self) -> Result<Url, RemoteStoreError> {
        self.config
            .url
            .join(&format!("rest/v1/{RECORDS_TABLE}"))
            .map_err(|err| RemoteStoreError::Transport(format!("invalid remote url: {err}")))
    }

    fn authed(&self, request: RequestBuilder, session: &AuthSession) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .header(header::ACCEPT, "application/json")
    }

    async fn read_success_body(
        response: reqwest::Response,
    ) -> Result<Vec<u8>, RemoteStoreError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn select_records(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<WorkRecord>, RemoteStoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &eq_filter(&session.user_id))
            .append_pair("order", "start_date.desc");

        let response = self
            .authed(self.client.get(url), session)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = Self::read_success_body(response).await?;
        parse_rows(&body).map(|rows| rows.into_iter().map(WorkRecord::from).collect())
    }

    async fn insert_record(
        &self,
        session: &AuthSession,
        record: &NewWorkRecord,
    ) -> Result<WorkRecord, RemoteStoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .authed(self.client.post(url), session)
            .header("Prefer", "return=representation")
            .json(&RemoteRecordInsert::new(&session.user_id, record))
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = Self::read_success_body(response).await?;

        parse_rows(&body)?
            .into_iter()
            .next()
            .map(WorkRecord::from)
            .ok_or(RemoteStoreError::EmptyInsertReply)
    }

    async fn update_record(
        &self,
        session: &AuthSession,
        record: &WorkRecord,
    ) -> Result<(), RemoteStoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &eq_filter(&record.id))
            .append_pair("user_id", &eq_filter(&session.user_id));

        let response = self
            .authed(self.client.patch(url), session)
            .json(&RemoteRecordPatch::from(record))
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::read_success_body(response).await?;
        Ok(())
    }

    async fn delete_record(
        &self,
        session: &AuthSession,
        id: &str,
    ) -> Result<(), RemoteStoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &eq_filter(id))
            .append_pair("user_id", &eq_filter(&session.user_id));

        let response = self
            .authed(self.client.delete(url), session)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::read_success_body(response).await?;
        Ok(())
    }
}

fn eq_filter(value: &str) -> String {
    format!("eq.{value}")
}

fn parse_rows(body: &[u8]) -> Result<Vec<RemoteWorkRecord>, RemoteStoreError> {
    serde_json::from_slice(body)
        .map_err(|err| RemoteStoreError::Decode(format!("invalid record payload: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> RemoteStoreError {
    RemoteStoreError::Transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteStoreError {
    RemoteStoreError::Status {
        status: status.as_u16(),
        body: body_preview(body),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
