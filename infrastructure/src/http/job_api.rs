//! REST adapter for the model download service.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | poll      | `GET  models/download/status/{id}` |
//! | catalog   | `GET  models/catalog` |
//! | start     | `POST models/download/{id}` |
//! | cancel    | `POST models/download/cancel/{id}` |
//! | delete    | `DELETE models/delete/{id}` |

use super::envelope::{decode, unwrap_envelope};
use super::error::HttpError;
use assist_application::{JobApiError, JobCatalog, JobCommands, JobStatusSource, StartOutcome};
use assist_domain::{CatalogEntry, JobId, JobSnapshot};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Wrapped { models: Vec<CatalogEntry> },
    Bare(Vec<CatalogEntry>),
}

#[derive(Deserialize)]
struct CommandReply {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the job (model download) endpoints.
#[derive(Clone)]
pub struct HttpJobApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpJobApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn call(&self, method: Method, path: &str) -> Result<Value, HttpError> {
        let url = self.url(path);
        trace!(%method, %url, "Job API request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::from_status(status, body));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn command(&self, method: Method, path: &str) -> Result<CommandReply, HttpError> {
        let value = unwrap_envelope(self.call(method, path).await?)?;
        if value.is_null() {
            return Ok(CommandReply {
                status: "success".to_string(),
                message: None,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl JobStatusSource for HttpJobApi {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot, JobApiError> {
        let value = self
            .call(Method::GET, &format!("models/download/status/{job_id}"))
            .await?;
        Ok(decode(value)?)
    }
}

#[async_trait]
impl JobCatalog for HttpJobApi {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, JobApiError> {
        let value = self.call(Method::GET, "models/catalog").await?;
        let entries = match decode::<CatalogPayload>(value)? {
            CatalogPayload::Wrapped { models } => models,
            CatalogPayload::Bare(models) => models,
        };
        debug!(entries = entries.len(), "Fetched catalog");
        Ok(entries)
    }
}

#[async_trait]
impl JobCommands for HttpJobApi {
    async fn start(&self, job_id: &JobId) -> Result<StartOutcome, JobApiError> {
        let reply = self
            .command(Method::POST, &format!("models/download/{job_id}"))
            .await?;
        match reply.status.as_str() {
            "started" | "downloading" => Ok(StartOutcome::Started),
            "already_downloading" => Ok(StartOutcome::AlreadyDownloading),
            "already_installed" => Ok(StartOutcome::AlreadyInstalled),
            other => Err(JobApiError::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| format!("unexpected start status '{other}'")),
            )),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> Result<(), JobApiError> {
        self.command(Method::POST, &format!("models/download/cancel/{job_id}"))
            .await?;
        Ok(())
    }

    async fn delete(&self, job_id: &JobId) -> Result<(), JobApiError> {
        self.command(Method::DELETE, &format!("models/delete/{job_id}"))
            .await?;
        Ok(())
    }
}
