//! Minimal client for the remote content API.
//!
//! Every endpoint answers `{"items": [{"id": ..., "data": {...}}, ...]}`.
//! We only read `items[].data`; the item id is copied into the record when
//! the record has none. Calls are instrumented and log URLs, status codes
//! and item counts (not contents).

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ContentError;
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct ContentClient {
  client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiResponse {
  #[serde(default)]
  items: Vec<ApiItem>,
}

#[derive(Deserialize)]
struct ApiItem {
  #[serde(default)]
  id: Option<String>,
  #[serde(default)]
  data: serde_json::Value,
}

/// Text of the "about" screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
  #[serde(default, alias = "objetivo_academico")]
  pub academic_goal: String,
  #[serde(default, alias = "metologia")]
  pub methodology: String,
  #[serde(default, alias = "detalhamento")]
  pub details: String,
}

impl ContentClient {
  pub fn new(timeout: Duration) -> Result<Self, ContentError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(ContentError::Client)?;
    Ok(Self { client })
  }

  #[instrument(level = "info", skip(self))]
  async fn get_body(&self, url: &str) -> Result<String, ContentError> {
    let res = self
      .client
      .get(url)
      .header(USER_AGENT, "osteoplay-backend/0.1")
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|source| ContentError::Transport { url: url.to_string(), source })?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      warn!(target: "osteoplay_backend", %url, %status, body = %trunc_for_log(&body, 200), "Content endpoint error");
      return Err(ContentError::Status { url: url.to_string(), status });
    }

    res.text().await.map_err(|source| ContentError::Transport { url: url.to_string(), source })
  }

  /// Fetch and decode every item of an endpoint.
  #[instrument(level = "info", skip(self))]
  pub async fn fetch_items<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ContentError> {
    let start = std::time::Instant::now();
    let body = self.get_body(url).await?;
    let items = parse_items(&body).map_err(|source| ContentError::Body { url: url.to_string(), source })?;
    info!(target: "osteoplay_backend", %url, count = items.len(), elapsed = ?start.elapsed(), "Content fetched");
    Ok(items)
  }

  /// The first item of the project-information endpoint, if any.
  #[instrument(level = "info", skip(self))]
  pub async fn fetch_project_info(&self, url: &str) -> Result<Option<ProjectInfo>, ContentError> {
    Ok(self.fetch_items::<ProjectInfo>(url).await?.into_iter().next())
  }
}

/// Decode an API body. Items whose `data` does not fit `T` are skipped.
pub fn parse_items<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, serde_json::Error> {
  let response: ApiResponse = serde_json::from_str(body)?;
  let mut out = Vec::with_capacity(response.items.len());
  for (position, item) in response.items.into_iter().enumerate() {
    let mut data = item.data;
    if let (Some(id), Some(obj)) = (item.id, data.as_object_mut()) {
      obj.entry("id").or_insert(serde_json::Value::String(id));
    }
    match serde_json::from_value::<T>(data) {
      Ok(record) => out.push(record),
      Err(e) => warn!(target: "osteoplay_backend", position, error = %e, "Skipping malformed content item"),
    }
  }
  Ok(out)
}
