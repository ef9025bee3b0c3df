// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Lektio.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::errors::{SduiError, SduiResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use lektio_core::{TimetableSource, value_at};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Production SDUI API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.sdui.app";

/// Bound on a single timetable fetch, including connect and body read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// SDUI timetable REST API client for a single user.
///
/// Holds the bearer token and user id from configuration; the token is sent
/// as-is, no validation or refresh is attempted. Failed fetches surface as
/// [`SduiError`] and are never retried here.
#[derive(Debug, Clone)]
pub struct SduiClient {
    base_url: String,
    user_id: String,
    token: String,
    client: Client,
}

impl SduiClient {
    /// Create a new SDUI client with a custom base URL (tests, proxies).
    pub fn new(
        base_url: impl Into<String>,
        user_id: impl Into<String>,
        token: impl Into<String>,
    ) -> SduiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SduiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            user_id: user_id.into(),
            token: token.into(),
            client,
        })
    }

    /// Create a client against the production SDUI API.
    pub fn for_user(user_id: impl Into<String>, token: impl Into<String>) -> SduiResult<Self> {
        Self::new(DEFAULT_BASE_URL, user_id, token)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Fetch the raw lesson records for the given date range.
    ///
    /// Returns the array at `data.lessons` in the response body, defaulting
    /// to empty when the path is absent. The records are passed through
    /// undecoded; field extraction is the projector's job.
    pub async fn fetch_timetable(
        &self,
        begins_at: NaiveDate,
        ends_at: NaiveDate,
    ) -> SduiResult<Vec<Value>> {
        let url = format!(
            "{}/v1/timetables/users/{}/timetable?begins_at={}&ends_at={}",
            self.base_url,
            self.user_id,
            begins_at.format("%Y-%m-%d"),
            ends_at.format("%Y-%m-%d")
        );
        debug!("📅 [SDUI] Fetching timetable for user {}", self.user_id);
        debug!("   URL: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.json::<Value>().await?;
                let lessons = value_at(&body, &["data", "lessons"])
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                debug!("✅ [SDUI] Received {} raw lesson records", lessons.len());
                Ok(lessons)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("❌ [SDUI] Authentication failed for user {}", self.user_id);
                Err(SduiError::AuthenticationFailed)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!("❌ [SDUI] Status {}: {}", status, message);
                Err(SduiError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl TimetableSource for SduiClient {
    async fn fetch_day(&self, day: NaiveDate) -> anyhow::Result<Vec<Value>> {
        Ok(self.fetch_timetable(day, day).await?)
    }

    fn name(&self) -> &str {
        "SDUI timetable API"
    }
}
