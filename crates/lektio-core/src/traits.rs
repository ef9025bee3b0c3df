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

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

/// Source of raw lesson records for the configured user.
///
/// The poll loop asks once per cycle for a single day; the projector consumes
/// whatever comes back. Implementations own authentication and timeouts.
#[async_trait]
pub trait TimetableSource: Send + Sync {
    /// Fetch the raw lesson records for the given day.
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Value>>;

    /// Get data source name for logging
    fn name(&self) -> &str;
}

/// Sink that publishes the projected timetable to the host platform.
#[async_trait]
pub trait StateSink: Send + Sync {
    /// Publish a state value together with its attribute payload.
    async fn publish(&self, state: &str, attributes: Value) -> Result<()>;

    /// Mark the published entity as unavailable (fetch failed, no projection).
    async fn mark_unavailable(&self) -> Result<()>;

    /// Get sink name for logging
    fn name(&self) -> &str;
}
