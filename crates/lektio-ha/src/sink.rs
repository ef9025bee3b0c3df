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

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::client::HomeAssistantClient;
use lektio_core::StateSink;

const SENSOR_ICON: &str = "mdi:calendar-clock";
const STATE_UNAVAILABLE: &str = "unavailable";

/// Publishes the projected timetable as one HA sensor entity.
///
/// The entity id is derived from the SDUI user id so repeated runs keep
/// updating the same entity instead of creating new ones.
#[derive(Debug)]
pub struct TimetableSink {
    client: Arc<HomeAssistantClient>,
    entity_id: String,
    friendly_name: String,
}

impl TimetableSink {
    pub fn new(
        client: Arc<HomeAssistantClient>,
        user_id: &str,
        friendly_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            entity_id: format!("sensor.sdui_timetable_{}", slugify(user_id)),
            friendly_name: friendly_name.into(),
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn decorate(&self, mut attributes: Value) -> Value {
        if let Value::Object(map) = &mut attributes {
            map.insert("friendly_name".to_string(), json!(self.friendly_name));
            map.insert("icon".to_string(), json!(SENSOR_ICON));
        }
        attributes
    }
}

/// HA entity ids allow lowercase alphanumerics and underscores only.
fn slugify(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl StateSink for TimetableSink {
    async fn publish(&self, state: &str, attributes: Value) -> anyhow::Result<()> {
        info!("📤 [SINK] {} = '{}'", self.entity_id, state);
        self.client
            .set_state(&self.entity_id, state, self.decorate(attributes))
            .await?;
        Ok(())
    }

    async fn mark_unavailable(&self) -> anyhow::Result<()> {
        info!("⚠️ [SINK] Marking {} unavailable", self.entity_id);
        self.client
            .set_state(&self.entity_id, STATE_UNAVAILABLE, self.decorate(json!({})))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Home Assistant state API"
    }
}
