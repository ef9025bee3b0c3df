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

mod config;
mod poll;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use lektio_core::TimetableProjector;
use lektio_ha::{HomeAssistantClient, TimetableSink};
use lektio_sdui::SduiClient;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Handle command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                println!("Lektio - SDUI timetable bridge for Home Assistant");
                println!("Version: {}", VERSION);
                println!();
                println!("Usage: lektio [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help    Print this help message");
                println!("  -v, --version Print version");
                return Ok(());
            }
            "--version" | "-v" => {
                println!("{}", VERSION);
                return Ok(());
            }
            _ => {
                // Continue to normal execution for other args or no args
            }
        }
    }

    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = AppConfig::load()?;

    info!("🚀 Starting Lektio - SDUI timetable bridge");
    info!("📋 Configuration Summary:");
    info!("   SDUI user: {}", config.sdui.user_id);
    info!("   SDUI API: {}", config.sdui.base_url);
    info!("   Sensor name: {}", config.sdui.sensor_name);
    info!(
        "   Update interval: {}s",
        config.system.update_interval_secs
    );

    // Initialize Home Assistant client
    let ha_client = if std::env::var("SUPERVISOR_TOKEN").is_ok() {
        info!("🏠 Initializing HA client using Supervisor API...");
        Arc::new(HomeAssistantClient::from_supervisor()?)
    } else {
        info!("🏠 Initializing HA client from configuration...");
        Arc::new(HomeAssistantClient::from_config(
            config.system.ha_base_url.clone(),
            config.system.ha_token.clone(),
        )?)
    };

    if !ha_client.ping().await.unwrap_or(false) {
        warn!("⚠️ Home Assistant API is not reachable yet, continuing anyway");
    }

    // Fetch timezone from Home Assistant for wall-clock rendering
    let timezone = match ha_client.get_timezone().await {
        Ok(tz_name) => match tz_name.parse::<chrono_tz::Tz>() {
            Ok(tz) => {
                info!("🌍 Using Home Assistant timezone: {}", tz_name);
                tz
            }
            Err(_) => {
                warn!(
                    "⚠️ Unknown timezone '{}', times will be displayed in UTC",
                    tz_name
                );
                chrono_tz::UTC
            }
        },
        Err(e) => {
            warn!(
                "⚠️ Failed to fetch timezone from HA ({}), times will be displayed in UTC",
                e
            );
            chrono_tz::UTC
        }
    };

    let projector = TimetableProjector::new(timezone);
    let source = SduiClient::new(
        config.sdui.base_url.clone(),
        config.sdui.user_id.clone(),
        config.sdui.token.clone(),
    )?;
    let sink = TimetableSink::new(
        ha_client,
        &config.sdui.user_id,
        config.sdui.sensor_name.clone(),
    );
    info!("📟 Publishing to entity: {}", sink.entity_id());

    info!("✅ Starting poll loop...");
    poll::run_poll_loop(&source, &projector, &sink, config.update_interval()).await
}
