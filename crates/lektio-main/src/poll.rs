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

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info};

use lektio_core::{StateSink, TimetableProjector, TimetableSource};

/// Run the poll loop forever: one cycle per interval tick.
///
/// A failed cycle never ends the loop; the entity is marked unavailable and
/// the next tick tries again.
pub async fn run_poll_loop(
    source: &dyn TimetableSource,
    projector: &TimetableProjector,
    sink: &dyn StateSink,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        run_cycle(source, projector, sink).await;
    }
}

/// One poll cycle: fetch today's lessons, project, publish.
///
/// On any fetch failure the projector is not invoked; the sink is told to
/// mark the entity unavailable instead.
pub async fn run_cycle(
    source: &dyn TimetableSource,
    projector: &TimetableProjector,
    sink: &dyn StateSink,
) {
    let today = Utc::now().with_timezone(&projector.timezone()).date_naive();
    debug!("🔄 Poll cycle for {} via {}", today, source.name());

    match source.fetch_day(today).await {
        Ok(records) => {
            let projection = projector.project_records(&records);
            info!("📅 {}: {}", today, projection.summary);

            if let Err(e) = sink
                .publish(&projection.summary, projection.state_attributes())
                .await
            {
                error!("❌ Failed to publish timetable state: {:#}", e);
            }
        }
        Err(e) => {
            error!("❌ Error fetching data from SDUI API: {:#}", e);
            if let Err(e) = sink.mark_unavailable().await {
                error!("❌ Failed to mark entity unavailable: {:#}", e);
            }
        }
    }
}
