//! Background scheduler for the periodic auto-backup.
//!
//! Wakes on the configured check interval. A backup runs when the user enabled
//! auto-backup, their `intervalMinutes` has elapsed since the last attempt, and
//! the document changed since the last backup.

use std::sync::Arc;

use serde_json::json;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::events::{ServerEvent, BACKUP_COMPLETE, BACKUP_ERROR};
use crate::main_lib::AppState;

/// Delay before the first check, to let the server finish starting.
const INITIAL_DELAY_SECS: u64 = 30;

pub fn start_auto_backup_scheduler(state: Arc<AppState>, check_every: Duration) {
    tokio::spawn(async move {
        info!("Auto-backup scheduler started (checking every {:?})", check_every);
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(check_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_attempt: Option<Instant> = None;

        loop {
            ticker.tick().await;
            let settings = match state.settings_service.get_settings() {
                Ok(settings) => settings.auto_backup,
                Err(e) => {
                    warn!("Auto-backup skipped, settings unavailable: {}", e);
                    continue;
                }
            };
            let period = Duration::from_secs(u64::from(settings.interval_minutes) * 60);
            if !is_due(settings.enabled, last_attempt, Instant::now(), period) {
                continue;
            }
            last_attempt = Some(Instant::now());
            run_auto_backup(&state).await;
        }
    });
}

fn is_due(enabled: bool, last_attempt: Option<Instant>, now: Instant, period: Duration) -> bool {
    enabled && last_attempt.map_or(true, |last| now.duration_since(last) >= period)
}

/// Runs one auto-backup attempt and reports the outcome on the event bus.
pub async fn run_auto_backup(state: &AppState) {
    match state.backup_service.backup_if_changed().await {
        Ok(Some(receipt)) => {
            info!("Auto-backup uploaded revision {}", receipt.revision);
            state.event_bus.publish(ServerEvent::with_payload(
                BACKUP_COMPLETE,
                serde_json::to_value(&receipt).unwrap_or_default(),
            ));
        }
        Ok(None) => debug!("Auto-backup skipped: no changes since last backup"),
        Err(e) => {
            warn!("Auto-backup failed: {}", e);
            state.event_bus.publish(ServerEvent::with_payload(
                BACKUP_ERROR,
                json!({ "message": e.to_string() }),
            ));
        }
    }
}
