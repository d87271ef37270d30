use crate::config::AppConfig;
use crate::models::alert_view::AlertViewModel;
use crate::supabase::SupabaseClient;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

/// Periodically fetches the verified-alert feed and renders each alert as a
/// log line. A failed fetch renders an empty feed with a warning; the tagged
/// error stays available to programmatic callers of `fetch_alert_feed`.
pub async fn run(config: &AppConfig, client: SupabaseClient) -> anyhow::Result<()> {
    let interval = Duration::from_secs(config.poll_interval_secs.max(1));
    info!(
        "Polling verified alerts every {}s from table '{}'",
        interval.as_secs(),
        config.alerts_table
    );

    loop {
        match client.fetch_alert_feed().await {
            Ok(alerts) => {
                info!("Fetched {} verified alerts", alerts.len());
                for alert in &alerts {
                    log_alert_card(alert);
                }
            }
            Err(e) => {
                warn!("Alert feed fetch failed, rendering empty feed: {}", e);
            }
        }

        tokio::time::sleep(interval).await;
    }
}

fn log_alert_card(alert: &AlertViewModel) {
    let recent = if is_recent(&alert.timestamp, Utc::now()) {
        " [RECENT]"
    } else {
        ""
    };
    let image = match alert.image_source() {
        Some(src) if src.starts_with("data:") => "embedded image",
        Some(_) => "stored image",
        None => "no image",
    };
    info!(
        "#{} {} [{}]{} | {} | weapons: {} | {} | {}",
        alert.id,
        alert.title,
        alert.tier,
        recent,
        format_card_timestamp(&alert.timestamp),
        alert.weapons_detected,
        alert.description,
        image
    );
}

/// Card timestamp format: dd/mm/yyyy HH:MM:SS. Rows store either RFC 3339 or
/// a bare date-time; anything else is shown as-is.
fn format_card_timestamp(timestamp: &str) -> String {
    if let Ok(t) = DateTime::parse_from_rfc3339(timestamp) {
        return t.format("%d/%m/%Y %H:%M:%S").to_string();
    }
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        Ok(t) => t.format("%d/%m/%Y %H:%M:%S").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// An alert counts as recent within one hour of its timestamp.
fn is_recent(timestamp: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => now.signed_duration_since(t.with_timezone(&Utc)) < chrono::Duration::hours(1),
        Err(_) => false,
    }
}
