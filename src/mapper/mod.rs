use crate::models::alert_view::{AlertTier, AlertViewModel};
use crate::models::raw_alert::{AlertMetadata, DetectionDetails, RawAlertRecord};
use chrono::Utc;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Folder inside the storage bucket that holds verified-alert snapshots.
pub const IMAGE_PATH_PREFIX: &str = "verified_alerts/images";

const DEFAULT_TITLE: &str = "Crime Detection Alert";
const DEFAULT_DESCRIPTION: &str = "Alert detected by system";
const LOCATION_LABEL: &str = "Detection Zone";
const STATUS_VERIFIED: &str = "verified";

/// Resolves a storage path to a public URL. Returning `None` means the image
/// cannot be located; the record is still mapped, with an empty `image_url`.
pub trait ImageLocator {
    fn public_url(&self, path: &str) -> Option<String>;
}

/// Maps a batch of raw rows to view-models. Output length and order match
/// the input; a malformed row degrades to defaults instead of being dropped.
pub fn map_alerts(rows: &[RawAlertRecord], locator: &dyn ImageLocator) -> Vec<AlertViewModel> {
    rows.iter().map(|row| map_alert(row, locator)).collect()
}

pub fn map_alert(row: &RawAlertRecord, locator: &dyn ImageLocator) -> AlertViewModel {
    let metadata = extract_metadata(row.metadata.as_ref());

    let title = metadata
        .alert_type
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| row.alert_type.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let description = build_description(metadata.detection_details.as_ref());

    // Image resolution only applies to rows that carry an alert_id; the
    // stored snapshot is keyed by it when metadata names no file.
    let image_url = match row.alert_id.as_deref().filter(|s| !s.is_empty()) {
        Some(alert_id) => {
            let filename = metadata
                .image_file
                .as_deref()
                .map(strip_directories)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.jpg", alert_id));
            let path = format!("{}/{}", IMAGE_PATH_PREFIX, filename);
            locator.public_url(&path).unwrap_or_default()
        }
        None => String::new(),
    };

    let timestamp = row
        .timestamp
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| row.created_at.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let id = row
        .id
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| row.alert_id.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| fallback_id(&timestamp, &title, row.threat_score));

    AlertViewModel {
        id,
        tier: AlertTier::from_threat_score(row.threat_score),
        title,
        location: LOCATION_LABEL.to_string(),
        timestamp,
        description,
        status: STATUS_VERIFIED.to_string(),
        confidence: row.confidence.unwrap_or(0.0),
        threat_score: row.threat_score.unwrap_or(0.0),
        weapons_detected: row.weapons_detected.unwrap_or(0),
        image_base64: row.image_base64.clone().unwrap_or_default(),
        image_url,
    }
}

/// `metadata` may be a JSON-encoded string, an object, or absent. Anything
/// that does not coerce cleanly degrades to the empty metadata record.
fn extract_metadata(raw: Option<&Value>) -> AlertMetadata {
    match raw {
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_else(|e| {
            warn!("Failed to parse alert metadata: {}", e);
            AlertMetadata::default()
        }),
        Some(v @ Value::Object(_)) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
            warn!("Failed to parse alert metadata: {}", e);
            AlertMetadata::default()
        }),
        _ => AlertMetadata::default(),
    }
}

/// Joined sub-score summary in fixed order. A field present with value zero
/// is still listed; only absent fields are skipped.
fn build_description(details: Option<&DetectionDetails>) -> String {
    match details {
        Some(DetectionDetails::Scores(scores)) => {
            let mut parts = Vec::new();
            if let Some(w) = scores.weapons_detected {
                parts.push(format!("Weapons: {}", w));
            }
            if let Some(v) = scores.crime_score {
                parts.push(format!("Crime Score: {:.1}%", v * 100.0));
            }
            if let Some(v) = scores.motion_score {
                parts.push(format!("Motion Score: {:.1}%", v * 100.0));
            }
            if let Some(v) = scores.cluster_score {
                parts.push(format!("Cluster Score: {:.1}%", v * 100.0));
            }
            if parts.is_empty() {
                DEFAULT_DESCRIPTION.to_string()
            } else {
                parts.join(", ")
            }
        }
        Some(DetectionDetails::Text(text)) => text.clone(),
        None => DEFAULT_DESCRIPTION.to_string(),
    }
}

/// Keeps only the trailing filename, dropping any `/` or `\` directory parts.
fn strip_directories(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Stable id for rows that carry neither `id` nor `alert_id`: a v5 UUID over
/// the fields we do have. Good enough for disposable UI keys, not meant to be
/// collision-proof for persistence.
fn fallback_id(timestamp: &str, title: &str, threat_score: Option<f64>) -> String {
    let seed = format!("{}|{}|{}", timestamp, title, threat_score.unwrap_or(0.0));
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
}
