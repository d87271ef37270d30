use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One row of the verified-alerts table as the backend returns it.
///
/// Column types are not trusted: numeric columns arrive as numbers or as
/// strings depending on how the row was ingested, and `metadata` is either a
/// JSON-encoded string or an already-parsed object. Everything lands as an
/// `Option` here and is coerced to defaults by the mapper.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAlertRecord {
    #[serde(default, deserialize_with = "de_lossy_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_lossy_string")]
    pub alert_id: Option<String>,
    pub timestamp: Option<String>,
    pub created_at: Option<String>,
    pub alert_type: Option<String>,
    #[serde(default, deserialize_with = "de_lossy_f64")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "de_lossy_f64")]
    pub threat_score: Option<f64>,
    #[serde(default, deserialize_with = "de_lossy_count")]
    pub weapons_detected: Option<u32>,
    pub image_base64: Option<String>,
    pub metadata: Option<Value>,
}

/// The strict shape the mapper coerces `metadata` into.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertMetadata {
    pub alert_type: Option<String>,
    pub image_file: Option<String>,
    #[serde(default, deserialize_with = "de_detection_details")]
    pub detection_details: Option<DetectionDetails>,
}

/// `detection_details` carries either per-signal scores or free text.
#[derive(Debug, Clone)]
pub enum DetectionDetails {
    Scores(DetectionScores),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionScores {
    #[serde(default, deserialize_with = "de_lossy_count")]
    pub weapons_detected: Option<u32>,
    #[serde(default, deserialize_with = "de_lossy_f64")]
    pub crime_score: Option<f64>,
    #[serde(default, deserialize_with = "de_lossy_f64")]
    pub motion_score: Option<f64>,
    #[serde(default, deserialize_with = "de_lossy_f64")]
    pub cluster_score: Option<f64>,
}

fn de_lossy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a number or a numeric string; anything else coerces to `None`
/// rather than failing the row.
fn de_lossy_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Like `de_lossy_f64` but for counts: truncates, clamps negatives to zero.
fn de_lossy_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Value> = Option::deserialize(deserializer)?;
    let n = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.map(|f| if f.is_finite() && f > 0.0 { f as u32 } else { 0 }))
}

fn de_detection_details<'de, D>(deserializer: D) -> Result<Option<DetectionDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(DetectionDetails::Text(s)),
        Some(obj @ Value::Object(_)) => serde_json::from_value::<DetectionScores>(obj)
            .ok()
            .map(DetectionDetails::Scores),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_stringly_typed_row() {
        let payload = r#"
        {
            "id": 42,
            "alert_id": "CRIME_20251115_165805_658",
            "timestamp": "2025-11-15T16:58:05Z",
            "alert_type": "Weapon Detected",
            "confidence": "0.87",
            "threat_score": 0.91,
            "weapons_detected": "2",
            "image_base64": "",
            "metadata": "{\"alert_type\":\"Weapon Detected\"}"
        }
        "#;

        let row: RawAlertRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(row.id, Some("42".to_string()));
        assert_eq!(row.alert_id, Some("CRIME_20251115_165805_658".to_string()));
        assert_eq!(row.confidence, Some(0.87));
        assert_eq!(row.threat_score, Some(0.91));
        assert_eq!(row.weapons_detected, Some(2));
        assert!(matches!(row.metadata, Some(Value::String(_))));
    }

    #[test]
    fn test_garbage_numerics_coerce_to_none() {
        let payload = r#"
        {
            "alert_id": "abc123",
            "confidence": "high",
            "threat_score": null,
            "weapons_detected": "-3"
        }
        "#;

        let row: RawAlertRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(row.confidence, None);
        assert_eq!(row.threat_score, None);
        assert_eq!(row.weapons_detected, Some(0));
    }

    #[test]
    fn test_metadata_scores_accept_mixed_types() {
        let payload = r#"
        {
            "alert_type": "Crime Detection Alert",
            "image_file": "images/CRIME_1.jpg",
            "detection_details": {
                "weapons_detected": 0,
                "crime_score": "0.5",
                "motion_score": 0.231
            }
        }
        "#;

        let meta: AlertMetadata = serde_json::from_str(payload).unwrap();
        match meta.detection_details {
            Some(DetectionDetails::Scores(s)) => {
                assert_eq!(s.weapons_detected, Some(0));
                assert_eq!(s.crime_score, Some(0.5));
                assert_eq!(s.motion_score, Some(0.231));
                assert_eq!(s.cluster_score, None);
            }
            other => panic!("expected scores, got {:?}", other),
        }
    }

    #[test]
    fn test_detection_details_as_text() {
        let meta: AlertMetadata =
            serde_json::from_str(r#"{"detection_details": "Suspect seen on camera 4"}"#).unwrap();
        match meta.detection_details {
            Some(DetectionDetails::Text(t)) => assert_eq!(t, "Suspect seen on camera 4"),
            other => panic!("expected text, got {:?}", other),
        }
    }
}
