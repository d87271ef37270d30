use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse severity classification derived from `threat_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Info,
    Warning,
    Critical,
}

impl AlertTier {
    /// Threshold mapping: > 0.8 critical, > 0.5 warning, otherwise info.
    /// An absent score classifies as info.
    pub fn from_threat_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > 0.8 => AlertTier::Critical,
            Some(s) if s > 0.5 => AlertTier::Warning,
            _ => AlertTier::Info,
        }
    }
}

impl fmt::Display for AlertTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTier::Critical => write!(f, "critical"),
            AlertTier::Warning => write!(f, "warning"),
            AlertTier::Info => write!(f, "info"),
        }
    }
}

/// Flat, UI-ready shape of one verified alert. Derived fresh on every fetch,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertViewModel {
    pub id: String,
    pub tier: AlertTier,
    pub title: String,
    pub location: String,
    pub timestamp: String,
    pub description: String,
    pub status: String,
    pub confidence: f64,
    pub threat_score: f64,
    pub weapons_detected: u32,
    pub image_base64: String,
    pub image_url: String,
}

impl AlertViewModel {
    /// Displayable image source: an embedded base64 payload wins over the
    /// storage URL; `None` when the alert carries no image at all.
    pub fn image_source(&self) -> Option<String> {
        if !self.image_base64.is_empty() {
            Some(format!("data:image/jpeg;base64,{}", self.image_base64))
        } else if !self.image_url.is_empty() {
            Some(self.image_url.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(AlertTier::from_threat_score(Some(0.85)), AlertTier::Critical);
        assert_eq!(AlertTier::from_threat_score(Some(0.8)), AlertTier::Warning);
        assert_eq!(AlertTier::from_threat_score(Some(0.6)), AlertTier::Warning);
        assert_eq!(AlertTier::from_threat_score(Some(0.5)), AlertTier::Info);
        assert_eq!(AlertTier::from_threat_score(Some(0.3)), AlertTier::Info);
        assert_eq!(AlertTier::from_threat_score(Some(0.0)), AlertTier::Info);
        assert_eq!(AlertTier::from_threat_score(None), AlertTier::Info);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlertTier::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn test_image_source_prefers_base64() {
        let mut alert = AlertViewModel {
            id: "1".into(),
            tier: AlertTier::Info,
            title: "Crime Detection Alert".into(),
            location: "Detection Zone".into(),
            timestamp: "2025-11-15T16:58:05Z".into(),
            description: "Alert detected by system".into(),
            status: "verified".into(),
            confidence: 0.0,
            threat_score: 0.0,
            weapons_detected: 0,
            image_base64: "aGVsbG8=".into(),
            image_url: "https://cdn.example/alerts/1.jpg".into(),
        };
        assert_eq!(
            alert.image_source().as_deref(),
            Some("data:image/jpeg;base64,aGVsbG8=")
        );

        alert.image_base64.clear();
        assert_eq!(
            alert.image_source().as_deref(),
            Some("https://cdn.example/alerts/1.jpg")
        );

        alert.image_url.clear();
        assert_eq!(alert.image_source(), None);
    }
}
