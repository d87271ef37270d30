use crate::config::AppConfig;
use std::time::Duration;
use thiserror::Error;

pub mod auth;
pub mod rest;
pub mod storage;

/// Everything that can go wrong talking to the hosted backend. Nothing here
/// is fatal to the service and nothing is retried.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("supabase is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")]
    NotConfigured,
    #[error("request to supabase failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("supabase responded with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed supabase response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("email confirmation required before signing in")]
    ConfirmationRequired,
}

/// Shared handle for the three hosted services this dashboard talks to:
/// the row API (PostgREST), object storage and the identity API (GoTrue).
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    alerts_table: String,
    storage_bucket: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self, SupabaseError> {
        if config.supabase_url.is_empty() || config.supabase_anon_key.is_empty() {
            return Err(SupabaseError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            alerts_table: config.alerts_table.clone(),
            storage_bucket: config.storage_bucket.clone(),
            access_token: None,
        })
    }

    /// Use a signed-in session for subsequent row-API requests. Without one,
    /// requests go out under the anonymous key and row-level security decides
    /// what is visible.
    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    pub(crate) fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}
