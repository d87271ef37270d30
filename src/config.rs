use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub alerts_table: String,
    pub storage_bucket: String,
    pub dashboard_email: String,
    pub dashboard_password: String,
    pub poll_interval_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL").unwrap_or_default();
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY").unwrap_or_default();
        let alerts_table =
            env::var("ALERTS_TABLE").unwrap_or_else(|_| "verified_alerts".to_string());
        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "alert-images".to_string());
        let dashboard_email = env::var("DASHBOARD_EMAIL").unwrap_or_default();
        let dashboard_password = env::var("DASHBOARD_PASSWORD").unwrap_or_default();
        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            alerts_table,
            storage_bucket,
            dashboard_email,
            dashboard_password,
            poll_interval_secs,
            log_level,
        })
    }
}
