use super::{SupabaseClient, SupabaseError};
use crate::mapper;
use crate::models::alert_view::AlertViewModel;
use crate::models::raw_alert::RawAlertRecord;
use tracing::debug;

impl SupabaseClient {
    /// Queries the verified-alerts table, newest first. Row order comes from
    /// the backend and is preserved all the way to the view-models.
    pub async fn fetch_verified_alerts(&self) -> Result<Vec<RawAlertRecord>, SupabaseError> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.alerts_table);
        let response = self
            .http
            .get(&url)
            .query(&[("select", "*"), ("order", "timestamp.desc")])
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let rows: Vec<RawAlertRecord> = serde_json::from_str(&body)?;
        debug!("Fetched {} verified alert rows", rows.len());
        Ok(rows)
    }

    /// Fetches and maps the whole feed. Failure is reported to the caller
    /// instead of being collapsed into an empty list, so "no alerts" and
    /// "backend unreachable" stay distinguishable; the rendering edge decides
    /// how to show either.
    pub async fn fetch_alert_feed(&self) -> Result<Vec<AlertViewModel>, SupabaseError> {
        let rows = self.fetch_verified_alerts().await?;
        let locator = self.storage();
        Ok(mapper::map_alerts(&rows, &locator))
    }
}
