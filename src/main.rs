use tracing::{info, warn};
use vigilia_alerts::config::AppConfig;
use vigilia_alerts::feed;
use vigilia_alerts::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting Vigilia Alerts feed service...");

    let mut client = SupabaseClient::new(&config)?;

    // Optional dashboard sign-in; without it the feed runs under the
    // anonymous key and row-level security decides what is visible.
    if !config.dashboard_email.is_empty() {
        match client
            .sign_in(&config.dashboard_email, &config.dashboard_password)
            .await
        {
            Ok(session) => {
                info!(
                    "Signed in as {}",
                    session.user.email.as_deref().unwrap_or(&session.user.id)
                );
                client.set_access_token(session.access_token);
            }
            Err(e) => warn!("Sign-in failed, continuing anonymously: {}", e),
        }
    }

    feed::run(&config, client).await?;

    Ok(())
}
