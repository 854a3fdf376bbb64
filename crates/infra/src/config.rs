use subtrack_utils::create_random_secret;
use tracing::{info, warn};

const DEFAULT_DISPATCH_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret attached to every webhook delivery so that the receiving
    /// application can verify where the request came from
    pub webhook_signing_key: String,
    /// Where due reminders are delivered. When absent, reminders are
    /// computed and logged but never sent anywhere.
    pub webhook_url: Option<String>,
    /// How often the dispatch job runs. Also used as the width of the
    /// due window so that consecutive runs cover adjacent windows.
    pub dispatch_interval_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        let webhook_signing_key = match std::env::var("WEBHOOK_SIGNING_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find WEBHOOK_SIGNING_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!(
                    "Webhook signing key was generated and set to: {}",
                    key
                );
                key
            }
        };

        let webhook_url = std::env::var("REMINDER_WEBHOOK_URL").ok();
        if webhook_url.is_none() {
            warn!("REMINDER_WEBHOOK_URL is not set. Due reminders will be logged but not delivered.");
        }

        let interval = std::env::var("DISPATCH_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_DISPATCH_INTERVAL_SECS.to_string());
        let dispatch_interval_secs = match interval.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given DISPATCH_INTERVAL_SECS: {} is not valid, falling back to the default: {}.",
                    interval, DEFAULT_DISPATCH_INTERVAL_SECS
                );
                DEFAULT_DISPATCH_INTERVAL_SECS
            }
        };

        Self {
            webhook_signing_key,
            webhook_url,
            dispatch_interval_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
