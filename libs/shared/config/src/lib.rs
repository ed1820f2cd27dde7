use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Slot length used when a query does not ask for one. Defaults to the
    /// 50-minute therapy hour.
    pub default_slot_duration_minutes: u32,
    /// IANA timezone applied when a location has none configured.
    pub default_timezone: String,
    /// How long a notified waitlist client has to respond before the entry
    /// expires.
    pub waitlist_response_window_hours: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            default_slot_duration_minutes: env::var("DEFAULT_SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("DEFAULT_SLOT_DURATION_MINUTES not set or invalid, using 50");
                    50
                }),
            default_timezone: env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| {
                warn!("DEFAULT_TIMEZONE not set, using UTC");
                "UTC".to_string()
            }),
            waitlist_response_window_hours: env::var("WAITLIST_RESPONSE_WINDOW_HOURS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("WAITLIST_RESPONSE_WINDOW_HOURS not set or invalid, using 24");
                    24
                }),
        };

        if !config.is_configured() {
            warn!("Scheduling engine not fully configured - check environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.default_slot_duration_minutes > 0
            && !self.default_timezone.is_empty()
            && self.waitlist_response_window_hours > 0
    }
}
