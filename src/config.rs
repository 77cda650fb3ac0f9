use std::env;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_api: String,
    pub database_url: String,
    pub admin_name: String,
    pub admin_password: String,
    pub utc_offset_minutes: i32,
    pub telegram_bot_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            backend_api: env::var("BACKEND_API")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://appointment-system-iw83.onrender.com".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "clinic.db".to_string()),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "1234".to_string()),
            // Asia/Riyadh, no DST
            utc_offset_minutes: env::var("CLINIC_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(180),
            telegram_bot_url: env::var("TELEGRAM_BOT_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Offset used when showing appointment times. Out-of-range values fall back to UTC.
    pub fn clinic_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}
