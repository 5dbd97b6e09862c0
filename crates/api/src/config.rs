//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Folio API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `ADMIN_EMAIL`: Email address of the site administrator (required)
//! - `ADMIN_PASSWORD_HASH`: Argon2 PHC hash of the admin password (required)
//! - `SESSION_TTL_MINUTES`: Lifetime of an admin session (default: 720)
//! - `SCHEDULE_TIMEZONE`: IANA zone the meeting slots are offered in (default: "America/Los_Angeles")
//! - `SCHEDULE_DAY_START` / `SCHEDULE_DAY_END`: First and last slot, `HH:MM` (default: 09:00 / 17:00)
//! - `SCHEDULE_SLOT_MINUTES`: Slot length and spacing (default: 30)
//! - `CALENDAR_API_URL`, `CALENDAR_API_TOKEN`, `CALENDAR_TIMEOUT_SECONDS`: External calendar
//!   service; when unset, bookings are stored as appointments in the database

use chrono::Duration;
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use folio_calendar::config::CalendarConfig;
use folio_core::models::schedule::{SlotCatalog, TimeSlot};
use std::env;
use tracing::Level;

/// Longest admin session accepted from configuration: 30 days.
const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Configuration for the Folio API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// The single account allowed into the admin panel
    pub admin: AdminCredentials,

    /// Admin session lifetime in minutes
    pub session_ttl_minutes: i64,

    /// Meeting slot catalog and time zone
    pub schedule: ScheduleSettings,

    /// External calendar service, if one is used
    pub calendar: Option<CalendarConfig>,
}

/// Admin sign-in credentials.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2 hash in PHC string format
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Which slots are offered and how they map to absolute time.
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub time_zone: Tz,
    pub catalog: SlotCatalog,
    pub slot_minutes: u32,
}

impl ScheduleSettings {
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_minutes as i64)
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::Los_Angeles,
            catalog: SlotCatalog::default(),
            slot_minutes: 30,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `DATABASE_URL`, `ADMIN_EMAIL` or `ADMIN_PASSWORD_HASH` is not set
    /// - `API_PORT` cannot be parsed as a u16
    /// - a schedule setting is malformed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Admin settings
        let admin = AdminCredentials {
            email: env::var("ADMIN_EMAIL").wrap_err("ADMIN_EMAIL environment variable must be set")?,
            password_hash: env::var("ADMIN_PASSWORD_HASH")
                .wrap_err("ADMIN_PASSWORD_HASH environment variable must be set")?,
        };
        let session_ttl_minutes = parse_session_ttl(
            &env::var("SESSION_TTL_MINUTES").unwrap_or_else(|_| "720".to_string()),
        )?;

        // Scheduling settings
        let schedule = ScheduleSettings::from_parts(
            &env::var("SCHEDULE_TIMEZONE").unwrap_or_else(|_| "America/Los_Angeles".to_string()),
            &env::var("SCHEDULE_DAY_START").unwrap_or_else(|_| "09:00".to_string()),
            &env::var("SCHEDULE_DAY_END").unwrap_or_else(|_| "17:00".to_string()),
            &env::var("SCHEDULE_SLOT_MINUTES").unwrap_or_else(|_| "30".to_string()),
        )?;

        let calendar = CalendarConfig::from_env()?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            admin,
            session_ttl_minutes,
            schedule,
            calendar,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ScheduleSettings {
    /// Builds settings from their textual configuration values.
    pub fn from_parts(time_zone: &str, day_start: &str, day_end: &str, slot_minutes: &str) -> Result<Self> {
        let time_zone: Tz = time_zone
            .parse()
            .map_err(|e| eyre!("Invalid SCHEDULE_TIMEZONE '{}': {}", time_zone, e))?;
        let start: TimeSlot = day_start
            .parse()
            .map_err(|e| eyre!("Invalid SCHEDULE_DAY_START: {}", e))?;
        let end: TimeSlot = day_end
            .parse()
            .map_err(|e| eyre!("Invalid SCHEDULE_DAY_END: {}", e))?;
        let slot_minutes: u32 = slot_minutes
            .parse()
            .wrap_err("Invalid SCHEDULE_SLOT_MINUTES value")?;

        let catalog = SlotCatalog::between(start, end, slot_minutes)
            .map_err(|e| eyre!("Invalid schedule window: {}", e))?;

        Ok(Self {
            time_zone,
            catalog,
            slot_minutes,
        })
    }
}

/// Parses `SESSION_TTL_MINUTES`, which must be between one minute and 30 days.
fn parse_session_ttl(value: &str) -> Result<i64> {
    let minutes: i64 = value
        .trim()
        .parse()
        .wrap_err("Invalid SESSION_TTL_MINUTES value")?;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        return Err(eyre!(
            "SESSION_TTL_MINUTES must be between 1 and {}, got {}",
            MAX_SESSION_TTL_MINUTES,
            minutes
        ));
    }
    Ok(minutes)
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
