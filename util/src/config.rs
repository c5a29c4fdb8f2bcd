//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton holding
//! runtime values loaded from the environment (and an optional `.env` file).
//! Every key has a usable default so the server and the test suite start
//! without any environment at all. Tests override values through the
//! per-field setters.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

const DEV_JWT_SECRET: &str = "exam-monitor-development-secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub heartbeat_idle_seconds: u64,
    pub heartbeat_offline_seconds: u64,
    pub heartbeat_max_skew_seconds: u64,
    pub sweep_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses a numeric or boolean key, falling back to `default` when the key is
/// missing or malformed. Malformed values are reported but never fatal.
fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring malformed configuration value");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env_name = var_or("APP_ENV", "development");
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                if env_name == "production" {
                    tracing::warn!("JWT_SECRET is not set; falling back to the development secret");
                }
                DEV_JWT_SECRET.to_string()
            }
        };

        Self {
            env: env_name,
            project_name: var_or("PROJECT_NAME", "exam-monitor"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "data/exam_monitor.db"),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            jwt_secret,
            jwt_duration_minutes: parsed_or("JWT_DURATION_MINUTES", 60),
            heartbeat_idle_seconds: parsed_or("HEARTBEAT_IDLE_SECONDS", 60),
            heartbeat_offline_seconds: parsed_or("HEARTBEAT_OFFLINE_SECONDS", 180),
            heartbeat_max_skew_seconds: parsed_or("HEARTBEAT_MAX_SKEW_SECONDS", 300),
            sweep_interval_seconds: parsed_or("SWEEP_INTERVAL_SECONDS", 15),
            request_timeout_seconds: parsed_or("REQUEST_TIMEOUT_SECONDS", 30),
        }
    }

    /// Returns a read guard on the global configuration.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        // A poisoned lock still holds a complete config value.
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reloads the configuration from the environment, dropping overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(|p| p.into_inner());
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(|p| p.into_inner());
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_heartbeat_idle_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.heartbeat_idle_seconds = value);
    }

    pub fn set_heartbeat_offline_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.heartbeat_offline_seconds = value);
    }

    pub fn set_heartbeat_max_skew_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.heartbeat_max_skew_seconds = value);
    }

    pub fn set_sweep_interval_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.sweep_interval_seconds = value);
    }
}

// --- Free getters, so call sites read `config::port()` ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn heartbeat_idle_seconds() -> u64 {
    AppConfig::global().heartbeat_idle_seconds
}

pub fn heartbeat_offline_seconds() -> u64 {
    AppConfig::global().heartbeat_offline_seconds
}

pub fn heartbeat_max_skew_seconds() -> u64 {
    AppConfig::global().heartbeat_max_skew_seconds
}

pub fn sweep_interval_seconds() -> u64 {
    AppConfig::global().sweep_interval_seconds
}

pub fn request_timeout_seconds() -> u64 {
    AppConfig::global().request_timeout_seconds
}
