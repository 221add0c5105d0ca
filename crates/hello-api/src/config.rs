//! Configuration loading and validation.
//!
//! Sources are layered: built-in defaults, then the named config file(s) in
//! order (later files win, missing files are skipped), then environment
//! variables (`APP__PORT`, `DATABASE__HOST`, …), then — when `PLATFORM_CONFIG`
//! points at a managed-platform JSON document — an override for database and
//! telemetry-export settings. The snapshot is loaded once at startup and
//! read-only thereafter; any invalid value aborts the process with a clear
//! error message.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable holding the path to the managed-platform JSON config.
pub const PLATFORM_CONFIG_VAR: &str = "PLATFORM_CONFIG";

/// Validated service configuration snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub app: AppConfig,
    /// Main database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logger settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Optional log/trace export settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP port of the API service.
    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Main database hostname.
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Main database port.
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Main database name.
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Main database username.
    #[serde(default = "default_db_user")]
    pub user: String,
    /// Main database password; empty means connect without one.
    #[serde(default)]
    pub password: String,
    /// Upper bound on simultaneous live pool connections.
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Logger level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Statement-level database log filter; `off` disables the pool log hook.
    #[serde(default = "default_db_log_level")]
    pub database_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP endpoint for span/log export; export is disabled when absent.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_app_port() -> u16 {
    8000
}
fn default_db_host() -> String {
    "localhost".into()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_name() -> String {
    "hellos".into()
}
fn default_db_user() -> String {
    "postgres".into()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_log_level() -> String {
    "info".into()
}
fn default_db_log_level() -> String {
    "off".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_app_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            name: default_db_name(),
            user: default_db_user(),
            password: String::new(),
            max_connections: default_db_max_connections(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            database_level: default_db_log_level(),
        }
    }
}

/// Managed-platform override document (see [`PLATFORM_CONFIG_VAR`]).
///
/// When the platform provisions the service it hands over database
/// credentials and an export endpoint; those take precedence over both files
/// and environment variables.
#[derive(Debug, Deserialize)]
struct PlatformConfig {
    #[serde(default)]
    database: Option<PlatformDatabase>,
    #[serde(default)]
    telemetry: Option<PlatformTelemetry>,
}

#[derive(Debug, Deserialize)]
struct PlatformDatabase {
    hostname: String,
    port: u16,
    name: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PlatformTelemetry {
    otlp_endpoint: Option<String>,
}

impl Config {
    /// Load and validate configuration from the given file stems plus the
    /// environment and the optional platform override.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed, or if the
    /// resulting snapshot fails validation.
    pub fn load(files: &[&str]) -> Result<Self> {
        let mut builder = config::Config::builder();
        for file in files {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }
        let raw = builder
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("failed to build configuration")?;

        let mut cfg: Config = raw
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        cfg.apply_platform_override()
            .context("failed to apply platform configuration override")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Merge the managed-platform document over database/telemetry settings.
    fn apply_platform_override(&mut self) -> Result<()> {
        let Ok(path) = std::env::var(PLATFORM_CONFIG_VAR) else {
            return Ok(());
        };
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read platform config at {path}"))?;
        let platform: PlatformConfig = serde_json::from_str(&contents)
            .with_context(|| format!("cannot parse platform config at {path}"))?;

        if let Some(db) = platform.database {
            self.database.host = db.hostname;
            self.database.port = db.port;
            self.database.name = db.name;
            self.database.user = db.username;
            self.database.password = db.password;
        }
        if let Some(telemetry) = platform.telemetry {
            if telemetry.otlp_endpoint.is_some() {
                self.telemetry.otlp_endpoint = telemetry.otlp_endpoint;
            }
        }
        Ok(())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.app.port == 0 {
            anyhow::bail!("APP__PORT must be non-zero");
        }
        ensure_non_empty(&self.database.host, "DATABASE__HOST")?;
        ensure_non_empty(&self.database.name, "DATABASE__NAME")?;
        ensure_non_empty(&self.database.user, "DATABASE__USER")?;
        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE__MAX_CONNECTIONS must be > 0");
        }
        self.logging
            .database_level
            .parse::<log::LevelFilter>()
            .map_err(|_| {
                anyhow::anyhow!(
                    "LOGGING__DATABASE_LEVEL is not a valid level: {}",
                    self.logging.database_level
                )
            })?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
