use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub registration: RegistrationConfig,
    pub notification: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = RegistrationConfig::default();
        let registration = RegistrationConfig {
            redirect_path: env::var("REGISTRATION_REDIRECT_PATH")
                .unwrap_or(defaults.redirect_path),
            success_redirect_delay: seconds_var(
                "REGISTRATION_SUCCESS_REDIRECT_SECS",
                defaults.success_redirect_delay,
            )?,
            failure_redirect_delay: seconds_var(
                "REGISTRATION_FAILURE_REDIRECT_SECS",
                defaults.failure_redirect_delay,
            )?,
            mask_delivery_failures: flag_var(
                "REGISTRATION_MASK_DELIVERY_FAILURES",
                defaults.mask_delivery_failures,
            )?,
            idle_timeout: seconds_var("REGISTRATION_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
        };

        let notification = NotificationConfig {
            webhook_url: env::var("NOTIFICATION_WEBHOOK_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            admin_email: env::var("NOTIFICATION_ADMIN_EMAIL")
                .unwrap_or_else(|_| NotificationConfig::DEFAULT_ADMIN_EMAIL.to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            registration,
            notification,
        })
    }
}

fn seconds_var(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(default),
    }
}

fn flag_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name }),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Behavior of the registration wizard once a submission completes.
///
/// `mask_delivery_failures` keeps the historical behavior of reporting
/// success to the visitor even when the notification could not be sent.
/// Sessions untouched for `idle_timeout` are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConfig {
    pub redirect_path: String,
    pub success_redirect_delay: Duration,
    pub failure_redirect_delay: Duration,
    pub mask_delivery_failures: bool,
    pub idle_timeout: Duration,
}

impl RegistrationConfig {
    /// How often idle sessions are looked for: a quarter of the timeout, at least once a second.
    pub fn idle_sweep_interval(&self) -> Duration {
        (self.idle_timeout / 4).max(Duration::from_secs(1))
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            redirect_path: "/itacademy".to_string(),
            success_redirect_delay: Duration::from_secs(4),
            failure_redirect_delay: Duration::from_secs(3),
            mask_delivery_failures: true,
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Outbound notification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub admin_email: String,
}

impl NotificationConfig {
    pub const DEFAULT_ADMIN_EMAIL: &'static str = "admissions@itacademy.example";
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
    InvalidFlag { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must be a whole number of seconds")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be one of true/false/1/0/yes/no/on/off")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
