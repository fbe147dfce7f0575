use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::directory::alignment::{AlignmentConfig, ConfidencePolicy};
use crate::directory::service::DEFAULT_MAX_PAGE_SIZE;

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
    pub directory: DirectoryConfig,
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

        let seed_csv = env::var("DIRECTORY_SEED_CSV")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let max_page_size = match env::var("DIRECTORY_MAX_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize)?,
            Err(_) => DEFAULT_MAX_PAGE_SIZE,
        };
        let alignment = match env::var("ALIGNMENT_CONFIDENCE_POLICY") {
            Ok(raw) => parse_confidence_policy(&raw)?,
            Err(_) => AlignmentConfig::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            directory: DirectoryConfig {
                seed_csv,
                max_page_size,
                alignment,
            },
        })
    }
}

fn parse_confidence_policy(raw: &str) -> Result<AlignmentConfig, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "split" => Ok(AlignmentConfig::default()),
        "flat" => Ok(AlignmentConfig::uniform(ConfidencePolicy::flat_penalty())),
        "multiplicative" => Ok(AlignmentConfig::uniform(ConfidencePolicy::multiplicative())),
        other => Err(ConfigError::InvalidConfidencePolicy(other.to_string())),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Directory seeding, paging and scoring policy.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub seed_csv: Option<PathBuf>,
    pub max_page_size: usize,
    pub alignment: AlignmentConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPageSize,
    InvalidConfidencePolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "DIRECTORY_MAX_PAGE_SIZE must be a positive integer")
            }
            ConfigError::InvalidConfidencePolicy(value) => write!(
                f,
                "ALIGNMENT_CONFIDENCE_POLICY must be split, flat or multiplicative (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPageSize
            | ConfigError::InvalidConfidencePolicy(_) => None,
        }
    }
}
