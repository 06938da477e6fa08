//! Configuration module
//!
//! Configuration is read once at startup from the process environment (a `.env`
//! file is honoured when present) into an explicit [`Config`] value, which is then
//! validated. Missing credentials are a fatal startup error.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_VIDEO_SIZE_MB: usize = 500;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    // Media sink (Cloudinary) credentials
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub cloudinary_api_base: String,
    pub cloudinary_upload_folder: Option<String>,
    /// 0 = no timeout
    pub cloudinary_timeout_secs: u64,
    // Document store
    pub store_connection_uri: String,
    pub db_max_connections: u32,
    // HTTP
    pub listen_port: u16,
    pub max_video_size_bytes: usize,
    /// Delete the remote object when the record write fails after a successful upload.
    pub orphan_cleanup_enabled: bool,
    pub log_format: LogFormat,
    pub environment: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[redacted]")
            .field("cloudinary_api_base", &self.cloudinary_api_base)
            .field("cloudinary_upload_folder", &self.cloudinary_upload_folder)
            .field("cloudinary_timeout_secs", &self.cloudinary_timeout_secs)
            .field("store_connection_uri", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("listen_port", &self.listen_port)
            .field("max_video_size_bytes", &self.max_video_size_bytes)
            .field("orphan_cleanup_enabled", &self.orphan_cleanup_enabled)
            .field("log_format", &self.log_format)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Required values that are absent are reported together in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };
        let cloud_name = required("CLOUDINARY_NAME");
        let api_key = required("CLOUDINARY_API_KEY");
        let api_secret = required("CLOUDINARY_API_SECRET");
        let store_connection_uri = required("DATABASE_URL");

        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required configuration: {}",
                missing.join(", ")
            ));
        }

        let listen_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid SERVER_PORT '{}': {}", v, e))?,
            None => DEFAULT_SERVER_PORT,
        };

        let max_video_size_mb = get("MAX_VIDEO_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB);

        let db_max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        let cloudinary_timeout_secs = get("CLOUDINARY_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let orphan_cleanup_enabled = get("ORPHAN_CLEANUP_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let log_format = match get("LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        Ok(Config {
            cloud_name,
            api_key,
            api_secret,
            cloudinary_api_base: get("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string()),
            cloudinary_upload_folder: get("CLOUDINARY_UPLOAD_FOLDER"),
            cloudinary_timeout_secs,
            store_connection_uri,
            db_max_connections,
            listen_port,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            orphan_cleanup_enabled,
            log_format,
            environment,
        })
    }

    /// Check values that parse fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, value) in [
            ("CLOUDINARY_NAME", &self.cloud_name),
            ("CLOUDINARY_API_KEY", &self.api_key),
            ("CLOUDINARY_API_SECRET", &self.api_secret),
            ("DATABASE_URL", &self.store_connection_uri),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} cannot be empty", name));
            }
        }

        if self.listen_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT cannot be 0"));
        }

        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB cannot be 0"));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        if !(self.store_connection_uri.starts_with("postgres://")
            || self.store_connection_uri.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a postgres:// or postgresql:// connection string"
            ));
        }

        if !(self.cloudinary_api_base.starts_with("http://")
            || self.cloudinary_api_base.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_API_BASE must be an http(s) URL"
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
