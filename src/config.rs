use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

pub const DEFAULT_BANNER: &str = "TEDx PIEAS Registration Backend is Running!";
pub const DEFAULT_LOG_FILTER: &str = "event_registration=debug,axum=info,tower_http=info";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which set of form field names the intake accepts. Both shapes are live
/// deployments of the same form; the choice is fixed for the lifetime of a
/// content root because it decides the log header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    /// Capitalised field names, front and back CNIC images.
    Dual,
    /// Lowercase field names, a single CNIC image.
    Single,
}

impl FromStr for FormVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dual" | "two" | "front_back" => Ok(Self::Dual),
            "single" | "one" => Ok(Self::Single),
            other => anyhow::bail!("unknown FORM_VARIANT {other:?} (expected \"dual\" or \"single\")"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub content_root: PathBuf,
}

impl StorageConfig {
    pub fn uploads_dir(&self) -> PathBuf {
        self.content_root.join("uploads")
    }

    pub fn log_path(&self) -> PathBuf {
        self.content_root.join("registrations.csv")
    }

    pub fn export_path(&self) -> PathBuf {
        self.content_root.join("registrations.xlsx")
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `RUST_LOG` directive string.
    pub filter: String,
    /// `LOG_FORMAT=json`
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub variant: FormVariant,
    pub max_upload_bytes: usize,
    pub banner: String,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("APP_PORT")
            .map(|v| v.parse::<u16>().context("invalid APP_PORT"))
            .transpose()?
            .unwrap_or(8080);
        let variant = lookup("FORM_VARIANT")
            .map(|v| v.parse::<FormVariant>())
            .transpose()?
            .unwrap_or(FormVariant::Dual);
        let max_upload_bytes = lookup("MAX_UPLOAD_BYTES")
            .map(|v| v.parse::<usize>().context("invalid MAX_UPLOAD_BYTES"))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let config = Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            storage: StorageConfig {
                content_root: lookup("DATA_DIR").unwrap_or_else(|| "data".into()).into(),
            },
            variant,
            max_upload_bytes,
            banner: lookup("APP_BANNER").unwrap_or_else(|| DEFAULT_BANNER.into()),
            logging: LoggingConfig {
                filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
                json: lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("APP_PORT must be greater than 0");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than 0");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Config rooted at `content_root` with every other knob at its default.
    pub fn for_content_root(content_root: impl Into<PathBuf>, variant: FormVariant) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            storage: StorageConfig {
                content_root: content_root.into(),
            },
            variant,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            banner: DEFAULT_BANNER.into(),
            logging: LoggingConfig::default(),
        }
    }
}
