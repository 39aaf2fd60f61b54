use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub forms: FormsConfig,
    pub disk: DiskConfig,
    pub documents: DocumentsConfig,
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

        let forms_api_url = env::var("FORMS_API_URL")
            .unwrap_or_else(|_| "https://api.forms.yandex.net/v1".to_string());
        let survey_id = env::var("FORMS_SURVEY_ID").unwrap_or_default();
        let oauth_token = env::var("FORMS_OAUTH_TOKEN").unwrap_or_default();
        let page_size = env::var("FORMS_PAGE_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPageSize)?;

        let disk_api_url = env::var("DISK_API_URL")
            .unwrap_or_else(|_| "https://cloud-api.yandex.net/v1/disk".to_string());
        let disk_token = env::var("DISK_TOKEN").unwrap_or_default();

        let template_dir =
            PathBuf::from(env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string()));
        let output_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            forms: FormsConfig {
                api_base_url: forms_api_url,
                survey_id,
                oauth_token,
                page_size,
            },
            disk: DiskConfig {
                api_base_url: disk_api_url,
                oauth_token: disk_token,
            },
            documents: DocumentsConfig {
                template_dir,
                output_dir,
            },
        })
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
}

/// Credentials and paging for the remote forms service.
#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub api_base_url: String,
    pub survey_id: String,
    pub oauth_token: String,
    /// Submissions fetched per lookup. The remote API caps a page at 50;
    /// older submissions are never scanned.
    pub page_size: u16,
}

/// Credentials for the cloud-disk export fallback.
#[derive(Debug, Clone)]
pub struct DiskConfig {
    pub api_base_url: String,
    pub oauth_token: String,
}

/// Where statement templates are read from and filled statements are written.
#[derive(Debug, Clone)]
pub struct DocumentsConfig {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidPageSize,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidPageSize => write!(f, "FORMS_PAGE_SIZE must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidPageSize => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FORMS_API_URL",
            "FORMS_SURVEY_ID",
            "FORMS_OAUTH_TOKEN",
            "FORMS_PAGE_SIZE",
            "DISK_API_URL",
            "DISK_TOKEN",
            "TEMPLATE_DIR",
            "OUTPUT_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.forms.page_size, 50);
        assert_eq!(config.forms.api_base_url, "https://api.forms.yandex.net/v1");
        assert_eq!(config.documents.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn rejects_non_numeric_page_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FORMS_PAGE_SIZE", "fifty");
        let error = AppConfig::load().expect_err("page size must be numeric");
        assert!(matches!(error, ConfigError::InvalidPageSize));
    }
}
