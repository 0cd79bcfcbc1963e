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

/// Everything the service reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Reads the process environment, after merging an optional `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&env_or("APP_ENV", "development"));
        let server = ServerConfig::from_env()?;
        let telemetry = TelemetryConfig {
            log_level: env_or("APP_LOG_LEVEL", "info"),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            store: StoreConfig::from_env(),
        })
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// HTTP bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_port = env_or("APP_PORT", "3000");
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: raw_port })?;
        Ok(Self {
            host: env_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    /// `localhost` maps to the IPv4 loopback; anything else must be an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Row store wiring: which tables hold what, and an optional seed file.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub tables: TableNames,
    pub seed_path: Option<PathBuf>,
}

impl StoreConfig {
    fn from_env() -> Self {
        let defaults = TableNames::default();
        let tables = TableNames {
            mood: env_or("MOOD_TABLE", &defaults.mood),
            users: env_or("USERS_TABLE", &defaults.users),
            weights: env_or("SCORE_WEIGHTS_TABLE", &defaults.weights),
            bands: env_or("SCORE_BANDS_TABLE", &defaults.bands),
            range_config: env_or("RANGE_CONFIG_TABLE", &defaults.range_config),
            label_options: env_or("LABEL_OPTIONS_TABLE", &defaults.label_options),
            mascot: env_or("MASCOT_TABLE", &defaults.mascot),
        };
        let seed_path = env::var("STORE_SEED_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        Self { tables, seed_path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub mood: String,
    pub users: String,
    pub weights: String,
    pub bands: String,
    /// Slider bounds per input field.
    pub range_config: String,
    /// Display labels per input field.
    pub label_options: String,
    /// Encouragement lines keyed by feeling.
    pub mascot: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            mood: "moodMetric".to_string(),
            users: "users".to_string(),
            weights: "mood_score_weights".to_string(),
            bands: "mood_score_bands".to_string(),
            range_config: "range_config".to_string(),
            label_options: "label_options".to_string(),
            mascot: "mascot".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a port number")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{value}' is neither localhost nor an IP address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
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
            "MOOD_TABLE",
            "USERS_TABLE",
            "SCORE_WEIGHTS_TABLE",
            "SCORE_BANDS_TABLE",
            "STORE_SEED_PATH",
            "RANGE_CONFIG_TABLE",
            "LABEL_OPTIONS_TABLE",
            "MASCOT_TABLE",
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
        assert_eq!(config.store.tables, TableNames::default());
        assert!(config.store.seed_path.is_none());
    }

    #[test]
    fn table_names_and_seed_path_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("SCORE_BANDS_TABLE", "bands_v2");
        env::set_var("STORE_SEED_PATH", "seed/dev.json");
        env::set_var("MASCOT_TABLE", "mascot_lines");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.store.tables.bands, "bands_v2");
        assert_eq!(config.store.tables.mood, "moodMetric");
        assert_eq!(config.store.tables.mascot, "mascot_lines");
        assert_eq!(config.store.tables.range_config, "range_config");
        assert_eq!(config.store.seed_path, Some(PathBuf::from("seed/dev.json")));
        reset_env();
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "seventy");
        match AppConfig::load() {
            Err(ConfigError::InvalidPort { value }) => assert_eq!(value, "seventy"),
            other => panic!("expected invalid port, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn socket_addr_rejects_hostnames() {
        let server = ServerConfig {
            host: "mood.internal".to_string(),
            port: 8080,
        };
        match server.socket_addr() {
            Err(ConfigError::InvalidHost { value, .. }) => assert_eq!(value, "mood.internal"),
            other => panic!("expected invalid host, got {other:?}"),
        }
    }
}
