/*
 * Responsibility
 * - read settings from the environment (PORT, CORS allowlist, Basic auth realm/credentials)
 * - validate them (startup fails on invalid values)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub basic_auth_realm: String,
    pub basic_auth_username: String,
    pub basic_auth_password: String,
}

// keep the password out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("basic_auth_realm", &self.basic_auth_realm)
            .field("basic_auth_username", &self.basic_auth_username)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process env in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let basic_auth_realm = lookup("BASIC_AUTH_REALM").unwrap_or_else(|| "Example".to_string());
        if basic_auth_realm.contains('"') {
            return Err(ConfigError::Invalid("BASIC_AUTH_REALM"));
        }

        let basic_auth_username =
            lookup("BASIC_AUTH_USERNAME").unwrap_or_else(|| "admin".to_string());
        if basic_auth_username.is_empty() {
            return Err(ConfigError::Invalid("BASIC_AUTH_USERNAME"));
        }

        let basic_auth_password =
            lookup("BASIC_AUTH_PASSWORD").unwrap_or_else(|| "secret".to_string());

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            basic_auth_realm,
            basic_auth_username,
            basic_auth_password,
        })
    }
}
