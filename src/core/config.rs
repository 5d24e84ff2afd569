use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.zsxq.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_APP_VERSION: &str = "2.83.0";

/// Client configuration, fixed once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Secret<String>,
    pub base_url: String,
    /// Bound on a single attempt, from connect until the body is read
    pub timeout: Duration,
    /// Additional attempts allowed after a network or timeout failure
    pub max_retries: u32,
    /// Base of the exponential backoff between attempts
    pub retry_delay: Duration,
    pub device_id: String,
    pub app_version: String,
}

// Custom Serialize implementation - never expose the token in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 7)?;
        state.serialize_field("token", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_ms", &(self.timeout.as_millis() as u64))?;
        state.serialize_field("max_retries", &self.max_retries)?;
        state.serialize_field("retry_delay_ms", &(self.retry_delay.as_millis() as u64))?;
        state.serialize_field("device_id", &self.device_id)?;
        state.serialize_field("app_version", &self.app_version)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            token: String,
            base_url: Option<String>,
            timeout_ms: Option<u64>,
            max_retries: Option<u32>,
            retry_delay_ms: Option<u64>,
            device_id: Option<String>,
            app_version: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        let mut config = Self::new(helper.token);
        if let Some(base_url) = helper.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout_ms) = helper.timeout_ms {
            config.timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(max_retries) = helper.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = helper.retry_delay_ms {
            config.retry_delay = Duration::from_millis(retry_delay_ms);
        }
        if let Some(device_id) = helper.device_id {
            config.device_id = device_id;
        }
        if let Some(app_version) = helper.app_version {
            config.app_version = app_version;
        }
        Ok(config)
    }
}

impl ClientConfig {
    /// Create a configuration with the given token and default settings.
    ///
    /// The device id defaults to a freshly generated UUID.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            device_id: uuid::Uuid::new_v4().to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_TOKEN` (required)
    /// - `{PREFIX}_BASE_URL`, `{PREFIX}_DEVICE_ID`, `{PREFIX}_APP_VERSION` (optional)
    /// - `{PREFIX}_TIMEOUT_SECS`, `{PREFIX}_MAX_RETRIES`, `{PREFIX}_RETRY_DELAY_MS` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let token_var = format!("{}_TOKEN", prefix);

        let token = env::var(&token_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(token_var))?;

        let mut config = Self::new(token);

        if let Ok(base_url) = env::var(format!("{}_BASE_URL", prefix)) {
            config.base_url = base_url;
        }
        if let Some(secs) = parse_var::<u64>(&format!("{}_TIMEOUT_SECS", prefix))? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32>(&format!("{}_MAX_RETRIES", prefix))? {
            config.max_retries = retries;
        }
        if let Some(millis) = parse_var::<u64>(&format!("{}_RETRY_DELAY_MS", prefix))? {
            config.retry_delay = Duration::from_millis(millis);
        }
        if let Ok(device_id) = env::var(format!("{}_DEVICE_ID", prefix)) {
            config.device_id = device_id;
        }
        if let Ok(app_version) = env::var(format!("{}_APP_VERSION", prefix)) {
            config.app_version = app_version;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// A missing file is not an error; system environment variables are used
    /// instead.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check the settings a client cannot be built without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::InvalidConfiguration(
                "base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    #[must_use]
    pub fn app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = app_version.into();
        self
    }

    /// Get the token (use carefully - exposes secret)
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidConfiguration(format!("{} is not valid: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("A token is required to build the client")]
    MissingToken,

    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("token");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.app_version, "2.83.0");
        assert_eq!(config.device_id.len(), 36);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_id_is_fresh_per_config() {
        let a = ClientConfig::new("token");
        let b = ClientConfig::new("token");
        assert_ne!(a.device_id, b.device_id);
    }

    #[test]
    fn test_empty_token_fails_validation() {
        assert!(matches!(
            ClientConfig::new("").validate(),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            ClientConfig::new("   ").validate(),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_serialize_redacts_token() {
        let config = ClientConfig::new("super-secret").device_id("device-1");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("device-1"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"token":"abc","max_retries":1,"retry_delay_ms":250}"#)
                .unwrap();
        assert_eq!(config.token(), "abc");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_env() {
        env::set_var("ZSXQTEST_TOKEN", "env-token");
        env::set_var("ZSXQTEST_MAX_RETRIES", "5");
        env::set_var("ZSXQTEST_BASE_URL", "http://localhost:9000");

        let config = ClientConfig::from_env("zsxqtest").unwrap();
        assert_eq!(config.token(), "env-token");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_url, "http://localhost:9000");

        env::set_var("ZSXQTEST_MAX_RETRIES", "many");
        assert!(matches!(
            ClientConfig::from_env("zsxqtest"),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_env_missing_token() {
        let result = ClientConfig::from_env("zsxq_missing_prefix");
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvironmentVariable(name)) if name == "ZSXQ_MISSING_PREFIX_TOKEN"
        ));
    }
}
