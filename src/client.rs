use crate::core::config::ClientConfig;
use crate::core::errors::ZsxqError;
use crate::core::kernel::{ReqwestRest, RestClient};
use crate::resources::{Checkins, Dashboard, Groups, Misc, Ranking, Topics, Users};
use secrecy::Secret;
use std::time::Duration;

/// Entry point to the platform API.
///
/// Holds one request module per API area, all sharing a single transport.
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ZsxqClient<R: RestClient = ReqwestRest> {
    groups: Groups<R>,
    topics: Topics<R>,
    users: Users<R>,
    checkins: Checkins<R>,
    dashboard: Dashboard<R>,
    ranking: Ranking<R>,
    misc: Misc<R>,
}

impl ZsxqClient<ReqwestRest> {
    pub fn builder() -> ZsxqClientBuilder {
        ZsxqClientBuilder::new()
    }

    /// Build a client from a complete configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ZsxqError> {
        Ok(Self::new(&ReqwestRest::from_config(config)?))
    }
}

impl<R: RestClient + Clone> ZsxqClient<R> {
    /// Wrap an existing transport.
    pub fn new(rest: &R) -> Self {
        Self {
            groups: Groups::new(rest),
            topics: Topics::new(rest),
            users: Users::new(rest),
            checkins: Checkins::new(rest),
            dashboard: Dashboard::new(rest),
            ranking: Ranking::new(rest),
            misc: Misc::new(rest),
        }
    }
}

impl<R: RestClient> ZsxqClient<R> {
    pub fn groups(&self) -> &Groups<R> {
        &self.groups
    }

    pub fn topics(&self) -> &Topics<R> {
        &self.topics
    }

    pub fn users(&self) -> &Users<R> {
        &self.users
    }

    pub fn checkins(&self) -> &Checkins<R> {
        &self.checkins
    }

    pub fn dashboard(&self) -> &Dashboard<R> {
        &self.dashboard
    }

    pub fn ranking(&self) -> &Ranking<R> {
        &self.ranking
    }

    pub fn misc(&self) -> &Misc<R> {
        &self.misc
    }
}

/// Builder for [`ZsxqClient`]
///
/// Everything except the token has a default; see [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ZsxqClientBuilder {
    config: ClientConfig,
}

impl Default for ZsxqClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZsxqClientBuilder {
    /// Create a new `ZsxqClientBuilder` with default settings and no token
    pub fn new() -> Self {
        Self {
            config: ClientConfig::new(String::new()),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Secret::new(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many times a network or timeout failure is retried
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the base delay of the exponential backoff
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.config.device_id = device_id.into();
        self
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.config.app_version = app_version.into();
        self
    }

    /// The configuration the client would be built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the client
    ///
    /// Fails with a configuration error when the token is missing or
    /// blank. Nothing is constructed in that case.
    pub fn build(self) -> Result<ZsxqClient, ZsxqError> {
        self.config.validate()?;
        ZsxqClient::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
    use crate::core::errors::ErrorKind;

    #[test]
    fn test_builder_defaults() {
        let builder = ZsxqClientBuilder::new();
        assert_eq!(builder.config().base_url, DEFAULT_BASE_URL);
        assert_eq!(builder.config().max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(builder.config().timeout, Duration::from_secs(10));
        assert!(builder.config().token().is_empty());
    }

    #[test]
    fn test_build_without_token_fails() {
        let error = ZsxqClientBuilder::new().build().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.code(), 0);

        let error = ZsxqClient::builder().with_token("  ").build().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_builder_settings() {
        let builder = ZsxqClient::builder()
            .with_token("token")
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(3))
            .with_max_retries(1)
            .with_retry_delay(Duration::from_millis(50))
            .with_device_id("device-7")
            .with_app_version("3.0.0");

        let config = builder.config();
        assert_eq!(config.token(), "token");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay, Duration::from_millis(50));
        assert_eq!(config.device_id, "device-7");
        assert_eq!(config.app_version, "3.0.0");

        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_with_config_replaces_settings() {
        let config = ClientConfig::new("from-config").max_retries(0);
        let builder = ZsxqClient::builder().with_token("ignored").with_config(config);
        assert_eq!(builder.config().token(), "from-config");
        assert_eq!(builder.config().max_retries, 0);
    }

    #[test]
    fn test_client_is_cloneable() {
        let client = ZsxqClient::builder().with_token("token").build().unwrap();
        let clone = client.clone();
        let _ = (clone.groups(), clone.users(), client.misc());
    }
}
