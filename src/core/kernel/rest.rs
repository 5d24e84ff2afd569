use crate::core::config::{ClientConfig, ConfigError};
use crate::core::errors::ZsxqError;
use crate::core::kernel::codec::Envelope;
use crate::core::kernel::signer::{HmacSigner, Signer};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

/// REST client trait for the platform's signed JSON API
///
/// Every operation runs one logical call to completion: signing, sending,
/// retrying transient failures, and decoding the response envelope into `T`.
/// The cancellation token aborts the call at any suspension point.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `cancel` - Aborts the call, including any backoff wait
    /// * `path` - The API path, e.g. `/v2/groups`
    /// * `query_params` - Ordered query parameters, appended only if non-empty
    async fn get_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, ZsxqError>;

    /// Make a POST request with a JSON body
    async fn post_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Value,
    ) -> Result<T, ZsxqError>;

    /// Make a PUT request with a JSON body
    async fn put_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Value,
    ) -> Result<T, ZsxqError>;

    /// Make a DELETE request
    async fn delete_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<T, ZsxqError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Maximum number of retries for network and timeout failures
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each following one
    pub retry_delay: Duration,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout: crate::core::config::DEFAULT_TIMEOUT,
            max_retries: crate::core::config::DEFAULT_MAX_RETRIES,
            retry_delay: crate::core::config::DEFAULT_RETRY_DELAY,
        }
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base retry delay
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Delay before attempt `attempt` (the original request is attempt 0).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt - 1))
    }
}

impl From<&ClientConfig> for RestClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
            .with_timeout(config.timeout)
            .with_max_retries(config.max_retries)
            .with_retry_delay(config.retry_delay)
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer used for every attempt
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    ///
    /// Every platform endpoint requires signed headers, so a signer is
    /// mandatory.
    pub fn build(self) -> Result<ReqwestRest, ZsxqError> {
        let signer = self.signer.ok_or_else(|| {
            ConfigError::InvalidConfiguration("A signer is required to build the REST client".to_string())
        })?;

        let client = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| {
                ZsxqError::from(ConfigError::InvalidConfiguration(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer,
        })
    }
}

/// A parsed response together with the attempt that produced it.
#[derive(Debug)]
struct Outcome {
    envelope: Envelope,
    request_id: String,
    /// `Retry-After` header in seconds, when the server sent one
    retry_after: Option<u64>,
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Arc<dyn Signer>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Create a transport from a validated client configuration, signing
    /// with [`HmacSigner`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ZsxqError> {
        config.validate()?;

        let signer = Arc::new(HmacSigner::new(
            config.token.clone(),
            config.device_id.clone(),
            config.app_version.clone(),
        ));

        RestClientBuilder::new(RestClientConfig::from(config))
            .with_signer(signer)
            .build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Get the current timestamp in seconds
    fn get_timestamp() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Build the full URL for a path and its query parameters
    fn build_url(&self, path: &str, query_params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        if !query_params.is_empty() {
            url.push('?');
            url.push_str(&Self::create_query_string(query_params));
        }
        url
    }

    /// Create a form-encoded query string, keeping parameter order
    fn create_query_string(params: &[(&str, &str)]) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish()
    }

    fn encode_body(body: &Value) -> Result<Vec<u8>, ZsxqError> {
        if body.is_null() {
            return Ok(Vec::new());
        }
        serde_json::to_vec(body).map_err(ZsxqError::serialization)
    }

    fn transport_error(error: reqwest::Error, request_id: &str) -> ZsxqError {
        let request_id = Some(request_id.to_string());
        if error.is_timeout() {
            ZsxqError::timeout(format!("Request timed out: {}", error), request_id)
                .with_source(error)
        } else {
            ZsxqError::network(format!("Request failed: {}", error), request_id).with_source(error)
        }
    }

    /// Run one attempt and parse its envelope.
    ///
    /// Headers are signed afresh, so every attempt carries its own
    /// timestamp and request id.
    async fn attempt(
        &self,
        cancel: &CancellationToken,
        method: &Method,
        url: &str,
        path: &str,
        body: &[u8],
    ) -> Result<Outcome, ZsxqError> {
        let headers = self
            .signer
            .sign_request(method.as_str(), path, body, Self::get_timestamp())?;
        let request_id = headers.request_id.clone();

        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(headers.to_header_map()?);
        if !body.is_empty() {
            request = request.body(body.to_vec());
        }

        debug!(request_id = %request_id, "Sending request");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, retry_after, bytes))
        };

        let (status, retry_after, bytes) = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(request_id = %request_id, "Request cancelled in flight");
                return Err(ZsxqError::cancelled(Some(request_id)));
            }
            result = exchange => result.map_err(|e| Self::transport_error(e, &request_id))?,
        };

        trace!("Response body: {}", String::from_utf8_lossy(&bytes));

        if !status.is_success() {
            warn!(status = %status, request_id = %request_id, "Non-success HTTP status");
        }

        let envelope = Envelope::parse(&bytes, &request_id)?;
        Ok(Outcome {
            envelope,
            request_id,
            retry_after,
        })
    }

    /// Execute a call with retries and return the outcome of the last attempt.
    #[instrument(skip(self, cancel, query_params, body), fields(method = %method, path = %path))]
    async fn execute(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Outcome, ZsxqError> {
        let url = self.build_url(path, query_params);
        let mut attempt: u32 = 0;

        loop {
            match self.attempt(cancel, &method, &url, path, body).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) if error.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying request"
                    );

                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            return Err(ZsxqError::cancelled(error.request_id().map(str::to_string)));
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                Err(error) => {
                    if error.is_retryable() {
                        warn!(attempts = attempt + 1, error = %error, "Retries exhausted");
                    }
                    return Err(error);
                }
            }
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
    ) -> Result<T, ZsxqError> {
        let outcome = self
            .execute(cancel, method, path, query_params, body)
            .await?;
        outcome
            .envelope
            .into_result(&outcome.request_id)
            .map_err(|e| e.with_retry_after(outcome.retry_after))
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, cancel, query_params), fields(path = %path, param_count = query_params.len()))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, ZsxqError> {
        self.call(cancel, Method::GET, path, query_params, &[])
            .await
    }

    #[instrument(skip(self, cancel, body), fields(path = %path))]
    async fn post_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Value,
    ) -> Result<T, ZsxqError> {
        let body_bytes = Self::encode_body(body)?;
        self.call(cancel, Method::POST, path, &[], &body_bytes)
            .await
    }

    #[instrument(skip(self, cancel, body), fields(path = %path))]
    async fn put_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &Value,
    ) -> Result<T, ZsxqError> {
        let body_bytes = Self::encode_body(body)?;
        self.call(cancel, Method::PUT, path, &[], &body_bytes)
            .await
    }

    #[instrument(skip(self, cancel), fields(path = %path))]
    async fn delete_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<T, ZsxqError> {
        self.call(cancel, Method::DELETE, path, &[], &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;

    fn rest(base_url: &str) -> ReqwestRest {
        ReqwestRest::from_config(&ClientConfig::new("token").base_url(base_url)).unwrap()
    }

    #[test]
    fn test_backoff_doubles() {
        let config = RestClientConfig::new("http://localhost".to_string())
            .with_retry_delay(Duration::from_millis(100));
        assert_eq!(config.backoff_delay(0), Duration::ZERO);
        assert_eq!(config.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(400));
        assert!(config.backoff_delay(64) > Duration::from_secs(1_000_000));
    }

    #[test]
    fn test_build_url_without_query() {
        let rest = rest("https://api.zsxq.com");
        assert_eq!(
            rest.build_url("/v2/groups", &[]),
            "https://api.zsxq.com/v2/groups"
        );
    }

    #[test]
    fn test_build_url_keeps_order_and_encodes() {
        let rest = rest("https://api.zsxq.com/");
        let url = rest.build_url(
            "/v2/groups/1/topics",
            &[
                ("scope", "all"),
                ("count", "20"),
                ("end_time", "2024-01-01T00:00:00.000+0800"),
            ],
        );
        assert_eq!(
            url,
            "https://api.zsxq.com/v2/groups/1/topics?scope=all&count=20&end_time=2024-01-01T00%3A00%3A00.000%2B0800"
        );
    }

    #[test]
    fn test_null_body_is_empty() {
        assert!(ReqwestRest::encode_body(&Value::Null).unwrap().is_empty());
        assert_eq!(
            ReqwestRest::encode_body(&serde_json::json!({"a": 1})).unwrap(),
            br#"{"a":1}"#.to_vec()
        );
    }

    #[test]
    fn test_builder_requires_signer() {
        let result = RestClientBuilder::new(RestClientConfig::new("http://localhost".to_string()))
            .build();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_config_rejects_empty_token() {
        let result = ReqwestRest::from_config(&ClientConfig::new(""));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }
}
