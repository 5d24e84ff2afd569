use crate::core::config::ConfigError;
use crate::core::errors::ZsxqError;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use secrecy::{ExposeSecret, Secret};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Shared secret the platform uses to verify request signatures.
pub const SIGNING_SECRET: &str = "zsxq-sdk-secret";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Compute the request signature.
///
/// The canonical string is `timestamp\nMETHOD\npath`, followed by `\nbody`
/// when the body is non-empty. The digest is HMAC-SHA1, which the platform
/// still requires, rendered as 40 lowercase hex characters.
pub fn compute_signature(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<String, ZsxqError> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).map_err(|e| {
        ZsxqError::auth(10003, format!("Invalid signing secret: {}", e), None)
    })?;

    mac.update(timestamp.as_bytes());
    mac.update(b"\n");
    mac.update(method.to_uppercase().as_bytes());
    mac.update(b"\n");
    mac.update(path.as_bytes());
    if !body.is_empty() {
        mac.update(b"\n");
        mac.update(body);
    }

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Header set for one attempt of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub content_type: String,
    pub user_agent: String,
    pub authorization: String,
    pub timestamp: String,
    pub signature: String,
    pub request_id: String,
    pub version: String,
    pub device_id: String,
}

impl SignedHeaders {
    /// Convert into reqwest headers.
    ///
    /// Fails when a configured value (token, device id, version) contains
    /// characters that are not valid in an HTTP header.
    pub fn to_header_map(&self) -> Result<HeaderMap, ZsxqError> {
        let mut headers = HeaderMap::with_capacity(8);
        headers.insert(CONTENT_TYPE, header_value(&self.content_type)?);
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        let mut authorization = header_value(&self.authorization)?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(
            HeaderName::from_static("x-timestamp"),
            header_value(&self.timestamp)?,
        );
        headers.insert(
            HeaderName::from_static("x-signature"),
            header_value(&self.signature)?,
        );
        headers.insert(
            HeaderName::from_static("x-request-id"),
            header_value(&self.request_id)?,
        );
        headers.insert(
            HeaderName::from_static("x-version"),
            header_value(&self.version)?,
        );
        headers.insert(
            HeaderName::from_static("x-aduid"),
            header_value(&self.device_id)?,
        );
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ZsxqError> {
    HeaderValue::from_str(value).map_err(|e| {
        ZsxqError::from(ConfigError::InvalidConfiguration(format!(
            "Value is not a valid HTTP header: {}",
            e
        )))
    })
}

/// Signer trait for request authentication
///
/// Implementations produce the complete header set for a single attempt.
/// Every call must mint a new request id so that retries are individually
/// traceable.
pub trait Signer: Send + Sync {
    /// Sign a request
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `path` - Request path without the query string
    /// * `body` - Raw request body bytes, empty when there is no body
    /// * `timestamp` - Unix timestamp in seconds
    fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: i64,
    ) -> Result<SignedHeaders, ZsxqError>;
}

/// HMAC-SHA1 signer used by the platform's app clients.
pub struct HmacSigner {
    token: Secret<String>,
    device_id: String,
    app_version: String,
    secret: String,
}

impl HmacSigner {
    /// Create a signer using the platform's shared secret
    ///
    /// # Arguments
    /// * `token` - Raw authorization token
    /// * `device_id` - Value of the `x-aduid` header
    /// * `app_version` - App version embedded in `user-agent` and `x-version`
    pub fn new(token: Secret<String>, device_id: String, app_version: String) -> Self {
        Self {
            token,
            device_id,
            app_version,
            secret: SIGNING_SECRET.to_string(),
        }
    }

    /// Replace the signing secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("device_id", &self.device_id)
            .field("app_version", &self.app_version)
            .finish_non_exhaustive()
    }
}

impl Signer for HmacSigner {
    fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: i64,
    ) -> Result<SignedHeaders, ZsxqError> {
        let timestamp = timestamp.to_string();
        let signature = compute_signature(&self.secret, &timestamp, method, path, body)?;

        Ok(SignedHeaders {
            content_type: JSON_CONTENT_TYPE.to_string(),
            user_agent: format!("xiaomiquan/{} SDK/1.0.0", self.app_version),
            authorization: self.token.expose_secret().clone(),
            timestamp,
            signature,
            request_id: uuid::Uuid::new_v4().to_string(),
            version: self.app_version.clone(),
            device_id: self.device_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(timestamp: &str, method: &str, path: &str, body: &[u8]) -> String {
        compute_signature(SIGNING_SECRET, timestamp, method, path, body).unwrap()
    }

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign("1700000000", "GET", "/v2/groups", b"");
        let b = sign("1700000000", "GET", "/v2/groups", b"");
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_shape() {
        let cases: [(&str, &str, &str, &[u8]); 4] = [
            ("0", "GET", "/", b""),
            ("1700000000", "post", "/v2/groups/1/checkins", br#"{"req_data":{}}"#),
            ("1700000000", "DELETE", "/v2/topics/9", b""),
            ("99999999999", "PUT", "/v3/users/self", "中文内容".as_bytes()),
        ];
        for (timestamp, method, path, body) in cases {
            let signature = sign(timestamp, method, path, body);
            assert_eq!(signature.len(), 40);
            assert!(is_lower_hex(&signature), "{}", signature);
        }
    }

    #[test]
    fn test_any_input_change_alters_signature() {
        let base = sign("1700000000", "POST", "/v2/groups", b"{}");
        assert_ne!(base, sign("1700000001", "POST", "/v2/groups", b"{}"));
        assert_ne!(base, sign("1700000000", "PUT", "/v2/groups", b"{}"));
        assert_ne!(base, sign("1700000000", "POST", "/v2/group", b"{}"));
        assert_ne!(base, sign("1700000000", "POST", "/v2/groups", b"{ }"));
        assert_ne!(base, sign("1700000000", "POST", "/v2/groups", b""));
    }

    #[test]
    fn test_method_is_uppercased() {
        assert_eq!(
            sign("1700000000", "get", "/v2/groups", b""),
            sign("1700000000", "GET", "/v2/groups", b"")
        );
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA1("zsxq-sdk-secret", "1700000000\nGET\n/v2/groups")
        let mut mac = HmacSha1::new_from_slice(SIGNING_SECRET.as_bytes()).unwrap();
        mac.update(b"1700000000\nGET\n/v2/groups");
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(sign("1700000000", "GET", "/v2/groups", b""), expected);
    }

    #[test]
    fn test_headers_carry_configuration() {
        let signer = HmacSigner::new(
            Secret::new("token-abc".to_string()),
            "device-1".to_string(),
            "2.83.0".to_string(),
        );
        let headers = signer.sign_request("GET", "/v2/groups", b"", 1_700_000_000).unwrap();

        assert_eq!(headers.authorization, "token-abc");
        assert_eq!(headers.device_id, "device-1");
        assert_eq!(headers.version, "2.83.0");
        assert_eq!(headers.user_agent, "xiaomiquan/2.83.0 SDK/1.0.0");
        assert_eq!(headers.timestamp, "1700000000");
        assert_eq!(headers.signature, sign("1700000000", "GET", "/v2/groups", b""));

        let map = headers.to_header_map().unwrap();
        for name in [
            "content-type",
            "user-agent",
            "authorization",
            "x-timestamp",
            "x-signature",
            "x-request-id",
            "x-version",
            "x-aduid",
        ] {
            assert!(map.contains_key(name), "missing header {}", name);
        }
    }

    #[test]
    fn test_request_id_is_fresh_per_call() {
        let signer = HmacSigner::new(Secret::new("t".to_string()), "d".to_string(), "v".to_string());
        let first = signer.sign_request("GET", "/", b"", 1).unwrap();
        let second = signer.sign_request("GET", "/", b"", 1).unwrap();
        assert_eq!(first.signature, second.signature);
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let signer = HmacSigner::new(
            Secret::new("bad\ntoken".to_string()),
            "d".to_string(),
            "v".to_string(),
        );
        let headers = signer.sign_request("GET", "/", b"", 1).unwrap();
        assert!(headers.to_header_map().is_err());
    }

    #[test]
    fn test_custom_secret_changes_signature() {
        let signer = HmacSigner::new(Secret::new("t".to_string()), "d".to_string(), "v".to_string())
            .with_secret("staging-secret");
        let headers = signer.sign_request("GET", "/v2/groups", b"", 1_700_000_000).unwrap();

        let expected =
            compute_signature("staging-secret", "1700000000", "GET", "/v2/groups", b"").unwrap();
        assert_eq!(headers.signature, expected);
        assert_ne!(headers.signature, sign("1700000000", "GET", "/v2/groups", b""));
    }

    #[test]
    fn test_debug_hides_token() {
        let signer = HmacSigner::new(
            Secret::new("very-secret-token".to_string()),
            "d".to_string(),
            "v".to_string(),
        );
        assert!(!format!("{:?}", signer).contains("very-secret-token"));
    }
}
