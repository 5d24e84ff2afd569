use crate::core::config::ConfigError;
use thiserror::Error;

/// Code carried by transport failures (connection, unreadable or malformed response).
pub const NETWORK_ERROR_CODE: i32 = 70001;
/// Code carried by attempts that exceeded the configured timeout.
pub const TIMEOUT_ERROR_CODE: i32 = 70002;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Discriminant of a [`ZsxqError`].
///
/// The platform reports failures as numeric codes grouped into families
/// (auth, permission, not-found, business, network). Each family has a
/// generic kind plus the specific kinds the platform documents; the family
/// predicates below answer "is-a" questions without a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Any platform code without a dedicated kind
    Platform,
    Auth,
    TokenInvalid,
    TokenExpired,
    SignatureInvalid,
    Permission,
    NotMember,
    NotOwner,
    NotFound,
    GroupNotFound,
    TopicNotFound,
    RateLimited,
    Business,
    NotJoinedCheckin,
    Network,
    Timeout,
    /// The call's cancellation token fired
    Cancelled,
    /// Client construction was rejected before any network activity
    Config,
    /// The request body could not be encoded
    Serialization,
}

impl ErrorKind {
    /// Map a platform code onto its specific kind, falling back to `Platform`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            10001 => Self::TokenInvalid,
            10002 => Self::TokenExpired,
            10003 => Self::SignatureInvalid,
            20001 => Self::Permission,
            20002 => Self::NotMember,
            20003 => Self::NotOwner,
            30001 => Self::GroupNotFound,
            30002 => Self::TopicNotFound,
            40001 => Self::RateLimited,
            52010 => Self::NotJoinedCheckin,
            NETWORK_ERROR_CODE => Self::Network,
            TIMEOUT_ERROR_CODE => Self::Timeout,
            _ => Self::Platform,
        }
    }

    /// Message used when the platform supplies none.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Platform => "unknown error",
            Self::Auth => "authentication failed",
            Self::TokenInvalid => "token is invalid",
            Self::TokenExpired => "token has expired",
            Self::SignatureInvalid => "signature verification failed",
            Self::Permission => "permission denied",
            Self::NotMember => "not a member of this group",
            Self::NotOwner => "not the owner of this group",
            Self::NotFound => "resource not found",
            Self::GroupNotFound => "group not found",
            Self::TopicNotFound => "topic not found",
            Self::RateLimited => "too many requests",
            Self::Business => "business rule violated",
            Self::NotJoinedCheckin => "not joined this check-in",
            Self::Network => "network error",
            Self::Timeout => "request timed out",
            Self::Cancelled => "request cancelled",
            Self::Config => "invalid configuration",
            Self::Serialization => "failed to serialize request body",
        }
    }

    pub const fn is_auth(self) -> bool {
        matches!(
            self,
            Self::Auth | Self::TokenInvalid | Self::TokenExpired | Self::SignatureInvalid
        )
    }

    pub const fn is_permission(self) -> bool {
        matches!(self, Self::Permission | Self::NotMember | Self::NotOwner)
    }

    pub const fn is_not_found(self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::GroupNotFound | Self::TopicNotFound
        )
    }

    pub const fn is_business(self) -> bool {
        matches!(self, Self::Business | Self::NotJoinedCheckin)
    }

    /// Timeouts are a specialization of the network family.
    pub const fn is_network(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }

    /// Only network-family failures are retried by the transport.
    pub const fn is_retryable(self) -> bool {
        self.is_network()
    }
}

/// Error returned by every SDK operation.
///
/// Carries the platform code and message together with the request id of
/// the attempt that produced it, so failures can be matched against server
/// logs.
#[derive(Error, Debug)]
#[error("[{code}] {message}{}", request_id_suffix(.request_id))]
pub struct ZsxqError {
    kind: ErrorKind,
    code: i32,
    message: String,
    request_id: Option<String>,
    retry_after: Option<u64>,
    #[source]
    source: Option<BoxError>,
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    request_id
        .as_deref()
        .map(|id| format!(" (request_id: {})", id))
        .unwrap_or_default()
}

impl ZsxqError {
    /// Build an error of an explicit kind. An empty message is replaced by the
    /// kind's default message.
    pub fn new(
        kind: ErrorKind,
        code: i32,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };

        Self {
            kind,
            code,
            message,
            request_id,
            retry_after: None,
            source: None,
        }
    }

    /// Construct the error for a platform failure code.
    ///
    /// Known codes get their specific kind; anything else becomes a
    /// `Platform` error that keeps the original code.
    pub fn from_code(code: i32, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::from_code(code), code, message, request_id)
    }

    pub fn auth(code: i32, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Auth, code, message, request_id)
    }

    pub fn permission(code: i32, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Permission, code, message, request_id)
    }

    pub fn not_found(code: i32, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message, request_id)
    }

    pub fn business(code: i32, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Business, code, message, request_id)
    }

    pub fn rate_limited(
        message: impl Into<String>,
        request_id: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let mut error = Self::new(ErrorKind::RateLimited, 40001, message, request_id);
        error.retry_after = retry_after;
        error
    }

    pub fn network(message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Network, NETWORK_ERROR_CODE, message, request_id)
    }

    pub fn timeout(message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT_ERROR_CODE, message, request_id)
    }

    pub fn cancelled(request_id: Option<String>) -> Self {
        Self::new(ErrorKind::Cancelled, 0, "", request_id)
    }

    pub fn serialization(source: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Serialization,
            0,
            format!("Failed to serialize request body: {}", source),
            None,
        )
        .with_source(source)
    }

    /// Attach a retry-after hint. Only rate-limit errors carry one.
    pub fn with_retry_after(mut self, retry_after: Option<u64>) -> Self {
        if self.kind == ErrorKind::RateLimited {
            self.retry_after = retry_after.or(self.retry_after);
        }
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Seconds the platform asked callers to wait; only set on rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    pub fn is_auth(&self) -> bool {
        self.kind.is_auth()
    }

    pub fn is_permission(&self) -> bool {
        self.kind.is_permission()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind.is_not_found()
    }

    pub fn is_business(&self) -> bool {
        self.kind.is_business()
    }

    pub fn is_network(&self) -> bool {
        self.kind.is_network()
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<ConfigError> for ZsxqError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorKind::Config, 0, error.to_string(), None).with_source(error)
    }
}
