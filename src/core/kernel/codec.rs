use crate::core::errors::ZsxqError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The platform's uniform response wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub succeeded: bool,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub resp_data: Option<Value>,
}

impl Envelope {
    /// Parse a response body.
    ///
    /// An unreadable body is reported as a network error: truncated or
    /// proxy-generated responses are transient and the caller may retry.
    pub fn parse(body: &[u8], request_id: &str) -> Result<Self, ZsxqError> {
        serde_json::from_slice(body).map_err(|e| {
            ZsxqError::network(
                format!("Failed to parse response envelope: {}", e),
                Some(request_id.to_string()),
            )
            .with_source(e)
        })
    }

    /// The human-readable failure message, preferring `error` over `info`.
    pub fn failure_message(&self) -> &str {
        [self.error.as_deref(), self.info.as_deref()]
            .into_iter()
            .flatten()
            .find(|message| !message.is_empty())
            .unwrap_or_default()
    }

    /// Turn a failed envelope into its classified error; `None` on success.
    pub fn failure(&self, request_id: &str) -> Option<ZsxqError> {
        if self.succeeded {
            return None;
        }
        Some(ZsxqError::from_code(
            self.code.unwrap_or_default(),
            self.failure_message(),
            Some(request_id.to_string()),
        ))
    }

    /// Decode the payload of a successful envelope into `T`.
    ///
    /// An absent or `null` payload still means success: it decodes as
    /// `null` when `T` accepts that (`Option`, `IgnoredAny`) and otherwise
    /// as an empty object. Failure here means the platform broke its
    /// response contract and is not retried.
    pub fn into_result<T: DeserializeOwned>(self, request_id: &str) -> Result<T, ZsxqError> {
        if let Some(error) = self.failure(request_id) {
            return Err(error);
        }

        let decoded = match self.resp_data {
            Some(Value::Null) | None => serde_json::from_value(Value::Null)
                .or_else(|_| serde_json::from_value(Value::Object(Map::new()))),
            Some(data) => serde_json::from_value(data),
        };

        decoded.map_err(|e| {
            ZsxqError::network(
                format!("Failed to decode response data: {}", e),
                Some(request_id.to_string()),
            )
            .with_source(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ErrorKind, NETWORK_ERROR_CODE};
    use serde::de::IgnoredAny;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[test]
    fn test_success_decodes_payload() {
        let envelope =
            Envelope::parse(br#"{"succeeded":true,"resp_data":{"name":"rust"}}"#, "req").unwrap();
        let payload: Payload = envelope.into_result("req").unwrap();
        assert_eq!(payload.name, "rust");
    }

    #[test]
    fn test_failure_maps_code() {
        let envelope = Envelope::parse(
            br#"{"succeeded":false,"code":10001,"error":"invalid token","resp_data":{"name":"x"}}"#,
            "req-9",
        )
        .unwrap();
        let error = envelope.into_result::<Payload>("req-9").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TokenInvalid);
        assert_eq!(error.message(), "invalid token");
        assert_eq!(error.request_id(), Some("req-9"));
    }

    #[test]
    fn test_failure_message_falls_back_to_info() {
        let envelope =
            Envelope::parse(br#"{"succeeded":false,"code":30001,"error":"","info":"gone"}"#, "r")
                .unwrap();
        assert_eq!(envelope.failure_message(), "gone");

        let envelope = Envelope::parse(br#"{"succeeded":false,"code":30001}"#, "r").unwrap();
        let error = envelope.failure("r").unwrap();
        assert_eq!(error.message(), "group not found");
    }

    #[test]
    fn test_missing_succeeded_is_failure() {
        let envelope = Envelope::parse(br#"{"resp_data":{}}"#, "r").unwrap();
        let error = envelope.failure("r").unwrap();
        assert_eq!(error.kind(), ErrorKind::Platform);
        assert_eq!(error.code(), 0);
    }

    #[test]
    fn test_malformed_body_is_network_error() {
        let error = Envelope::parse(b"<html>502 Bad Gateway</html>", "req-5").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
        assert!(error.is_retryable());
        assert_eq!(error.request_id(), Some("req-5"));
    }

    #[test]
    fn test_payload_mismatch_is_network_class() {
        let envelope =
            Envelope::parse(br#"{"succeeded":true,"resp_data":{"name":42}}"#, "req").unwrap();
        let error = envelope.into_result::<Payload>("req").unwrap_err();
        assert_eq!(error.code(), NETWORK_ERROR_CODE);
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct ListPayload {
        items: Vec<String>,
    }

    #[test]
    fn test_missing_payload_decodes_as_null() {
        let envelope = Envelope::parse(br#"{"succeeded":true}"#, "req").unwrap();
        let value: Option<Payload> = envelope.clone().into_result("req").unwrap();
        assert!(value.is_none());
        let _: IgnoredAny = envelope.into_result("req").unwrap();
    }

    #[test]
    fn test_missing_payload_decodes_struct_from_empty_object() {
        for body in [&br#"{"succeeded":true}"#[..], br#"{"succeeded":true,"resp_data":null}"#] {
            let envelope = Envelope::parse(body, "req").unwrap();
            let list: ListPayload = envelope.into_result("req").unwrap();
            assert!(list.items.is_empty());
        }
    }

    #[test]
    fn test_missing_payload_with_required_field_fails() {
        let envelope = Envelope::parse(br#"{"succeeded":true}"#, "req").unwrap();
        let error = envelope.into_result::<Payload>("req").unwrap_err();
        assert_eq!(error.code(), NETWORK_ERROR_CODE);
        assert!(error.message().contains("missing field"));
    }
}
