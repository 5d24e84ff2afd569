//! Transport kernel shared by every resource module.
//!
//! - [`signer`] computes the per-attempt signature and header set.
//! - [`codec`] decodes the platform's response envelope.
//! - [`rest`] runs a logical call: sign, send, retry with backoff, decode.
//!
//! ```rust,no_run
//! use zsxq_sdk::core::config::ClientConfig;
//! use zsxq_sdk::core::kernel::{ReqwestRest, RestClient};
//! use zsxq_sdk::core::errors::ZsxqError;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), ZsxqError> {
//! let rest = ReqwestRest::from_config(&ClientConfig::new("token"))?;
//! let cancel = CancellationToken::new();
//! let me: serde_json::Value = rest.get_json(&cancel, "/v3/users/self", &[]).await?;
//! # Ok(())
//! # }
//! ```
pub mod codec;
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use codec::Envelope;
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{compute_signature, HmacSigner, SignedHeaders, Signer, SIGNING_SECRET};
