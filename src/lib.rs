//! Typed async client for the Knowledge Planet ("zsxq") REST API.
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use zsxq_sdk::ZsxqClient;
//!
//! # async fn example() -> Result<(), zsxq_sdk::ZsxqError> {
//! let client = ZsxqClient::builder().with_token("your-token").build()?;
//! let cancel = CancellationToken::new();
//! for group in client.groups().list(&cancel).await? {
//!     println!("{} {}", group.group_id, group.name);
//! }
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod core;
pub mod resources;

pub use client::{ZsxqClient, ZsxqClientBuilder};
pub use core::{
    config::{ClientConfig, ConfigError},
    errors::{ErrorKind, ZsxqError},
    types::*,
};
pub use tokio_util::sync::CancellationToken;
