//! Tower middleware for the querent transport.
//!
//! Layers wrap the boxed hyper service inside [`crate::HyperClient`].
//! [`AuthLayer`] is always the innermost one, so whatever sits outside it
//! (retry in particular) hands every attempt over for signing.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-retry` | `.with_retry()` helper |
//! | `middleware-logging` | `.with_logging()` helper |
//! | `middleware-concurrency` | `.with_concurrency_limit()` helper |
//! | `middleware-decompression` | Built-in response decoding matching the `Accept-Encoding` hint (default) |
//! | `middleware-core` | Retry, logging and concurrency |
//! | `middleware-full` | All middleware |
//!
//! # Example
//!
//! ```ignore
//! use querent::HyperClient;
//!
//! let client = HyperClient::builder()
//!     .with_oauth1(credentials)
//!     .with_retry(2)
//!     .with_logging()
//!     .build();
//! ```

mod auth;
#[cfg(feature = "middleware-decompression")]
mod decompression;
mod logging;
mod retry;

pub use auth::{Auth, AuthLayer, Authenticator, BearerToken, OAuth1, OAuth1Credentials, OAuthStamp};
#[cfg(feature = "middleware-decompression")]
pub use decompression::{Decompression, DecompressionLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::RetryPolicy;

pub use tower::{Layer, ServiceBuilder};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::retry::RetryLayer;
