//! Client configuration types.

use std::time::Duration;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("querent/", env!("CARGO_PKG_VERSION"));

/// Default `Accept-Encoding` compression hint.
///
/// Only encodings the built-in decoder handles are advertised.
#[cfg(feature = "middleware-decompression")]
pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate, br, zstd";

/// Default `Accept-Encoding` compression hint.
///
/// Built without `middleware-decompression`, so nothing but `identity`.
#[cfg(not(feature = "middleware-decompression"))]
pub const DEFAULT_ACCEPT_ENCODING: &str = "identity";

/// Configuration for the HTTP client.
///
/// Passed explicitly to the transport and to the authentication layer;
/// nothing here is read from global state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// Client identification header value.
    pub user_agent: String,
    /// Compression hint sent as `Accept-Encoding`.
    ///
    /// Encoded responses are decoded by the built-in decompression layer;
    /// without the `middleware-decompression` feature, keep this to `identity`.
    pub accept_encoding: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_encoding: DEFAULT_ACCEPT_ENCODING.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
    accept_encoding: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the `Accept-Encoding` header value.
    #[must_use]
    pub fn accept_encoding(mut self, accept_encoding: impl Into<String>) -> Self {
        self.accept_encoding = Some(accept_encoding.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            accept_encoding: self.accept_encoding.unwrap_or(defaults.accept_encoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        check!(config.timeout == Duration::from_secs(30));
        check!(config.connect_timeout == Duration::from_secs(10));
        check!(config.pool_idle_per_host == 32);
        check!(config.user_agent.starts_with("querent/"));
        check!(config.accept_encoding == DEFAULT_ACCEPT_ENCODING);
    }

    #[cfg(feature = "middleware-decompression")]
    #[test]
    fn default_hint_lists_decodable_encodings() {
        check!(DEFAULT_ACCEPT_ENCODING == "gzip, deflate, br, zstd");
    }

    #[cfg(not(feature = "middleware-decompression"))]
    #[test]
    fn default_hint_is_identity_without_decoder() {
        check!(DEFAULT_ACCEPT_ENCODING == "identity");
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_per_host(16)
            .user_agent("compliance-audit/2.1")
            .accept_encoding("gzip")
            .build();

        check!(config.timeout == Duration::from_secs(60));
        check!(config.connect_timeout == Duration::from_secs(5));
        check!(config.pool_idle_per_host == 16);
        check!(config.pool_idle_timeout == Duration::from_secs(90));
        check!(config.user_agent == "compliance-audit/2.1");
        check!(config.accept_encoding == "gzip");
    }
}
