//! Request authentication.
//!
//! An [`Authenticator`] attaches transport identity to a built request.
//! [`AuthLayer`] applies it around the transport together with the
//! client identification and compression hint headers, so every attempt
//! that reaches the wire is authenticated, retries included.
//!
//! Two authenticators ship with the crate:
//!
//! - [`OAuth1`]: OAuth 1.0a user context, HMAC-SHA1 signature over the
//!   method, the URL and its query parameters, and form body parameters,
//! - [`BearerToken`]: app-only `Authorization: Bearer <token>`.

use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use hmac::{Hmac, Mac};
use percent_encoding::utf8_percent_encode;
use querent_core::{ContentType, QUERY_ENCODE_SET};
use rand::{Rng, distributions::Alphanumeric};
use sha1::Sha1;
use tower::{Layer, Service};
use url::form_urlencoded;

use crate::{ClientConfig, Error, Request, Response, Result};

type HmacSha1 = Hmac<Sha1>;

const AUTHORIZATION: &str = "authorization";
const NONCE_LEN: usize = 32;

/// Attaches identity to an outbound request.
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Add authentication data (usually the `Authorization` header).
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be signed.
    fn authenticate(&self, request: &mut Request<Bytes>) -> Result<()>;
}

impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    fn authenticate(&self, request: &mut Request<Bytes>) -> Result<()> {
        (**self).authenticate(request)
    }
}

// ============================================================================
// OAuth 1.0a
// ============================================================================

/// OAuth 1.0a user-context credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    /// Consumer (API) key.
    pub consumer_key: String,
    /// Consumer (API) secret.
    pub consumer_secret: String,
    /// Access token.
    pub token: String,
    /// Access token secret.
    pub token_secret: String,
}

impl OAuth1Credentials {
    /// Bundle the four credential strings.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

impl fmt::Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token", &self.token)
            .field("token_secret", &"***")
            .finish()
    }
}

/// Nonce and timestamp of one signed request.
///
/// Stored in the request extensions the first time the request is signed and
/// reused afterwards. Insert one beforehand to pin the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    /// Random single-use token.
    pub nonce: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl OAuthStamp {
    /// Stamp with explicit values.
    pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }

    /// Fresh random nonce, current time.
    #[must_use]
    pub fn generate() -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect::<String>();
        Self::new(nonce, chrono::Utc::now().timestamp())
    }
}

/// OAuth 1.0a HMAC-SHA1 request signer.
#[derive(Debug, Clone)]
pub struct OAuth1 {
    credentials: OAuth1Credentials,
}

impl OAuth1 {
    /// Signer for the given credentials.
    #[must_use]
    pub const fn new(credentials: OAuth1Credentials) -> Self {
        Self { credentials }
    }

    fn protocol_params(&self, stamp: &OAuthStamp) -> Vec<(String, String)> {
        vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), stamp.nonce.clone()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), stamp.timestamp.to_string()),
            ("oauth_token".to_string(), self.credentials.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]
    }

    /// Signature base string: `METHOD&url&params`, every part RFC 3986 encoded.
    ///
    /// The parameter string holds the protocol parameters, the URL query
    /// parameters and, for form bodies, the body parameters; encoded, then
    /// sorted by key and value.
    #[must_use]
    pub fn signature_base(&self, request: &Request<Bytes>, stamp: &OAuthStamp) -> String {
        let mut params: Vec<(String, String)> = self
            .protocol_params(stamp)
            .into_iter()
            .chain(
                request
                    .url()
                    .query_pairs()
                    .map(|(key, value)| (key.into_owned(), value.into_owned())),
            )
            .chain(form_params(request))
            .map(|(key, value)| (encode(&key), encode(&value)))
            .collect();
        params.sort();

        let param_string = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut base_url = request.url().clone();
        base_url.set_query(None);
        base_url.set_fragment(None);

        format!(
            "{}&{}&{}",
            request.method().as_str(),
            encode(base_url.as_str()),
            encode(&param_string)
        )
    }

    /// Base64 HMAC-SHA1 of the signature base string.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key is rejected.
    pub fn signature(&self, request: &Request<Bytes>, stamp: &OAuthStamp) -> Result<String> {
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| Error::invalid_request(format!("invalid signing key: {e}")))?;
        mac.update(self.signature_base(request, stamp).as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Full `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be signed.
    pub fn authorization(&self, request: &Request<Bytes>, stamp: &OAuthStamp) -> Result<String> {
        let signature = self.signature(request, stamp)?;
        let mut params = self.protocol_params(stamp);
        params.push(("oauth_signature".to_string(), signature));
        params.sort();

        let fields = params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }
}

impl Authenticator for OAuth1 {
    fn authenticate(&self, request: &mut Request<Bytes>) -> Result<()> {
        let stamp = match request.extensions().get::<OAuthStamp>() {
            Some(stamp) => stamp.clone(),
            None => {
                let stamp = OAuthStamp::generate();
                request.extensions_mut().insert(stamp.clone());
                stamp
            }
        };
        let header = self.authorization(request, &stamp)?;
        request.set_header(AUTHORIZATION, header);
        Ok(())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

fn form_params(request: &Request<Bytes>) -> Vec<(String, String)> {
    let is_form = request
        .header("content-type")
        .is_some_and(|value| value.starts_with(ContentType::FormUrlEncoded.as_str()));
    match request.body() {
        Some(body) if is_form => form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Bearer
// ============================================================================

/// App-only bearer token authentication.
#[derive(Clone)]
pub struct BearerToken {
    token: Arc<str>,
}

impl BearerToken {
    /// Authenticator for the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}

impl Authenticator for BearerToken {
    fn authenticate(&self, request: &mut Request<Bytes>) -> Result<()> {
        request.set_header(AUTHORIZATION, format!("Bearer {}", self.token));
        Ok(())
    }
}

// ============================================================================
// Layer
// ============================================================================

/// Layer that authenticates requests and adds the identity headers.
///
/// ```ignore
/// use querent::middleware::{AuthLayer, BearerToken};
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(AuthLayer::new(BearerToken::new("token"), &config))
///     .service(transport);
/// ```
#[derive(Debug, Clone)]
pub struct AuthLayer {
    authenticator: Option<Arc<dyn Authenticator>>,
    user_agent: Arc<str>,
    accept_encoding: Arc<str>,
}

impl AuthLayer {
    /// Layer with an authenticator.
    pub fn new(authenticator: impl Authenticator + 'static, config: &ClientConfig) -> Self {
        Self {
            authenticator: Some(Arc::new(authenticator)),
            ..Self::identity_only(config)
        }
    }

    /// Layer adding only `User-Agent` and `Accept-Encoding`.
    #[must_use]
    pub fn identity_only(config: &ClientConfig) -> Self {
        Self {
            authenticator: None,
            user_agent: Arc::from(config.user_agent.as_str()),
            accept_encoding: Arc::from(config.accept_encoding.as_str()),
        }
    }

    /// Replace the authenticator with a shared one.
    #[must_use]
    pub fn with_shared(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = Auth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Auth {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service that authenticates requests.
#[derive(Debug, Clone)]
pub struct Auth<S> {
    inner: S,
    layer: AuthLayer,
}

impl<S> Auth<S> {
    fn prepare(&self, request: &mut Request<Bytes>) -> Result<()> {
        request.set_header_if_absent("user-agent", self.layer.user_agent.as_ref());
        request.set_header_if_absent("accept-encoding", self.layer.accept_encoding.as_ref());
        match &self.layer.authenticator {
            Some(authenticator) => authenticator.authenticate(request),
            None => Ok(()),
        }
    }
}

impl<S> Service<Request<Bytes>> for Auth<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        if let Err(err) = self.prepare(&mut request) {
            return Box::pin(future::ready(Err(err)));
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
