//! The query pipeline, end to end.
//!
//! [`ApiClient`] pairs a transport with the API base URL and runs every call
//! through the same steps:
//!
//! ```text
//! predicate → extract → kind → validate → build → (auth, transport) → map
//! ```
//!
//! Everything up to `build` is synchronous and happens before any network
//! traffic, so validation failures never cost a round trip.

use bytes::Bytes;
use querent_core::{
    BuildMode, DateStyle, EndpointFamily, OperationKind, ParameterExtractor, ParameterSet,
    Predicate, TargetBuilder,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::{Error, Executor, HttpClient, Request, Result};

/// Typed result together with the payload it was mapped from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult<T> {
    /// Body as received (after decompression).
    pub raw: Bytes,
    /// Typed value.
    pub value: T,
}

/// Declarative client over one API base URL.
///
/// Wraps any [`HttpClient`]; share one [`crate::HyperClient`] (and its
/// connection pool) across several `ApiClient`s by cloning it.
///
/// ```ignore
/// use querent::{ApiClient, HyperClient, Predicate};
/// use querent::endpoints::compliance::{ComplianceJobs, ComplianceResponse};
///
/// let api = ApiClient::new(HyperClient::builder().with_bearer_auth(token).build(), "https://api.twitter.com/2/")?;
/// let jobs: ComplianceResponse = api
///     .query::<ComplianceJobs, _>(Some(&ComplianceJobs::single_job("123")), &cancel)
///     .await?;
/// ```
#[derive(Debug)]
pub struct ApiClient<C> {
    executor: Executor<C>,
    base_url: Url,
    date_style: DateStyle,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            base_url: self.base_url.clone(),
            date_style: self.date_style,
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_url(
            client,
            Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        ))
    }

    /// Create a client from a parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            executor: Executor::new(client),
            base_url,
            date_style: DateStyle::Url,
        }
    }

    /// Date format used while extracting parameters.
    ///
    /// Only visible through [`ApiClient::parameters`]; requests always carry
    /// the URL format.
    #[must_use]
    pub const fn with_date_style(mut self, date_style: DateStyle) -> Self {
        self.date_style = date_style;
        self
    }

    /// API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying transport.
    #[must_use]
    pub const fn inner(&self) -> &C {
        self.executor.client()
    }

    /// Extract the parameter set of a predicate.
    ///
    /// # Errors
    ///
    /// Malformed predicates, unknown fields and invalid values.
    pub fn parameters<F: EndpointFamily>(&self, predicate: Option<&Predicate>) -> Result<ParameterSet> {
        ParameterExtractor::for_family::<F>()
            .with_date_style(self.date_style)
            .extract(predicate)
    }

    /// Run every offline step and return the request that would be sent.
    ///
    /// # Errors
    ///
    /// Any extraction, validation or build error.
    pub fn prepare<F: EndpointFamily>(&self, predicate: Option<&Predicate>) -> Result<Request<Bytes>> {
        let params = self.parameters::<F>(predicate)?;
        let kind = F::kind_of(&params)?;
        debug!(family = F::NAME, ?kind, fields = params.len(), "extracted parameters");
        self.build::<F, ()>(kind, Some(params), None)
    }

    /// Run a query and map the response to `T`.
    ///
    /// # Errors
    ///
    /// Validation errors before anything is sent, then transport, HTTP,
    /// cancellation and deserialization errors.
    pub async fn query<F, T>(&self, predicate: Option<&Predicate>, cancel: &CancellationToken) -> Result<T>
    where
        F: EndpointFamily,
        T: DeserializeOwned + Default,
    {
        Ok(self.query_raw::<F, T>(predicate, cancel).await?.value)
    }

    /// Like [`ApiClient::query`], keeping the raw payload.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::query`].
    pub async fn query_raw<F, T>(
        &self,
        predicate: Option<&Predicate>,
        cancel: &CancellationToken,
    ) -> Result<RawResult<T>>
    where
        F: EndpointFamily,
        T: DeserializeOwned + Default,
    {
        let request = self.prepare::<F>(predicate)?;
        self.send(F::NAME, request, cancel).await
    }

    /// Run a command of a known kind, with an optional JSON payload.
    ///
    /// The parameter set only needs the path fields of the kind.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::query`]; [`Error::NullInput`] if `params` is `None`.
    pub async fn command<F, B, T>(
        &self,
        kind: F::Kind,
        params: Option<ParameterSet>,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<RawResult<T>>
    where
        F: EndpointFamily,
        B: Serialize + Sync,
        T: DeserializeOwned + Default,
    {
        let request = self.build::<F, B>(kind, params, body)?;
        self.send(F::NAME, request, cancel).await
    }

    fn build<F, B>(
        &self,
        kind: F::Kind,
        params: Option<ParameterSet>,
        body: Option<&B>,
    ) -> Result<Request<Bytes>>
    where
        F: EndpointFamily,
        B: Serialize,
    {
        let validated = F::rules().validate(params, kind)?;
        let builder = TargetBuilder::for_family::<F>();
        let request = match (kind.mode(), body) {
            (BuildMode::Body, Some(body)) => builder.build_with_body(&validated, &self.base_url, body)?,
            (BuildMode::Body, None) => {
                return Err(Error::invalid_request(format!(
                    "{}::{kind:?} needs a request body",
                    F::NAME
                )));
            }
            (BuildMode::Path | BuildMode::Query, _) => builder.build(&validated, &self.base_url)?,
        };
        debug!(family = F::NAME, ?kind, method = %request.method(), url = %request.url(), "built request");
        Ok(request)
    }

    async fn send<T>(&self, family: &str, request: Request<Bytes>, cancel: &CancellationToken) -> Result<RawResult<T>>
    where
        T: DeserializeOwned + Default,
    {
        let raw = self.executor.execute(request, cancel).await?;
        let value = querent_core::map_response(&raw)?;
        debug!(family, bytes = raw.len(), "mapped response");
        Ok(RawResult { raw, value })
    }
}
