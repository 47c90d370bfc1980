//! Declarative query layer over remote HTTP APIs.
//!
//! Callers describe a request as a [`Predicate`] over the typed fields of an
//! endpoint family; querent extracts, validates, builds, authenticates and
//! sends it, then maps the JSON response into a typed result.
//!
//! # Example
//!
//! ```ignore
//! use querent::prelude::*;
//! use querent::endpoints::compliance::{ComplianceJobs, ComplianceResponse, JobStatus};
//!
//! let http = HyperClient::builder()
//!     .with_oauth1(OAuth1Credentials::new(key, secret, token, token_secret))
//!     .with_retry(2)
//!     .build();
//! let api = ApiClient::new(http, "https://api.twitter.com/2/")?;
//!
//! let predicate = ComplianceJobs::multiple_jobs()
//!     .and(ComplianceJobs::status_in(&[JobStatus::InProgress, JobStatus::Expired]));
//! let jobs: ComplianceResponse = api
//!     .query::<ComplianceJobs, _>(Some(&predicate), &CancellationToken::new())
//!     .await?;
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod endpoints;
mod executor;
pub mod middleware;
pub mod prelude;

pub use api_client::{ApiClient, RawResult};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_ACCEPT_ENCODING, DEFAULT_USER_AGENT};
pub use executor::Executor;
pub use middleware::{Authenticator, BearerToken, OAuth1, OAuth1Credentials, OAuthStamp};

pub use tower;
pub use tokio_util::sync::CancellationToken;

pub use querent_core::{
    BuildMode, Comparison, ContentType, DateStyle, EndpointFamily, Error, FieldDecl, FieldKind,
    FieldValue, HttpClient, Method, OperationKind, ParamLocation, ParameterExtractor,
    ParameterSet, PathTemplate, Predicate, Request, RequestBuilder, Response, Result, Rule,
    RuleTable, TargetBuilder, ValidatedSet, WireToken, from_json, join_list, map_response,
    to_form, to_json,
};

pub use querent_core::{StatusCode, header};
