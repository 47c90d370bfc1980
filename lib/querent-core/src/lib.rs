//! Core types for querent, a declarative query layer over remote HTTP APIs.
//!
//! A query flows through the crate in one direction:
//!
//! 1. a [`Predicate`] describes the request as `field == value` terms,
//! 2. the [`ParameterExtractor`] turns it into an ordered [`ParameterSet`],
//! 3. the family's [`RuleTable`] validates the set for one operation kind,
//! 4. the [`TargetBuilder`] produces a [`Request`] (path, query or body mode),
//! 5. an [`HttpClient`] sends it, and [`map_response`] types the result.
//!
//! Endpoint families plug in through [`EndpointFamily`] and [`OperationKind`].
//! Transport, authentication and the end-to-end client live in the `querent`
//! crate.
//!
//! Also re-exported: [`StatusCode`] and [`header`] from the `http` crate.

mod body;
mod builder;
mod client;
mod error;
mod extract;
mod family;
mod field;
mod method;
mod params;
mod path_template;
mod predicate;
pub mod prelude;
mod request;
mod response;
mod rules;
mod value;

pub use body::{ContentType, from_json, map_response, to_form, to_json};
pub use builder::{QUERY_ENCODE_SET, TargetBuilder};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use extract::ParameterExtractor;
pub use family::{BuildMode, EndpointFamily, OperationKind};
pub use field::{FieldDecl, FieldKind, ParamLocation, lookup as lookup_field};
pub use method::Method;
pub use params::ParameterSet;
pub use path_template::PathTemplate;
pub use predicate::{Comparison, Predicate};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use rules::{Companion, ExclusiveGroup, Rule, RuleTable, ValidatedSet};
pub use value::{DateStyle, FieldValue, WireToken, join_list};

pub use http::{StatusCode, header};
