//! Glob-importable items for querying:
//!
//! ```ignore
//! use querent::prelude::*;
//! ```

pub use crate::{
    ApiClient, CancellationToken, ClientConfig, DateStyle, EndpointFamily, Error, FieldValue,
    HttpClient, HyperClient, OAuth1Credentials, ParameterSet, Predicate, Result, StatusCode,
    WireToken,
};
pub use serde::{Deserialize, Serialize};
