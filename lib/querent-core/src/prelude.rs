//! Glob-importable items for defining endpoint families:
//!
//! ```
//! use querent_core::prelude::*;
//! ```

pub use crate::{
    BuildMode, EndpointFamily, Error, FieldDecl, FieldKind, FieldValue, HttpClient, Method,
    OperationKind, ParameterSet, Predicate, Request, Response, Result, Rule, RuleTable,
    WireToken,
};
