//! Endpoint families.
//!
//! A family groups the operations that share one field table, for example
//! "compliance jobs" with a single-job lookup and a filtered job listing.

use std::fmt;

use crate::{
    Error, FieldDecl, Method, ParamLocation, ParameterSet, Result, RuleTable, WireToken,
};

/// How a request target is built for an operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Single resource: path fields are substituted, no query string.
    Path,
    /// Filtered lookup: query fields become the query string.
    Query,
    /// Write command: path fields are substituted, payload goes in the body.
    Body,
}

/// Operation kind of an endpoint family.
pub trait OperationKind: WireToken + Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Parse a kind from its wire token.
    fn from_token(token: &str) -> Option<Self>;

    /// Build mode of this kind.
    fn mode(&self) -> BuildMode;

    /// Path template, relative to the API base URL (e.g., `tweets/compliance/jobs/{id}`).
    fn path_template(&self) -> &'static str;

    /// HTTP method of this kind.
    fn method(&self) -> Method {
        Method::Get
    }
}

/// Static description of an endpoint family.
///
/// # Example
///
/// ```ignore
/// struct Users;
///
/// impl EndpointFamily for Users {
///     type Kind = UserKind;
///     const NAME: &'static str = "users";
///     const FIELDS: &'static [FieldDecl] = &[
///         FieldDecl::selector("Type"),
///         FieldDecl::path("ID", "id"),
///         FieldDecl::query("Usernames", "usernames", FieldKind::List),
///     ];
///
///     fn rules() -> &'static RuleTable<UserKind> {
///         static RULES: LazyLock<RuleTable<UserKind>> = LazyLock::new(|| {
///             RuleTable::new()
///                 .rule(UserKind::Single, Rule::new().require("ID"))
///                 .rule(UserKind::ByUsernames, Rule::new().require("Usernames"))
///         });
///         &RULES
///     }
/// }
/// ```
pub trait EndpointFamily {
    /// Operation kind enumeration.
    type Kind: OperationKind;

    /// Family name, for logs.
    const NAME: &'static str;

    /// Fields in declared order. Exactly one should be a selector.
    const FIELDS: &'static [FieldDecl];

    /// Validation rules, built once.
    fn rules() -> &'static RuleTable<Self::Kind>;

    /// Read the operation kind from an extracted parameter set.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] if the selector is absent,
    /// [`Error::InvalidValue`] if it names no known kind.
    fn kind_of(params: &ParameterSet) -> Result<Self::Kind> {
        let selector = Self::FIELDS
            .iter()
            .find(|decl| decl.location == ParamLocation::Selector)
            .ok_or_else(|| {
                Error::invalid_request(format!("family '{}' declares no selector", Self::NAME))
            })?;
        let token = params
            .get(selector.name)
            .ok_or_else(|| Error::missing_field(selector.name))?;
        Self::Kind::from_token(token).ok_or_else(|| Error::invalid_value(selector.name, token))
    }
}
