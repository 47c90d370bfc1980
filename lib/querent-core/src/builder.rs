//! Request target building.
//!
//! Turns a [`ValidatedSet`] into a [`Request`]. The operation kind decides
//! the [`BuildMode`]:
//!
//! - path mode substitutes path fields and appends no query string,
//! - query mode emits `?k1=v1&k2=v2` in parameter set order,
//! - body mode substitutes path fields and attaches a JSON payload.
//!
//! Query values are encoded with the RFC 3986 unreserved set: everything
//! but `A-Z a-z 0-9 - . _ ~` is percent-encoded, so a list separator `,`
//! becomes `%2C` and a time separator `:` becomes `%3A`.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::{
    BuildMode, DateStyle, EndpointFamily, Error, FieldDecl, FieldKind, OperationKind,
    ParamLocation, PathTemplate, Request, RequestBuilder, Result, ValidatedSet, field, join_list,
};

/// Characters escaped in query keys and values.
pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds requests for the operations of one field table.
#[derive(Debug, Clone, Copy)]
pub struct TargetBuilder {
    fields: &'static [FieldDecl],
}

impl TargetBuilder {
    /// Builder over a field table.
    #[must_use]
    pub const fn new(fields: &'static [FieldDecl]) -> Self {
        Self { fields }
    }

    /// Builder over the fields of an endpoint family.
    #[must_use]
    pub const fn for_family<F: EndpointFamily>() -> Self {
        Self::new(F::FIELDS)
    }

    /// Build the request of a path-mode or query-mode operation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if the kind is a body-mode operation
    /// - [`Error::MissingRequiredField`] if a path placeholder has no value
    /// - [`Error::UnknownField`] if the set holds an undeclared field
    /// - [`Error::InvalidValue`] if a date value cannot be canonicalized
    pub fn build<K: OperationKind>(
        &self,
        validated: &ValidatedSet<K>,
        base_url: &Url,
    ) -> Result<Request<Bytes>> {
        if validated.kind().mode() == BuildMode::Body {
            return Err(Error::invalid_request(format!(
                "{:?} needs a body, use build_with_body",
                validated.kind()
            )));
        }
        Ok(self.target(validated, base_url)?.build())
    }

    /// Build the request of a body-mode operation with a JSON payload.
    ///
    /// # Errors
    ///
    /// Same as [`TargetBuilder::build`], plus serialization errors.
    pub fn build_with_body<K, T>(
        &self,
        validated: &ValidatedSet<K>,
        base_url: &Url,
        body: &T,
    ) -> Result<Request<Bytes>>
    where
        K: OperationKind,
        T: serde::Serialize,
    {
        Ok(self.target(validated, base_url)?.json(body)?.build())
    }

    fn target<K: OperationKind>(
        &self,
        validated: &ValidatedSet<K>,
        base_url: &Url,
    ) -> Result<RequestBuilder<Bytes>> {
        let kind = validated.kind();
        let path = self.render_path(PathTemplate::new(kind.path_template()), validated)?;
        let mut url = resolve(base_url, &path)?;

        match kind.mode() {
            BuildMode::Query => {
                let query = self.encode_query(validated)?;
                url.set_query((!query.is_empty()).then_some(query.as_str()));
            }
            BuildMode::Path | BuildMode::Body => url.set_query(None),
        }

        Ok(Request::builder(kind.method(), url))
    }

    fn render_path<K: Copy>(
        &self,
        template: PathTemplate,
        validated: &ValidatedSet<K>,
    ) -> Result<String> {
        let params = validated.params();
        let mut values = Vec::new();
        for placeholder in template.placeholders() {
            let decl = self
                .fields
                .iter()
                .find(|decl| decl.location == ParamLocation::Path && decl.wire_name == placeholder)
                .ok_or_else(|| {
                    Error::invalid_request(format!(
                        "no path field declared for '{{{placeholder}}}' in '{template}'"
                    ))
                })?;
            let value = params
                .get(decl.name)
                .ok_or_else(|| Error::missing_field(decl.name))?;
            if value.trim().is_empty() || is_dot_segment(value) {
                return Err(Error::invalid_value(decl.name, value));
            }
            values.push((placeholder, value));
        }

        template.render(|name| {
            values
                .iter()
                .find(|(placeholder, _)| *placeholder == name)
                .map(|(_, value)| *value)
        })
    }

    fn encode_query<K: Copy>(&self, validated: &ValidatedSet<K>) -> Result<String> {
        let mut pairs = Vec::new();
        for (name, value) in validated.params().iter() {
            let decl = field::lookup(self.fields, name).ok_or_else(|| Error::unknown_field(name))?;
            if decl.location != ParamLocation::Query {
                continue;
            }
            let value = canonical_value(decl, value)?;
            pairs.push(format!(
                "{}={}",
                utf8_percent_encode(decl.wire_name, QUERY_ENCODE_SET),
                utf8_percent_encode(&value, QUERY_ENCODE_SET)
            ));
        }
        Ok(pairs.join("&"))
    }
}

/// Canonical wire form of a query value, whichever extraction mode produced it.
fn canonical_value(decl: &FieldDecl, value: &str) -> Result<String> {
    match decl.kind {
        FieldKind::Date => DateStyle::parse_any(value)
            .map(|date| DateStyle::Url.format(&date))
            .ok_or_else(|| Error::invalid_value(decl.name, value)),
        FieldKind::List => Ok(join_list([value])),
        FieldKind::Text | FieldKind::Token => Ok(value.to_string()),
    }
}

/// `.` and `..` (literal or `%2e`-encoded) would be collapsed by URL
/// resolution and point at another resource.
fn is_dot_segment(value: &str) -> bool {
    let decoded = value.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Resolve a relative path against the base URL, treating the base as a directory.
fn resolve(base_url: &Url, path: &str) -> Result<Url> {
    let path = path.trim_start_matches('/');
    if base_url.path().ends_with('/') {
        return base_url.join(path).map_err(Error::InvalidUrl);
    }
    let mut base = base_url.clone();
    base.set_path(&format!("{}/", base_url.path()));
    base.join(path).map_err(Error::InvalidUrl)
}
