//! Field declarations of an endpoint family.
//!
//! A family declares its fields once, in a fixed order. That order drives
//! the parameter set, and therefore the order of keys on the wire.

use std::fmt;

/// Where a field travels in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Selects the operation kind; never sent.
    Selector,
    /// Substituted into the path template (e.g., `jobs/{id}`).
    Path,
    /// Query string parameter (e.g., `?status=expired`).
    Query,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector => write!(f, "selector"),
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Value type accepted by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Timestamp.
    Date,
    /// Enumerated value.
    Token,
    /// Comma-joined list.
    List,
}

/// Declaration of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    /// Canonical field name, as used in predicates (`EndTime`).
    pub name: &'static str,
    /// Name on the wire (`end_time`).
    pub wire_name: &'static str,
    /// Accepted value type.
    pub kind: FieldKind,
    /// Where the value is sent.
    pub location: ParamLocation,
}

impl FieldDecl {
    /// Query-string field.
    #[must_use]
    pub const fn query(name: &'static str, wire_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire_name,
            kind,
            location: ParamLocation::Query,
        }
    }

    /// Text field substituted in the path template under `{wire_name}`.
    #[must_use]
    pub const fn path(name: &'static str, wire_name: &'static str) -> Self {
        Self {
            name,
            wire_name,
            kind: FieldKind::Text,
            location: ParamLocation::Path,
        }
    }

    /// Operation kind selector.
    #[must_use]
    pub const fn selector(name: &'static str) -> Self {
        Self {
            name,
            wire_name: name,
            kind: FieldKind::Token,
            location: ParamLocation::Selector,
        }
    }
}

/// Find a field by canonical name.
#[must_use]
pub fn lookup<'a>(fields: &'a [FieldDecl], name: &str) -> Option<&'a FieldDecl> {
    fields.iter().find(|decl| decl.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldDecl] = &[
        FieldDecl::selector("Type"),
        FieldDecl::path("ID", "id"),
        FieldDecl::query("EndTime", "end_time", FieldKind::Date),
    ];

    #[test]
    fn param_location_display() {
        assert_eq!(ParamLocation::Selector.to_string(), "selector");
        assert_eq!(ParamLocation::Path.to_string(), "path");
        assert_eq!(ParamLocation::Query.to_string(), "query");
    }

    #[test]
    fn const_constructors() {
        let id = FIELDS.get(1).expect("id field");
        assert_eq!(id.location, ParamLocation::Path);
        assert_eq!(id.kind, FieldKind::Text);

        let selector = FIELDS.first().expect("selector");
        assert_eq!(selector.wire_name, "Type");
        assert_eq!(selector.kind, FieldKind::Token);
    }

    #[test]
    fn lookup_by_canonical_name() {
        assert_eq!(
            lookup(FIELDS, "EndTime").map(|decl| decl.wire_name),
            Some("end_time")
        );
        assert!(lookup(FIELDS, "end_time").is_none());
    }
}
