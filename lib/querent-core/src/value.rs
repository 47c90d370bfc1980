//! Typed field values and their canonical string forms.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Enumerations that travel on the wire as a fixed token.
///
/// The token is what the remote API expects (`in_progress`), which is
/// usually not the Rust variant name (`InProgress`).
pub trait WireToken {
    /// Wire token for this value.
    fn wire_token(&self) -> &'static str;
}

/// How date values are rendered during extraction.
///
/// The two formats differ on purpose: [`DateStyle::Url`] is part of the wire
/// contract, [`DateStyle::Diagnostic`] is meant for logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateStyle {
    /// `yyyy-MM-ddTHH:mm:ssZ`
    #[default]
    Url,
    /// `MM/dd/yyyy HH:mm:ss`
    Diagnostic,
}

impl DateStyle {
    const URL_PATTERN: &'static str = "%Y-%m-%dT%H:%M:%SZ";
    const DIAGNOSTIC_PATTERN: &'static str = "%m/%d/%Y %H:%M:%S";

    /// `strftime` pattern of this style.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Url => Self::URL_PATTERN,
            Self::Diagnostic => Self::DIAGNOSTIC_PATTERN,
        }
    }

    /// Format a timestamp in this style.
    #[must_use]
    pub fn format(self, value: &DateTime<Utc>) -> String {
        value.format(self.pattern()).to_string()
    }

    /// Parse a timestamp written in either style, or as RFC 3339.
    ///
    /// Timestamps without an offset are taken as UTC.
    #[must_use]
    pub fn parse_any(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc));
        }
        [
            Self::URL_PATTERN,
            Self::DIAGNOSTIC_PATTERN,
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S",
        ]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .map(|naive| naive.and_utc())
    }
}

/// A typed value on the right-hand side of a field comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text, sent as is.
    Text(String),
    /// Point in time.
    Date(DateTime<Utc>),
    /// Enumerated value, already reduced to its wire token.
    Token(&'static str),
    /// List of values, joined with commas.
    List(Vec<String>),
}

impl FieldValue {
    /// Text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Enumerated value.
    #[must_use]
    pub fn token(value: &impl WireToken) -> Self {
        Self::Token(value.wire_token())
    }

    /// List of text values.
    #[must_use]
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// List of enumerated values.
    #[must_use]
    pub fn tokens<'a, I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: WireToken + 'a,
    {
        Self::List(
            values
                .into_iter()
                .map(|value| value.wire_token().to_string())
                .collect(),
        )
    }

    /// Short name of the value type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Token(_) => "token",
            Self::List(_) => "list",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value.and_utc())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Normalize list elements and join them with a single comma.
///
/// Each element is split on commas and trimmed before joining, so both
/// `["a", " b "]` and `["a, b"]` give `"a,b"`. Empty pieces are dropped.
#[must_use]
pub fn join_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
