//! Body serialization and response mapping.

use bytes::Bytes;

use crate::Result;

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use querent_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Like { tweet_id: String }
///
/// let like = Like { tweet_id: "20".to_string() };
/// let bytes = to_json(&like).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"tweet_id":"20"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// # Errors
///
/// [`crate::Error::Deserialization`] carrying the path to the offending field
/// and a copy of the original payload.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::deserialization(
            e.path().to_string(),
            e.inner().to_string(),
            Bytes::copy_from_slice(bytes),
        )
    })
}

/// Map a raw response body to a typed result.
///
/// An empty (or whitespace-only) body and a literal JSON `null` map to
/// `T::default()`, so callers always get a value they can inspect.
/// Anything else must deserialize as `T`.
///
/// # Errors
///
/// [`crate::Error::Deserialization`] if the payload is malformed or does not
/// match `T`. A malformed payload never degrades to the default value.
///
/// # Example
///
/// ```
/// use querent_core::map_response;
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, PartialEq, Deserialize)]
/// struct Liked { liked: bool }
///
/// let empty: Liked = map_response(b"").expect("default");
/// assert_eq!(empty, Liked::default());
///
/// let liked: Liked = map_response(br#"{"liked":true}"#).expect("typed");
/// assert!(liked.liked);
///
/// assert!(map_response::<Liked>(b"{oops").is_err());
/// ```
pub fn map_response<T>(raw: &[u8]) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() || trimmed == b"null" {
        return Ok(T::default());
    }
    from_json(raw)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Error;

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Job {
        id: String,
        #[serde(default)]
        status: Option<String>,
    }

    #[test]
    fn content_type_as_str() {
        check!(ContentType::Json.as_str() == "application/json");
        check!(ContentType::FormUrlEncoded.to_string() == "application/x-www-form-urlencoded");
    }

    #[test]
    fn to_form_serialize() {
        #[derive(serde::Serialize)]
        struct Update {
            status: String,
            include_entities: bool,
        }

        let update = Update {
            status: "Hello Ladies + Gentlemen".to_string(),
            include_entities: true,
        };

        let bytes = to_form(&update).expect("serialize");
        check!(bytes.as_ref() == b"status=Hello+Ladies+%2B+Gentlemen&include_entities=true");
    }

    #[test]
    fn empty_body_maps_to_default() {
        check!(map_response::<Job>(b"").expect("default") == Job::default());
        check!(map_response::<Job>(b"  \n").expect("default") == Job::default());
        check!(map_response::<Job>(b"null").expect("default") == Job::default());
    }

    #[test]
    fn body_maps_to_typed_value() {
        let job: Job = map_response(br#"{"id":"1","status":"expired"}"#).expect("job");
        check!(job.id == "1");
        check!(job.status.as_deref() == Some("expired"));
    }

    #[test]
    fn malformed_body_keeps_payload() {
        let raw = br#"{"id": 1}"#;
        let_assert!(Err(Error::Deserialization { path, payload, .. }) = map_response::<Job>(raw));
        check!(path == "id");
        check!(payload.as_ref() == raw);
    }

    #[test]
    fn broken_json_is_not_defaulted() {
        let_assert!(Err(Error::Deserialization { .. }) = map_response::<Job>(b"{\"id\":"));
    }
}
