//! Path templates with `{name}` placeholders.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Result};

/// Characters escaped in a substituted path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// A path template relative to the API base URL.
///
/// ```
/// use querent_core::PathTemplate;
///
/// let template = PathTemplate::new("users/{id}/likes/{tweet_id}");
/// let path = template
///     .render(|name| match name {
///         "id" => Some("15"),
///         "tweet_id" => Some("20"),
///         _ => None,
///     })
///     .expect("render");
/// assert_eq!(path, "users/15/likes/20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Placeholder names, in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.0.split('{').skip(1).filter_map(|rest| {
            rest.split_once('}').map(|(name, _)| name)
        })
    }

    /// Substitute every placeholder with its percent-encoded value.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] naming the first placeholder without a value.
    pub fn render<'v>(&self, mut value_of: impl FnMut(&str) -> Option<&'v str>) -> Result<String> {
        let mut path = self.0.to_string();
        for name in self.placeholders() {
            let value = value_of(name).ok_or_else(|| Error::missing_field(name))?;
            let encoded = utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string();
            path = path.replace(&format!("{{{name}}}"), &encoded);
        }
        Ok(path)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn placeholders_in_order() {
        let template = PathTemplate::new("users/{id}/posts/{post_id}");
        check!(template.placeholders().collect::<Vec<_>>() == ["id", "post_id"]);
        check!(PathTemplate::new("tweets/compliance/jobs").placeholders().count() == 0);
    }

    #[test]
    fn render_encodes_segments() {
        let template = PathTemplate::new("files/{name}");
        let path = template
            .render(|_| Some("a b/c?d"))
            .expect("render");
        check!(path == "files/a%20b%2Fc%3Fd");
    }

    #[test]
    fn render_reports_missing_placeholder() {
        let template = PathTemplate::new("tweets/compliance/jobs/{id}");
        let_assert!(Err(Error::MissingRequiredField { field }) = template.render(|_| None));
        check!(field == "id");
    }

    #[test]
    fn path_template_as_ref() {
        let template = PathTemplate::new("users/{id}");
        let s: &str = template.as_ref();
        check!(s == "users/{id}");
        check!(template.to_string() == "users/{id}");
    }
}
