//! Command descriptors and URL escaping

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::AriResult;

/// Characters left unescaped in a URL path segment: RFC 3986 `unreserved`,
/// `sub-delims`, `:` and `@`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Characters left unescaped in a query key or value. Kept in sync with
/// [`QUERY_SAFE_CHARS`](crate::constants::QUERY_SAFE_CHARS).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'!')
    .remove(b'.')
    .remove(b'~')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b';')
    .remove(b':')
    .remove(b'$')
    .remove(b'?')
    .remove(b'/')
    .remove(b'[')
    .remove(b']')
    .remove(b'@');

/// Escape one path segment (a channel id, playback id, ...).
///
/// ```
/// use asterisk_ari_tokio::escape_path_segment;
/// assert_eq!(escape_path_segment("PJSIP/100-0001"), "PJSIP%2F100-0001");
/// ```
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Escape a query key or value. Spaces become `+`.
///
/// ```
/// use asterisk_ari_tokio::escape_query_component;
/// assert_eq!(escape_query_component("sound:hello world"), "sound:hello+world");
/// ```
pub fn escape_query_component(component: &str) -> String {
    component
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// HTTP method of an ARI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HttpMethod {
    /// Read a resource.
    Get,
    /// Create a resource or trigger an action.
    Post,
    /// Remove a resource or stop an action.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// One ARI request: method, path relative to the ARI base URL, query
/// parameters, and an optional JSON body.
///
/// Paths are stored already escaped; build them with [`escape_path_segment`]
/// for any user-supplied part. Query parameters are stored raw and escaped
/// when rendered by [`uri`](Self::uri).
///
/// ```
/// use asterisk_ari_tokio::AriCommand;
///
/// let cmd = AriCommand::post("channels/abc/dial")
///     .query("caller", "alice bob")
///     .query("timeout", "30");
/// assert_eq!(cmd.uri(), "channels/abc/dial?caller=alice+bob&timeout=30");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AriCommand {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl AriCommand {
    /// Command with the given method and escaped relative path.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            path: path
                .trim_start_matches('/')
                .to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET` command.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST` command.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// `DELETE` command.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .push((key.into(), value.into()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON body.
    pub fn json_body<T: Serialize>(self, body: &T) -> AriResult<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Escaped relative path, without query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query parameters in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, if any.
    pub fn json(&self) -> Option<&Value> {
        self.body
            .as_ref()
    }

    /// Relative request target: escaped path plus escaped query string.
    pub fn uri(&self) -> String {
        if self
            .query
            .is_empty()
        {
            return self
                .path
                .clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", escape_query_component(k), escape_query_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for AriCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::QUERY_SAFE_CHARS;
    use serde_json::json;

    #[test]
    fn test_path_segment_escapes_reserved() {
        assert_eq!(escape_path_segment("abc/def"), "abc%2Fdef");
        assert_eq!(escape_path_segment("a b"), "a%20b");
        assert_eq!(escape_path_segment("a?b#c"), "a%3Fb%23c");
        assert_eq!(escape_path_segment("1700000000.42"), "1700000000.42");
    }

    #[test]
    fn test_path_segment_keeps_sub_delims() {
        assert_eq!(escape_path_segment("a+b=c;d:e@f"), "a+b=c;d:e@f");
        assert_eq!(escape_path_segment("x~y!z$'()*,&"), "x~y!z$'()*,&");
    }

    #[test]
    fn test_path_segment_utf8() {
        assert_eq!(escape_path_segment("é"), "%C3%A9");
    }

    #[test]
    fn test_query_safe_chars_untouched() {
        assert_eq!(escape_query_component(QUERY_SAFE_CHARS), QUERY_SAFE_CHARS);
    }

    #[test]
    fn test_query_escapes_separators() {
        assert_eq!(escape_query_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(escape_query_component("1+1"), "1%2B1");
        assert_eq!(escape_query_component("#frag"), "%23frag");
    }

    #[test]
    fn test_query_space_as_plus() {
        assert_eq!(escape_query_component("hello world "), "hello+world+");
    }

    #[test]
    fn test_uri_without_query() {
        let cmd = AriCommand::post("channels/abc/answer");
        assert_eq!(cmd.uri(), "channels/abc/answer");
        assert_eq!(cmd.to_string(), "POST channels/abc/answer");
    }

    #[test]
    fn test_leading_slash_stripped() {
        let cmd = AriCommand::get("/channels");
        assert_eq!(cmd.path(), "channels");
    }

    #[test]
    fn test_query_opt() {
        let cmd = AriCommand::post("channels/a/variable")
            .query("variable", "FOO")
            .query_opt("value", None::<String>);
        assert_eq!(cmd.uri(), "channels/a/variable?variable=FOO");
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Body {
            endpoint: &'static str,
        }
        let cmd = AriCommand::post("channels")
            .json_body(&Body {
                endpoint: "PJSIP/100",
            })
            .unwrap();
        assert_eq!(cmd.json(), Some(&json!({"endpoint": "PJSIP/100"})));
    }
}
