use http::header::COOKIE;
use http::HeaderMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Anything an incoming request's `Cookie` header can be read from.
pub trait RequestCookieSource {
    /// The raw `Cookie` header, if the request carries one.
    fn cookie_header(&self) -> Option<String>;
}

impl<T: RequestCookieSource + ?Sized> RequestCookieSource for &T {
    fn cookie_header(&self) -> Option<String> {
        (**self).cookie_header()
    }
}

/// Case-insensitive lookup. Multiple `Cookie` fields (as sent over HTTP/2)
/// are joined with `"; "`.
impl RequestCookieSource for HeaderMap {
    fn cookie_header(&self) -> Option<String> {
        let values: Vec<String> = self
            .get_all(COOKIE)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join("; "))
        }
    }
}

impl<B> RequestCookieSource for http::Request<B> {
    fn cookie_header(&self) -> Option<String> {
        self.headers().cookie_header()
    }
}

impl<S: BuildHasher> RequestCookieSource for HashMap<String, String, S> {
    fn cookie_header(&self) -> Option<String> {
        self.get("cookie").or_else(|| self.get("Cookie")).cloned()
    }
}

impl RequestCookieSource for BTreeMap<String, String> {
    fn cookie_header(&self) -> Option<String> {
        self.get("cookie").or_else(|| self.get("Cookie")).cloned()
    }
}

/// A cookie string handed over by the host as-is.
impl RequestCookieSource for str {
    fn cookie_header(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl RequestCookieSource for String {
    fn cookie_header(&self) -> Option<String> {
        Some(self.clone())
    }
}

/// Header carrier exposing only a `get(name)` accessor.
///
/// The accessor is tried with `cookie` first, then `Cookie`.
pub struct HeaderAccessor<F> {
    get: F,
}

impl<F> HeaderAccessor<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(get: F) -> Self {
        Self { get }
    }
}

impl<F> RequestCookieSource for HeaderAccessor<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn cookie_header(&self) -> Option<String> {
        (self.get)("cookie").or_else(|| (self.get)("Cookie"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_header_map_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Cookie", HeaderValue::from_static("foo=bar"));
        assert_eq!(headers.cookie_header().as_deref(), Some("foo=bar"));
    }

    #[test]
    fn test_header_map_joins_multiple_fields() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(headers.cookie_header().as_deref(), Some("a=1; b=2"));
    }

    #[test]
    fn test_header_map_without_cookie() {
        assert_eq!(HeaderMap::new().cookie_header(), None);
    }

    #[test]
    fn test_request_delegates_to_headers() {
        let request = http::Request::builder()
            .header("cookie", "foo=bar")
            .body(())
            .unwrap();
        assert_eq!(request.cookie_header().as_deref(), Some("foo=bar"));
    }

    #[test]
    fn test_plain_maps_accept_both_casings() {
        let mut lower = HashMap::new();
        lower.insert("cookie".to_string(), "a=1".to_string());
        assert_eq!(lower.cookie_header().as_deref(), Some("a=1"));

        let mut upper = BTreeMap::new();
        upper.insert("Cookie".to_string(), "b=2".to_string());
        assert_eq!(upper.cookie_header().as_deref(), Some("b=2"));

        let mut other = HashMap::new();
        other.insert("COOKIE".to_string(), "c=3".to_string());
        assert_eq!(other.cookie_header(), None);
    }

    #[test]
    fn test_accessor_tries_lowercase_then_capitalized() {
        let accessor = HeaderAccessor::new(|name: &str| {
            (name == "Cookie").then(|| "foo=bar".to_string())
        });
        assert_eq!(accessor.cookie_header().as_deref(), Some("foo=bar"));
    }

    #[test]
    fn test_raw_string() {
        assert_eq!("foo=bar".cookie_header().as_deref(), Some("foo=bar"));
        assert_eq!(String::from("a=1").cookie_header().as_deref(), Some("a=1"));
    }
}
