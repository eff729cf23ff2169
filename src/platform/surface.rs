use crate::cookies::codec;
use crate::platform::document::CookieDocument;
use crate::platform::request::RequestCookieSource;
use crate::platform::response::ResponseCookieSink;

/// Runtime platform indicator supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Browser,
    Server,
    #[default]
    Unknown,
}

impl PlatformId {
    /// Interpret the host's platform string (`"browser"` or `"server"`).
    /// Anything else, or no indicator at all, is [`PlatformId::Unknown`].
    pub fn from_indicator(indicator: Option<&str>) -> Self {
        match indicator.map(str::trim) {
            Some(id) if id.eq_ignore_ascii_case("browser") => PlatformId::Browser,
            Some(id) if id.eq_ignore_ascii_case("server") => PlatformId::Server,
            _ => PlatformId::Unknown,
        }
    }
}

impl From<&str> for PlatformId {
    fn from(indicator: &str) -> Self {
        PlatformId::from_indicator(Some(indicator))
    }
}

/// The cookie surface one request reads from and writes to.
pub enum CookieSurface<'a> {
    /// The document's live cookie string.
    Browser(&'a dyn CookieDocument),
    /// Request `Cookie` header in, response `Set-Cookie` headers out.
    Server {
        request: Option<&'a dyn RequestCookieSource>,
        response: Option<&'a mut dyn ResponseCookieSink>,
    },
}

impl<'a> CookieSurface<'a> {
    /// Pick the surface for `platform` from the carriers the host provided.
    ///
    /// An unknown platform, or a browser without a document, yields a surface
    /// with nothing to read and nowhere to write.
    pub fn resolve(
        platform: PlatformId,
        document: Option<&'a dyn CookieDocument>,
        request: Option<&'a dyn RequestCookieSource>,
        response: Option<&'a mut dyn ResponseCookieSink>,
    ) -> Self {
        match (platform, document) {
            (PlatformId::Browser, Some(document)) => CookieSurface::Browser(document),
            (PlatformId::Browser, None) => {
                tracing::warn!("browser platform without a document, cookies are unavailable");
                CookieSurface::detached()
            }
            (PlatformId::Server, _) => CookieSurface::Server { request, response },
            (PlatformId::Unknown, _) => {
                tracing::debug!("unrecognized platform, cookies are unavailable");
                CookieSurface::detached()
            }
        }
    }

    /// Server surface without a request or a response.
    pub fn detached() -> Self {
        CookieSurface::Server {
            request: None,
            response: None,
        }
    }

    pub fn is_browser(&self) -> bool {
        matches!(self, CookieSurface::Browser(_))
    }

    /// The cookie string visible to a read.
    ///
    /// On the server this is the request header followed by the `name=value`
    /// pairs of every staged `Set-Cookie`, so staged values win when parsed.
    pub fn read_raw_cookie_header(&self) -> Option<String> {
        match self {
            CookieSurface::Browser(document) => Some(document.cookie()),
            CookieSurface::Server { request, response } => {
                let request_header = request.and_then(|r| r.cookie_header());
                let staged = response
                    .as_deref()
                    .map(|r| r.staged_set_cookies())
                    .unwrap_or_default();

                let parts: Vec<&str> = request_header
                    .as_deref()
                    .into_iter()
                    .chain(staged.iter().filter_map(|value| codec::staged_pair(value)))
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
        }
    }

    /// Write one serialized cookie. Failures are logged and dropped.
    pub fn commit_cookie(&mut self, serialized: &str) {
        match self {
            CookieSurface::Browser(document) => document.set_cookie(serialized),
            CookieSurface::Server {
                response: Some(response),
                ..
            } => {
                if let Err(e) = response.append_set_cookie(serialized) {
                    tracing::warn!(error = %e, "dropping cookie write");
                }
            }
            CookieSurface::Server { response: None, .. } => {
                tracing::debug!("no response to stage cookie on, dropping write");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::document::MemoryDocument;
    use http::HeaderMap;

    #[test]
    fn test_platform_indicator() {
        assert_eq!(PlatformId::from("browser"), PlatformId::Browser);
        assert_eq!(PlatformId::from("Server"), PlatformId::Server);
        assert_eq!(PlatformId::from("worker"), PlatformId::Unknown);
        assert_eq!(PlatformId::from_indicator(None), PlatformId::Unknown);
    }

    #[test]
    fn test_browser_reads_and_writes_document() {
        let doc = MemoryDocument::with_cookie_string("foo=bar");
        let mut surface = CookieSurface::resolve(PlatformId::Browser, Some(&doc), None, None);
        assert!(surface.is_browser());
        assert_eq!(surface.read_raw_cookie_header().as_deref(), Some("foo=bar"));

        surface.commit_cookie("baz=qux;SameSite=Lax;");
        assert_eq!(doc.cookie(), "foo=bar; baz=qux");
    }

    #[test]
    fn test_browser_without_document_is_detached() {
        let mut surface = CookieSurface::resolve(PlatformId::Browser, None, None, None);
        assert!(!surface.is_browser());
        assert_eq!(surface.read_raw_cookie_header(), None);
        surface.commit_cookie("foo=bar;");
    }

    #[test]
    fn test_unknown_platform_ignores_carriers() {
        let request = "foo=bar".to_string();
        let mut response = HeaderMap::new();
        let mut surface = CookieSurface::resolve(
            PlatformId::Unknown,
            None,
            Some(&request),
            Some(&mut response),
        );
        assert_eq!(surface.read_raw_cookie_header(), None);
        surface.commit_cookie("a=1;");
        drop(surface);
        assert!(response.is_empty());
    }

    #[test]
    fn test_server_merges_request_and_staged() {
        let request = "a=1; b=2".to_string();
        let mut response = HeaderMap::new();
        let mut surface =
            CookieSurface::resolve(PlatformId::Server, None, Some(&request), Some(&mut response));

        surface.commit_cookie("a=3;Path=/;SameSite=Lax;");
        assert_eq!(surface.read_raw_cookie_header().as_deref(), Some("a=1; b=2; a=3"));
    }

    #[test]
    fn test_server_without_response_drops_writes() {
        let request = "a=1".to_string();
        let mut surface = CookieSurface::resolve(PlatformId::Server, None, Some(&request), None);
        surface.commit_cookie("b=2;");
        assert_eq!(surface.read_raw_cookie_header().as_deref(), Some("a=1"));
    }

    #[test]
    fn test_server_with_nothing_reads_none() {
        let surface = CookieSurface::detached();
        assert_eq!(surface.read_raw_cookie_header(), None);
    }
}
