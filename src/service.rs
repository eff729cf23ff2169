use crate::config::CookieConfig;
use crate::cookies::codec;
use crate::cookies::jar::CookieJar;
use crate::cookies::options::{
    self, CookieOptions, Expiry, PositionalArgs, SameSite, SetCookieArgs, DELETION_SENTINEL,
};
use crate::platform::document::CookieDocument;
use crate::platform::request::RequestCookieSource;
use crate::platform::response::ResponseCookieSink;
use crate::platform::surface::{CookieSurface, PlatformId};

/// Attributes identifying which cookie a delete targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieScope {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }
}

/// Cookie access for one request (server) or one document (browser).
///
/// Reads never fail: an absent cookie, a malformed encoding or a missing
/// carrier all read as "no cookie". Writes that cannot be delivered are
/// dropped and logged.
///
/// # Example
///
/// ```rust
/// use cookiebridge::{CookieService, PlatformId};
/// use http::HeaderMap;
///
/// let request = "theme=dark".to_string();
/// let mut response = HeaderMap::new();
/// let mut cookies = CookieService::builder(PlatformId::Server)
///     .request(&request)
///     .response(&mut response)
///     .build();
///
/// cookies.set("session", "abc", ());
/// assert_eq!(cookies.get("session"), "abc");
/// assert_eq!(cookies.get("theme"), "dark");
/// ```
pub struct CookieService<'a> {
    surface: CookieSurface<'a>,
    config: CookieConfig,
}

impl<'a> CookieService<'a> {
    pub fn builder(platform: PlatformId) -> CookieServiceBuilder<'a> {
        CookieServiceBuilder::new(platform)
    }

    /// Service over a browser document.
    pub fn browser<D: CookieDocument + 'a>(document: &'a D) -> Self {
        Self::builder(PlatformId::Browser).document(document).build()
    }

    /// Service over a server request/response pair.
    pub fn server(
        request: Option<&'a dyn RequestCookieSource>,
        response: Option<&'a mut dyn ResponseCookieSink>,
    ) -> Self {
        Self::from_surface(CookieSurface::Server { request, response })
    }

    /// Service with nothing to read and nowhere to write.
    pub fn detached() -> Self {
        Self::from_surface(CookieSurface::detached())
    }

    pub fn from_surface(surface: CookieSurface<'a>) -> Self {
        Self {
            surface,
            config: CookieConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CookieConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CookieConfig {
        &self.config
    }

    pub fn surface(&self) -> &CookieSurface<'a> {
        &self.surface
    }

    /// Whether a cookie named `name` is visible.
    pub fn check(&self, name: &str) -> bool {
        self.get_all().has(name)
    }

    /// Value of cookie `name`, or `""` if it is absent.
    ///
    /// An absent cookie and a cookie with an empty value are indistinguishable.
    pub fn get(&self, name: &str) -> String {
        self.get_all().value_of(name).to_string()
    }

    /// Snapshot of every visible cookie.
    pub fn get_all(&self) -> CookieJar {
        self.surface
            .read_raw_cookie_header()
            .map(|raw| codec::parse_all(&raw))
            .unwrap_or_default()
    }

    /// Write a cookie.
    ///
    /// `args` is either a [`CookieOptions`] structure, [`PositionalArgs`], an
    /// [`Expiry`], or `()` for defaults.
    pub fn set(&mut self, name: &str, value: &str, args: impl Into<SetCookieArgs>) {
        let normalized = options::normalize(name, args.into(), &self.config);
        let serialized = codec::serialize_one(name, value, &normalized);
        tracing::debug!(cookie = %name, browser = self.surface.is_browser(), "setting cookie");
        self.surface.commit_cookie(&serialized);
    }

    /// Write a cookie from positional fields.
    pub fn set_positional(&mut self, name: &str, value: &str, args: PositionalArgs) {
        self.set(name, value, args);
    }

    /// Expire cookie `name` within `scope`.
    pub fn delete(&mut self, name: &str, scope: &CookieScope) {
        let options = CookieOptions {
            expires: Some(Expiry::At(DELETION_SENTINEL)),
            path: scope.path.clone(),
            domain: scope.domain.clone(),
            secure: scope.secure,
            same_site: Some(scope.same_site),
            ..CookieOptions::default()
        };
        self.set(name, "", options);
    }

    /// Expire every cookie visible right now within `scope`.
    pub fn delete_all(&mut self, scope: &CookieScope) {
        let names: Vec<String> = self.get_all().into_iter().map(|(name, _)| name).collect();
        tracing::debug!(count = names.len(), "deleting all cookies");
        for name in &names {
            self.delete(name, scope);
        }
    }
}

/// Assembles a [`CookieService`] from whatever carriers the host provides.
pub struct CookieServiceBuilder<'a> {
    platform: PlatformId,
    document: Option<&'a dyn CookieDocument>,
    request: Option<&'a dyn RequestCookieSource>,
    response: Option<&'a mut dyn ResponseCookieSink>,
    config: CookieConfig,
}

impl<'a> CookieServiceBuilder<'a> {
    pub fn new(platform: PlatformId) -> Self {
        Self {
            platform,
            document: None,
            request: None,
            response: None,
            config: CookieConfig::default(),
        }
    }

    pub fn document<D: CookieDocument + 'a>(mut self, document: &'a D) -> Self {
        self.document = Some(document);
        self
    }

    pub fn request<R: RequestCookieSource + 'a>(mut self, request: &'a R) -> Self {
        self.request = Some(request);
        self
    }

    pub fn response<S: ResponseCookieSink + 'a>(mut self, response: &'a mut S) -> Self {
        self.response = Some(response);
        self
    }

    pub fn config(mut self, config: CookieConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> CookieService<'a> {
        let surface =
            CookieSurface::resolve(self.platform, self.document, self.request, self.response);
        CookieService::from_surface(surface).with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::document::MemoryDocument;
    use http::HeaderMap;

    #[test]
    fn test_browser_set_then_get() {
        let doc = MemoryDocument::new();
        let mut cookies = CookieService::browser(&doc);
        cookies.set("foo", "bar", ());
        assert_eq!(cookies.get("foo"), "bar");
        assert!(cookies.check("foo"));
    }

    #[test]
    fn test_check_matches_names_only() {
        let doc = MemoryDocument::with_cookie_string("foo=bar; test1=test123");
        let cookies = CookieService::browser(&doc);
        assert!(cookies.check("foo"));
        assert!(!cookies.check("bar"));
        assert!(cookies.check("test1"));
        assert!(!cookies.check("test123"));
    }

    #[test]
    fn test_server_read_after_write() {
        let mut response = HeaderMap::new();
        let mut cookies = CookieService::server(None, Some(&mut response));
        assert!(!cookies.check("foo"));

        cookies.set("foo", "bar", ());
        assert_eq!(cookies.get("foo"), "bar");
    }

    #[test]
    fn test_detached_degrades() {
        let mut cookies = CookieService::detached();
        cookies.set("foo", "bar", ());
        assert!(!cookies.check("foo"));
        assert_eq!(cookies.get("foo"), "");
        assert!(cookies.get_all().is_empty());
        cookies.delete_all(&CookieScope::default());
    }

    #[test]
    fn test_config_fallback_applies_to_writes() {
        let mut response = HeaderMap::new();
        let mut cookies = CookieService::server(None, Some(&mut response))
            .with_config(CookieConfig::new().path("/app"));
        cookies.set("foo", "bar", ());
        cookies.set("baz", "qux", CookieOptions::new().path("/other"));
        drop(cookies);

        let staged: Vec<_> = response.get_all(http::header::SET_COOKIE).iter().collect();
        assert_eq!(staged[0], "foo=bar;Path=/app;SameSite=Lax;");
        assert_eq!(staged[1], "baz=qux;Path=/other;SameSite=Lax;");
    }

    #[test]
    fn test_scope_builder() {
        let scope = CookieScope::new()
            .path("/test")
            .domain("example.com")
            .secure(true)
            .same_site(SameSite::Strict);
        assert_eq!(scope.path.as_deref(), Some("/test"));
        assert_eq!(scope.domain.as_deref(), Some("example.com"));
        assert!(scope.secure);
        assert_eq!(scope.same_site, SameSite::Strict);
    }
}
