//! Cookie options and their normalization.
//!
//! Callers describe a cookie either with a [`CookieOptions`] structure or with
//! positional fields ([`PositionalArgs`]). Both funnel through [`normalize`],
//! which produces the single canonical [`NormalizedOptions`] the codec
//! serializes.

use crate::base::cookieerror::CookieError;
use crate::config::CookieConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{macros::datetime, Duration, OffsetDateTime};

/// Expiry written when deleting a cookie: `Thu, 01 Jan 1970 00:00:01 GMT`.
///
/// Deployed cookies are cleared with this exact instant, so it must not change.
pub const DELETION_SENTINEL: OffsetDateTime = datetime!(1970-01-01 00:00:01 UTC);

const SECONDS_PER_DAY: i64 = 86_400;

/// Cross-site sending policy of a cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
    #[default]
    Lax,
    None,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::None => "None",
            SameSite::Strict => "Strict",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(SameSite::None)
        } else if s.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else {
            Err(CookieError::invalid_same_site(s))
        }
    }
}

/// When a cookie expires: a number of days from now, or a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Days(i64),
    At(OffsetDateTime),
}

impl Expiry {
    /// Resolve to an absolute instant relative to `now`.
    ///
    /// A zero day count means "no expiry" and yields `None`, as does a day
    /// count too large to represent.
    pub fn resolve(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            Expiry::Days(0) => None,
            Expiry::Days(days) => {
                let resolved = now.checked_add(Duration::seconds(days.saturating_mul(SECONDS_PER_DAY)));
                if resolved.is_none() {
                    tracing::warn!(days, "Cookie expiry out of range, writing a session cookie");
                }
                resolved
            }
            Expiry::At(at) => Some(at),
        }
    }
}

impl From<OffsetDateTime> for Expiry {
    fn from(at: OffsetDateTime) -> Self {
        Expiry::At(at)
    }
}

/// Options structure accepted by [`CookieService::set`](crate::service::CookieService::set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub expires: Option<Expiry>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    /// Defaults to [`SameSite::Lax`] during normalization.
    pub same_site: Option<SameSite>,
    pub partitioned: bool,
    pub http_only: bool,
    pub max_age: Option<i64>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire after the given number of days.
    pub fn expires_in_days(mut self, days: i64) -> Self {
        self.expires = Some(Expiry::Days(days));
        self
    }

    /// Expire at a fixed instant.
    pub fn expires_at(mut self, at: OffsetDateTime) -> Self {
        self.expires = Some(Expiry::At(at));
        self
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
        self.same_site = Some(same_site);
        self
    }

    pub fn partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = partitioned;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set `Max-Age` in seconds.
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }
}

/// The positional call shape: `expires, path, domain, secure, same_site, partitioned`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalArgs {
    pub expires: Option<Expiry>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: Option<bool>,
    pub same_site: Option<SameSite>,
    pub partitioned: Option<bool>,
}

impl PositionalArgs {
    fn into_options(self) -> CookieOptions {
        CookieOptions {
            expires: self.expires,
            path: self.path,
            domain: self.domain,
            secure: self.secure.unwrap_or(false),
            same_site: self.same_site,
            partitioned: self.partitioned.unwrap_or(false),
            http_only: false,
            max_age: None,
        }
    }
}

/// Either call shape of a cookie write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCookieArgs {
    Options(CookieOptions),
    Positional(PositionalArgs),
}

impl Default for SetCookieArgs {
    fn default() -> Self {
        SetCookieArgs::Options(CookieOptions::default())
    }
}

impl From<CookieOptions> for SetCookieArgs {
    fn from(options: CookieOptions) -> Self {
        SetCookieArgs::Options(options)
    }
}

impl From<PositionalArgs> for SetCookieArgs {
    fn from(args: PositionalArgs) -> Self {
        SetCookieArgs::Positional(args)
    }
}

impl From<Expiry> for SetCookieArgs {
    fn from(expires: Expiry) -> Self {
        SetCookieArgs::Positional(PositionalArgs {
            expires: Some(expires),
            ..PositionalArgs::default()
        })
    }
}

impl From<()> for SetCookieArgs {
    fn from(_: ()) -> Self {
        SetCookieArgs::default()
    }
}

/// Canonical option set handed to the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOptions {
    pub expires_at: Option<OffsetDateTime>,
    pub max_age: Option<i64>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
    pub partitioned: bool,
    pub http_only: bool,
    /// `Secure` was added because `SameSite=None` requires it.
    pub forced_secure: bool,
}

impl Default for NormalizedOptions {
    fn default() -> Self {
        Self {
            expires_at: None,
            max_age: None,
            path: None,
            domain: None,
            secure: false,
            same_site: SameSite::Lax,
            partitioned: false,
            http_only: false,
            forced_secure: false,
        }
    }
}

/// Normalize the options of cookie `name` against the current time.
pub fn normalize(name: &str, args: SetCookieArgs, config: &CookieConfig) -> NormalizedOptions {
    normalize_at(name, args, config, OffsetDateTime::now_utc())
}

/// Normalize the options of cookie `name`, resolving day counts against `now`.
pub fn normalize_at(
    name: &str,
    args: SetCookieArgs,
    config: &CookieConfig,
    now: OffsetDateTime,
) -> NormalizedOptions {
    let options = match args {
        SetCookieArgs::Options(options) => options,
        SetCookieArgs::Positional(args) => args.into_options(),
    };

    let same_site = options.same_site.unwrap_or_default();
    let mut secure = options.secure;
    let mut forced_secure = false;
    if same_site == SameSite::None && !secure {
        secure = true;
        forced_secure = true;
        tracing::warn!(
            cookie = %name,
            "Cookie was forced with secure flag because SameSite=None"
        );
    }

    NormalizedOptions {
        expires_at: options.expires.and_then(|expires| expires.resolve(now)),
        max_age: options.max_age,
        path: non_empty(options.path).or_else(|| config.path.clone()),
        domain: non_empty(options.domain).or_else(|| config.domain.clone()),
        secure,
        same_site,
        partitioned: options.partitioned,
        http_only: options.http_only,
        forced_secure,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2020-03-15 10:00:00 UTC);

    fn normalize_now(args: impl Into<SetCookieArgs>) -> NormalizedOptions {
        normalize_at("foo", args.into(), &CookieConfig::default(), NOW)
    }

    #[test]
    fn test_same_site_defaults_to_lax() {
        let normalized = normalize_now(CookieOptions::new());
        assert_eq!(normalized.same_site, SameSite::Lax);
        assert!(!normalized.secure);
        assert!(!normalized.forced_secure);
    }

    #[test]
    fn test_same_site_none_forces_secure() {
        let normalized = normalize_now(CookieOptions::new().same_site(SameSite::None).secure(false));
        assert!(normalized.secure);
        assert!(normalized.forced_secure);
    }

    #[test]
    fn test_same_site_none_with_secure_is_untouched() {
        let normalized = normalize_now(CookieOptions::new().same_site(SameSite::None).secure(true));
        assert!(normalized.secure);
        assert!(!normalized.forced_secure);
    }

    #[test]
    fn test_relative_days_resolve_from_now() {
        let normalized = normalize_now(Expiry::Days(2));
        assert_eq!(normalized.expires_at, Some(datetime!(2020-03-17 10:00:00 UTC)));
    }

    #[test]
    fn test_zero_days_means_session_cookie() {
        let normalized = normalize_now(CookieOptions::new().expires_in_days(0));
        assert_eq!(normalized.expires_at, None);
    }

    #[test]
    fn test_absolute_expiry_passes_through() {
        let at = datetime!(2021-03-15 10:00:00 UTC);
        let normalized = normalize_now(CookieOptions::new().expires_at(at));
        assert_eq!(normalized.expires_at, Some(at));
    }

    #[test]
    fn test_positional_shape_matches_options_shape() {
        let positional = PositionalArgs {
            expires: Some(Expiry::At(datetime!(2021-03-15 10:00:00 UTC))),
            path: Some("/test".to_string()),
            domain: Some("example.com".to_string()),
            secure: Some(true),
            same_site: Some(SameSite::Strict),
            partitioned: None,
        };
        let options = CookieOptions::new()
            .expires_at(datetime!(2021-03-15 10:00:00 UTC))
            .path("/test")
            .domain("example.com")
            .secure(true)
            .same_site(SameSite::Strict);

        assert_eq!(normalize_now(positional), normalize_now(options));
    }

    #[test]
    fn test_config_supplies_fallback_path_and_domain() {
        let config = CookieConfig::new().path("/app").domain("example.com");
        let normalized = normalize_at("foo", CookieOptions::new().into(), &config, NOW);
        assert_eq!(normalized.path.as_deref(), Some("/app"));
        assert_eq!(normalized.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_per_call_path_overrides_config() {
        let config = CookieConfig::new().path("/app").domain("example.com");
        let args = CookieOptions::new().path("/call").domain("call.example.com");
        let normalized = normalize_at("foo", args.into(), &config, NOW);
        assert_eq!(normalized.path.as_deref(), Some("/call"));
        assert_eq!(normalized.domain.as_deref(), Some("call.example.com"));
    }

    #[test]
    fn test_empty_path_is_treated_as_absent() {
        let normalized = normalize_now(CookieOptions::new().path(""));
        assert_eq!(normalized.path, None);
    }

    #[test]
    fn test_same_site_from_str() {
        assert_eq!("lax".parse::<SameSite>(), Ok(SameSite::Lax));
        assert_eq!("None".parse::<SameSite>(), Ok(SameSite::None));
        assert_eq!(" STRICT ".parse::<SameSite>(), Ok(SameSite::Strict));
        assert!(matches!(
            "sideways".parse::<SameSite>(),
            Err(CookieError::InvalidSameSite { .. })
        ));
    }

    #[test]
    fn test_out_of_range_days_write_session_cookie() {
        assert_eq!(Expiry::Days(3_000_000).resolve(NOW), None);
        assert_eq!(Expiry::Days(i64::MAX).resolve(NOW), None);
        assert_eq!(Expiry::Days(i64::MIN).resolve(NOW), None);

        let normalized = normalize_now(CookieOptions::new().expires_in_days(3_000_000));
        assert_eq!(normalized.expires_at, None);
        assert_eq!(
            crate::cookies::codec::serialize_one("c", "1", &normalized),
            "c=1;SameSite=Lax;"
        );
    }

    #[test]
    fn test_deletion_sentinel_value() {
        assert_eq!(DELETION_SENTINEL.unix_timestamp(), 1);
    }
}
