use cookie::Cookie;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::{Duration, OffsetDateTime};

/// The live cookie slot of a browser document.
///
/// Reading returns every visible cookie as `name=value` pairs joined by
/// `"; "`. Writing assigns a single serialized cookie, which the host merges
/// into its cookie set.
pub trait CookieDocument {
    fn cookie(&self) -> String;
    fn set_cookie(&self, serialized: &str);
}

impl<T: CookieDocument + ?Sized> CookieDocument for &T {
    fn cookie(&self) -> String {
        (**self).cookie()
    }

    fn set_cookie(&self, serialized: &str) {
        (**self).set_cookie(serialized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
}

impl StoredCookie {
    fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }
}

/// In-process document with browser assignment semantics.
///
/// A cookie is identified by name, path and domain. Assigning an existing
/// cookie replaces its value in place; an `Expires` in the past or a
/// non-positive `Max-Age` removes it. Names and values are kept in wire form.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    cookies: Mutex<Vec<StoredCookie>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing `name=value; ...` cookie string.
    pub fn with_cookie_string(raw: &str) -> Self {
        let cookies = raw
            .split(';')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| {
                let (name, value) = fragment.split_once('=').unwrap_or((fragment, ""));
                StoredCookie {
                    name: name.to_string(),
                    value: value.to_string(),
                    path: None,
                    domain: None,
                }
            })
            .collect();
        Self {
            cookies: Mutex::new(cookies),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredCookie>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieDocument for MemoryDocument {
    fn cookie(&self) -> String {
        self.lock()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_cookie(&self, serialized: &str) {
        let parsed = match Cookie::parse(serialized) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unparseable cookie assignment");
                return;
            }
        };

        let now = OffsetDateTime::now_utc();
        let expired = parsed.expires_datetime().is_some_and(|at| at <= now)
            || parsed.max_age().is_some_and(|age| age <= Duration::ZERO);

        let incoming = StoredCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            path: parsed.path().map(str::to_string),
            domain: parsed.domain().map(str::to_string),
        };

        let mut cookies = self.lock();
        let existing = cookies.iter().position(|c| c.same_slot(&incoming));
        match (existing, expired) {
            (Some(idx), true) => {
                cookies.remove(idx);
            }
            (Some(idx), false) => cookies[idx] = incoming,
            (None, true) => {}
            (None, false) => cookies.push(incoming),
        }
    }
}
