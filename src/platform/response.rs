use crate::base::cookieerror::CookieResult;
use http::header::SET_COOKIE;
use http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

const SET_COOKIE_NAME: &str = "Set-Cookie";

/// An outgoing response's `Set-Cookie` collection.
///
/// Writes always append; a cookie staged earlier in the same response is never
/// overwritten.
pub trait ResponseCookieSink {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()>;

    /// `Set-Cookie` values staged so far, in order.
    fn staged_set_cookies(&self) -> Vec<String>;
}

impl<T: ResponseCookieSink + ?Sized> ResponseCookieSink for &mut T {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        (**self).append_set_cookie(value)
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        (**self).staged_set_cookies()
    }
}

impl ResponseCookieSink for HeaderMap {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        self.append(SET_COOKIE, HeaderValue::from_str(value)?);
        Ok(())
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        self.get_all(SET_COOKIE)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect()
    }
}

impl<B> ResponseCookieSink for http::Response<B> {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        self.headers_mut().append_set_cookie(value)
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        self.headers().staged_set_cookies()
    }
}

/// Ordered list of header name/value pairs.
impl ResponseCookieSink for Vec<(String, String)> {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        self.push((SET_COOKIE_NAME.to_string(), value.to_string()));
        Ok(())
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        self.iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(SET_COOKIE_NAME))
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// Value of a header in a plain header record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderField {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderField {
    pub fn values(&self) -> &[String] {
        match self {
            HeaderField::Single(value) => std::slice::from_ref(value),
            HeaderField::Multiple(values) => values,
        }
    }

    /// Add a value; a single value becomes an ordered list.
    pub fn push(&mut self, value: String) {
        match self {
            HeaderField::Single(first) => {
                let first = std::mem::take(first);
                *self = HeaderField::Multiple(vec![first, value]);
            }
            HeaderField::Multiple(values) => values.push(value),
        }
    }
}

fn set_cookie_keys<'k>(keys: impl Iterator<Item = &'k String>) -> Vec<String> {
    let mut matching: Vec<String> = keys
        .filter(|key| key.eq_ignore_ascii_case(SET_COOKIE_NAME))
        .cloned()
        .collect();
    matching.sort();
    matching
}

/// Fold every case variant of `Set-Cookie` into one field and append `value`.
///
/// Variants are merged in sorted key order so the result does not depend on
/// map iteration order. The first sorted key is kept.
fn merge_set_cookie(
    keys: Vec<String>,
    mut take: impl FnMut(&str) -> Option<HeaderField>,
    value: &str,
) -> (String, HeaderField) {
    let key = keys
        .first()
        .cloned()
        .unwrap_or_else(|| SET_COOKIE_NAME.to_string());

    let mut merged: Option<HeaderField> = None;
    for field in keys.iter().filter_map(|k| take(k)) {
        match merged.as_mut() {
            Some(existing) => {
                for staged in field.values() {
                    existing.push(staged.clone());
                }
            }
            None => merged = Some(field),
        }
    }

    let field = match merged {
        Some(mut field) => {
            field.push(value.to_string());
            field
        }
        None => HeaderField::Single(value.to_string()),
    };
    (key, field)
}

impl<S: BuildHasher> ResponseCookieSink for HashMap<String, HeaderField, S> {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        let keys = set_cookie_keys(self.keys());
        let (key, field) = merge_set_cookie(keys, |k| self.remove(k), value);
        self.insert(key, field);
        Ok(())
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        set_cookie_keys(self.keys())
            .iter()
            .filter_map(|key| self.get(key))
            .flat_map(|field| field.values().to_vec())
            .collect()
    }
}

impl ResponseCookieSink for BTreeMap<String, HeaderField> {
    fn append_set_cookie(&mut self, value: &str) -> CookieResult<()> {
        let keys = set_cookie_keys(self.keys());
        let (key, field) = merge_set_cookie(keys, |k| self.remove(k), value);
        self.insert(key, field);
        Ok(())
    }

    fn staged_set_cookies(&self) -> Vec<String> {
        self.iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(SET_COOKIE_NAME))
            .flat_map(|(_, field)| field.values().to_vec())
            .collect()
    }
}
