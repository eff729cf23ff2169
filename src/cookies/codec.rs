//! Cookie string codec.
//!
//! Converts between the concatenated `name=value; name2=value2` form used by
//! `document.cookie` and the `Cookie` request header, a decoded [`CookieJar`],
//! and single `Set-Cookie` values.
//!
//! Names and values are percent-encoded with the `encodeURIComponent` reserved
//! set so cookies written by this crate and by browser script code agree on
//! the wire format.

use crate::base::cookieerror::CookieResult;
use crate::cookies::jar::CookieJar;
use crate::cookies::options::NormalizedOptions;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use time::{macros::format_description, OffsetDateTime, UtcOffset};

/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters escaped before a name is embedded in a lookup pattern.
const PATTERN_RESERVED: &str = "[]{}()|=;+?,.*^$\\";

/// Percent-encode a cookie name or value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Percent-decode `token`, returning it unchanged when it is not valid
/// percent-encoded UTF-8.
pub fn decode_percent(token: &str) -> String {
    if !has_well_formed_escapes(token) {
        return token.to_string();
    }
    match percent_decode_str(token).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => token.to_string(),
    }
}

// Every '%' must introduce two hex digits.
fn has_well_formed_escapes(token: &str) -> bool {
    let mut bytes = token.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            match (bytes.next(), bytes.next()) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {}
                _ => return false,
            }
        }
    }
    true
}

/// Backslash-escape the pattern metacharacters in `name`.
pub fn escape_for_matching(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if PATTERN_RESERVED.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Lookup pattern for the wire-form (already encoded) cookie name.
///
/// Matches the name at the start of the string or after a `;` separator and
/// captures the raw value up to the next `;` or end of string.
pub fn cookie_pattern(encoded_name: &str) -> String {
    let escaped = escape_for_matching(encoded_name);
    format!(r"(?:^{0}|;\s*{0})=(.*?)(?:;|$)", escaped)
}

/// Compiled [`cookie_pattern`] for a decoded cookie name.
pub fn cookie_regex(name: &str) -> CookieResult<Regex> {
    Ok(Regex::new(&cookie_pattern(&encode_component(name)))?)
}

/// Find the decoded value of the first cookie called `name` in `raw`.
///
/// This is a single-cookie lookup and keeps the first match. When a name
/// repeats, [`parse_all`] (and therefore the service reads) keeps the last
/// value instead.
pub fn lookup(raw: &str, name: &str) -> Option<String> {
    let regex = match cookie_regex(name) {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!(cookie = %name, error = %e, "cookie lookup pattern rejected");
            return None;
        }
    };
    regex
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|value| decode_percent(value.as_str()))
}

/// Parse a concatenated cookie string into a decoded jar.
///
/// Fragments without `=` are flag cookies with an empty value. Later
/// duplicates overwrite earlier ones.
pub fn parse_all(raw: &str) -> CookieJar {
    let mut jar = CookieJar::new();
    for fragment in raw.split(';') {
        let fragment = fragment.strip_prefix(' ').unwrap_or(fragment);
        if fragment.trim().is_empty() {
            continue;
        }
        let (name, value) = fragment.split_once('=').unwrap_or((fragment, ""));
        if name.is_empty() {
            continue;
        }
        jar.insert(decode_percent(name), decode_percent(value));
    }
    jar
}

/// Raw `name=value` pair of a `Set-Cookie` value, without its attributes.
pub fn staged_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie
        .split_once(';')
        .map_or(set_cookie, |(pair, _)| pair)
        .trim();
    let name = pair.split_once('=').map_or(pair, |(name, _)| name);
    if name.trim().is_empty() {
        None
    } else {
        Some(pair)
    }
}

/// Format an instant as an RFC 1123 HTTP date, e.g. `Thu, 01 Jan 1970 00:00:01 GMT`.
pub fn http_date(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.to_offset(UtcOffset::UTC).format(format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    ))
}

/// Serialize one cookie into a `Set-Cookie` value.
///
/// Attribute order is fixed: Expires, Max-Age, Path, Domain, Secure,
/// SameSite, Partitioned, HttpOnly. `SameSite` is always written.
pub fn serialize_one(name: &str, value: &str, options: &NormalizedOptions) -> String {
    let mut out = format!("{}={};", encode_component(name), encode_component(value));

    if let Some(at) = options.expires_at {
        match http_date(at) {
            Ok(date) => out.push_str(&format!("Expires={};", date)),
            Err(e) => tracing::warn!(cookie = %name, error = %e, "dropping unformattable Expires"),
        }
    }
    if let Some(max_age) = options.max_age {
        out.push_str(&format!("Max-Age={};", max_age));
    }
    if let Some(path) = &options.path {
        out.push_str(&format!("Path={};", path));
    }
    if let Some(domain) = &options.domain {
        out.push_str(&format!("Domain={};", domain));
    }
    if options.secure {
        out.push_str("Secure;");
    }
    out.push_str(&format!("SameSite={};", options.same_site));
    if options.partitioned {
        out.push_str("Partitioned;");
    }
    if options.http_only {
        out.push_str("HttpOnly;");
    }
    out
}
