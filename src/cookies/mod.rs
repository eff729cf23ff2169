//! Cookie codec, jar and option normalization.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`codec`] | Parse cookie strings, serialize `Set-Cookie` values, name lookup |
//! | [`jar`] | Decoded name → value view ([`CookieJar`](jar::CookieJar)) |
//! | [`options`] | Call shapes, defaults and the `SameSite=None` policy |
//!
//! # Example
//!
//! ```rust
//! use cookiebridge::config::CookieConfig;
//! use cookiebridge::cookies::codec::{parse_all, serialize_one};
//! use cookiebridge::cookies::options::{normalize, CookieOptions, SameSite};
//!
//! let options = normalize(
//!     "session",
//!     CookieOptions::new().path("/").same_site(SameSite::Strict).into(),
//!     &CookieConfig::default(),
//! );
//! assert_eq!(
//!     serialize_one("session", "a b", &options),
//!     "session=a%20b;Path=/;SameSite=Strict;"
//! );
//!
//! let jar = parse_all("session=a%20b; theme=dark");
//! assert_eq!(jar.value_of("session"), "a b");
//! ```

pub mod codec;
pub mod jar;
pub mod options;
