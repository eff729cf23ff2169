//! # cookiebridge
//!
//! Read and write HTTP cookies with one API, whether the code runs in a
//! browser or renders the same application on a server.
//!
//! In the browser cookies live in the document's live cookie string. On the
//! server they arrive in the request's `Cookie` header and leave as
//! `Set-Cookie` headers on the response. `cookiebridge` hides the difference
//! and keeps server reads consistent with writes made earlier in the same
//! request.
//!
//! ## Features
//!
//! - **Codec**: `encodeURIComponent`-compatible encoding, safe decoding,
//!   regex-based name lookup, fixed-order `Set-Cookie` serialization
//! - **Options**: positional or structured arguments, `SameSite=Lax` by default,
//!   `Secure` forced for `SameSite=None`
//! - **Platforms**: browser documents, `http::HeaderMap`, plain header maps and
//!   accessor closures
//! - **Read-after-write**: staged `Set-Cookie` values override request cookies
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiebridge::platform::document::MemoryDocument;
//! use cookiebridge::{CookieOptions, CookieScope, CookieService, SameSite};
//!
//! let document = MemoryDocument::new();
//! let mut cookies = CookieService::browser(&document);
//!
//! cookies.set("theme", "dark", CookieOptions::new().path("/").same_site(SameSite::Strict));
//! assert_eq!(cookies.get("theme"), "dark");
//!
//! cookies.delete("theme", &CookieScope::new().path("/"));
//! assert!(!cookies.check("theme"));
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`config`] - Service-wide defaults
//! - [`cookies`] - Codec, jar and option normalization
//! - [`platform`] - Browser document and server header carriers
//! - [`service`] - The [`CookieService`] façade

pub mod base;
pub mod config;
pub mod cookies;
pub mod platform;
pub mod service;

pub use base::cookieerror::{CookieError, CookieResult};
pub use config::CookieConfig;
pub use cookies::jar::CookieJar;
pub use cookies::options::{CookieOptions, Expiry, PositionalArgs, SameSite, SetCookieArgs};
pub use platform::surface::{CookieSurface, PlatformId};
pub use service::{CookieScope, CookieService, CookieServiceBuilder};
