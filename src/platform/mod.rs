//! Where cookies are read from and written to.
//!
//! In the browser the surface is the document's live cookie string. During
//! server-side rendering it is the incoming request's `Cookie` header plus the
//! `Set-Cookie` headers staged on the outgoing response.
//!
//! | Browser | Server |
//! |---------|--------|
//! | [`CookieDocument`](document::CookieDocument) | [`RequestCookieSource`](request::RequestCookieSource) + [`ResponseCookieSink`](response::ResponseCookieSink) |
//!
//! [`CookieSurface`](surface::CookieSurface) is the single place that branches
//! on the platform.

pub mod document;
pub mod request;
pub mod response;
pub mod surface;
