//! Base types and error handling.
//!
//! - [`CookieError`](cookieerror::CookieError): errors of the fallible helpers

pub mod cookieerror;
