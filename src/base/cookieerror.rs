use thiserror::Error;

/// Errors raised by the fallible building blocks of the crate.
///
/// The [`CookieService`](crate::service::CookieService) never returns these;
/// it logs and degrades instead. They surface from parsing helpers,
/// configuration loading and pattern compilation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    #[error("Invalid SameSite value: {value:?}")]
    InvalidSameSite { value: String },
    #[error("Set-Cookie value rejected by header sink: {value:?}")]
    InvalidHeaderValue { value: String },
    #[error("Cookie lookup pattern failed to compile: {message}")]
    InvalidPattern { message: String },
    #[error("Invalid cookie configuration: {message}")]
    Config { message: String },
    #[error("Failed to read cookie configuration {path}: {message}")]
    ConfigIo { path: String, message: String },
}

impl CookieError {
    pub fn invalid_same_site(value: impl Into<String>) -> Self {
        CookieError::InvalidSameSite {
            value: value.into(),
        }
    }

    pub fn invalid_header_value(value: impl Into<String>) -> Self {
        CookieError::InvalidHeaderValue {
            value: value.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CookieError::Config {
            message: message.into(),
        }
    }

    pub fn config_io(path: impl Into<String>, err: std::io::Error) -> Self {
        CookieError::ConfigIo {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for CookieError {
    fn from(err: regex::Error) -> Self {
        CookieError::InvalidPattern {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CookieError {
    fn from(err: serde_json::Error) -> Self {
        CookieError::Config {
            message: err.to_string(),
        }
    }
}

impl From<http::header::InvalidHeaderValue> for CookieError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        CookieError::InvalidHeaderValue {
            value: err.to_string(),
        }
    }
}

/// Result type alias for cookie operations that can fail.
pub type CookieResult<T> = Result<T, CookieError>;
