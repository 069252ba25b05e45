//! Error type shared across the crate.
//!
//! A single opaque [`Error`] with a [`Kind`] discriminant. Operations never
//! retry or swallow failures; every error propagates to the caller with its
//! kind intact so callers can branch on it.

use std::fmt;

use reqwest::StatusCode;

/// Broad error category, stable across minor releases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Bad or missing caller input, detected before any network attempt.
    Validation,
    /// Unknown currency symbol or token mapping in the configured table.
    Config,
    /// The signing provider could not produce a signature.
    Signing,
    /// Network-level failure, including timeouts surfaced by the HTTP client.
    Transport,
    /// Non-2xx HTTP response from the API.
    Api,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Validation => "validation",
            Kind::Config => "config",
            Kind::Signing => "signing",
            Kind::Transport => "transport",
            Kind::Api => "api",
        };
        f.write_str(name)
    }
}

/// Crate-wide error.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    message: Option<String>,
    status: Option<StatusCode>,
    body: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            body: None,
            source: None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(Kind::Validation)
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(Kind::Config)
        }
    }

    pub(crate) fn signing(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(Kind::Signing)
        }
    }

    pub(crate) fn signing_failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(Kind::Signing)
        }
    }

    pub(crate) fn api(status: StatusCode, body: String) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            ..Self::new(Kind::Api)
        }
    }

    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// HTTP status code, present only for [`Kind::Api`].
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Raw response body, present only for [`Kind::Api`].
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        } else if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        } else if let Some(body) = &self.body {
            write!(f, ": {body}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self {
            status: source.status(),
            source: Some(Box::new(source)),
            ..Self::new(Kind::Transport)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self {
            message: Some(format!("invalid url: {source}")),
            ..Self::new(Kind::Validation)
        }
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(source: alloy::signers::Error) -> Self {
        Self::signing(source)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(Kind::Validation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = Error::api(StatusCode::BAD_REQUEST, "nope".into());
        assert_eq!(err.kind(), Kind::Api, "kind should be Api");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST), "status kept");
        assert_eq!(err.body(), Some("nope"), "body kept");
    }

    #[test]
    fn validation_error_has_no_status() {
        let err = Error::validation("missing symbol");
        assert_eq!(err.kind(), Kind::Validation, "kind should be Validation");
        assert!(err.status().is_none(), "no status on local errors");
        assert!(err.to_string().contains("missing symbol"), "message shown");
    }
}
