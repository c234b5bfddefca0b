//! Error types for the API client.
//!
//! [`DomainError`] is the typed form of a failure response from HMRC: one
//! variant per well-known HTTP status plus an [`DomainError::UnknownRequest`]
//! catch-all. [`Error`] is what [`Client::execute`](crate::Client::execute)
//! returns and wraps either a `DomainError` or the untouched transport error.

/// A failure response from the HMRC API, classified by HTTP status.
///
/// Named variants always report their own fixed status from
/// [`status`](Self::status). Only `UnknownRequest` stores the status that was
/// actually observed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// HTTP 400: the request arguments were rejected.
    #[error("Bad request: {message}")]
    BadRequest { message: String, code: Option<String> },
    /// HTTP 401: the access token is missing, invalid or expired.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, code: Option<String> },
    /// HTTP 403: the token lacks the required scope or permission.
    #[error("Forbidden: {message}")]
    Forbidden { message: String, code: Option<String> },
    /// HTTP 404: the endpoint or the data it refers to does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String, code: Option<String> },
    /// HTTP 405
    #[error("Method not allowed: {message}")]
    MethodNotAllowed { message: String, code: Option<String> },
    /// HTTP 406: usually an unsupported API version in the Accept header.
    #[error("Not acceptable: {message}")]
    NotAcceptable { message: String, code: Option<String> },
    /// HTTP 429: rate limited.
    #[error("Too many requests: {message}")]
    TooManyRequests { message: String, code: Option<String> },
    /// HTTP 500
    #[error("Internal server error: {message}")]
    InternalServer { message: String, code: Option<String> },
    /// HTTP 501
    #[error("Not implemented: {message}")]
    NotImplemented { message: String, code: Option<String> },
    /// HTTP 503
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String, code: Option<String> },
    /// HTTP 504
    #[error("Gateway timeout: {message}")]
    GatewayTimeout { message: String, code: Option<String> },
    /// Any status without a dedicated variant.
    #[error("Request failed with status {status}: {message}")]
    UnknownRequest {
        message: String,
        code: Option<String>,
        status: u16,
    },
}

impl DomainError {
    /// Classifies a failure response by its HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::BadRequest { message, code },
            401 => Self::Unauthorized { message, code },
            403 => Self::Forbidden { message, code },
            404 => Self::NotFound { message, code },
            405 => Self::MethodNotAllowed { message, code },
            406 => Self::NotAcceptable { message, code },
            429 => Self::TooManyRequests { message, code },
            500 => Self::InternalServer { message, code },
            501 => Self::NotImplemented { message, code },
            503 => Self::ServiceUnavailable { message, code },
            504 => Self::GatewayTimeout { message, code },
            status => Self::UnknownRequest {
                message,
                code,
                status,
            },
        }
    }

    /// The HTTP status this error represents.
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::NotAcceptable { .. } => 406,
            Self::TooManyRequests { .. } => 429,
            Self::InternalServer { .. } => 500,
            Self::NotImplemented { .. } => 501,
            Self::ServiceUnavailable { .. } => 503,
            Self::GatewayTimeout { .. } => 504,
            Self::UnknownRequest { status, .. } => *status,
        }
    }

    /// The human-readable message returned by the API.
    pub fn message(&self) -> &str {
        let (message, _) = self.parts();
        message
    }

    /// The machine-readable error code returned by the API, e.g.
    /// `INVALID_VRN` or `MATCHING_RESOURCE_NOT_FOUND`.
    pub fn code(&self) -> Option<&str> {
        let (_, code) = self.parts();
        code.as_deref()
    }

    /// Stable name of the error kind, suitable for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BadRequestError",
            Self::Unauthorized { .. } => "UnauthorizedError",
            Self::Forbidden { .. } => "ForbiddenError",
            Self::NotFound { .. } => "NotFoundError",
            Self::MethodNotAllowed { .. } => "MethodNotAllowedError",
            Self::NotAcceptable { .. } => "NotAcceptableError",
            Self::TooManyRequests { .. } => "TooManyRequestsError",
            Self::InternalServer { .. } => "InternalServerError",
            Self::NotImplemented { .. } => "NotImplementedError",
            Self::ServiceUnavailable { .. } => "ServiceUnavailableError",
            Self::GatewayTimeout { .. } => "GatewayTimeoutError",
            Self::UnknownRequest { .. } => "UnknownRequestError",
        }
    }

    fn parts(&self) -> (&str, &Option<String>) {
        match self {
            Self::BadRequest { message, code }
            | Self::Unauthorized { message, code }
            | Self::Forbidden { message, code }
            | Self::NotFound { message, code }
            | Self::MethodNotAllowed { message, code }
            | Self::NotAcceptable { message, code }
            | Self::TooManyRequests { message, code }
            | Self::InternalServer { message, code }
            | Self::NotImplemented { message, code }
            | Self::ServiceUnavailable { message, code }
            | Self::GatewayTimeout { message, code }
            | Self::UnknownRequest { message, code, .. } => (message.as_str(), code),
        }
    }
}

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API answered with a structured error body.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The request failed below the API contract (network error, timeout, or
    /// an error response without a structured body). The original error is
    /// passed through as-is.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The endpoint could not be joined onto the base URL.
    #[error("Invalid endpoint {endpoint:?}: {source}")]
    InvalidUrl {
        endpoint: String,
        source: url::ParseError,
    },
    /// A header name or value could not be sent over HTTP.
    #[error("Invalid header {name:?}")]
    InvalidHeader { name: String },
    /// The request arguments could not be serialized.
    #[error("Failed to encode request arguments: {0}")]
    Encode(#[source] serde_json::Error),
    /// A success response did not match the expected type.
    #[error("Failed to parse response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Returns the mapped API error, if this is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// The HTTP status behind this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Domain(err) => Some(err.status()),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [(u16, &str); 11] = [
        (400, "BadRequestError"),
        (401, "UnauthorizedError"),
        (403, "ForbiddenError"),
        (404, "NotFoundError"),
        (405, "MethodNotAllowedError"),
        (406, "NotAcceptableError"),
        (429, "TooManyRequestsError"),
        (500, "InternalServerError"),
        (501, "NotImplementedError"),
        (503, "ServiceUnavailableError"),
        (504, "GatewayTimeoutError"),
    ];

    #[test]
    fn known_statuses_map_to_named_kinds() {
        for (status, name) in KNOWN {
            let err = DomainError::from_status(status, "boom", Some("CODE".to_string()));
            assert_eq!(err.name(), name, "status {}", status);
            assert_eq!(err.status(), status);
            assert_eq!(err.message(), "boom");
            assert_eq!(err.code(), Some("CODE"));
        }
    }

    #[test]
    fn service_unavailable_is_not_named_after_501() {
        let err = DomainError::from_status(503, "down", None);
        assert!(matches!(err, DomainError::ServiceUnavailable { .. }));
        assert_eq!(err.name(), "ServiceUnavailableError");
    }

    #[test]
    fn unlisted_status_keeps_observed_value() {
        let err = DomainError::from_status(418, "teapot", Some("TEAPOT".to_string()));
        assert_eq!(
            err,
            DomainError::UnknownRequest {
                message: "teapot".to_string(),
                code: Some("TEAPOT".to_string()),
                status: 418,
            }
        );
        assert_eq!(err.status(), 418);
        assert_eq!(err.name(), "UnknownRequestError");
    }

    #[test]
    fn unknown_request_preserves_any_status() {
        assert_eq!(DomainError::from_status(502, "bad gateway", None).status(), 502);
        assert_eq!(DomainError::from_status(100, "odd", None).status(), 100);
    }

    #[test]
    fn missing_code_is_none() {
        let err = DomainError::from_status(404, "gone", None);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn display_includes_message() {
        let err = DomainError::from_status(400, "VRN is invalid", Some("VRN_INVALID".into()));
        insta::assert_snapshot!(err.to_string(), @"Bad request: VRN is invalid");

        let err = DomainError::from_status(422, "nope", None);
        insta::assert_snapshot!(err.to_string(), @"Request failed with status 422: nope");
    }

    #[test]
    fn error_helpers_expose_domain_error() {
        let err = Error::from(DomainError::from_status(429, "slow down", None));
        assert_eq!(err.status(), Some(429));
        assert!(matches!(
            err.domain(),
            Some(DomainError::TooManyRequests { .. })
        ));
        assert_eq!(err.to_string(), "Too many requests: slow down");
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = Error::InvalidHeader {
            name: "bad header".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.domain().is_none());
    }
}
