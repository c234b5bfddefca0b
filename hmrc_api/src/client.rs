//! HTTP client for the HMRC REST APIs.

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    environment::Environment,
    errors::DomainError,
    headers::build_headers,
    options::{ArgumentType, RequestOptions},
    query::{add_to_url, to_query_pairs},
    token::AccessToken,
    Error,
};

/// Vendor name used in the versioned `Accept` header.
pub const PROVIDER: &str = "hmrc";

const USER_AGENT: &str = concat!("hmrc_api/", env!("CARGO_PKG_VERSION"));

/// Error body returned by HMRC alongside a 4xx/5xx status.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

/// HMRC codes are strings, but any scalar is accepted rather than losing the
/// message.
fn code_to_string(code: Option<Value>) -> Option<String> {
    match code? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// HTTP client for the HMRC REST APIs.
///
/// Holds only the base URL and a pooled `reqwest::Client`; every call is
/// independent, so a `Client` can be cloned and shared between tasks. No
/// timeout, retry or backoff policy is applied here. Configure timeouts on the
/// `reqwest::Client` passed to [`Client::with_http_client`] if needed.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API, chosen from the [`Environment`] at construction.
    base_api_url: String,
}

impl Client {
    /// Creates a client for the given environment.
    pub fn new(environment: Environment) -> Result<Self, Error> {
        Self::with_base_url(environment.base_url())
    }

    /// Creates a client for the environment named by `HMRC_ENVIRONMENT`.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(Environment::from_env())
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e)
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.to_string(),
        })
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, environment: Environment) -> Self {
        Self {
            http,
            base_api_url: environment.base_url().to_string(),
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, endpoint: &str) -> Result<Url, Error> {
        let joined = format!(
            "{}/{}",
            self.base_api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })
    }

    /// Makes a request to the HMRC API.
    ///
    /// `token` is optional; without one the request is sent unauthenticated.
    /// `args` go in the query string or the JSON body depending on
    /// [`RequestOptions::type`](RequestOptions), and `options` falls back to
    /// [`RequestOptions::default`] when `None`.
    ///
    /// The success body is parsed as `T` without further validation. An empty
    /// body is parsed as JSON `null`, so `()` and `Option<_>` work for
    /// endpoints that return no content.
    ///
    /// # Errors
    ///
    /// - [`Error::Domain`] when the API answers 4xx/5xx with a `{message, code}`
    ///   body, classified by status (see [`DomainError::from_status`]).
    /// - [`Error::Transport`] with the original `reqwest::Error` for network
    ///   failures, or for a 4xx/5xx whose body is not the structured shape.
    /// - [`Error::InvalidUrl`], [`Error::InvalidHeader`], [`Error::Encode`]
    ///   before anything is sent, and [`Error::Decode`] when a success body
    ///   does not match `T`.
    pub async fn execute<A, T>(
        &self,
        token: Option<&AccessToken>,
        endpoint: &str,
        args: Option<&A>,
        options: Option<&RequestOptions>,
    ) -> Result<T, Error>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let defaults = RequestOptions::default();
        let options = options.unwrap_or(&defaults);

        let args = match args {
            Some(args) => serde_json::to_value(args).map_err(Error::Encode)?,
            None => Value::Null,
        };
        let headers = build_headers(options, token, PROVIDER)?;
        let url = self.get_url(endpoint)?;
        let url = match options.r#type {
            ArgumentType::Params => add_to_url(&url, &to_query_pairs(&args)?),
            ArgumentType::Data => url,
        };

        tracing::debug!(
            "{} {} (version {}, args as {:?}, authenticated: {})",
            options.method,
            url,
            options.version,
            options.r#type,
            token.is_some()
        );

        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if options.r#type == ArgumentType::Data && !args.is_null() {
            request = request.json(&args);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", endpoint, e);
            Error::Transport(e)
        })?;

        let status = resp.status();
        if let Some(status_error) = resp.error_for_status_ref().err() {
            let body = resp.text().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read error response body: {}", e);
                String::new()
            });
            return Err(map_failure(status, status_error, &body));
        }

        let body = resp.text().await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str::<T>(body).map_err(|e| {
            tracing::error!(
                "Failed to parse response from {}: {} | body: {}",
                endpoint,
                e,
                truncate_body(body)
            );
            Error::Decode(e)
        })
    }

    /// `GET` with `query` as query parameters.
    pub async fn get<A, T>(
        &self,
        token: Option<&AccessToken>,
        endpoint: &str,
        query: Option<&A>,
    ) -> Result<T, Error>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(token, endpoint, query, None).await
    }

    /// `POST` with `body` as JSON.
    pub async fn post<A, T>(
        &self,
        token: Option<&AccessToken>,
        endpoint: &str,
        body: &A,
    ) -> Result<T, Error>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default()
            .with_method(Method::POST)
            .with_type(ArgumentType::Data);
        self.execute(token, endpoint, Some(body), Some(&options))
            .await
    }

    /// `PUT` with `body` as JSON.
    pub async fn put<A, T>(
        &self,
        token: Option<&AccessToken>,
        endpoint: &str,
        body: &A,
    ) -> Result<T, Error>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default()
            .with_method(Method::PUT)
            .with_type(ArgumentType::Data);
        self.execute(token, endpoint, Some(body), Some(&options))
            .await
    }

    /// `DELETE` without arguments.
    pub async fn delete<T>(&self, token: Option<&AccessToken>, endpoint: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let options = RequestOptions::default().with_method(Method::DELETE);
        self.execute::<(), T>(token, endpoint, None, Some(&options))
            .await
    }
}

/// Turns a 4xx/5xx response into an [`Error`]. Structured bodies become a
/// [`DomainError`]; anything else passes the status error through unchanged.
fn map_failure(status: StatusCode, status_error: reqwest::Error, body: &str) -> Error {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message, code }) => {
            let err = DomainError::from_status(status.as_u16(), message, code_to_string(code));
            tracing::warn!(
                "Request failed with {} (HTTP {}, code {:?}): {}",
                err.name(),
                err.status(),
                err.code(),
                err.message()
            );
            Error::Domain(err)
        }
        Err(_) => {
            tracing::warn!(
                "Request failed with status {} and no structured error body: {}",
                status,
                truncate_body(body)
            );
            Error::Transport(status_error)
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
