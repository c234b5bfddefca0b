//! Per-request options: HTTP method, API version, argument placement and
//! extra headers.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Where request arguments are sent.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    /// Arguments are encoded into the query string. This is the default.
    #[default]
    Params,
    /// Arguments are sent as a JSON request body.
    Data,
}

/// Options for a single API call.
///
/// Fields left untouched keep their defaults: `GET`, version `1.0`,
/// arguments as query parameters and no extra headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOptions {
    /// The HTTP method to make the request with.
    pub method: Method,
    /// The API version, embedded in the `Accept` header.
    pub version: String,
    /// Whether arguments go in the query string or the body.
    pub r#type: ArgumentType,
    /// Additional headers. Token headers, `Authorization` and `Accept` take
    /// precedence over these, and a caller `Authorization` is never sent.
    /// Add entries through [`with_header`](Self::with_header) so names that
    /// differ only by case replace each other; when written directly, such
    /// duplicates resolve in key byte order.
    pub headers: BTreeMap<String, String>,
}

impl Default for RequestOptions {
    fn default() -> RequestOptions {
        RequestOptions {
            method: Method::GET,
            version: "1.0".to_string(),
            r#type: ArgumentType::Params,
            headers: BTreeMap::new(),
        }
    }
}

impl RequestOptions {
    /// Sets the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the API version, e.g. `"2.0"`.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Sets where arguments are sent.
    pub fn with_type(mut self, r#type: ArgumentType) -> Self {
        self.r#type = r#type;
        self
    }

    /// Adds one header. A later call with the same name, in any case, replaces
    /// the earlier value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.insert_header(name.to_string(), value.to_string());
        self
    }

    /// Adds several headers, replacing any with the same name.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.insert_header(name.into(), value.into());
        }
        self
    }

    fn insert_header(&mut self, name: String, value: String) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    /// The `Accept` header value for the configured version.
    pub fn accept(&self, provider: &str) -> String {
        format!("application/vnd.{}.{}+json", provider, self.version)
    }
}
