//! Query string encoding for request arguments sent as parameters.

use serde::ser::Error as _;
use serde_json::Value;
use url::Url;

use crate::Error;

/// Flattens serialized arguments into `(key, value)` query pairs.
///
/// Arguments must serialize to a JSON object (or `null` for none). `null`
/// members are skipped, arrays repeat their key, nested objects are rejected.
pub(crate) fn to_query_pairs(args: &Value) -> Result<Vec<(String, String)>, Error> {
    let map = match args {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        _ => {
            return Err(Error::Encode(serde_json::Error::custom(
                "query arguments must be a map",
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar(key, item)? {
                        pairs.push((key.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar(key, other)? {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: &Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::Encode(serde_json::Error::custom(
            format!("query argument {:?} is not a scalar", key),
        ))),
    }
}

/// Appends the pairs to the URL, returning the modified URL. An empty list
/// leaves the URL without a query string.
pub(crate) fn add_to_url(url: &Url, pairs: &[(String, String)]) -> Url {
    let mut url = url.clone();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}
