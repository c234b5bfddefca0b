//! Outgoing header construction.
//!
//! Headers are layered in a fixed order, each layer overwriting names set by
//! the layers before it:
//!
//! 1. caller headers from [`RequestOptions`]
//! 2. the token's own headers
//! 3. `Authorization: Bearer <token>`
//! 4. `Accept: application/vnd.<provider>.<version>+json`
//!
//! Names are compared case-insensitively, as HTTP requires. A caller
//! `Authorization` header is always discarded.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::{options::RequestOptions, token::AccessToken, Error};

/// Builds the header map for one request.
pub(crate) fn build_headers(
    options: &RequestOptions,
    token: Option<&AccessToken>,
    provider: &str,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    overlay(&mut headers, &options.headers)?;
    headers.remove(AUTHORIZATION);
    if let Some(token) = token {
        overlay(&mut headers, &token.headers)?;
        headers.insert(AUTHORIZATION, header_value("Authorization", &token.bearer())?);
    }
    headers.insert(ACCEPT, header_value("Accept", &options.accept(provider))?);

    Ok(headers)
}

fn overlay(headers: &mut HeaderMap, layer: &BTreeMap<String, String>) -> Result<(), Error> {
    for (name, value) in layer {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader {
                name: name.clone(),
            })?;
        headers.insert(header_name, header_value(name, value)?);
    }
    Ok(())
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader {
        name: name.to_string(),
    })
}
