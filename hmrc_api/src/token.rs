//! OAuth2 access token issued by the HMRC authorization flow.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth2 access token together with the extra headers that must travel
/// with every request made on its behalf.
///
/// Tokens are produced and refreshed outside this crate. The client only
/// borrows them, so the same token can be shared across concurrent calls.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// The bearer credential sent in the `Authorization` header.
    pub access_token: String,
    /// Token type as reported by the authorization server, normally `bearer`.
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_token: String,
    /// Granted scopes, in the order the authorization server returned them.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Headers added to every request made with this token, e.g. the
    /// `Gov-Client-*` / `Gov-Vendor-*` fraud prevention headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl AccessToken {
    /// Returns `true` if the token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Returns `true` if `scope` was granted to this token.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "accessToken": "abc123",
            "tokenType": "bearer",
            "expiresAt": "2024-06-15T12:00:00Z",
            "refreshToken": "refresh-xyz",
            "scopes": ["read:vat", "write:vat"],
            "headers": {
                "Gov-Client-Connection-Method": "DESKTOP_APP_DIRECT",
                "Gov-Client-Device-ID": "beec798b-b366-47fa-b1f8-92cede14a1ce"
            }
        })
    }

    #[test]
    fn deserializes_camel_case() {
        let token: AccessToken = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.refresh_token, "refresh-xyz");
        assert_eq!(token.scopes, vec!["read:vat", "write:vat"]);
        assert_eq!(
            token.headers.get("Gov-Client-Connection-Method").map(String::as_str),
            Some("DESKTOP_APP_DIRECT")
        );
        assert_eq!(
            token.expires_at,
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn headers_and_scopes_default_to_empty() {
        let token: AccessToken = serde_json::from_value(serde_json::json!({
            "accessToken": "abc123",
            "tokenType": "bearer",
            "expiresAt": "2024-06-15T12:00:00Z",
            "refreshToken": "refresh-xyz"
        }))
        .unwrap();
        assert!(token.scopes.is_empty());
        assert!(token.headers.is_empty());
    }

    #[test]
    fn expiry_and_scopes() {
        let token: AccessToken = serde_json::from_value(sample_json()).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 6, 15, 11, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert!(!token.is_expired(before));
        assert!(token.is_expired(after));
        assert!(token.has_scope("write:vat"));
        assert!(!token.has_scope("read:self-assessment"));
    }

    #[test]
    fn bearer_value() {
        let token: AccessToken = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(token.bearer(), "Bearer abc123");
    }
}
