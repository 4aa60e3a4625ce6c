use crate::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: String,
    /// Only returned on the authorization-code grant
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

impl TokenResponse {
    /// Absolute expiry in epoch millis, saturating on absurd lifetimes
    pub fn expiry_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_add(self.expires_in.saturating_mul(1000))
    }
}

/// Claims carried by the identity token.
///
/// Display-only: the signature is never checked here, the favorites
/// service validates the bearer token itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decodes the payload segment of a JWT without verifying it
pub fn decode_id_token(token: &str) -> Result<IdClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::Auth("identity token is not a JWT".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::Auth(format!("Failed to parse JWT: {}", e)))?;

    serde_json::from_slice(&bytes).map_err(|e| Error::Auth(format!("Failed to parse JWT: {}", e)))
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expiry_saturates() {
        let mut tokens = TokenResponse {
            access_token: "a".to_string(),
            id_token: "i".to_string(),
            refresh_token: None,
            expires_in: 3600,
        };
        assert_eq!(tokens.expiry_ms(1_700_000_000_000), 1_700_003_600_000);

        tokens.expires_in = 9_223_372_036_854_775;
        assert_eq!(tokens.expiry_ms(1_700_000_000_000), i64::MAX);

        tokens.expires_in = i64::MIN;
        assert_eq!(tokens.expiry_ms(1_700_000_000_000), i64::MIN);
    }

    #[test]
    fn test_decode_id_token() {
        let token = encode_test_token(&json!({
            "sub": "user-123",
            "email": "traveler@example.com",
            "name": "琉球 太郎",
            "cognito:username": "traveler"
        }));

        let claims = decode_id_token(&token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email.as_deref(), Some("traveler@example.com"));
        assert_eq!(claims.name.as_deref(), Some("琉球 太郎"));
        assert_eq!(claims.picture, None);
        assert_eq!(claims.extra["cognito:username"], "traveler");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_id_token("not-a-token").is_err());
        assert!(decode_id_token("a.!!!.c").is_err());

        let no_sub = encode_test_token(&json!({"email": "x@example.com"}));
        assert!(matches!(decode_id_token(&no_sub), Err(Error::Auth(_))));
    }

    #[test]
    fn test_refresh_response_without_refresh_token() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "a", "id_token": "i", "expires_in": 3600, "token_type": "Bearer"}"#,
        )
        .unwrap();
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.expiry_ms(1_000), 3_601_000);
    }
}
