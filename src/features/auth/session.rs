//! Signed-cookie session transport
//!
//! The session state machine has two states: anonymous and authenticated.
//! An authenticated session carries (user_id, user_name, role) in an
//! HMAC-SHA256-signed cookie value: `base64(json payload).hex(signature)`.
//! Tampered or expired cookies decode to anonymous.

use base64::prelude::*;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

use crate::core::config::SessionConfig;
use crate::features::auth::models::UserRole;

type HmacSha256 = Hmac<Sha256>;

/// Identity carried by an authenticated session.
///
/// `user_id` is the string form of the store-assigned user identifier, so
/// it stays comparable regardless of which store backend issued it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub user_name: String,
    pub role: UserRole,
}

#[derive(Serialize, Deserialize)]
struct SessionPayload {
    user_id: String,
    user_name: String,
    role: UserRole,
    exp: i64,
}

/// Encodes and verifies session cookie values.
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.secret.as_bytes().to_vec(),
            ttl: config.ttl,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    /// Produce a signed cookie value for an authenticated session.
    pub fn encode(&self, user: &SessionUser) -> String {
        let payload = SessionPayload {
            user_id: user.user_id.clone(),
            user_name: user.user_name.clone(),
            role: user.role,
            exp: Utc::now().timestamp() + self.ttl.as_secs() as i64,
        };

        // The payload is plain JSON; only integrity matters here
        let json = serde_json::to_vec(&payload).expect("session payload serializes");
        let encoded = BASE64_URL_SAFE_NO_PAD.encode(&json);

        let mut mac = self.mac();
        mac.update(encoded.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        format!("{}.{}", encoded, signature)
    }

    /// Verify a cookie value. Returns `None` for anything malformed,
    /// tampered with, or expired: all of those mean anonymous.
    pub fn decode(&self, token: &str) -> Option<SessionUser> {
        let (encoded, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = BASE64_URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let payload: SessionPayload = serde_json::from_slice(&json).ok()?;

        if payload.exp <= Utc::now().timestamp() {
            return None;
        }

        Some(SessionUser {
            user_id: payload.user_id,
            user_name: payload.user_name,
            role: payload.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer_with_ttl(ttl: Duration) -> SessionSigner {
        SessionSigner::new(&SessionConfig {
            secret: "test-secret".to_string(),
            ttl,
        })
    }

    fn session_user() -> SessionUser {
        SessionUser {
            user_id: "42".to_string(),
            user_name: "Ayu".to_string(),
            role: UserRole::Creator,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let signer = signer_with_ttl(Duration::from_secs(3600));
        let token = signer.encode(&session_user());

        let decoded = signer.decode(&token).expect("valid token");
        assert_eq!(decoded.user_id, "42");
        assert_eq!(decoded.user_name, "Ayu");
        assert_eq!(decoded.role, UserRole::Creator);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = signer_with_ttl(Duration::from_secs(3600));
        let token = signer.encode(&session_user());

        let (payload, signature) = token.split_once('.').unwrap();
        let other = signer.encode(&SessionUser {
            user_id: "99".to_string(),
            ..session_user()
        });
        let (other_payload, _) = other.split_once('.').unwrap();

        // Payload from one token, signature from another
        let forged = format!("{}.{}", other_payload, signature);
        assert!(signer.decode(&forged).is_none());
        // Sanity: the untouched halves still verify
        assert!(signer.decode(&format!("{}.{}", payload, signature)).is_some());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = signer_with_ttl(Duration::from_secs(3600));
        let token = signer.encode(&session_user());

        let other = SessionSigner::new(&SessionConfig {
            secret: "different-secret".to_string(),
            ttl: Duration::from_secs(3600),
        });
        assert!(other.decode(&token).is_none());
    }

    #[test]
    fn expired_session_is_anonymous() {
        let signer = signer_with_ttl(Duration::from_secs(0));
        let token = signer.encode(&session_user());
        assert!(signer.decode(&token).is_none());
    }

    #[test]
    fn garbage_tokens_are_anonymous() {
        let signer = signer_with_ttl(Duration::from_secs(3600));
        assert!(signer.decode("").is_none());
        assert!(signer.decode("no-dot-here").is_none());
        assert!(signer.decode("a.b").is_none());
        assert!(signer.decode("a.ffff").is_none());
    }
}
