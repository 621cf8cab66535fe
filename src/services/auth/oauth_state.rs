//! # OAuth `state` 서명
//!
//! 동의 화면으로 보내는 요청마다 HS256으로 서명한 짧은 수명의 `state` 값을 붙이고,
//! 콜백에서 같은 키로 검증합니다. 서버에 저장하는 값은 없습니다.
//!
//! ```text
//! issue()  ──► state = JWT { nonce, iat, exp }      (consent URL에 포함)
//! verify() ◄── /auth/google/callback?code=...&state=...
//! ```
//!
//! 서명 키는 `OAUTH_STATE_SECRET`이며, 없으면 `GOOGLE_CLIENT_SECRET`을 사용합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GoogleOAuthConfig;
use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    nonce: String,
    iat: i64,
    exp: i64,
}

/// `state` 발급/검증기
#[derive(Clone)]
pub struct OAuthStateSigner {
    key: Option<String>,
    ttl: Duration,
}

impl OAuthStateSigner {
    /// 동의 화면에서 콜백까지 허용하는 시간
    pub const DEFAULT_TTL_MINUTES: i64 = 10;

    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.trim().is_empty()),
            ttl: Duration::minutes(Self::DEFAULT_TTL_MINUTES),
        }
    }

    pub fn from_config(config: &GoogleOAuthConfig) -> Self {
        Self::new(
            config
                .state_secret
                .clone()
                .or_else(|| config.client_secret.clone()),
        )
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn key(&self) -> Result<&[u8], AppError> {
        self.key
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| {
                AppError::ConfigurationError(
                    "OAUTH_STATE_SECRET or GOOGLE_CLIENT_SECRET is required to sign OAuth state".to_string(),
                )
            })
    }

    /// 새 `state` 값을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 서명 키 없음
    pub fn issue(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = StateClaims {
            nonce: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.key()?),
        )
        .map_err(|e| AppError::InternalError(format!("OAuth state 서명 실패: {}", e)))
    }

    /// 콜백으로 돌아온 `state`를 검증합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 서명 불일치, 형식 오류, 만료
    /// * `AppError::ConfigurationError` - 서명 키 없음
    pub fn verify(&self, state: &str) -> Result<(), AppError> {
        let key = DecodingKey::from_secret(self.key()?);

        decode::<StateClaims>(state, &key, &Validation::new(Algorithm::HS256))
            .map(|_| ())
            .map_err(|e| AppError::AuthenticationError(format!("invalid OAuth state: {}", e)))
    }
}

impl std::fmt::Debug for OAuthStateSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthStateSigner")
            .field("key", &self.key.as_ref().map(|_| "***"))
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_state_verifies_with_same_key() {
        let signer = OAuthStateSigner::new(Some("state-key".to_string()));

        let state = signer.issue().unwrap();

        assert!(signer.verify(&state).is_ok());
        assert_ne!(state, signer.issue().unwrap());
    }

    #[test]
    fn test_foreign_or_malformed_state_is_rejected() {
        let signer = OAuthStateSigner::new(Some("state-key".to_string()));
        let forged = OAuthStateSigner::new(Some("other-key".to_string())).issue().unwrap();

        assert!(matches!(signer.verify(&forged), Err(AppError::AuthenticationError(_))));
        assert!(matches!(signer.verify("xyz"), Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let signer = OAuthStateSigner::new(Some("state-key".to_string())).with_ttl(Duration::minutes(-5));

        let state = signer.issue().unwrap();

        assert!(matches!(signer.verify(&state), Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let signer = OAuthStateSigner::new(Some("  ".to_string()));

        assert!(matches!(signer.issue(), Err(AppError::ConfigurationError(_))));
        assert!(matches!(signer.verify("xyz"), Err(AppError::ConfigurationError(_))));
    }

    #[test]
    fn test_state_secret_takes_precedence_over_client_secret() {
        let mut config = GoogleOAuthConfig::new(Some("id".into()), Some("client-secret".into()), "http://x/cb");
        let from_client_secret = OAuthStateSigner::from_config(&config).issue().unwrap();

        config.state_secret = Some("dedicated".to_string());
        let signer = OAuthStateSigner::from_config(&config);

        assert!(signer.verify(&from_client_secret).is_err());
        assert!(signer.verify(&signer.issue().unwrap()).is_ok());
    }

    #[test]
    fn test_debug_masks_key() {
        let printed = format!("{:?}", OAuthStateSigner::new(Some("state-key".to_string())));

        assert!(!printed.contains("state-key"));
    }
}
