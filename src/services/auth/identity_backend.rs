//! # Identity Backend Client
//!
//! 서버 측에서 서비스 키로 호출하는 Identity Backend(Supabase GoTrue 호환) 경계입니다.
//!
//! | 연산 | 엔드포인트 |
//! |------|-----------|
//! | `sign_in_with_id_token` | `POST /auth/v1/token?grant_type=id_token` |
//! | `create_user` | `POST /auth/v1/admin/users` |
//! | `generate_magic_link` | `POST /auth/v1/admin/generate_link` |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::config::{AuthProvider, IdentityBackendConfig};
use crate::domain::models::identity::{
    IdentityError, IdentitySession, IdentityUser, MagicLink, NewIdentity,
};

/// 사용자/세션을 관리하는 외부 Identity Backend
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// 프로바이더 ID 토큰으로 로그인하여 세션을 발급받습니다.
    ///
    /// 사용자가 없으면 Identity Backend가 생성합니다. ID 토큰 서명 검증도 이쪽의 책임입니다.
    async fn sign_in_with_id_token(
        &self,
        provider: AuthProvider,
        id_token: &str,
        access_token: Option<&str>,
    ) -> Result<IdentitySession, IdentityError>;

    /// 이메일 확인 처리된 사용자를 생성합니다.
    ///
    /// 이미 존재하면 [`IdentityError::AlreadyRegistered`]를 반환합니다.
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityUser, IdentityError>;

    /// 일회용 매직 링크를 발급합니다.
    async fn generate_magic_link(&self, email: &str) -> Result<MagicLink, IdentityError>;
}

/// Supabase 관리자 API 클라이언트
pub struct SupabaseAdminClient {
    http: reqwest::Client,
    config: IdentityBackendConfig,
}

impl SupabaseAdminClient {
    pub fn new(http: reqwest::Client, config: IdentityBackendConfig) -> Self {
        Self { http, config }
    }

    /// 서비스 키로 JSON POST 요청을 보내고 응답을 역직렬화합니다.
    async fn post_admin<B, T>(&self, path: &str, body: &B) -> Result<T, IdentityError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let (base_url, key) = self.config.admin_endpoint()?;

        let response = self
            .http
            .post(format!("{}{}", base_url, path))
            .header("apikey", key)
            .bearer_auth(key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::from_response(status.as_u16(), &body));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityBackend for SupabaseAdminClient {
    async fn sign_in_with_id_token(
        &self,
        provider: AuthProvider,
        id_token: &str,
        access_token: Option<&str>,
    ) -> Result<IdentitySession, IdentityError> {
        let mut body = json!({
            "provider": provider.as_str(),
            "id_token": id_token,
        });
        if let Some(access_token) = access_token {
            body["access_token"] = json!(access_token);
        }

        self.post_admin("/auth/v1/token?grant_type=id_token", &body).await
    }

    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityUser, IdentityError> {
        self.post_admin("/auth/v1/admin/users", identity).await
    }

    async fn generate_magic_link(&self, email: &str) -> Result<MagicLink, IdentityError> {
        let body = json!({
            "type": "magiclink",
            "email": email,
        });

        self.post_admin("/auth/v1/admin/generate_link", &body).await
    }
}
