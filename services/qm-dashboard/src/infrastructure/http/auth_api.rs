//! 认证接口 `/users/*`

use std::sync::Arc;

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::{LoginRequest, LoginResponse, SignupRequest};
use crate::domain::repositories::AuthRepository;

use super::client::{ApiClient, require_body};

pub struct HttpAuthRepository {
    client: Arc<ApiClient>,
}

impl HttpAuthRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let body = self.client.post("/users/login", request).await?;
        require_body(body, "登录")
    }

    async fn signup(&self, request: &SignupRequest) -> AppResult<()> {
        let _: Option<serde_json::Value> = self.client.post("/users/signup", request).await?;
        Ok(())
    }
}
