//! 认证接口

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::{LoginRequest, LoginResponse, SignupRequest};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;

    async fn signup(&self, request: &SignupRequest) -> AppResult<()>;
}
