//! 用户与角色

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Manager,
    Admin,
}

impl UserRole {
    /// 专家评价需要 MANAGER 或 ADMIN
    pub fn can_evaluate(&self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    /// 部品维护需要 MANAGER 或 ADMIN
    pub fn can_manage_items(&self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    /// 删除部品仅限 ADMIN
    pub fn can_delete_items(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// 数据录入对所有角色开放
    pub fn can_enter_data(&self) -> bool {
        true
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "USER",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
        };
        f.write_str(s)
    }
}

/// 已登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
}

/// 登录结果，令牌与用户信息平铺在同一对象中
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: SessionUser,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}
