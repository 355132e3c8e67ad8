//! 认证命令

use errors::{AppResult, FieldErrors};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::entities::{LoginRequest, SignupRequest, UserRole};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: SecretString,
}

impl LoginCommand {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "请输入用户名");
        }
        if self.password.expose_secret().is_empty() {
            errors.add("password", "请输入密码");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: self.password.expose_secret().clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub username: String,
    pub password: SecretString,
    pub role: UserRole,
}

impl SignupCommand {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "请输入用户名");
        } else if username.chars().count() < 3 {
            errors.add("username", "用户名至少 3 个字符");
        }
        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.add("password", "请输入密码");
        } else if password.chars().count() < 4 {
            errors.add("password", "密码至少 4 个字符");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.trim().to_string(),
            password: self.password.expose_secret().clone(),
            role: self.role,
        }
    }
}
