//! qm-errors - 统一错误处理
//!
//! 两类错误：本地校验错误（发请求前拦截，按字段显示）与远程错误（请求后返回，显示单条消息）。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 字段级校验错误，字段名 -> 提示信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 无错误时返回 Ok
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {0}")]
    InvalidFields(FieldErrors),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, msg);
        Self::InvalidFields(errors)
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 根据后端 HTTP 状态码构造错误
    pub fn from_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            400 | 422 => Self::Validation(msg),
            401 => Self::Unauthenticated(msg),
            403 => Self::Forbidden(msg),
            404 => Self::NotFound(msg),
            409 => Self::Conflict(msg),
            _ => Self::ExternalService(msg),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidFields(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::ExternalService(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// 是否为本地字段校验错误（未发出任何请求）
    pub fn is_field_error(&self) -> bool {
        matches!(self, Self::InvalidFields(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidFields(errors) => Some(errors),
            _ => None,
        }
    }

    /// 面向用户的单条消息
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::ExternalService(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::InvalidFields(errors) => errors.to_string(),
        }
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(AppError::from_status(400, "bad"), AppError::Validation(_)));
        assert!(matches!(AppError::from_status(401, "x"), AppError::Unauthenticated(_)));
        assert!(matches!(AppError::from_status(403, "x"), AppError::Forbidden(_)));
        assert!(matches!(AppError::from_status(404, "x"), AppError::NotFound(_)));
        assert!(matches!(AppError::from_status(503, "x"), AppError::ExternalService(_)));
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.add("okQuantity", "required");
        errors.add("okQuantity", "must be >= 0");
        errors.add("ngQuantity", "required");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("okQuantity"), Some("required"));
        assert_eq!(errors.to_string(), "ngQuantity: required; okQuantity: required");
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let err = AppError::field("evaluation", "required");
        assert!(err.is_field_error());
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field_errors().and_then(|e| e.get("evaluation")), Some("required"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("evaluation", "required");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"evaluation":"required"}"#);
    }

    #[test]
    fn test_user_message() {
        let err = AppError::external_service("server down");
        assert_eq!(err.user_message(), "server down");
        assert_eq!(err.to_string(), "External service error: server down");
    }
}
