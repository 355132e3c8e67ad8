//! 会话上下文
//!
//! 当前用户与访问令牌。启动时创建并注入到 HTTP 客户端与处理器，
//! 登出或后端返回 401 时清空，持久化由调用方显式触发。

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use errors::{AppError, AppResult};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::{SessionUser, UserRole};

/// 多处共享的会话
pub type SharedSession = Arc<RwLock<SessionContext>>;

#[derive(Debug, Default)]
pub struct SessionContext {
    user: Option<SessionUser>,
    token: Option<SecretString>,
}

/// 会话文件内容
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: Option<String>,
    #[serde(default)]
    user: Option<serde_json::Value>,
    saved_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn sign_in(&mut self, user: SessionUser, token: SecretString) {
        self.user = Some(user);
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }

    /// 要求当前用户具备某项权限
    pub fn require(&self, allowed: impl Fn(&UserRole) -> bool, action: &str) -> AppResult<&SessionUser> {
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| AppError::unauthenticated("请先登录"))?;
        if allowed(&user.role) {
            Ok(user)
        } else {
            Err(AppError::forbidden(format!(
                "{} 需要更高权限（当前角色：{}）",
                action, user.role
            )))
        }
    }

    /// 从会话文件恢复；文件不存在时返回空会话，用户信息损坏时只保留令牌
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|e| {
            AppError::internal(format!("failed to read session file {}: {}", path.display(), e))
        })?;
        let stored: StoredSession = serde_json::from_str(&data).map_err(|e| {
            AppError::internal(format!("failed to parse session file {}: {}", path.display(), e))
        })?;

        let user = match stored.user {
            Some(value) => match serde_json::from_value::<SessionUser>(value) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable user in session file: {}", e);
                    None
                }
            },
            None => None,
        };

        debug!("Session restored from {}", path.display());
        Ok(Self {
            user,
            token: stored.token.map(SecretString::new),
        })
    }

    /// 写入会话文件；会话为空时删除文件
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if !self.is_authenticated() && self.user.is_none() {
            return Self::remove_file(path);
        }
        let user = self
            .user
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::internal(e.to_string()))?;
        let stored = StoredSession {
            token: self.token.as_ref().map(|t| t.expose_secret().clone()),
            user,
            saved_at: Utc::now(),
        };
        let payload =
            serde_json::to_vec_pretty(&stored).map_err(|e| AppError::internal(e.to_string()))?;
        write_private(path, &payload).map_err(|e| {
            AppError::internal(format!("failed writing {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    fn remove_file(path: &Path) -> AppResult<()> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| {
                AppError::internal(format!("failed to remove {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

/// 令牌只允许当前用户读写（Unix 下为 0600，已存在的文件也会收紧权限）
#[cfg(unix)]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(payload)
}

#[cfg(not(unix))]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    fs::write(path, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserId;

    fn manager() -> SessionUser {
        SessionUser {
            id: UserId(1),
            username: "park".into(),
            role: UserRole::Manager,
        }
    }

    #[test]
    fn test_sign_in_and_clear() {
        let mut session = SessionContext::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer(), None);

        session.sign_in(manager(), SecretString::new("abc".into()));
        assert!(session.is_authenticated());
        assert_eq!(session.bearer().as_deref(), Some("Bearer abc"));

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_require_permission() {
        let mut session = SessionContext::new();
        assert!(matches!(
            session.require(UserRole::can_evaluate, "evaluate"),
            Err(AppError::Unauthenticated(_))
        ));

        session.sign_in(manager(), SecretString::new("abc".into()));
        assert!(session.require(UserRole::can_evaluate, "evaluate").is_ok());
        assert!(matches!(
            session.require(UserRole::can_delete_items, "delete item"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let mut session = SessionContext::new();
        session.sign_in(manager(), SecretString::new("super-secret-token".into()));
        let output = format!("{:?}", session);
        assert!(!output.contains("super-secret-token"));
    }
}
