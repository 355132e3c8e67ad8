//! HTTP 错误映射

use errors::AppError;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

fn default_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "登录已过期，请重新登录".to_string(),
        StatusCode::FORBIDDEN => "没有执行该操作的权限".to_string(),
        StatusCode::NOT_FOUND => "请求的数据不存在".to_string(),
        _ => format!("请求失败（HTTP {}），请稍后重试", status.as_u16()),
    }
}

/// 非 2xx 响应转为 `AppError`，优先使用后端返回的 `msg`
pub fn map_http_error(status: StatusCode, body: &str) -> AppError {
    let msg = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.msg)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_message(status));
    AppError::from_status(status.as_u16(), msg)
}

/// 传输层错误（超时、连接失败、读取响应失败）
pub fn map_transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::external_service("后端请求超时，请稍后重试")
    } else if err.is_connect() {
        AppError::external_service(format!("无法连接后端服务: {}", err))
    } else {
        AppError::external_service(format!("后端请求失败: {}", err))
    }
}
