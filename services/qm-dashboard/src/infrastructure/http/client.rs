//! 后端 HTTP 客户端
//!
//! 从会话读取令牌附加 `Authorization` 头；收到 401 时清空会话。

use std::time::{Duration, Instant};

use config::ApiConfig;
use errors::{AppError, AppResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::application::session::SharedSession;
use crate::infrastructure::observability::metrics;

use super::envelope::ApiEnvelope;
use super::error::{map_http_error, map_transport_error};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SharedSession) -> AppResult<Self> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| AppError::internal(format!("invalid api.base_url: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AppError::internal(format!("invalid request path {}: {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = self.url(path, query)?;
        self.send::<(), T>(Method::GET, url, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        let url = self.url(path, &[])?;
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        let url = self.url(path, &[])?;
        self.send(Method::PUT, url, Some(body)).await
    }

    /// 删除接口的响应体不使用
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let url = self.url(path, &[])?;
        self.send::<(), serde_json::Value>(Method::DELETE, url, None)
            .await?;
        Ok(())
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AppResult<Option<T>> {
        let started = Instant::now();
        let bearer = self.session.read().bearer();

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, "Calling backend");
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_api_transport_error(method.as_str());
                warn!(method = %method, url = %url, error = %e, "Backend request failed");
                return Err(map_transport_error(e));
            }
        };

        let status = response.status();
        metrics::record_api_request(method.as_str(), status.as_u16(), started.elapsed());
        let text = response.text().await.map_err(map_transport_error)?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Backend rejected credentials, clearing session");
            self.session.write().clear();
        }
        if !status.is_success() {
            warn!(method = %method, url = %url, status = status.as_u16(), "Backend returned error");
            return Err(map_http_error(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(format!("unexpected response from backend: {}", e))
        })?;
        if let Some(msg) = envelope.msg.as_deref() {
            debug!(url = %url, msg = %msg, "Backend message");
        }
        Ok(envelope.body)
    }
}

/// 需要响应体的接口在 body 为空时报错
pub fn require_body<T>(body: Option<T>, what: &str) -> AppResult<T> {
    body.ok_or_else(|| AppError::external_service(format!("后端未返回{}数据", what)))
}
