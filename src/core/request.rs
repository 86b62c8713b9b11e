//! HTTP request layer.
//!
//! [`BaseClient`] talks to the API without any session handling and hands
//! back raw envelopes; it is used by login/logout. [`RequestClient`] wraps it
//! with the session rules every business call goes through:
//!
//! * attach the access token and `Accept-Language`;
//! * unwrap `{success, data}` and turn `success: false` into an error;
//! * on HTTP 401 refresh the token once and replay the request, otherwise
//!   re-authenticate;
//! * on business code 401 drop both tokens and log out;
//! * report every failure through the [`Notifier`](crate::domain::ports::Notifier).

use crate::config::LoginExpiredMode;
use crate::core::auth::AuthService;
use crate::core::context::AppContext;
use crate::domain::model::Envelope;
use crate::utils::error::{ApiError, Result};
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const SESSION_EXPIRED_MESSAGE: &str = "登录已过期，请重新登录";
const BUSINESS_UNAUTHORIZED: i64 = 401;

/// 一次請求的完整描述，重試時原樣重送
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// 不經攔截邏輯的客戶端
#[derive(Debug, Clone)]
pub struct BaseClient {
    client: Client,
    base_url: String,
    locale: String,
    auth_scheme: Option<String>,
}

impl BaseClient {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(ctx.api.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: ctx.api.base_url.trim_end_matches('/').to_string(),
            locale: ctx.preferences.locale.clone(),
            auth_scheme: ctx.api.auth_scheme.clone().filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 後端要求 `Authorization` 直接放 token，可選擇加上前綴
    pub fn format_token(&self, token: &str) -> String {
        match &self.auth_scheme {
            Some(scheme) => format!("{} {}", scheme.trim(), token),
            None => token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn send(&self, spec: &RequestSpec, token: Option<&str>) -> Result<reqwest::Response> {
        let url = self.url(&spec.path);
        let mut request = self
            .client
            .request(spec.method.clone(), &url)
            .header(ACCEPT_LANGUAGE, &self.locale);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, self.format_token(token));
        }
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        tracing::debug!("➡️  {} {}", spec.method, url);
        let response = request.send().await?;
        tracing::debug!("⬅️  {} {} -> {}", spec.method, url, response.status());
        Ok(response)
    }

    /// 回傳完整 envelope；`success: false` 也照常回傳，交給呼叫端判斷
    pub async fn envelope<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        token: Option<&str>,
    ) -> Result<Envelope<T>> {
        let response = self.send(spec, token).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_body(status, &text));
        }
        parse_envelope::<Value>(spec, &text)?
            .typed()
            .map_err(|e| invalid_response(spec, e))
    }
}

fn invalid_response(spec: &RequestSpec, e: serde_json::Error) -> ApiError {
    ApiError::InvalidResponse {
        message: format!("{} {}: {}", spec.method, spec.path, e),
    }
}

fn parse_envelope<T: DeserializeOwned>(spec: &RequestSpec, text: &str) -> Result<Envelope<T>> {
    serde_json::from_str(text).map_err(|e| invalid_response(spec, e))
}

/// 非 2xx 時盡量取出後端訊息
fn failure_from_body(status: StatusCode, text: &str) -> ApiError {
    if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(text) {
        let message = envelope.failure_message().to_string();
        if !message.is_empty() {
            return ApiError::BusinessError {
                code: envelope.code,
                message,
            };
        }
    }
    let message = if text.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        text.trim().to_string()
    };
    ApiError::ServerError {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResult {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// 帶 session 處理的客戶端，所有業務介面都經過這裡
#[derive(Debug, Clone)]
pub struct RequestClient {
    base: BaseClient,
    ctx: Arc<AppContext>,
    auth: AuthService,
    refresh_lock: Arc<Mutex<()>>,
}

impl RequestClient {
    pub fn new(ctx: Arc<AppContext>) -> Result<Self> {
        let base = BaseClient::new(&ctx)?;
        let auth = AuthService::new(base.clone(), ctx.clone());
        Ok(Self {
            base,
            ctx,
            auth,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Vec<(String, String)>) -> Result<T> {
        let spec = RequestSpec::new(Method::GET, path).query(query);
        self.execute_required(spec).await
    }

    /// `data` 可能為 null 的 GET
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Option<T>> {
        let spec = RequestSpec::new(Method::GET, path).query(query);
        self.execute(spec).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        let spec = RequestSpec::new(Method::POST, path).json(body)?;
        self.execute(spec).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        let spec = RequestSpec::new(Method::PUT, path).json(body)?;
        self.execute(spec).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.execute(RequestSpec::new(Method::DELETE, path)).await
    }

    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>> {
        let spec = RequestSpec::new(Method::DELETE, path).json(body)?;
        self.execute(spec).await
    }

    async fn execute_required<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let path = spec.path.clone();
        self.execute(spec).await?.ok_or_else(|| {
            let err = ApiError::InvalidResponse {
                message: format!("{} returned no data", path),
            };
            self.ctx.notifier.error(&err.user_friendly_message());
            err
        })
    }

    /// 執行請求並回傳 envelope 的 `data`；失敗時統一提示
    pub async fn execute<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<Option<T>> {
        match self.dispatch(&spec).await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!("{} {} failed: {}", spec.method, spec.path, e);
                self.ctx.notifier.error(&e.user_friendly_message());
                Err(e)
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<Option<T>> {
        let token = self.ctx.store.access_token();
        let response = self.base.send(spec, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return self.handle_unauthorized(spec, token).await;
        }
        self.unwrap_response(spec, response).await
    }

    /// HTTP 401：刷新一次 token 並重送，失敗則重新認證
    async fn handle_unauthorized<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        sent_token: Option<String>,
    ) -> Result<Option<T>> {
        if !self.ctx.preferences.enable_refresh_token {
            self.re_authenticate().await;
            return Err(ApiError::Unauthorized);
        }

        let token = match self.refresh_once(sent_token.as_deref()).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.re_authenticate().await;
                return Err(e);
            }
        };

        tracing::debug!("🔁 Retrying {} {} with refreshed token", spec.method, spec.path);
        let response = self.base.send(spec, Some(&token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.re_authenticate().await;
            return Err(ApiError::Unauthorized);
        }
        self.unwrap_response(spec, response).await
    }

    /// 同一時間只刷新一次；若其它請求已經換過 token，直接使用新的
    async fn refresh_once(&self, sent_token: Option<&str>) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.ctx.store.access_token() {
            if Some(current.as_str()) != sent_token {
                tracing::debug!("Token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let refresh_token = self
            .ctx
            .store
            .refresh_token()
            .ok_or_else(|| ApiError::RefreshFailed {
                message: "no refresh token stored".to_string(),
            })?;

        tracing::info!("🔑 Refreshing access token");
        let spec = RequestSpec::new(Method::POST, self.ctx.api.refresh_path.clone()).json(
            &RefreshTokenRequest {
                refresh_token: &refresh_token,
            },
        )?;
        let envelope: Envelope<RefreshTokenResult> = self
            .base
            .envelope(&spec, sent_token)
            .await
            .map_err(|e| ApiError::RefreshFailed {
                message: e.to_string(),
            })?;

        match envelope.data {
            Some(result) if envelope.success => {
                self.ctx.store.set_access_token(Some(result.token.clone()));
                if let Some(refresh) = result.refresh_token {
                    self.ctx.store.set_refresh_token(Some(refresh));
                }
                Ok(result.token)
            }
            _ => Err(ApiError::RefreshFailed {
                message: envelope.failure_message().to_string(),
            }),
        }
    }

    /// token 無效：清掉 access token，依設定彈窗或登出
    async fn re_authenticate(&self) {
        tracing::warn!("Access token or refresh token is invalid or expired.");
        let store = &self.ctx.store;
        store.set_access_token(None);

        if self.ctx.preferences.login_expired_mode == LoginExpiredMode::Modal
            && store.is_access_checked()
        {
            store.set_login_expired(true);
        } else {
            self.auth.logout(true).await;
        }
    }

    async fn unwrap_response<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(match failure_from_body(status, &text) {
                ApiError::BusinessError { code, message } => {
                    self.business_failure(code, message).await
                }
                other => other,
            });
        }

        // 先看 success/code，失敗回應的 data 不必符合 T
        let envelope: Envelope<Value> = parse_envelope(spec, &text)?;
        if !envelope.success {
            let message = envelope.failure_message().to_string();
            return Err(self.business_failure(envelope.code, message).await);
        }
        let envelope: Envelope<T> = envelope.typed().map_err(|e| invalid_response(spec, e))?;
        Ok(envelope.data)
    }

    /// 業務碼 401 代表未登入或登入過期：清 token 並登出
    async fn business_failure(&self, code: Option<i64>, message: String) -> ApiError {
        if code == Some(BUSINESS_UNAUTHORIZED) {
            tracing::warn!("Session expired (business code 401), logging out");
            self.ctx.store.set_access_token(None);
            self.ctx.store.set_refresh_token(None);
            self.auth.logout(true).await;
            let message = if message.is_empty() {
                SESSION_EXPIRED_MESSAGE.to_string()
            } else {
                message
            };
            return ApiError::SessionExpired { message };
        }

        let message = if message.is_empty() {
            "请求失败".to_string()
        } else {
            message
        };
        ApiError::BusinessError { code, message }
    }
}
