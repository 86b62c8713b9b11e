use crate::core::context::AppContext;
use crate::core::request::{BaseClient, RequestSpec};
use crate::domain::model::UserInfo;
use crate::domain::ports::Location;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::require_input;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const LOGIN_PATH: &str = "/api/Account/login";
const LOGOUT_PATH: &str = "/api/Account/logout";
const CHANGE_PASSWORD_PATH: &str = "/api/Account/change-password";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    pub branch_id: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: String,
    #[serde(default)]
    pub employees_name: String,
    #[serde(default)]
    pub employee_number: String,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<Value>,
}

impl LoginUser {
    /// 角色可能是字串或物件，物件取 roleCode / roleName
    fn role_names(&self) -> Vec<String> {
        self.roles
            .iter()
            .filter_map(|role| match role {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => ["roleCode", "code", "roleName", "name"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }

    pub fn to_user_info(&self, token: &str, home_path: &str) -> UserInfo {
        UserInfo {
            user_id: self.id.clone(),
            username: self.employee_number.clone(),
            real_name: self.employees_name.clone(),
            avatar: self.avatar_url.clone().unwrap_or_default(),
            desc: self.position.clone().unwrap_or_default(),
            roles: self.role_names(),
            token: token.to_string(),
            home_path: home_path.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordParams {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// 登入、登出與使用者資訊
#[derive(Debug, Clone)]
pub struct AuthService {
    base: BaseClient,
    ctx: Arc<AppContext>,
}

impl AuthService {
    pub fn new(base: BaseClient, ctx: Arc<AppContext>) -> Self {
        Self { base, ctx }
    }

    fn login_failed(&self, description: &str) {
        self.ctx
            .notifier
            .error(&format!("登录失败: {}", description));
    }

    fn validate_login(params: &LoginParams) -> Result<()> {
        require_input(&params.branch_id, "请输入门店编号")?;
        require_input(&params.user_name, "请输入用户名")?;
        require_input(&params.password, "请输入密码")?;
        Ok(())
    }

    /// 登入並保存 token 與使用者資訊
    pub async fn login(&self, params: &LoginParams) -> Result<UserInfo> {
        if let Err(e) = Self::validate_login(params) {
            self.login_failed(&e.user_friendly_message());
            return Err(e);
        }

        let mut spec = RequestSpec::new(Method::POST, LOGIN_PATH).json(params)?;
        if let Some(key) = &self.ctx.api.login_authorization {
            spec = spec.header("Authorization", key.clone());
        }

        tracing::info!("🔐 Logging in as {} (branch {})", params.user_name, params.branch_id);
        let envelope = match self.base.envelope::<LoginResult>(&spec, None).await {
            Ok(envelope) => envelope,
            Err(e) => {
                self.login_failed(&e.user_friendly_message());
                return Err(e);
            }
        };

        let result = match envelope.data {
            Some(result) if envelope.success => result,
            _ => {
                let message = envelope.failure_message().to_string();
                self.login_failed(&message);
                return Err(ApiError::BusinessError {
                    code: envelope.code,
                    message,
                });
            }
        };

        let store = &self.ctx.store;
        store.set_access_token(Some(result.token.clone()));
        store.set_refresh_token(result.refresh_token.clone());

        let home_path = self.ctx.preferences.default_home_path.clone();
        let user_info = result.user.to_user_info(&result.token, &home_path);
        store.set_user_info(Some(user_info.clone()));

        if store.login_expired() {
            // 彈窗重新登入：留在原頁面
            store.set_login_expired(false);
        } else {
            self.ctx.navigator.navigate(Location::new(home_path));
        }

        if !user_info.real_name.is_empty() {
            self.ctx
                .notifier
                .success("登录成功", &format!("欢迎回来:{}", user_info.real_name));
        }
        tracing::info!("✅ Logged in as {}", user_info.real_name);
        Ok(user_info)
    }

    /// 登出：後端呼叫失敗也繼續清除本地狀態並回到登入頁
    pub async fn logout(&self, redirect: bool) {
        let store = &self.ctx.store;
        let token = store.access_token();

        match RequestSpec::new(Method::POST, LOGOUT_PATH).json(&serde_json::json!({})) {
            Ok(spec) => {
                if let Err(e) = self.base.envelope::<Value>(&spec, token.as_deref()).await {
                    tracing::debug!("Logout request failed, ignoring: {}", e);
                }
            }
            Err(e) => tracing::debug!("Could not build logout request: {}", e),
        }

        let current = self.ctx.navigator.current_path();
        store.reset();
        store.set_login_expired(false);

        let mut location = Location::new(self.ctx.preferences.login_path.clone()).replacing();
        if redirect {
            location = location.with_query("redirect", urlencoding::encode(&current));
        }
        tracing::info!("👋 Logged out");
        self.ctx.navigator.navigate(location);
    }

    pub async fn change_password(&self, params: &ChangePasswordParams) -> Result<()> {
        require_input(&params.old_password, "请输入原密码")?;
        require_input(&params.new_password, "请输入新密码")?;
        if params.new_password != params.confirm_password {
            let err = ApiError::ValidationError {
                message: "两次输入的密码不一致".to_string(),
            };
            self.ctx.notifier.error(&err.user_friendly_message());
            return Err(err);
        }

        let spec = RequestSpec::new(Method::POST, CHANGE_PASSWORD_PATH).json(params)?;
        let token = self.ctx.store.access_token();
        let envelope = match self.base.envelope::<Value>(&spec, token.as_deref()).await {
            Ok(envelope) => envelope,
            Err(e) => {
                self.ctx.notifier.error(&e.user_friendly_message());
                return Err(e);
            }
        };

        if !envelope.success {
            let err = ApiError::BusinessError {
                code: envelope.code,
                message: envelope.failure_message().to_string(),
            };
            self.ctx.notifier.error(&err.user_friendly_message());
            return Err(err);
        }
        Ok(())
    }

    /// 登入介面已回傳使用者資訊，直接取 store 中的值
    pub fn fetch_user_info(&self) -> Option<UserInfo> {
        self.ctx.store.user_info()
    }
}
