use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_URL_ENV: &str = "RUNKANG_API_URL";
pub const DEFAULT_API_URL: &str = "http://23.141.172.216:5201";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: Preferences,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 登入過期時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginExpiredMode {
    /// 登出並回到登入頁
    #[default]
    Page,
    /// 保留畫面，彈出重新登入視窗
    Modal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub name: String,
    pub locale: String,
    pub default_home_path: String,
    pub login_path: String,
    pub login_expired_mode: LoginExpiredMode,
    pub enable_refresh_token: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            name: "润康月子会所".to_string(),
            locale: "zh-CN".to_string(),
            default_home_path: "/analytics".to_string(),
            login_path: "/auth/login".to_string(),
            login_expired_mode: LoginExpiredMode::Page,
            enable_refresh_token: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// `Authorization` 前綴，後端目前要求直接傳 token
    pub auth_scheme: Option<String>,
    /// 登入介面使用的固定 `Authorization` 值
    pub login_authorization: Option<String>,
    pub refresh_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
            auth_scheme: None,
            login_authorization: None,
            refresh_path: "/api/Account/refresh-token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub directory: String,
    pub file_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: ".runkang".to_string(),
            file_name: "session.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有檔案就讀檔，沒有就用預設值；最後套用環境變數覆蓋
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::debug!("📁 Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            Some(path) => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${API_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ApiError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("🔧 API base URL overridden by {}", API_URL_ENV);
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;
        validation::validate_route_path("api.refresh_path", &self.api.refresh_path)?;
        validation::validate_route_path("app.default_home_path", &self.app.default_home_path)?;
        validation::validate_route_path("app.login_path", &self.app.login_path)?;
        validation::validate_non_empty_string("app.locale", &self.app.locale)?;
        validation::validate_non_empty_string("session.file_name", &self.session.file_name)?;
        validation::validate_resolved(
            "api.login_authorization",
            self.api.login_authorization.as_deref(),
        )?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
