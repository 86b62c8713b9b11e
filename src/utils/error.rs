use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    /// 非 2xx 的 HTTP 回應
    #[error("Server responded with {status}: {message}")]
    ServerError { status: u16, message: String },

    /// `success: false` 的業務錯誤
    #[error("{message}")]
    BusinessError { code: Option<i64>, message: String },

    #[error("Login expired: {message}")]
    SessionExpired { message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Token refresh failed: {message}")]
    RefreshFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Server,
    Configuration,
    Data,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::HttpError(_) => ErrorCategory::Network,
            ApiError::SessionExpired { .. }
            | ApiError::Unauthorized
            | ApiError::RefreshFailed { .. } => ErrorCategory::Authentication,
            ApiError::ServerError { .. } | ApiError::BusinessError { .. } => ErrorCategory::Server,
            ApiError::IoError(_)
            | ApiError::ConfigError { .. }
            | ApiError::ConfigValidationError { .. }
            | ApiError::InvalidConfigValueError { .. }
            | ApiError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ApiError::SerializationError(_) | ApiError::InvalidResponse { .. } => {
                ErrorCategory::Data
            }
            ApiError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Authentication => ErrorSeverity::Medium,
            ErrorCategory::Server | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API address and your network connection",
            ErrorCategory::Authentication => "Run `runkang-admin login` to sign in again",
            ErrorCategory::Server => "Check the request parameters or contact the administrator",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Data => "The server returned unexpected data; retry later",
            ErrorCategory::Validation => "Fill in the required fields and retry",
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ApiError::HttpError(e) if e.is_timeout() => "请求超时，请稍后重试".to_string(),
            ApiError::HttpError(_) => "网络异常，请检查网络连接".to_string(),
            ApiError::SessionExpired { message } if !message.is_empty() => message.clone(),
            ApiError::SessionExpired { .. } | ApiError::Unauthorized => {
                "登录已过期，请重新登录".to_string()
            }
            ApiError::BusinessError { message, .. } | ApiError::ValidationError { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ApiError::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
