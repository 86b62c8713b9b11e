use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 導航目標，對應前端 router 的 `{ path, query, replace }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub replace: bool,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    /// `path?k=v` 形式，值已經編碼過
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// 路由跳轉
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, location: Location);
}

/// 使用者提示 (toast / notification)
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
    fn success(&self, title: &str, description: &str);
}

/// 以 tracing 輸出提示
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::error!("❌ {}", message);
    }

    fn success(&self, title: &str, description: &str) {
        tracing::info!("✅ {}: {}", title, description);
    }
}

/// 沒有畫面的環境：只記錄最後一次跳轉
#[derive(Debug, Default)]
pub struct HeadlessNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<Location>>,
}

impl HeadlessNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(start.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<Location> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Location> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Navigator for HeadlessNavigator {
    fn current_path(&self) -> String {
        self.current.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn navigate(&self, location: Location) {
        tracing::debug!("🧭 Navigating to {}", location.full_path());
        if let Ok(mut current) = self.current.lock() {
            *current = location.full_path();
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(location);
        }
    }
}
