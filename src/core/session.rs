use crate::core::menu::RouteRecord;
use crate::domain::model::{Session, UserInfo};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 共享的存取狀態 (access token、使用者資訊、已產生的路由)
#[derive(Debug, Clone, Default)]
pub struct AccessStore {
    session: Arc<RwLock<Session>>,
    routes: Arc<RwLock<Vec<RouteRecord>>>,
}

impl AccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            routes: Arc::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        self.write().access_token = token;
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn set_refresh_token(&self, token: Option<String>) {
        self.write().refresh_token = token;
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.read().user_info.clone()
    }

    pub fn set_user_info(&self, user: Option<UserInfo>) {
        self.write().user_info = user;
    }

    pub fn is_access_checked(&self) -> bool {
        self.read().is_access_checked
    }

    pub fn set_is_access_checked(&self, checked: bool) {
        self.write().is_access_checked = checked;
    }

    pub fn login_expired(&self) -> bool {
        self.read().login_expired
    }

    pub fn set_login_expired(&self, expired: bool) {
        self.write().login_expired = expired;
    }

    pub fn access_routes(&self) -> Vec<RouteRecord> {
        self.routes.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn set_access_routes(&self, routes: Vec<RouteRecord>) {
        if let Ok(mut current) = self.routes.write() {
            *current = routes;
        }
    }

    /// 清空所有狀態 (登出)
    pub fn reset(&self) {
        *self.write() = Session::default();
        self.set_access_routes(Vec::new());
    }
}

/// 把 [`Session`] 以 JSON 保存到 [`Storage`]
pub struct SessionFile<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> SessionFile<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    /// 檔案不存在或損壞時回傳空的 session
    pub async fn load(&self) -> Session {
        match self.storage.read_file(&self.file_name).await {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session file {}: {}", self.file_name, e);
                    Session::default()
                }
            },
            Err(_) => Session::default(),
        }
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        let data = serde_json::to_vec_pretty(session)?;
        self.storage.write_file(&self.file_name, &data).await?;
        tracing::debug!("💾 Session saved to {}", self.file_name);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_file(&self.file_name).await
    }
}
