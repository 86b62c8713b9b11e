use crate::config::toml_config::{ApiConfig, AppConfig, Preferences};
use crate::core::session::AccessStore;
use crate::domain::ports::{Navigator, Notifier};
use std::sync::Arc;

/// 請求層與認證層共用的環境
#[derive(Clone)]
pub struct AppContext {
    pub preferences: Preferences,
    pub api: ApiConfig,
    pub store: AccessStore,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(
        config: &AppConfig,
        store: AccessStore,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            preferences: config.app.clone(),
            api: config.api.clone(),
            store,
            navigator,
            notifier,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("preferences", &self.preferences)
            .field("api", &self.api)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
