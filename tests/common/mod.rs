#![allow(dead_code)]

use runkang_admin::config::AppConfig;
use runkang_admin::domain::ports::{HeadlessNavigator, Location, Notifier};
use runkang_admin::{AccessStore, AdminApi, AppContext, RequestClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// 記錄所有提示，方便斷言
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<(String, String)> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn success(&self, title: &str, description: &str) {
        self.successes
            .lock()
            .unwrap()
            .push((title.to_string(), description.to_string()));
    }
}

pub struct Harness {
    pub store: AccessStore,
    pub navigator: Arc<HeadlessNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub client: RequestClient,
}

impl Harness {
    pub fn api(&self) -> AdminApi {
        AdminApi::new(self.client.clone())
    }

    pub fn last_location(&self) -> Option<Location> {
        self.navigator.last()
    }
}

pub fn harness(base_url: &str, tweak: impl FnOnce(&mut AppConfig)) -> Harness {
    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    tweak(&mut config);

    let store = AccessStore::new();
    let navigator = Arc::new(HeadlessNavigator::new("/room"));
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = Arc::new(AppContext::new(
        &config,
        store.clone(),
        navigator.clone(),
        notifier.clone(),
    ));
    let client = RequestClient::new(ctx).expect("client should build");

    Harness {
        store,
        navigator,
        notifier,
        client,
    }
}

pub fn ok(data: Value) -> Value {
    json!({
        "success": true,
        "message": "ok",
        "data": data,
        "code": 200,
        "timestamp": "2025-01-01T00:00:00Z"
    })
}

pub fn fail(code: i64, message: &str) -> Value {
    json!({
        "success": false,
        "message": message,
        "data": null,
        "code": code,
        "timestamp": "2025-01-01T00:00:00Z"
    })
}

pub fn login_redirect(from: &str) -> Location {
    Location::new("/auth/login")
        .with_query("redirect", urlencoding::encode(from))
        .replacing()
}
