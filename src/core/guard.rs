//! Navigation access checks.
//!
//! Decides for each navigation whether it may proceed, must go to the login
//! page, or needs the route table generated first. Route generation merges
//! the static routes with the routes built from the backend menus.

use crate::api::menu::MenuApi;
use crate::core::context::AppContext;
use crate::core::menu::{flatten_routes, BackendMenu, MenuTransformer, RouteMeta, RouteRecord};
use crate::core::request::RequestClient;
use crate::domain::ports::Location;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 不需要權限檢查的基本路由
pub const CORE_ROUTE_NAMES: &[&str] = &["Root", "Authentication", "Login", "FallbackNotFound"];

/// 一次導航的目標
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationTarget {
    pub name: Option<String>,
    pub path: String,
    pub full_path: String,
    /// 已解碼的查詢參數
    pub query: BTreeMap<String, String>,
    pub ignore_access: bool,
}

impl NavigationTarget {
    /// 由 `path?k=v` 解析
    pub fn parse(full_path: &str) -> Self {
        let (path, query_str) = match full_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (full_path, None),
        };
        let query = query_str
            .map(|q| {
                q.split('&')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| match pair.split_once('=') {
                        Some((k, v)) => (decode_query_value(k), decode_query_value(v)),
                        None => (decode_query_value(pair), String::new()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: None,
            path: path.to_string(),
            full_path: full_path.to_string(),
            query,
            ignore_access: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn ignoring_access(mut self) -> Self {
        self.ignore_access = true;
        self
    }
}

/// 無法解成 UTF-8 的值原樣保留
fn decode_query_value(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Allow,
    Redirect(Location),
}

/// 登入後一定存在的前端路由
pub fn static_routes(home_path: &str) -> Vec<RouteRecord> {
    let home_name = home_path.trim_start_matches('/').to_string();
    vec![RouteRecord {
        name: "Dashboard".to_string(),
        path: "/dashboard".to_string(),
        component: Some("BasicLayout".to_string()),
        redirect: Some(home_path.to_string()),
        meta: RouteMeta {
            title: "概览".to_string(),
            icon: Some("lucide:layout-dashboard".to_string()),
            order: Some(-1),
            ..Default::default()
        },
        children: vec![RouteRecord {
            name: if home_name.is_empty() {
                "Analytics".to_string()
            } else {
                home_name
            },
            path: home_path.to_string(),
            component: Some("/dashboard/analytics/index".to_string()),
            parent: Some("/dashboard".to_string()),
            parents: vec!["/dashboard".to_string()],
            meta: RouteMeta {
                title: "分析页".to_string(),
                icon: Some("lucide:area-chart".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }]
}

/// 後端選單來源
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menus(&self) -> Result<Vec<BackendMenu>>;
}

#[async_trait]
impl MenuSource for RequestClient {
    async fn fetch_menus(&self) -> Result<Vec<BackendMenu>> {
        MenuApi::new(self).user_menus().await
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    ctx: Arc<AppContext>,
    menus: Arc<dyn MenuSource>,
    static_routes: Vec<RouteRecord>,
}

impl AccessGuard {
    pub fn new(client: RequestClient) -> Self {
        let ctx = client.context().clone();
        Self::with_source(ctx, Arc::new(client))
    }

    pub fn with_source(ctx: Arc<AppContext>, menus: Arc<dyn MenuSource>) -> Self {
        let static_routes = static_routes(&ctx.preferences.default_home_path);
        Self {
            ctx,
            menus,
            static_routes,
        }
    }

    pub fn with_static_routes(mut self, routes: Vec<RouteRecord>) -> Self {
        self.static_routes = routes;
        self
    }

    /// 只看路由名稱
    fn is_core_route(&self, to: &NavigationTarget) -> bool {
        to.name
            .as_deref()
            .map(|name| CORE_ROUTE_NAMES.contains(&name))
            .unwrap_or(false)
    }

    fn home_path(&self) -> String {
        let ctx = &self.ctx;
        ctx.store
            .user_info()
            .map(|u| u.home_path)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ctx.preferences.default_home_path.clone())
    }

    pub async fn check(&self, to: &NavigationTarget, from: Option<&NavigationTarget>) -> GuardDecision {
        let ctx = &self.ctx;
        let prefs = &ctx.preferences;
        let has_token = ctx.store.access_token().is_some();

        if self.is_core_route(to) {
            if to.path == prefs.login_path && has_token {
                let target = to
                    .query
                    .get("redirect")
                    .filter(|r| !r.is_empty())
                    .cloned()
                    .unwrap_or_else(|| self.home_path());
                return GuardDecision::Redirect(Location::new(target));
            }
            return GuardDecision::Allow;
        }

        if !has_token {
            if to.ignore_access {
                return GuardDecision::Allow;
            }
            if to.full_path == prefs.login_path {
                return GuardDecision::Allow;
            }
            let mut location = Location::new(prefs.login_path.clone()).replacing();
            if to.full_path != prefs.default_home_path {
                location = location.with_query("redirect", urlencoding::encode(&to.full_path));
            }
            tracing::debug!("🔒 No token, sending {} to login", to.full_path);
            return GuardDecision::Redirect(location);
        }

        if ctx.store.is_access_checked() {
            return GuardDecision::Allow;
        }

        let routes = self.generate_access().await;
        tracing::info!("🛡️  Generated {} accessible routes", flatten_routes(&routes).len());
        ctx.store.set_access_routes(routes);
        ctx.store.set_is_access_checked(true);

        let redirect = from
            .and_then(|f| f.query.get("redirect"))
            .filter(|r| !r.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                if to.path == prefs.default_home_path {
                    self.home_path()
                } else {
                    to.full_path.clone()
                }
            });
        GuardDecision::Redirect(Location::new(redirect).replacing())
    }

    /// 靜態路由加上後端選單路由；選單載入失敗時只保留靜態路由
    pub async fn generate_access(&self) -> Vec<RouteRecord> {
        let mut transformer = MenuTransformer::new();
        transformer.reserve(&self.static_routes);

        // 請求層已經對失敗做過提示
        let backend = match self.menus.fetch_menus().await {
            Ok(menus) => {
                tracing::info!("🗺️  Loaded {} backend menus", menus.len());
                transformer.transform(&menus)
            }
            Err(e) => {
                tracing::warn!("Failed to load menus, continuing with static routes: {}", e);
                Vec::new()
            }
        };

        let mut routes = self.static_routes.clone();
        routes.extend(backend);
        routes.sort_by_key(|r| r.meta.order.unwrap_or(i64::MAX));
        routes
    }
}
