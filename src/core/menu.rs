//! Backend menu tree to client route table.
//!
//! Buttons and invisible entries are dropped. Every surviving entry gets a
//! unique route name and a unique path; entries whose backend path is empty
//! or a placeholder get a path synthesized under their parent.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const LAYOUT_PLACEHOLDER: &str = "/Layout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuType {
    /// 目錄
    #[serde(rename = "M")]
    Directory,
    #[default]
    #[serde(rename = "C")]
    Menu,
    /// 按鈕，不產生路由
    #[serde(rename = "F")]
    Button,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMenuMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMenu {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub menu_name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub menu_type: MenuType,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub is_cache: bool,
    /// 缺少時視為隱藏
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub children: Vec<BackendMenu>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub hide_children_in_menu: Option<bool>,
    #[serde(default)]
    pub meta: Option<BackendMenuMeta>,
}

impl BackendMenu {
    /// 已轉換過的 `name` 優先
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.menu_name,
        }
    }

    fn is_routable(&self) -> bool {
        self.menu_type != MenuType::Button && self.is_visible && !self.hidden.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub hide_in_menu: bool,
    #[serde(default)]
    pub hide_children_in_menu: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default)]
    pub keep_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub open_in_new_window: bool,
    #[serde(default)]
    pub ignore_access: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    pub meta: RouteMeta,
    #[serde(default)]
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    /// 深度優先走訪整棵樹
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a RouteRecord>) {
        out.push(self);
        for child in &self.children {
            child.walk(out);
        }
    }
}

/// 攤平路由樹
pub fn flatten_routes(routes: &[RouteRecord]) -> Vec<&RouteRecord> {
    let mut out = Vec::new();
    for route in routes {
        route.walk(&mut out);
    }
    out
}

fn is_placeholder_path(path: &str) -> bool {
    matches!(path, "" | LAYOUT_PLACEHOLDER | "#" | "/")
}

/// `customerProfile` -> `customer{sep}Profile` 的分段位置
fn split_camel(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for c in input.chars() {
        if let Some(p) = prev {
            if (p.is_ascii_lowercase() || p.is_ascii_digit()) && c.is_ascii_uppercase() {
                out.push(sep);
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// 元件名稱轉成前端的元件路徑
pub fn normalize_component_path(component: Option<&str>, path: Option<&str>) -> Option<String> {
    let component = component.filter(|c| !c.is_empty())?;

    if component == "Layout" || component == "BasicLayout" {
        return Some("BasicLayout".to_string());
    }
    if component.starts_with('/') {
        return Some(component.to_string());
    }
    if let Some(path) = path {
        if !is_placeholder_path(path) && path.starts_with('/') {
            return Some(path.to_string());
        }
    }
    Some(format!("/{}", split_camel(component, '/').to_lowercase()))
}

/// 英文名稱轉 kebab-case；非 ASCII 名稱回傳 None
pub fn slugify(name: &str) -> Option<String> {
    if name.is_empty() || !name.is_ascii() {
        return None;
    }
    let mut slug = String::with_capacity(name.len());
    for c in split_camel(name, '-').chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-').to_string();
    (!slug.is_empty()).then_some(slug)
}

fn name_from_path(path: &str) -> String {
    path.trim_start_matches('/').replace('/', "-")
}

/// 有狀態的轉換器：記錄已使用的路徑與名稱以保證唯一
#[derive(Debug, Default)]
pub struct MenuTransformer {
    used_paths: HashSet<String>,
    used_names: HashSet<String>,
}

impl MenuTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 預先登記已存在的路由 (例如靜態路由)，避免重複
    pub fn reserve(&mut self, routes: &[RouteRecord]) {
        for route in flatten_routes(routes) {
            self.used_paths.insert(route.path.clone());
            self.used_names.insert(route.name.clone());
        }
    }

    pub fn transform(&mut self, menus: &[BackendMenu]) -> Vec<RouteRecord> {
        // 後端給的真實路徑先登記，產生的路徑才不會撞到
        fn collect(menus: &[BackendMenu], used: &mut HashSet<String>) {
            for menu in menus.iter().filter(|m| m.is_routable()) {
                if let Some(path) = menu.path.as_deref().filter(|p| !is_placeholder_path(p)) {
                    used.insert(path.to_string());
                }
                collect(&menu.children, used);
            }
        }
        collect(menus, &mut self.used_paths);

        let routes: Vec<RouteRecord> = menus
            .iter()
            .filter_map(|menu| self.transform_menu(menu, None, &[]))
            .collect();
        tracing::debug!("🗺️  Transformed {} top-level menus into routes", routes.len());
        routes
    }

    fn unique(used: &mut HashSet<String>, candidate: String) -> String {
        if used.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let next = format!("{}-{}", candidate, n);
            if used.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }

    fn synthesize_path(&mut self, menu: &BackendMenu, parent: Option<&str>) -> String {
        let slug = slugify(menu.display_name()).unwrap_or_else(|| {
            if menu.id.is_empty() {
                "menu".to_string()
            } else {
                format!("menu-{}", menu.id)
            }
        });
        let base = parent.unwrap_or("").trim_end_matches('/');
        Self::unique(&mut self.used_paths, format!("{}/{}", base, slug))
    }

    fn route_name(&mut self, menu: &BackendMenu, backend_path: &str, parent: Option<&str>) -> String {
        let menu_name = menu.display_name();
        let candidate = if !is_placeholder_path(backend_path) {
            let from_path = name_from_path(backend_path);
            if from_path.is_empty() {
                menu_name.to_string()
            } else {
                from_path
            }
        } else {
            match parent.map(name_from_path).filter(|p| !p.is_empty()) {
                Some(parent_name) => format!("{}-{}", parent_name, menu_name),
                None => menu_name.to_string(),
            }
        };
        Self::unique(&mut self.used_names, candidate)
    }

    fn transform_menu(
        &mut self,
        menu: &BackendMenu,
        parent: Option<&str>,
        parents: &[String],
    ) -> Option<RouteRecord> {
        if !menu.is_routable() {
            return None;
        }

        let backend_path = menu.path.as_deref().unwrap_or("");
        let name = self.route_name(menu, backend_path, parent);
        let path = if is_placeholder_path(backend_path) {
            self.synthesize_path(menu, parent)
        } else {
            backend_path.to_string()
        };

        let meta_ref = menu.meta.as_ref();
        let non_empty = |s: Option<&String>| s.filter(|v| !v.is_empty()).cloned();
        let meta = RouteMeta {
            title: non_empty(meta_ref.and_then(|m| m.title.as_ref()))
                .unwrap_or_else(|| menu.display_name().to_string()),
            icon: non_empty(meta_ref.and_then(|m| m.icon.as_ref()))
                .or_else(|| non_empty(menu.icon.as_ref())),
            order: Some(menu.sort),
            hide_in_menu: false,
            hide_children_in_menu: menu.hide_children_in_menu.unwrap_or(false),
            permission: non_empty(meta_ref.and_then(|m| m.permission.as_ref()))
                .or_else(|| non_empty(menu.permission.as_ref())),
            keep_alive: menu.is_cache,
            link: (menu.is_external && !backend_path.is_empty()).then(|| backend_path.to_string()),
            open_in_new_window: menu.is_external,
            ignore_access: false,
        };

        let mut child_parents = parents.to_vec();
        child_parents.push(path.clone());
        let children = menu
            .children
            .iter()
            .filter_map(|child| self.transform_menu(child, Some(&path), &child_parents))
            .collect();

        Some(RouteRecord {
            name,
            component: normalize_component_path(menu.component.as_deref(), menu.path.as_deref()),
            redirect: None,
            parent: parent.map(str::to_string),
            parents: parents.to_vec(),
            meta,
            children,
            path,
        })
    }
}

/// 便利函式：以全新的轉換器處理一次
pub fn transform_menus(menus: &[BackendMenu]) -> Vec<RouteRecord> {
    MenuTransformer::new().transform(menus)
}
