use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 後端統一回應格式 `{success, message, data, code, timestamp}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "ok".to_string(),
            data: Some(data),
            code: Some(200),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            error: None,
        }
    }

    pub fn fail(code: i64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            code: Some(code),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            error: None,
        }
    }

    /// 失敗時優先取 `error`，其次 `message`
    pub fn failure_message(&self) -> &str {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.message)
    }
}

impl Envelope<Value> {
    /// 只有成功回應才把 `data` 轉成目標型別，失敗回應的 `data` 直接丟棄
    pub fn typed<T: DeserializeOwned>(self) -> serde_json::Result<Envelope<T>> {
        let data = match self.data {
            Some(value) if self.success && !value.is_null() => Some(serde_json::from_value(value)?),
            _ => None,
        };
        Ok(Envelope {
            success: self.success,
            message: self.message,
            data,
            code: self.code,
            timestamp: self.timestamp,
            error: self.error,
        })
    }
}

/// `/list` 介面回傳的分頁物件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub has_previous: Option<bool>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> From<Page<T>> for ListResult<T> {
    fn from(page: Page<T>) -> Self {
        let total = page.total_count.unwrap_or(page.data.len() as u64);
        Self {
            items: page.data,
            total,
        }
    }
}

/// 列表查詢參數，後端使用 PascalCase (`PageIndex`, `PageSize`, `CustomerName` ...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
    pub order_by: Option<String>,
    pub is_asc: Option<bool>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, index: u32, size: u32) -> Self {
        self.page_index = Some(index);
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some(field.into());
        self.is_asc = Some(ascending);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// 只輸出有設定的參數
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(index) = self.page_index {
            pairs.push(("PageIndex".to_string(), index.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("PageSize".to_string(), size.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("OrderBy".to_string(), order_by.clone()));
        }
        if let Some(is_asc) = self.is_asc {
            pairs.push(("IsAsc".to_string(), is_asc.to_string()));
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                pairs.push((key.clone(), value.clone()));
            }
        }
        pairs
    }
}

/// 前端使用的使用者資訊，由登入結果轉換而來
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub real_name: String,
    pub avatar: String,
    pub desc: String,
    pub roles: Vec<String>,
    pub token: String,
    pub home_path: String,
}

/// 存取狀態：token、使用者、權限檢查旗標
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub is_access_checked: bool,
    #[serde(default)]
    pub login_expired: bool,
}
