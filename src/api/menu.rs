use crate::core::menu::BackendMenu;
use crate::core::request::RequestClient;
use crate::utils::error::Result;
use serde_json::Value;

const USER_MENU_PATH: &str = "/api/Menu/userlist";

#[derive(Debug, Clone)]
pub struct MenuApi<'a> {
    client: &'a RequestClient,
}

impl<'a> MenuApi<'a> {
    pub fn new(client: &'a RequestClient) -> Self {
        Self { client }
    }

    /// 目前使用者的後端選單原始資料；非陣列回應視為空
    pub async fn user_menus(&self) -> Result<Vec<BackendMenu>> {
        let data: Option<Value> = self.client.get_optional(USER_MENU_PATH, Vec::new()).await?;
        Ok(match data {
            Some(list @ Value::Array(_)) => serde_json::from_value(list).unwrap_or_else(|e| {
                tracing::warn!("Menu payload could not be parsed: {}", e);
                Vec::new()
            }),
            _ => Vec::new(),
        })
    }
}
