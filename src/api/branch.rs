use crate::core::request::RequestClient;
use crate::domain::entities::Branch;
use crate::utils::error::Result;
use serde_json::Value;

const ALL_BRANCHES_PATH: &str = "/api/Branch/all";

#[derive(Debug, Clone)]
pub struct BranchApi<'a> {
    client: &'a RequestClient,
}

impl<'a> BranchApi<'a> {
    pub fn new(client: &'a RequestClient) -> Self {
        Self { client }
    }

    /// 登入頁的門店下拉選單；非陣列回應視為沒有門店
    pub async fn all(&self) -> Result<Vec<Branch>> {
        let data: Option<Value> = self.client.get_optional(ALL_BRANCHES_PATH, Vec::new()).await?;
        Ok(branches_from(data))
    }
}

fn branches_from(data: Option<Value>) -> Vec<Branch> {
    match data {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Branch>(item) {
                Ok(branch) => Some(branch),
                Err(e) => {
                    tracing::warn!("Skipping malformed branch: {}", e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}
