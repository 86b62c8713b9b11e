use super::{parse_list, EntityApi};
use crate::core::request::RequestClient;
use crate::domain::entities::SalesLead;
use crate::domain::model::{ListQuery, ListResult};
use crate::utils::error::Result;
use crate::utils::validation::require_input;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MY_ASSIGNED_PATH: &str = "/api/SalesLead/my-assigned-list";
const CONVERT_PATH: &str = "/api/SalesLead/convert";
const ASSIGN_PATH: &str = "/api/SalesLead/assign";

/// 線索轉客戶
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertLeadParams {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

/// 指派銷售
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLeadParams {
    pub id: String,
    pub assigned_employee_id: String,
}

#[derive(Debug, Clone)]
pub struct SalesLeadApi<'a> {
    client: &'a RequestClient,
}

impl<'a> SalesLeadApi<'a> {
    pub fn new(client: &'a RequestClient) -> Self {
        Self { client }
    }

    /// 一般的 list/get/create/update/delete
    pub fn crud(&self) -> EntityApi<'a, SalesLead> {
        EntityApi::typed(self.client)
    }

    /// 目前登入者被指派的線索
    pub async fn my_assigned_list(&self, query: &ListQuery) -> Result<ListResult<SalesLead>> {
        let data: Option<Value> = self
            .client
            .get_optional(MY_ASSIGNED_PATH, query.to_pairs())
            .await?;
        parse_list(data)
    }

    pub async fn convert(&self, params: &ConvertLeadParams) -> Result<Option<Value>> {
        require_input(&params.id, "缺少线索 id")?;
        tracing::info!("🔄 Converting sales lead {} to customer", params.id);
        self.client.post(CONVERT_PATH, params).await
    }

    pub async fn assign(&self, params: &AssignLeadParams) -> Result<Option<Value>> {
        require_input(&params.id, "缺少线索 id")?;
        require_input(&params.assigned_employee_id, "请选择销售")?;
        tracing::info!(
            "👤 Assigning sales lead {} to {}",
            params.id,
            params.assigned_employee_id
        );
        self.client.post(ASSIGN_PATH, params).await
    }
}
