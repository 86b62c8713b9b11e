//! Status transitions that have their own endpoints.

use crate::core::request::RequestClient;
use crate::domain::entities::{Entity, Record};
use crate::utils::error::Result;
use crate::utils::validation::require_input;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 前台預約狀態 (到訪、取消 ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStatusUpdate {
    pub id: String,
    pub appointment_status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reception_employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatusUpdate {
    pub id: String,
    pub maintenance_status: i32,
    #[serde(flatten)]
    pub extra: Record,
}

/// 客訴回覆
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub response_status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_id: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone)]
pub struct StatusApi<'a> {
    client: &'a RequestClient,
}

impl<'a> StatusApi<'a> {
    pub fn new(client: &'a RequestClient) -> Self {
        Self { client }
    }

    pub async fn update_appointment(&self, update: &AppointmentStatusUpdate) -> Result<Option<Value>> {
        require_input(&update.id, "缺少预约 id")?;
        let path = format!("{}/status", Entity::FrontdeskAppointment.collection_path());
        self.client.put(&path, update).await
    }

    pub async fn update_maintenance(&self, update: &MaintenanceStatusUpdate) -> Result<Option<Value>> {
        require_input(&update.id, "缺少维护记录 id")?;
        let path = format!(
            "{}/status",
            Entity::MaintenanceRecord.item_path(&update.id)
        );
        self.client.put(&path, update).await
    }

    pub async fn respond_feedback(&self, response: &FeedbackResponse) -> Result<Option<Value>> {
        require_input(&response.id, "缺少反馈 id")?;
        let path = format!("{}/response", Entity::CustomerFeedback.collection_path());
        self.client.put(&path, response).await
    }
}
