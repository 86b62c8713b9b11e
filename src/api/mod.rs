//! Typed wrappers over the REST endpoints.
//!
//! Every entity shares the same five operations (list/get/create/update/
//! delete), so [`EntityApi`] implements them once. Entities with extra
//! endpoints get their own module.

pub mod branch;
pub mod menu;
pub mod sales_lead;
pub mod status;

use crate::core::request::RequestClient;
use crate::domain::entities::{
    Baby, Contract, Customer, Department, Employee, Entity, Payment, Record, Resource, Role, Room,
    RoomType,
};
use crate::domain::model::{ListQuery, ListResult, Page};
use crate::utils::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// 單一實體的 CRUD
#[derive(Debug, Clone)]
pub struct EntityApi<'a, T> {
    client: &'a RequestClient,
    entity: Entity,
    _record: PhantomData<T>,
}

impl<'a, T: Resource> EntityApi<'a, T> {
    pub fn typed(client: &'a RequestClient) -> Self {
        Self::with_entity(client, T::ENTITY)
    }
}

impl<'a> EntityApi<'a, Record> {
    /// 沒有專屬型別的實體，以 JSON 物件操作
    pub fn dynamic(client: &'a RequestClient, entity: Entity) -> Self {
        Self::with_entity(client, entity)
    }
}

impl<'a, T> EntityApi<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    fn with_entity(client: &'a RequestClient, entity: Entity) -> Self {
        Self {
            client,
            entity,
            _record: PhantomData,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListResult<T>> {
        let data: Option<Value> = self
            .client
            .get_optional(&self.entity.list_path(), query.to_pairs())
            .await?;
        let result = parse_list(data)?;
        tracing::debug!(
            "📋 {} list: {} items (total {})",
            self.entity,
            result.items.len(),
            result.total
        );
        Ok(result)
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.client.get(&self.entity.item_path(id), Vec::new()).await
    }

    pub async fn create(&self, record: &T) -> Result<Option<Value>> {
        tracing::info!("➕ Creating {}", self.entity);
        self.client.post(&self.entity.collection_path(), record).await
    }

    /// id 放在請求體中
    pub async fn update(&self, record: &T) -> Result<Option<Value>> {
        tracing::info!("✏️  Updating {}", self.entity);
        self.client.put(&self.entity.collection_path(), record).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        tracing::info!("🗑️  Deleting {} {}", self.entity, id);
        if self.entity.deletes_by_body() {
            let body = serde_json::json!({ "id": id });
            self.client
                .delete_with_body(&self.entity.collection_path(), &body)
                .await
        } else {
            self.client.delete(&self.entity.item_path(id)).await
        }
    }
}

/// 分頁物件或直接回傳陣列都接受
fn parse_list<T: DeserializeOwned>(data: Option<Value>) -> Result<ListResult<T>> {
    let invalid = |e: serde_json::Error| ApiError::InvalidResponse {
        message: format!("unexpected list payload: {}", e),
    };
    match data {
        None | Some(Value::Null) => Ok(ListResult {
            items: Vec::new(),
            total: 0,
        }),
        Some(Value::Array(items)) => {
            let items: Vec<T> = serde_json::from_value(Value::Array(items)).map_err(invalid)?;
            let total = items.len() as u64;
            Ok(ListResult { items, total })
        }
        Some(page) => {
            let page: Page<T> = serde_json::from_value(page).map_err(invalid)?;
            Ok(page.into())
        }
    }
}

/// 後台所有介面的入口
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: RequestClient,
}

impl AdminApi {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn resource<T: Resource>(&self) -> EntityApi<'_, T> {
        EntityApi::typed(&self.client)
    }

    pub fn entity(&self, entity: Entity) -> EntityApi<'_, Record> {
        EntityApi::dynamic(&self.client, entity)
    }

    pub fn customers(&self) -> EntityApi<'_, Customer> {
        self.resource()
    }

    pub fn babies(&self) -> EntityApi<'_, Baby> {
        self.resource()
    }

    pub fn contracts(&self) -> EntityApi<'_, Contract> {
        self.resource()
    }

    pub fn rooms(&self) -> EntityApi<'_, Room> {
        self.resource()
    }

    pub fn room_types(&self) -> EntityApi<'_, RoomType> {
        self.resource()
    }

    pub fn payments(&self) -> EntityApi<'_, Payment> {
        self.resource()
    }

    pub fn sales_leads(&self) -> sales_lead::SalesLeadApi<'_> {
        sales_lead::SalesLeadApi::new(&self.client)
    }

    pub fn departments(&self) -> EntityApi<'_, Department> {
        self.resource()
    }

    pub fn employees(&self) -> EntityApi<'_, Employee> {
        self.resource()
    }

    pub fn roles(&self) -> EntityApi<'_, Role> {
        self.resource()
    }

    pub fn branches(&self) -> branch::BranchApi<'_> {
        branch::BranchApi::new(&self.client)
    }

    pub fn statuses(&self) -> status::StatusApi<'_> {
        status::StatusApi::new(&self.client)
    }

    pub fn menus(&self) -> menu::MenuApi<'_> {
        menu::MenuApi::new(&self.client)
    }
}
