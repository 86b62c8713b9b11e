//! Local stand-in for the customer endpoints, for UI work without a backend.

use crate::domain::model::Envelope;
use crate::utils::error::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::net::SocketAddr;

pub fn router() -> Router {
    Router::new()
        .route("/api/customers", get(list_customers))
        .route("/api/customers/add", post(add_customer))
}

fn sample_customers() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "张三",
            "email": "zhangsan@example.com",
            "phone": "13800138001",
            "address": "北京市朝阳区",
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-01"
        }),
        json!({
            "id": 2,
            "name": "李四",
            "email": "lisi@example.com",
            "phone": "13800138002",
            "address": "上海市浦东新区",
            "createdAt": "2024-01-02",
            "updatedAt": "2024-01-02"
        }),
        json!({
            "id": 3,
            "name": "王五",
            "email": "wangwu@example.com",
            "phone": "13800138003",
            "address": "广州市天河区",
            "createdAt": "2024-01-03",
            "updatedAt": "2024-01-03"
        }),
    ]
}

async fn list_customers() -> Json<Envelope<Vec<Value>>> {
    Json(Envelope::ok(sample_customers()))
}

/// 100..=1099 之間的 id
fn generate_id() -> u64 {
    use rand::Rng;
    rand::thread_rng().gen_range(100..1100)
}

async fn add_customer(Json(body): Json<Value>) -> Json<Envelope<Value>> {
    let now = Utc::now().to_rfc3339();
    let mut customer = Map::new();
    customer.insert("id".to_string(), json!(generate_id()));
    if let Value::Object(fields) = body {
        customer.extend(fields);
    }
    customer.insert("createdAt".to_string(), json!(now));
    customer.insert("updatedAt".to_string(), json!(now));
    tracing::info!("🧪 Mock customer added: {}", customer["id"]);
    Json(Envelope::ok(Value::Object(customer)))
}

/// 啟動 mock 服務直到行程結束
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🧪 Mock backend listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_stay_in_range() {
        for _ in 0..50 {
            let id = generate_id();
            assert!((100..1100).contains(&id));
        }
    }

    #[test]
    fn test_generated_ids_vary() {
        let ids: std::collections::HashSet<u64> = (0..200).map(|_| generate_id()).collect();
        assert!(ids.len() > 1);
    }

    #[test]
    fn test_sample_customers() {
        let customers = sample_customers();
        assert_eq!(customers.len(), 3);
        assert_eq!(customers[1]["name"], "李四");
    }
}
