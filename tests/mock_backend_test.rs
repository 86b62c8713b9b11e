#![cfg(feature = "mock")]

use anyhow::Result;
use runkang_admin::mock;
use serde_json::{json, Value};

async fn spawn_mock() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, mock::router()).await;
    });
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_customers_are_wrapped_in_envelope() -> Result<()> {
    let base = spawn_mock().await?;

    let body: Value = reqwest::get(format!("{}/api/customers", base))
        .await?
        .json()
        .await?;

    assert_eq!(body["success"], true);
    let customers = body["data"].as_array().expect("data should be a list");
    assert_eq!(customers.len(), 3);
    let names: Vec<&str> = customers.iter().filter_map(|c| c["name"].as_str()).collect();
    assert_eq!(names, vec!["张三", "李四", "王五"]);
    Ok(())
}

#[tokio::test]
async fn test_add_customer_echoes_body_with_id_and_timestamps() -> Result<()> {
    let base = spawn_mock().await?;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/api/customers/add", base))
        .json(&json!({"name": "赵六", "phone": "13800138004"}))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["success"], true);
    let customer = &body["data"];
    assert_eq!(customer["name"], "赵六");
    assert_eq!(customer["phone"], "13800138004");

    let id = customer["id"].as_u64().expect("numeric id");
    assert!((100..1100).contains(&id));
    assert!(customer["createdAt"].is_string());
    assert_eq!(customer["createdAt"], customer["updatedAt"]);
    Ok(())
}
