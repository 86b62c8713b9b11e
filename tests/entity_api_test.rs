mod common;

use anyhow::Result;
use common::{harness, ok};
use httpmock::prelude::*;
use runkang_admin::api::sales_lead::{AssignLeadParams, ConvertLeadParams};
use runkang_admin::api::status::{AppointmentStatusUpdate, FeedbackResponse, MaintenanceStatusUpdate};
use runkang_admin::core::guard::AccessGuard;
use runkang_admin::domain::entities::{Customer, Room};
use runkang_admin::{Entity, ListQuery};
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_sends_pascal_case_query_and_unwraps_page() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/Customer/list")
                .query_param("PageIndex", "2")
                .query_param("PageSize", "10")
                .query_param("OrderBy", "createdAt")
                .query_param("IsAsc", "false")
                .query_param("CustomerStatus", "2");
            then.status(200).json_body(ok(json!({
                "pageNo": 2,
                "pageSize": 10,
                "totalCount": 11,
                "pages": 2,
                "data": [{"id": "c11", "customerName": "王五", "customerStatus": 2, "tag": "vip"}]
            })));
        })
        .await;

    let query = ListQuery::new()
        .page(2, 10)
        .order_by("createdAt", false)
        .filter("CustomerStatus", 2)
        .filter("CustomerName", "");
    let result = h.api().customers().list(&query).await?;

    mock.assert_async().await;
    assert_eq!(result.total, 11);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].customer_name, "王五");
    assert_eq!(result.items[0].extra.get("tag"), Some(&json!("vip")));
    Ok(())
}

#[tokio::test]
async fn test_get_uses_server_spelling() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/FrondeskAppointment/a1");
            then.status(200).json_body(ok(json!({"id": "a1", "visitorName": "赵六"})));
        })
        .await;

    let record = h.api().entity(Entity::FrontdeskAppointment).get("a1").await?;
    mock.assert_async().await;
    assert_eq!(record["visitorName"], "赵六");
    Ok(())
}

#[tokio::test]
async fn test_create_posts_without_id_and_returns_data() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Customer").json_body(json!({
                "customerName": "张三",
                "phoneNumber": "13800138001",
                "customerStatus": 1
            }));
            then.status(200).json_body(ok(json!("c-new")));
        })
        .await;

    let customer = Customer {
        customer_name: "张三".to_string(),
        phone_number: Some("13800138001".to_string()),
        customer_status: 1,
        ..Default::default()
    };
    let created = h.api().customers().create(&customer).await?;

    mock.assert_async().await;
    assert_eq!(created, Some(json!("c-new")));
    Ok(())
}

#[tokio::test]
async fn test_update_puts_id_in_body() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/Room")
                .json_body_partial(r#"{"id": "r1", "roomNo": "A101", "status": 2}"#);
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let room = Room {
        id: "r1".to_string(),
        room_no: "A101".to_string(),
        room_type_id: "t1".to_string(),
        status: 2,
        ..Default::default()
    };
    let updated = h.api().rooms().update(&room).await?;

    mock.assert_async().await;
    assert_eq!(updated, None);
    Ok(())
}

#[tokio::test]
async fn test_delete_by_path_and_department_by_body() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let room = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/Room/r1");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;
    let department = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/Department")
                .json_body(json!({"id": "d1"}));
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    h.api().rooms().delete("r1").await?;
    h.api().departments().delete("d1").await?;

    room.assert_async().await;
    department.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_sales_lead_operations() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mine = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/SalesLead/my-assigned-list")
                .query_param("PageIndex", "1");
            then.status(200).json_body(ok(json!({
                "totalCount": 1,
                "data": [{"id": "L1", "customerName": "孙七", "leadSource": 2}]
            })));
        })
        .await;
    let assign = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/SalesLead/assign")
                .json_body(json!({"id": "L1", "assignedEmployeeId": "E9"}));
            then.status(200).json_body(ok(Value::Null));
        })
        .await;
    let convert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/SalesLead/convert")
                .json_body(json!({"id": "L1", "branchId": "B01"}));
            then.status(200).json_body(ok(json!("c-99")));
        })
        .await;

    let api = h.api();
    let leads = api.sales_leads();
    let page = leads.my_assigned_list(&ListQuery::new().page(1, 20)).await?;
    assert_eq!(page.items[0].customer_name, "孙七");

    leads
        .assign(&AssignLeadParams {
            id: "L1".to_string(),
            assigned_employee_id: "E9".to_string(),
        })
        .await?;
    let converted = leads
        .convert(&ConvertLeadParams {
            id: "L1".to_string(),
            branch_id: Some("B01".to_string()),
        })
        .await?;

    mine.assert_async().await;
    assign.assert_async().await;
    convert.assert_async().await;
    assert_eq!(converted, Some(json!("c-99")));
    Ok(())
}

#[tokio::test]
async fn test_status_endpoints() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let appointment = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/FrondeskAppointment/status")
                .json_body(json!({"id": "a1", "appointmentStatus": 3, "cancelReason": "改期"}));
            then.status(200).json_body(ok(Value::Null));
        })
        .await;
    let maintenance = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/MaintenanceRecord/m1/status")
                .json_body(json!({"id": "m1", "maintenanceStatus": 2}));
            then.status(200).json_body(ok(Value::Null));
        })
        .await;
    let feedback = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/CustomerFeedback/response")
                .json_body_partial(r#"{"id": "f1", "responseStatus": 1, "responseContent": "已处理"}"#);
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let api = h.api();
    let statuses = api.statuses();
    statuses
        .update_appointment(&AppointmentStatusUpdate {
            id: "a1".to_string(),
            appointment_status: 3,
            cancel_reason: Some("改期".to_string()),
            ..Default::default()
        })
        .await?;
    statuses
        .update_maintenance(&MaintenanceStatusUpdate {
            id: "m1".to_string(),
            maintenance_status: 2,
            ..Default::default()
        })
        .await?;
    statuses
        .respond_feedback(&FeedbackResponse {
            id: "f1".to_string(),
            response_status: 1,
            response_content: Some("已处理".to_string()),
            ..Default::default()
        })
        .await?;

    appointment.assert_async().await;
    maintenance.assert_async().await;
    feedback.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_branches_tolerate_non_array_payload() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Branch/all");
            then.status(200).json_body(ok(json!([
                {"id": "1", "branchCode": "SZ01", "branchName": "深圳店"},
                {"id": "2", "branchCode": "GZ01", "branchName": "广州店"}
            ])));
        })
        .await;

    let branches = h.api().branches().all().await?;
    mock.assert_async().await;
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1].branch_code, "GZ01");

    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Branch/all");
            then.status(200).json_body(ok(json!({"unexpected": true})));
        })
        .await;
    assert!(h.api().branches().all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_generated_access_merges_backend_menus() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("tok".to_string()));

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Menu/userlist").header("Authorization", "tok");
            then.status(200).json_body(ok(json!([
                {"id": "1", "menuName": "客户管理", "path": "/customer", "menuType": "M", "sort": 1,
                 "isVisible": true, "component": "Layout", "children": [
                    {"id": "2", "menuName": "客户列表", "path": "/customer/list", "menuType": "C",
                     "isVisible": true, "component": "customerList"},
                    {"id": "3", "menuName": "导出", "menuType": "F", "isVisible": true}
                 ]}
            ])));
        })
        .await;

    let routes = AccessGuard::new(h.client.clone()).generate_access().await;
    mock.assert_async().await;

    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Dashboard", "customer"]);
    assert_eq!(routes[1].children.len(), 1);
    assert_eq!(routes[1].children[0].component.as_deref(), Some("/customer/list"));
    Ok(())
}

#[tokio::test]
async fn test_menu_payload_that_is_not_a_list_yields_static_routes_only() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("tok".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Menu/userlist");
            then.status(200).json_body(ok(json!({"menus": []})));
        })
        .await;

    let routes = AccessGuard::new(h.client.clone()).generate_access().await;
    assert_eq!(routes.len(), 1);
    assert!(h.notifier.errors().is_empty());
    Ok(())
}
