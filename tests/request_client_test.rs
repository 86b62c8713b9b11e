mod common;

use anyhow::Result;
use common::{fail, harness, login_redirect, ok};
use httpmock::prelude::*;
use runkang_admin::config::LoginExpiredMode;
use runkang_admin::core::request::SESSION_EXPIRED_MESSAGE;
use runkang_admin::ApiError;
use serde_json::{json, Value};

/// token 與語系標頭會帶在每個請求上
#[tokio::test]
async fn test_token_and_locale_headers_are_attached() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("tok-1".to_string()));

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/Room/r1")
                .header("Authorization", "tok-1")
                .header("Accept-Language", "zh-CN");
            then.status(200).json_body(ok(json!({"id": "r1", "roomNumber": "A101"})));
        })
        .await;

    let room: Value = h.client.get("/api/Room/r1", Vec::new()).await?;
    assert_eq!(room["roomNumber"], "A101");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_auth_scheme_prefix_is_configurable() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |c| c.api.auth_scheme = Some("Bearer".to_string()));
    h.store.set_access_token(Some("tok-1".to_string()));

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Role/list").header("Authorization", "Bearer tok-1");
            then.status(200).json_body(ok(json!([])));
        })
        .await;

    let _: Value = h.client.get("/api/Role/list", Vec::new()).await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_success_false_surfaces_server_message() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("tok".to_string()));

    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Customer");
            then.status(200).json_body(fail(400, "手机号格式错误"));
        })
        .await;

    let err = h
        .client
        .post("/api/Customer", &json!({"customerName": "张三"}))
        .await
        .unwrap_err();

    match err {
        ApiError::BusinessError { code, message } => {
            assert_eq!(code, Some(400));
            assert_eq!(message, "手机号格式错误");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(h.notifier.errors(), vec!["手机号格式错误".to_string()]);
    // 一般業務錯誤不影響登入狀態
    assert_eq!(h.store.access_token().as_deref(), Some("tok"));
    Ok(())
}

#[tokio::test]
async fn test_error_field_wins_over_message() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/Room/r9");
            then.status(200).json_body(json!({
                "success": false,
                "message": "操作失败",
                "error": "房间已入住，无法删除",
                "code": 500
            }));
        })
        .await;

    let err = h.client.delete("/api/Room/r9").await.unwrap_err();
    assert_eq!(err.user_friendly_message(), "房间已入住，无法删除");
    Ok(())
}

#[tokio::test]
async fn test_non_2xx_becomes_server_error() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Payment/list");
            then.status(500).body("boom");
        })
        .await;

    let err = h
        .client
        .get::<Value>("/api/Payment/list", Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerError { status: 500, .. }));
    assert_eq!(h.notifier.errors().len(), 1);
    Ok(())
}

/// 業務碼 401：清除 token 並導向登入頁
#[tokio::test]
async fn test_business_401_clears_tokens_and_redirects() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("stale".to_string()));
    h.store.set_refresh_token(Some("refresh".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Customer/c1");
            then.status(200).json_body(fail(401, ""));
        })
        .await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let err = h
        .client
        .get::<Value>("/api/Customer/c1", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired { .. }));
    assert_eq!(err.user_friendly_message(), SESSION_EXPIRED_MESSAGE);
    assert!(h.store.access_token().is_none());
    assert!(h.store.refresh_token().is_none());
    assert_eq!(h.last_location(), Some(login_redirect("/room")));
    assert!(h.notifier.errors().contains(&SESSION_EXPIRED_MESSAGE.to_string()));
    logout.assert_async().await;
    Ok(())
}

/// HTTP 401：刷新一次 token 後以新 token 重送
#[tokio::test]
async fn test_http_401_refreshes_and_retries_once() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_refresh_token(Some("r-old".to_string()));

    let rejected = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1").header("Authorization", "old");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/Account/refresh-token")
                .json_body(json!({"refreshToken": "r-old"}));
            then.status(200)
                .json_body(ok(json!({"token": "new", "refreshToken": "r-new"})));
        })
        .await;
    let accepted = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1").header("Authorization", "new");
            then.status(200).json_body(ok(json!({"id": "r1"})));
        })
        .await;

    let room: Value = h.client.get("/api/Room/r1", Vec::new()).await?;
    assert_eq!(room["id"], "r1");

    rejected.assert_hits_async(1).await;
    refresh.assert_hits_async(1).await;
    accepted.assert_hits_async(1).await;
    assert_eq!(h.store.access_token().as_deref(), Some("new"));
    assert_eq!(h.store.refresh_token().as_deref(), Some("r-new"));
    assert!(h.notifier.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure_logs_out_and_redirects() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_refresh_token(Some("r-old".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/refresh-token");
            then.status(200).json_body(fail(400, "refresh token expired"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let err = h
        .client
        .get::<Value>("/api/Room/r1", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RefreshFailed { .. }));
    refresh.assert_hits_async(1).await;
    assert!(h.store.access_token().is_none());
    assert_eq!(h.last_location(), Some(login_redirect("/room")));
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure_in_modal_mode_sets_login_expired() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |c| c.app.login_expired_mode = LoginExpiredMode::Modal);
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_is_access_checked(true);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1");
            then.status(401);
        })
        .await;

    // 沒有 refresh token，直接重新認證
    let err = h
        .client
        .get::<Value>("/api/Room/r1", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RefreshFailed { .. }));
    assert!(h.store.login_expired());
    assert!(h.store.access_token().is_none());
    assert_eq!(h.last_location(), None);
    Ok(())
}

#[tokio::test]
async fn test_refresh_disabled_goes_straight_to_logout() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |c| c.app.enable_refresh_token = false);
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_refresh_token(Some("r-old".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/refresh-token");
            then.status(200).json_body(ok(json!({"token": "never"})));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let err = h
        .client
        .get::<Value>("/api/Room/r1", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    refresh.assert_hits_async(0).await;
    assert_eq!(h.last_location(), Some(login_redirect("/room")));
    Ok(())
}

/// 失敗回應的 data 型別不符時，仍以 success/code 判斷
#[tokio::test]
async fn test_business_401_with_mismatched_data_still_logs_out() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("stale".to_string()));
    h.store.set_refresh_token(Some("refresh".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Customer/c1");
            then.status(200).json_body(json!({
                "success": false,
                "message": "登录已过期",
                "code": 401,
                "data": {}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let err = h.api().customers().get("c1").await.unwrap_err();

    match err {
        ApiError::SessionExpired { message } => assert_eq!(message, "登录已过期"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(h.store.access_token().is_none());
    assert!(h.store.refresh_token().is_none());
    assert_eq!(h.last_location(), Some(login_redirect("/room")));
    Ok(())
}

#[tokio::test]
async fn test_failed_envelope_keeps_server_message_when_data_mismatches() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("tok".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1");
            then.status(200).json_body(json!({
                "success": false,
                "message": "房间不存在",
                "code": 404,
                "data": []
            }));
        })
        .await;

    let err = h.api().rooms().get("r1").await.unwrap_err();
    assert!(matches!(err, ApiError::BusinessError { code: Some(404), .. }));
    assert_eq!(err.user_friendly_message(), "房间不存在");
    assert_eq!(h.store.access_token().as_deref(), Some("tok"));
    Ok(())
}

/// 同時兩個 401 只會刷新一次
#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_refresh_token(Some("r-old".to_string()));

    server
        .mock_async(|when, then| {
            when.method(GET).header("Authorization", "old");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/refresh-token");
            then.status(200)
                .json_body(ok(json!({"token": "new", "refreshToken": "r-new"})))
                .delay(std::time::Duration::from_millis(100));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1").header("Authorization", "new");
            then.status(200).json_body(ok(json!({"id": "r1"})));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r2").header("Authorization", "new");
            then.status(200).json_body(ok(json!({"id": "r2"})));
        })
        .await;

    let (a, b) = tokio::join!(
        h.client.get::<Value>("/api/Room/r1", Vec::new()),
        h.client.get::<Value>("/api/Room/r2", Vec::new()),
    );

    assert_eq!(a?["id"], "r1");
    assert_eq!(b?["id"], "r2");
    refresh.assert_hits_async(1).await;
    assert_eq!(h.store.access_token().as_deref(), Some("new"));
    Ok(())
}

/// 重送後仍是 401：不再刷新，直接重新認證
#[tokio::test]
async fn test_retry_rejected_again_re_authenticates() -> Result<()> {
    let server = MockServer::start_async().await;
    let h = harness(&server.base_url(), |_| {});
    h.store.set_access_token(Some("old".to_string()));
    h.store.set_refresh_token(Some("r-old".to_string()));

    let room = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/Room/r1");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/refresh-token");
            then.status(200).json_body(ok(json!({"token": "new"})));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/Account/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let err = h
        .client
        .get::<Value>("/api/Room/r1", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    room.assert_hits_async(2).await;
    refresh.assert_hits_async(1).await;
    assert!(h.store.access_token().is_none());
    assert_eq!(h.last_location(), Some(login_redirect("/room")));
    Ok(())
}
