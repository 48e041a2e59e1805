use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use propdesk_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config::for_data_dir(tmp.path());
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_account(app: &Router, name: &str, funding: f64, split: f64) -> String {
    let (status, account) = send(
        app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "name": name, "initialFunding": funding, "profitSplit": split })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    account["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_responds() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn account_crud_and_error_mapping() {
    let (app, _tmp) = build_test_router().await;
    let id = create_account(&app, "Apex 50k", 50_000.0, 0.9).await;

    let (status, accounts) = send(&app, Method::GET, "/api/v1/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accounts.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/accounts/{}", id),
        Some(json!({ "name": "Apex 50k (PA)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Apex 50k (PA)");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/accounts/missing",
        Some(json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("missing"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/v1/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trades_and_payouts_move_funding() {
    let (app, _tmp) = build_test_router().await;
    let id = create_account(&app, "Funded", 1000.0, 0.8).await;

    let exit = Utc::now() - Duration::hours(2);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(json!({
            "entry_datetime": exit - Duration::minutes(15),
            "exit_datetime": exit,
            "asset": "ES",
            "direction": "Long",
            "accounts": [{ "accountId": id, "weight": 1.0 }],
            "result_gross": 200.0,
            "result_net": 200.0,
            "result_R": 2.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, preview) = send(
        &app,
        Method::POST,
        "/api/v1/payouts/preview",
        Some(json!({ "amount": 100.0, "accountIds": [id] })),
    )
    .await;
    assert_eq!(preview["totalNet"], 80.0);
    assert_eq!(preview["totalFee"], 20.0);

    let (_, account) = send(&app, Method::GET, &format!("/api/v1/accounts/{}", id), None).await;
    assert_eq!(account["currentFunding"], 1200.0);

    let (status, payout) = send(
        &app,
        Method::POST,
        "/api/v1/payouts",
        Some(json!({ "amountSolicited": 100.0, "method": "Wise", "accountIds": [id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payout["splitByAccount"][&id]["net"], 80.0);

    let (_, account) = send(&app, Method::GET, &format!("/api/v1/accounts/{}", id), None).await;
    assert_eq!(account["currentFunding"], 1100.0);

    let (_, report) = send(&app, Method::GET, "/api/v1/funding/reconcile", None).await;
    assert_eq!(report[0]["difference"], 0.0);

    let (status, dashboard) = send(&app, Method::GET, "/api/v1/dashboard?period=monthly", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["profit"], 200.0);
    assert_eq!(dashboard["payoutTotal"], 80.0);
    assert_eq!(dashboard["tradeCount"], 1);
    assert_eq!(dashboard["dailyProfit"].as_array().unwrap().len(), 31);
}

#[tokio::test]
async fn goal_progress_and_archive() {
    let (app, _tmp) = build_test_router().await;
    let id = create_account(&app, "Eval", 50_000.0, 0.8).await;

    let (status, goal) = send(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some(json!({
            "title": "First thousand",
            "type": "profit",
            "period": "allTime",
            "startDate": Utc::now() - Duration::days(10),
            "targetValue": 1000.0,
            "linkedAccounts": [id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let exit = Utc::now() - Duration::days(1);
    send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(json!({
            "entry_datetime": exit,
            "exit_datetime": exit,
            "accounts": [{ "accountId": id }],
            "result_net": 250.0
        })),
    )
    .await;

    let (status, progress) = send(
        &app,
        Method::GET,
        &format!("/api/v1/goals/{}/progress", goal_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["progress"], 25.0);
    assert_eq!(progress["completed"], false);

    let (status, archived) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/goals/{}/archive", goal_id),
        Some(json!({ "archived": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["archived"], true);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/goals/nope/archive",
        Some(json!({ "archived": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backup_and_restore_round_trip() {
    let (app, _tmp) = build_test_router().await;

    let (_, outcome) = send(&app, Method::POST, "/api/v1/backup/restore", None).await;
    assert_eq!(outcome["status"], "notFound");

    let id = create_account(&app, "Keep me", 10_000.0, 0.8).await;
    let (_, status_body) = send(&app, Method::GET, "/api/v1/backup/status", None).await;
    assert_eq!(status_body["dirty"], true);

    let (status, receipt) = send(&app, Method::POST, "/api/v1/backup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["name"], "propdesk-data.json");

    send(&app, Method::DELETE, &format!("/api/v1/accounts/{}", id), None).await;

    let (status, outcome) = send(&app, Method::POST, "/api/v1/backup/restore", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], "restored");
    assert_eq!(outcome["accounts"], 1);

    let (status, account) = send(&app, Method::GET, &format!("/api/v1/accounts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["name"], "Keep me");
}
