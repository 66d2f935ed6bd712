//! End-to-end tests: real client against a real server over HTTP on an
//! ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;

use accord_client::{ClientConfig, ClientError, RpcClient};
use accord_contract::ResponseStatus;
use accord_server::{Dispatcher, HttpRpcServer};
use user_service::{AppContext, NewUser, UserApi, contract, router, user_store};

async fn start_server() -> SocketAddr {
    let contract = Arc::new(contract().unwrap());
    let router = router(Arc::clone(&contract)).unwrap();
    let ctx = AppContext {
        store: Arc::new(user_store()),
    };
    let server = HttpRpcServer::builder(Dispatcher::new(router), ctx).build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

fn base_url(addr: SocketAddr) -> url::Url {
    format!("http://{addr}").parse().unwrap()
}

/// Raw client with client-side validation off, to observe the server's
/// own verdicts.
fn raw_client(addr: SocketAddr) -> RpcClient {
    RpcClient::new(
        Arc::new(contract().unwrap()),
        ClientConfig::new(base_url(addr))
            .validate_input(false)
            .validate_output(false),
    )
}

#[tokio::test]
async fn create_then_list_round_trips_exactly() {
    let addr = start_server().await;
    let api = UserApi::new(base_url(addr)).unwrap();

    let created = api
        .create_user(&NewUser {
            name: "Ann".into(),
            email: "ann@example.com".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Ann");
    assert_eq!(created.email, "ann@example.com");

    let users = api.get_users().await.unwrap();
    // Field-for-field: what went over the wire twice is still the same
    // record, timestamp included.
    assert_eq!(users, vec![created]);
}

#[tokio::test]
async fn server_rejects_empty_name_with_an_issue_at_name() {
    let addr = start_server().await;
    let client = raw_client(addr);

    let err = client
        .call("createUser", Some(json!({"name": "", "email": "a@b.com"})))
        .await
        .unwrap_err();
    match err {
        ClientError::Call { kind, issues, .. } => {
            assert_eq!(kind, ResponseStatus::ClientError);
            assert!(issues.iter().any(|i| i.path == "name"));
        }
        other => panic!("expected a call rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn multiple_bad_fields_are_all_reported() {
    let addr = start_server().await;
    let client = raw_client(addr);

    let err = client
        .call("createUser", Some(json!({"name": "", "email": "nope"})))
        .await
        .unwrap_err();
    match err {
        ClientError::Call { issues, .. } => {
            let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
            assert!(paths.contains(&"name"));
            assert!(paths.contains(&"email"));
        }
        other => panic!("expected a call rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn get_users_with_a_body_is_invalid_input() {
    let addr = start_server().await;
    let client = raw_client(addr);

    let err = client
        .call("getUsers", Some(json!({"page": 1})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Call { kind: ResponseStatus::ClientError, .. }
    ));

    // JSON null is the wire spelling of "no input" and stays accepted.
    let users = client.call("getUsers", None).await.unwrap();
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn unknown_procedure_is_404_not_a_crash() {
    let addr = start_server().await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("http://{addr}/deleteEverything"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "procedure 'deleteEverything' not found");

    // The server is still alive afterwards.
    let users: serde_json::Value = http
        .post(format!("http://{addr}/getUsers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_400() {
    let addr = start_server().await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/createUser"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON body")
    );
}

#[tokio::test]
async fn non_post_requests_are_404() {
    let addr = start_server().await;
    let response = reqwest::Client::new()
        .get(format!("http://{addr}/getUsers"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn options_preflight_gets_cors_headers() {
    let addr = start_server().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/createUser"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn client_side_validation_catches_bad_input_before_io() {
    // Deliberately no server here: local validation must reject first.
    let api = UserApi::new("http://127.0.0.1:1".parse().unwrap()).unwrap();
    let err = api
        .create_user(&NewUser {
            name: "   ".into(),
            email: "ann@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}
