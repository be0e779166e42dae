use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode;
use serde_json::json;
use service::file::user_store::UserStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    data_file: String,
}

/// Boot the real router on an ephemeral port against the given snapshot file.
async fn start_server_with_file(data_file: &str) -> anyhow::Result<TestApp> {
    let users = UserStore::new(data_file).await;
    let state = ServerState { users: Arc::clone(&users) };

    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_file: data_file.to_string() })
}

/// Boot with an isolated per-run snapshot file under target/test-data.
async fn start_server() -> anyhow::Result<TestApp> {
    let data_file = format!("target/test-data/{}/users.json", Uuid::new_v4());
    start_server_with_file(&data_file).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn users_crud_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create: 201 with store-assigned ids 1 and 2
    let res = c.post(format!("{}/users", app.base_url))
        .json(&json!({"name": "Ann", "email": "ann@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let ann = res.json::<serde_json::Value>().await?;
    assert_eq!(ann["id"], 1);
    assert_eq!(ann["name"], "Ann");

    let res = c.post(format!("{}/users", app.base_url))
        .json(&json!({"name": "Bob", "email": "bob@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<serde_json::Value>().await?["id"], 2);

    // List in insertion order
    let res = c.get(format!("{}/users", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().map(|a| a.len()), Some(2));
    assert_eq!(list[0]["name"], "Ann");
    assert_eq!(list[1]["name"], "Bob");

    // Read one
    let res = c.get(format!("{}/users/1", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["email"], "ann@x.com");

    // Update replaces name/email, id untouched
    let res = c.put(format!("{}/users/2", app.base_url))
        .json(&json!({"name": "Robert", "email": "robert@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["id"], 2);
    assert_eq!(updated["name"], "Robert");

    // Delete: 204, record gone, one record left
    let res = c.delete(format!("{}/users/1", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = c.get(format!("{}/users/1", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = c.get(format!("{}/users", app.base_url)).send().await?;
    let list = res.json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    assert_eq!(list[0]["name"], "Robert");

    Ok(())
}

#[tokio::test]
async fn unknown_ids_return_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/users/42", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = c.put(format!("{}/users/42", app.base_url))
        .json(&json!({"name": "Nobody", "email": "no@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/users/42", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn malformed_payload_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // broken JSON
    let res = c.post(format!("{}/users", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // wrong field type
    let res = c.post(format!("{}/users", app.base_url))
        .json(&json!({"name": 1, "email": "x@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // update path rejects the same way; seed a record first
    let res = c.post(format!("{}/users", app.base_url))
        .json(&json!({"name": "Ann", "email": "ann@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = c.put(format!("{}/users/1", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn client_supplied_id_is_ignored() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().post(format!("{}/users", app.base_url))
        .json(&json!({"id": 99, "name": "Ann", "email": "ann@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<serde_json::Value>().await?["id"], 1);
    Ok(())
}

#[tokio::test]
async fn zero_padded_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(format!("{}/users", app.base_url))
        .json(&json!({"name": "Ann", "email": "ann@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // ids match as decimal text, so "01" does not address record 1
    let res = c.get(format!("{}/users/01", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = c.get(format!("{}/users/1", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn snapshot_survives_restart() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for (name, email) in [("Ann", "ann@x.com"), ("Bob", "bob@x.com")] {
        let res = c.post(format!("{}/users", app.base_url))
            .json(&json!({"name": name, "email": email}))
            .send().await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // second instance on the same snapshot file sees the records and
    // continues the id sequence
    let second = start_server_with_file(&app.data_file).await?;
    let res = c.get(format!("{}/users", second.base_url)).send().await?;
    let list = res.json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().map(|a| a.len()), Some(2));

    let res = c.post(format!("{}/users", second.base_url))
        .json(&json!({"name": "Carol", "email": "carol@x.com"}))
        .send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<serde_json::Value>().await?["id"], 3);

    Ok(())
}
