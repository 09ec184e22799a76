use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use shopcart_api::app::{CartServices, build_app, services::StoreBackend};
use shopcart_api::config::ApiConfig;
use shopcart_infra::InMemoryCartStore;

struct TestServer {
    base_url: String,
    store: Arc<InMemoryCartStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig::default()).await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        // Same router as prod over an in-memory store, bound to an ephemeral port.
        let store = Arc::new(InMemoryCartStore::new());
        let services = CartServices::new(store.clone(), StoreBackend::InMemory);
        let app = build_app(Arc::new(services), &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    fn items_url(&self) -> String {
        format!("{}/api/cart_items", self.base_url)
    }

    fn item_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/api/cart_items/{}", self.base_url, id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list(client: &reqwest::Client, srv: &TestServer) -> serde_json::Value {
    let res = client.get(srv.items_url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn list_is_empty_on_fresh_store() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    assert_eq!(list(&client, &srv).await, json!([]));
}

#[tokio::test]
async fn create_then_get_returns_same_object() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "Keyboard", "price": 45 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created, json!({ "id": 1, "name": "Keyboard", "price": 45 }));

    let res = client.get(srv.item_url(1)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    assert_eq!(list(&client, &srv).await, json!([created]));
}

#[tokio::test]
async fn create_without_price_is_rejected_and_store_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "Bad" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Name and price are required" }));

    assert_eq!(list(&client, &srv).await, json!([]));
}

#[tokio::test]
async fn create_without_name_or_body_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [json!({ "price": 5 }), json!({ "name": "", "price": 5 }), json!({})] {
        let res = client.post(srv.items_url()).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    // No body at all behaves like `{}`.
    let res = client.post(srv.items_url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&client, &srv).await, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .header("content-type", "application/json")
        .body("{name:")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid JSON body" }));
}

#[tokio::test]
async fn null_price_is_accepted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "Freebie", "price": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created, json!({ "id": 1, "name": "Freebie", "price": null }));
}

#[tokio::test]
async fn get_missing_or_unparseable_id_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for id in ["9999", "abc", "-1"] {
        let res = client.get(srv.item_url(id)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "id {id}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Item not found" }));
    }
}

#[tokio::test]
async fn delete_twice_returns_item_then_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "Mouse", "price": 10 }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_u64().unwrap();

    let res = client.delete(srv.item_url(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let removed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(removed, created);

    let res = client.delete(srv.item_url(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.item_url(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_are_not_reused_until_reset() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let res = client
            .post(srv.items_url())
            .json(&json!({ "name": name, "price": 1 }))
            .send()
            .await
            .unwrap();
        let created: serde_json::Value = res.json().await.unwrap();
        ids.push(created["id"].as_u64().unwrap());
    }
    assert_eq!(ids, vec![1, 2, 3]);

    let res = client.delete(srv.item_url(3)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "d", "price": 1 }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["id"], 4);

    srv.store.reset().unwrap();
    assert_eq!(list(&client, &srv).await, json!([]));

    let res = client
        .post(srv.items_url())
        .json(&json!({ "name": "e", "price": 1 }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn update_changes_fields_without_reordering() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (name, price) in [("Keyboard", 45), ("Mouse", 10)] {
        client
            .post(srv.items_url())
            .json(&json!({ "name": name, "price": price }))
            .send()
            .await
            .unwrap();
    }

    let res = client
        .put(srv.item_url(1))
        .json(&json!({ "price": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated, json!({ "id": 1, "name": "Keyboard", "price": 50 }));

    assert_eq!(
        list(&client, &srv).await,
        json!([
            { "id": 1, "name": "Keyboard", "price": 50 },
            { "id": 2, "name": "Mouse", "price": 10 }
        ])
    );
}

#[tokio::test]
async fn update_rejects_empty_patch_and_unknown_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    client
        .post(srv.items_url())
        .json(&json!({ "name": "Keyboard", "price": 45 }))
        .send()
        .await
        .unwrap();

    let res = client.put(srv.item_url(1)).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Name or price is required" }));

    let res = client
        .put(srv.item_url(9999))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_request_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = client
        .get(srv.items_url())
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.items_url())
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn collection_accepts_trailing_slash() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let url = format!("{}/", srv.items_url());

    let res = client
        .post(&url)
        .json(&json!({ "name": "Keyboard", "price": 45 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn whole_number_id_spellings_find_the_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    client
        .post(srv.items_url())
        .json(&json!({ "name": "Keyboard", "price": 45 }))
        .send()
        .await
        .unwrap();

    for id in ["1", "01", "+1", "1.0", "1e0"] {
        let res = client.get(srv.item_url(id)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "id {id}");
        let item: serde_json::Value = res.json().await.unwrap();
        assert_eq!(item["id"], 1);
    }

    let res = client.get(srv.item_url("1.5")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn body_without_json_content_type_is_treated_as_empty() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.items_url())
        .header("content-type", "text/plain")
        .body(r#"{"name":"Keyboard","price":45}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Name and price are required" }));

    assert_eq!(list(&client, &srv).await, json!([]));
}

#[tokio::test]
async fn cors_allow_list_echoes_only_listed_origins() {
    let srv = TestServer::spawn_with(ApiConfig {
        // The second entry is not a valid header value and is skipped.
        cors_origins: vec!["http://a.test".into(), "http://bad\norigin.test".into()],
        ..ApiConfig::default()
    })
    .await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.items_url())
        .header("origin", "http://a.test")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "http://a.test");

    let res = client
        .get(srv.items_url())
        .header("origin", "http://b.test")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.headers().contains_key("access-control-allow-origin"));
}
