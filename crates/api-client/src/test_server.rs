//! In-process stand-in for the Labora backend, used by the client tests.

use crate::ApiClient;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use labora_core::CoreConfig;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const TOKEN: &str = "jwt-test-token";

type Reply = (StatusCode, Json<Value>);

/// Records what the client sent so tests can assert on it.
#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    requests: Arc<Mutex<Vec<Value>>>,
    parts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockBackend {
    /// JSON bodies of auth requests, in arrival order.
    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Multipart parts of the last create/update: `(name, text)` for text parts and
    /// `(name, content type)` for file parts.
    pub(crate) fn parts(&self) -> Vec<(String, String)> {
        self.parts.lock().unwrap().clone()
    }
}

pub(crate) fn client_for(base_url: &str) -> ApiClient {
    let config =
        CoreConfig::new(base_url, Duration::from_millis(300), Duration::from_secs(5)).unwrap();
    ApiClient::new(Arc::new(config)).unwrap()
}

/// Serves `backend` on an ephemeral port and returns a client pointed at it.
pub(crate) async fn client(backend: MockBackend) -> ApiClient {
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/materials", get(list).post(create))
        .route("/api/materials/my-materials", get(mine))
        .route("/api/materials/stats", get(stats))
        .route(
            "/api/materials/:id",
            get(detail).put(update).delete(remove),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    client_for(&format!("http://{addr}"))
}

fn tempe() -> Value {
    json!({
        "id": 1,
        "name": "Tempe",
        "testDate": "2024-05-01T00:00:00.000Z",
        "protein": "19",
        "fiber": 1.4,
        "iron": 2.7,
        "categories": ["muscle", "heart"],
        "imageUrl": null
    })
}

fn tahu() -> Value {
    json!({
        "id": "2",
        "name": "Tahu",
        "protein": 8.1,
        "categories": ["diet"]
    })
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn check_token(headers: &HeaderMap) -> Result<(), Reply> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Token tidak valid" }),
        )),
    }
}

async fn record_parts(backend: &MockBackend, mut multipart: Multipart) {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let content_type = field.content_type().unwrap_or_default().to_string();
            parts.push((name, content_type));
        } else {
            parts.push((name, field.text().await.unwrap()));
        }
    }
    *backend.parts.lock().unwrap() = parts;
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Reply {
    backend.requests.lock().unwrap().push(body.clone());
    if body["password"] == "salah" {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Email atau password salah" }),
        );
    }
    reply(
        StatusCode::OK,
        json!({ "data": {
            "id": 7,
            "email": body["email"],
            "name": "Sari",
            "role": "researcher",
            "token": TOKEN
        }}),
    )
}

async fn register(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Reply {
    backend.requests.lock().unwrap().push(body.clone());
    if body["email"] == "taken@labora.id" {
        return reply(
            StatusCode::CONFLICT,
            json!({ "message": "Email sudah terdaftar" }),
        );
    }
    reply(StatusCode::CREATED, json!({ "message": "Registrasi berhasil" }))
}

async fn list(headers: HeaderMap) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    reply(StatusCode::OK, json!({ "data": [tempe(), tahu()] }))
}

async fn mine(headers: HeaderMap) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    reply(StatusCode::OK, json!({ "data": [tempe()] }))
}

async fn stats(headers: HeaderMap) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    reply(
        StatusCode::OK,
        json!({ "data": {
            "totalMaterials": 2,
            "myMaterials": 1,
            "newMaterials": 0,
            "totalMaterialCategory": 2
        }}),
    )
}

async fn detail(headers: HeaderMap, Path(id): Path<String>) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    let data = if id == "1" { tempe() } else { Value::Null };
    reply(StatusCode::OK, json!({ "data": data }))
}

async fn create(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    record_parts(&backend, multipart).await;
    reply(StatusCode::CREATED, json!({ "data": { "id": "3" } }))
}

async fn update(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    multipart: Multipart,
) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    record_parts(&backend, multipart).await;
    reply(StatusCode::OK, json!({ "message": "Material diperbarui" }))
}

async fn remove(headers: HeaderMap, Path(id): Path<String>) -> Reply {
    if let Err(denied) = check_token(&headers) {
        return denied;
    }
    if id == "1" {
        reply(StatusCode::OK, json!({ "message": "Material dihapus" }))
    } else {
        reply(StatusCode::FORBIDDEN, json!({}))
    }
}
