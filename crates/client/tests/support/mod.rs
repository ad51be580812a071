//! In-process mock of the remote blog store, bound to an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};

use devdiaries_auth::{MemoryStorage, SessionStore};
use devdiaries_client::ResourceClient;

pub const PASSWORD: &str = "secret";

pub fn mint(email: &str, is_admin: bool) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &json!({ "id": format!("id-{email}"), "email": email, "isAdmin": is_admin }),
        &EncodingKey::from_secret(b"mock-secret"),
    )
    .expect("failed to encode jwt")
}

#[derive(Default)]
pub struct MockState {
    /// email -> (password, is_admin)
    pub users: HashMap<String, (String, bool)>,
    pub issued: Vec<String>,
    pub blogs: Vec<Value>,
    pub comments: Vec<Value>,
    pub next_id: usize,
    pub fail_blog_list: bool,
    pub blog_list_override: Option<Value>,
    /// "METHOD /path" of every request received, in order.
    pub requests: Vec<String>,
    pub last_authorization: Option<String>,
}

impl MockState {
    pub fn add_user(&mut self, email: &str, is_admin: bool) {
        self.users
            .insert(email.to_string(), (PASSWORD.to_string(), is_admin));
    }

    /// Issue a token the store will accept, without going through login.
    pub fn issue(&mut self, email: &str, is_admin: bool) -> String {
        let token = mint(email, is_admin);
        self.issued.push(token.clone());
        token
    }

    pub fn seed_blog(&mut self, title: &str) -> String {
        let id = self.fresh_id("b");
        self.blogs.push(json!({
            "_id": id,
            "title": title,
            "content": format!("{title} content"),
            "author": { "firstName": "Ada", "lastName": "Lovelace" },
            "createdAt": "2024-05-01T10:00:00.000Z",
        }));
        id
    }

    pub fn seed_comment(&mut self, blog_id: &str, text: &str) -> String {
        let id = self.fresh_id("c");
        self.comments.push(json!({
            "_id": id,
            "blogId": blog_id,
            "user": { "firstName": "Grace", "lastName": "Hopper" },
            "comment": text,
        }));
        id
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn record(&mut self, line: &str, headers: &HeaderMap) {
        self.requests.push(line.to_string());
        self.last_authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| self.issued.iter().any(|t| t == token))
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockServer {
    pub base_url: String,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let app = router(state.clone());

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
            state,
            handle,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<String> {
        self.with(|s| s.requests.clone())
    }

    /// A client whose session holds `credential` (if any).
    pub fn client(&self, credential: Option<&str>) -> ResourceClient {
        let storage = match credential {
            Some(token) => MemoryStorage::with_credential(token),
            None => MemoryStorage::new(),
        };
        let session = Arc::new(SessionStore::new(Arc::new(storage)));
        session.restore();
        ResourceClient::new(self.base_url.clone(), session)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/users/login", post(login))
        .route("/users/check-email", post(check_email))
        .route("/users/register", post(register))
        .route("/blogs/all", get(list_blogs))
        .route("/blogs/create", post(create_blog))
        .route("/blogs/edit/:id", patch(update_blog))
        .route("/blogs/remove/:id", delete(delete_blog))
        .route("/comments/blog/:blog_id", get(list_comments))
        .route("/comments/addComment/:blog_id", post(add_comment))
        .route("/comments/delete/:id", delete(delete_comment))
        .with_state(state)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "auth": "Failed", "message": "Action Forbidden" })),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{what} not found") })),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST /users/login", &headers);

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    match s.users.get(&email).cloned() {
        Some((expected, is_admin)) if expected == password => {
            let token = s.issue(&email, is_admin);
            Json(json!({ "access": token })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Email and password do not match" })),
        )
            .into_response(),
    }
}

async fn check_email(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST /users/check-email", &headers);
    let email = body["email"].as_str().unwrap_or_default();
    Json(json!(s.users.contains_key(email))).into_response()
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST /users/register", &headers);

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if body["mobileNo"].as_str().map(str::len) != Some(11) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Mobile number invalid" })),
        )
            .into_response();
    }
    s.users.insert(email, (password, false));
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn list_blogs(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET /blogs/all", &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    if s.fail_blog_list {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Error in fetching blogs" })),
        )
            .into_response();
    }
    match &s.blog_list_override {
        Some(body) => Json(body.clone()).into_response(),
        None => Json(Value::Array(s.blogs.clone())).into_response(),
    }
}

async fn create_blog(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST /blogs/create", &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    let title = body["title"].as_str().unwrap_or_default().to_string();
    let id = s.seed_blog(&title);
    if let Some(content) = body["content"].as_str() {
        if let Some(blog) = s.blogs.iter_mut().find(|b| b["_id"] == id.as_str()) {
            blog["content"] = json!(content);
        }
    }
    let created = s.blogs.iter().find(|b| b["_id"] == id.as_str()).cloned();
    (StatusCode::CREATED, Json(created.unwrap_or(Value::Null))).into_response()
}

async fn update_blog(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record(&format!("PATCH /blogs/edit/{id}"), &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    match s.blogs.iter_mut().find(|b| b["_id"] == id.as_str()) {
        Some(blog) => {
            blog["title"] = body["title"].clone();
            blog["content"] = body["content"].clone();
            Json(blog.clone()).into_response()
        }
        None => not_found("Blog"),
    }
}

async fn delete_blog(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.record(&format!("DELETE /blogs/remove/{id}"), &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    let before = s.blogs.len();
    s.blogs.retain(|b| b["_id"] != id.as_str());
    if s.blogs.len() == before {
        return not_found("Blog");
    }
    Json(json!({ "message": "Blog deleted successfully" })).into_response()
}

async fn list_comments(State(state): State<Shared>, Path(blog_id): Path<String>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.record(&format!("GET /comments/blog/{blog_id}"), &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    let comments: Vec<Value> = s
        .comments
        .iter()
        .filter(|c| c["blogId"] == blog_id.as_str())
        .cloned()
        .collect();
    Json(comments).into_response()
}

async fn add_comment(
    State(state): State<Shared>,
    Path(blog_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record(&format!("POST /comments/addComment/{blog_id}"), &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    let text = body["comment"].as_str().unwrap_or_default().to_string();
    let id = s.seed_comment(&blog_id, &text);
    let added = s.comments.iter().find(|c| c["_id"] == id.as_str()).cloned();
    (StatusCode::CREATED, Json(added.unwrap_or(Value::Null))).into_response()
}

async fn delete_comment(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.record(&format!("DELETE /comments/delete/{id}"), &headers);
    if !s.authorized(&headers) {
        return unauthorized();
    }
    s.comments.retain(|c| c["_id"] != id.as_str());
    // deliberately empty body
    StatusCode::OK.into_response()
}
