//! Typed request layer over the remote blog store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use devdiaries_auth::SessionStore;
use devdiaries_core::{BlogDraft, BlogId, BlogPost, Comment, CommentId, NewComment, Registration};

use crate::error::{ClientError, ClientResult};

/// Blog and comment operations the resource cache synchronizes against.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list_blogs(&self) -> ClientResult<Vec<BlogPost>>;

    async fn create_blog(&self, draft: &BlogDraft) -> ClientResult<BlogPost>;

    async fn update_blog(&self, post: &BlogPost) -> ClientResult<BlogPost>;

    async fn delete_blog(&self, id: &BlogId) -> ClientResult<()>;

    async fn list_comments(&self, blog_id: &BlogId) -> ClientResult<Vec<Comment>>;

    async fn add_comment(&self, blog_id: &BlogId, comment: &NewComment) -> ClientResult<Comment>;

    async fn delete_comment(&self, id: &CommentId) -> ClientResult<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Auth {
    Bearer,
    None,
}

/// HTTP implementation of [`ResourceApi`] plus the account endpoints.
///
/// Every bearer-authenticated call reads the credential from the session at
/// dispatch time; without one it fails with [`ClientError::Unauthorized`]
/// before anything is sent.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ResourceClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// `POST /users/login`; returns the issued credential.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let body = serde_json::json!({ "email": email, "password": password });
        let req = self.request(Method::POST, "/users/login", Auth::None)?.json(&body);
        let doc = self.send_json(req, Auth::None, "Login failed").await?;

        doc.get("access")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ClientError::malformed("login response carries no access token"))
    }

    /// `POST /users/check-email`; `true` when the address is already registered.
    pub async fn check_email(&self, email: &str) -> ClientResult<bool> {
        let body = serde_json::json!({ "email": email });
        let req = self.request(Method::POST, "/users/check-email", Auth::None)?.json(&body);
        match self.send_json(req, Auth::None, "Email check failed").await? {
            Value::Bool(exists) => Ok(exists),
            other => Err(ClientError::malformed(format!("expected a boolean, got {other}"))),
        }
    }

    /// `POST /users/register`; returns the server's message.
    pub async fn register(&self, registration: &Registration) -> ClientResult<String> {
        let req = self
            .request(Method::POST, "/users/register", Auth::None)?
            .json(registration);
        let doc = self.send_json(req, Auth::None, "Registration failed").await?;
        Ok(message_of(&doc).unwrap_or_default())
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> ClientResult<RequestBuilder> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "dispatching request");

        let req = self.http.request(method, url);
        match auth {
            Auth::None => Ok(req),
            Auth::Bearer => match self.session.credential() {
                Some(token) => Ok(req.bearer_auth(token)),
                None => Err(ClientError::Unauthorized),
            },
        }
    }

    /// Send and return the raw body of a successful response.
    async fn send(&self, req: RequestBuilder, auth: Auth, fallback: &str) -> ClientResult<String> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(status = status.as_u16(), "request rejected");
        if auth == Auth::Bearer && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ClientError::Unauthorized);
        }

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(message_of)
            .unwrap_or_else(|| fallback.to_string());
        Err(ClientError::rejected(status.as_u16(), message))
    }

    async fn send_json(&self, req: RequestBuilder, auth: Auth, fallback: &str) -> ClientResult<Value> {
        let body = self.send(req, auth, fallback).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::malformed(e.to_string()))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ClientResult<Vec<T>> {
        let req = self.request(Method::GET, path, Auth::Bearer)?;
        let doc = self.send_json(req, Auth::Bearer, fallback).await?;
        if !doc.is_array() {
            return Err(ClientError::malformed("expected an array"));
        }
        serde_json::from_value(doc).map_err(|e| ClientError::malformed(e.to_string()))
    }

    async fn submit_entity<B, T>(&self, method: Method, path: &str, body: &B, fallback: &str) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let req = self.request(method, path, Auth::Bearer)?.json(body);
        let body = self.send(req, Auth::Bearer, fallback).await?;
        entity_from_body(&body)
    }

    async fn remove(&self, path: &str, fallback: &str) -> ClientResult<()> {
        let req = self.request(Method::DELETE, path, Auth::Bearer)?;
        self.send(req, Auth::Bearer, fallback).await.map(|_| ())
    }
}

#[async_trait]
impl ResourceApi for ResourceClient {
    async fn list_blogs(&self) -> ClientResult<Vec<BlogPost>> {
        self.fetch_list("/blogs/all", "Failed to fetch blogs").await
    }

    async fn create_blog(&self, draft: &BlogDraft) -> ClientResult<BlogPost> {
        draft.validate()?;
        self.submit_entity(Method::POST, "/blogs/create", draft, "Failed to create blog")
            .await
    }

    async fn update_blog(&self, post: &BlogPost) -> ClientResult<BlogPost> {
        BlogDraft::new(post.title.as_str(), post.content.as_str()).validate()?;
        let path = format!("/blogs/edit/{}", post.id);
        self.submit_entity(Method::PATCH, &path, post, "Failed to update blog")
            .await
    }

    async fn delete_blog(&self, id: &BlogId) -> ClientResult<()> {
        self.remove(&format!("/blogs/remove/{id}"), "Failed to delete blog")
            .await
    }

    async fn list_comments(&self, blog_id: &BlogId) -> ClientResult<Vec<Comment>> {
        self.fetch_list(&format!("/comments/blog/{blog_id}"), "Failed to fetch comments")
            .await
    }

    async fn add_comment(&self, blog_id: &BlogId, comment: &NewComment) -> ClientResult<Comment> {
        comment.validate()?;
        let path = format!("/comments/addComment/{blog_id}");
        self.submit_entity(Method::POST, &path, comment, "Failed to add comment")
            .await
    }

    async fn delete_comment(&self, id: &CommentId) -> ClientResult<()> {
        self.remove(&format!("/comments/delete/{id}"), "Failed to delete comment")
            .await
    }
}

fn message_of(doc: &Value) -> Option<String> {
    doc.get("message").and_then(Value::as_str).map(str::to_string)
}

/// A falsy body (empty, `null`, `false`, `""`, `0`) is a failed mutation.
fn entity_from_body<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    if body.trim().is_empty() {
        return Err(ClientError::malformed("empty response body"));
    }
    let doc: Value = serde_json::from_str(body).map_err(|e| ClientError::malformed(e.to_string()))?;
    let falsy = match &doc {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    };
    if falsy {
        return Err(ClientError::malformed("empty response body"));
    }
    serde_json::from_value(doc).map_err(|e| ClientError::malformed(e.to_string()))
}
