//! Blog and comment models (wire-compatible with the remote store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{BlogId, CommentId};

/// Display name of a person attached to a post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl core::fmt::Display for PersonName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A blog post as returned by the remote store.
///
/// `author` and `created_at` are server-computed; a client never fills them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: BlogId,
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "lenient_person", skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for BlogPost {
    type Id = BlogId;

    fn id(&self) -> &BlogId {
        &self.id
    }
}

/// A comment attached to one blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub blog_id: BlogId,
    #[serde(default, deserialize_with = "lenient_person", skip_serializing_if = "Option::is_none")]
    pub user: Option<PersonName>,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Name shown next to the comment; unresolved users render as "Unknown".
    pub fn commenter(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> &CommentId {
        &self.id
    }
}

/// Request body for creating a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
}

impl BlogDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Presence check only; the remote store owns every other rule.
    pub fn validate(&self) -> DomainResult<()> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

/// Request body for adding a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub comment: String,
}

impl NewComment {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require("comment", &self.comment)
    }
}

/// Length of a valid mobile number (digits only).
pub const MOBILE_NO_LEN: usize = 11;

/// Request body for registering a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub password: String,
}

impl Registration {
    /// Form rule applied before anything is sent.
    pub fn validate(&self) -> DomainResult<()> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;

        let mobile = self.mobile_no.trim();
        if mobile.len() != MOBILE_NO_LEN || !mobile.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "mobileNo must be exactly {MOBILE_NO_LEN} digits"
            )));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Accept a populated person object; anything else (unpopulated reference id,
/// null) becomes `None` instead of failing the whole entity.
fn lenient_person<'de, D>(deserializer: D) -> Result<Option<PersonName>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
