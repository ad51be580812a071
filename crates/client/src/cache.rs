//! In-memory resource caches synchronized with the remote store.
//!
//! Policy:
//! - create/update: await the mutation, then refetch the whole collection
//! - delete: drop the entity locally by id once the store confirms
//! - comments: scoped to one viewed blog; switching blogs discards the list
//! - failures leave the cached collections untouched
//!
//! There is no deduplication of concurrent calls; when two refetches race,
//! whichever resolves last wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use devdiaries_core::{BlogDraft, BlogId, BlogPost, Comment, CommentId, Entity, NewComment};

use crate::api::ResourceApi;
use crate::error::ClientError;

/// A cache-level operation, used to word user-facing notices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    FetchBlogs,
    CreateBlog,
    UpdateBlog,
    DeleteBlog,
    FetchComments,
    AddComment,
    DeleteComment,
}

impl Operation {
    pub fn failure_notice(&self) -> &'static str {
        match self {
            Operation::FetchBlogs => "Failed to fetch blogs",
            Operation::CreateBlog => "Failed to create blog",
            Operation::UpdateBlog => "Failed to update blog",
            Operation::DeleteBlog => "Failed to delete blog",
            Operation::FetchComments => "Failed to fetch comments",
            Operation::AddComment => "Failed to add comment",
            Operation::DeleteComment => "Failed to delete comment",
        }
    }

    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            Operation::CreateBlog => Some("Blog created successfully!"),
            Operation::UpdateBlog => Some("Blog updated successfully!"),
            Operation::DeleteBlog => Some("Blog deleted successfully!"),
            Operation::AddComment => Some("Comment added successfully!"),
            Operation::DeleteComment => Some("Comment deleted successfully!"),
            Operation::FetchBlogs | Operation::FetchComments => None,
        }
    }
}

/// A failed cache operation. `Display` is the user-facing notice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", .operation.failure_notice())]
pub struct CacheError {
    pub operation: Operation,
    #[source]
    pub source: ClientError,
}

impl CacheError {
    pub fn new(operation: Operation, source: ClientError) -> Self {
        Self { operation, source }
    }

    /// Transient in-view message with the underlying reason.
    pub fn detail(&self) -> String {
        format!("{}: {}", self.operation.failure_notice(), self.source.user_message())
    }
}

/// A mutation the store confirmed.
///
/// `refetch_error` is set when the follow-up refresh failed: the entity exists
/// on the store but the cached collection may not show it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed<T> {
    pub entity: T,
    pub refetch_error: Option<CacheError>,
}

impl<T> Confirmed<T> {
    pub fn is_synced(&self) -> bool {
        self.refetch_error.is_none()
    }
}

#[derive(Debug, Default)]
struct CommentScope {
    blog_id: Option<BlogId>,
    items: Vec<Comment>,
}

#[derive(Debug, Default)]
struct CacheState {
    blogs: Vec<BlogPost>,
    comments: CommentScope,
}

/// Blog collection plus the comment list of the currently viewed blog.
///
/// Cheap to clone; clones share the same state. The lock is never held across
/// a request.
pub struct ResourceCache<A: ResourceApi + ?Sized> {
    api: Arc<A>,
    state: Arc<Mutex<CacheState>>,
}

impl<A: ResourceApi + ?Sized> Clone for ResourceCache<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: ResourceApi + ?Sized> ResourceCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    pub fn blogs(&self) -> Vec<BlogPost> {
        self.state().blogs.clone()
    }

    pub fn blog(&self, id: &BlogId) -> Option<BlogPost> {
        self.state().blogs.iter().find(|b| b.id() == id).cloned()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state().comments.items.clone()
    }

    pub fn viewed_blog(&self) -> Option<BlogId> {
        self.state().comments.blog_id.clone()
    }

    /// Replace the blog collection with a fresh fetch.
    pub async fn refresh_blogs(&self) -> Result<Vec<BlogPost>, CacheError> {
        let blogs = self
            .api
            .list_blogs()
            .await
            .map_err(|e| CacheError::new(Operation::FetchBlogs, e))?;

        self.state().blogs = blogs.clone();
        tracing::debug!(count = blogs.len(), "blog cache refreshed");
        Ok(blogs)
    }

    /// Create a blog, then refetch the collection.
    ///
    /// `Err` only when the store refused the create. A failed refetch is
    /// returned inside [`Confirmed`] next to the created entity.
    pub async fn create_blog(&self, draft: &BlogDraft) -> Result<Confirmed<BlogPost>, CacheError> {
        let created = self
            .api
            .create_blog(draft)
            .await
            .map_err(|e| CacheError::new(Operation::CreateBlog, e))?;
        tracing::info!(blog_id = %created.id, "blog created");

        Ok(self.refetch_after_mutation(created).await)
    }

    /// Update a blog, then refetch the collection. Same outcome shape as
    /// [`create_blog`](Self::create_blog).
    pub async fn update_blog(&self, post: &BlogPost) -> Result<Confirmed<BlogPost>, CacheError> {
        let updated = self
            .api
            .update_blog(post)
            .await
            .map_err(|e| CacheError::new(Operation::UpdateBlog, e))?;
        tracing::info!(blog_id = %updated.id, "blog updated");

        Ok(self.refetch_after_mutation(updated).await)
    }

    /// Second step of create/update: the list is only refetched after the
    /// mutation resolved, so server-computed fields (author, timestamps) are
    /// what the cache shows. A failure here leaves the cache as it was and is
    /// carried next to the confirmed entity.
    async fn refetch_after_mutation(&self, entity: BlogPost) -> Confirmed<BlogPost> {
        let refetch_error = match self.refresh_blogs().await {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(blog_id = %entity.id, error = %err.detail(), "refetch after mutation failed");
                Some(err)
            }
        };
        Confirmed {
            entity,
            refetch_error,
        }
    }

    pub async fn delete_blog(&self, id: &BlogId) -> Result<(), CacheError> {
        self.api
            .delete_blog(id)
            .await
            .map_err(|e| CacheError::new(Operation::DeleteBlog, e))?;

        let mut state = self.state();
        remove_by_id(&mut state.blogs, id);
        if state.comments.blog_id.as_ref() == Some(id) {
            state.comments = CommentScope::default();
        }
        tracing::info!(blog_id = %id, "blog deleted");
        Ok(())
    }

    /// Switch the comment scope to `blog_id` and load its comments.
    ///
    /// The previous blog's comments are discarded before the request is sent.
    pub async fn view_comments(&self, blog_id: BlogId) -> Result<Vec<Comment>, CacheError> {
        {
            let mut state = self.state();
            state.comments = CommentScope {
                blog_id: Some(blog_id.clone()),
                items: Vec::new(),
            };
        }
        self.fetch_comments(blog_id).await
    }

    /// Reload the comments of the viewed blog; no-op when none is viewed.
    pub async fn refresh_comments(&self) -> Result<Vec<Comment>, CacheError> {
        match self.viewed_blog() {
            Some(blog_id) => self.fetch_comments(blog_id).await,
            None => Ok(Vec::new()),
        }
    }

    pub fn close_comments(&self) {
        self.state().comments = CommentScope::default();
    }

    pub async fn add_comment(&self, blog_id: &BlogId, comment: &NewComment) -> Result<Comment, CacheError> {
        let added = self
            .api
            .add_comment(blog_id, comment)
            .await
            .map_err(|e| CacheError::new(Operation::AddComment, e))?;
        tracing::info!(blog_id = %blog_id, comment_id = %added.id, "comment added");

        if self.viewed_blog().as_ref() == Some(blog_id) {
            self.fetch_comments(blog_id.clone()).await?;
        }
        Ok(added)
    }

    pub async fn delete_comment(&self, id: &CommentId) -> Result<(), CacheError> {
        self.api
            .delete_comment(id)
            .await
            .map_err(|e| CacheError::new(Operation::DeleteComment, e))?;

        remove_by_id(&mut self.state().comments.items, id);
        tracing::info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    /// Forget everything (used on sign-out).
    pub fn clear(&self) {
        *self.state() = CacheState::default();
    }

    async fn fetch_comments(&self, blog_id: BlogId) -> Result<Vec<Comment>, CacheError> {
        let comments = self
            .api
            .list_comments(&blog_id)
            .await
            .map_err(|e| CacheError::new(Operation::FetchComments, e))?;

        let mut state = self.state();
        if state.comments.blog_id.as_ref() == Some(&blog_id) {
            state.comments.items = comments.clone();
        } else {
            tracing::debug!(blog_id = %blog_id, "discarding comments for a blog no longer viewed");
        }
        Ok(comments)
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remove_by_id<E: Entity>(items: &mut Vec<E>, id: &E::Id) {
    items.retain(|item| item.id() != id);
}
