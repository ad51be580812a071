use serde::{Deserialize, Serialize};

/// A named permission gating a feature or route.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Open the administrator console.
    ViewAdminConsole,
    /// Edit or delete any blog post regardless of author.
    ManageAnyBlog,
    /// Delete any comment on any post.
    DeleteAnyComment,
    /// See the blog listing.
    BrowseBlogs,
    CreateBlog,
    ManageOwnBlog,
    AddComment,
    ManageOwnComment,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ViewAdminConsole,
        Capability::ManageAnyBlog,
        Capability::DeleteAnyComment,
        Capability::BrowseBlogs,
        Capability::CreateBlog,
        Capability::ManageOwnBlog,
        Capability::AddComment,
        Capability::ManageOwnComment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewAdminConsole => "view_admin_console",
            Capability::ManageAnyBlog => "manage_any_blog",
            Capability::DeleteAnyComment => "delete_any_comment",
            Capability::BrowseBlogs => "browse_blogs",
            Capability::CreateBlog => "create_blog",
            Capability::ManageOwnBlog => "manage_own_blog",
            Capability::AddComment => "add_comment",
            Capability::ManageOwnComment => "manage_own_comment",
        }
    }

    /// Whether only administrators hold this capability.
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Capability::ViewAdminConsole | Capability::ManageAnyBlog | Capability::DeleteAnyComment
        )
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
