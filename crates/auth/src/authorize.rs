use thiserror::Error;

use crate::{Actor, Capability};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("forbidden: missing capability '{0}'")]
    Forbidden(Capability),
}

/// Authorize an actor for a capability.
///
/// - No IO
/// - No panics
/// - Anonymous is denied everything
pub fn authorize(actor: &Actor, capability: Capability) -> Result<(), AuthzError> {
    match actor {
        Actor::Anonymous => Err(AuthzError::Unauthenticated),
        Actor::Authenticated { is_admin, .. } => {
            if capability.is_admin_only() && !is_admin {
                Err(AuthzError::Forbidden(capability))
            } else {
                Ok(())
            }
        }
    }
}

/// Boolean form of [`authorize`].
pub fn allowed(actor: &Actor, capability: Capability) -> bool {
    authorize(actor, capability).is_ok()
}

/// Navigable locations of the client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    /// The blog listing; also the fallback for denied or unknown routes.
    Posts,
    Admin,
    Unknown,
}

impl Route {
    pub const FALLBACK: Route = Route::Posts;

    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/posts" => Route::Posts,
            "/admin" => Route::Admin,
            _ => Route::Unknown,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Posts => "/posts",
            Route::Admin => "/admin",
            Route::Unknown => "*",
        }
    }

    /// Capability required to enter the route, if any.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Route::Admin => Some(Capability::ViewAdminConsole),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Route guard: denied or unknown routes redirect to [`Route::FALLBACK`].
pub fn guard(actor: &Actor, route: Route) -> RouteDecision {
    if route == Route::Unknown {
        return RouteDecision::Redirect(Route::FALLBACK);
    }
    match route.required_capability() {
        Some(capability) if !allowed(actor, capability) => {
            tracing::debug!(route = route.path(), %capability, "route denied; redirecting");
            RouteDecision::Redirect(Route::FALLBACK)
        }
        _ => RouteDecision::Allow,
    }
}

/// Which variant of the blog listing an actor sees.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListingView {
    /// Nobody is signed in; the view asks for a login instead of failing.
    PromptLogin,
    AdminConsole,
    UserView,
}

pub fn listing_view(actor: &Actor) -> ListingView {
    if !allowed(actor, Capability::BrowseBlogs) {
        ListingView::PromptLogin
    } else if allowed(actor, Capability::ViewAdminConsole) {
        ListingView::AdminConsole
    } else {
        ListingView::UserView
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActorData;
    use proptest::prelude::*;

    fn user() -> Actor {
        Actor::from_data(ActorData::new("a@b.com", false))
    }

    fn admin() -> Actor {
        Actor::from_data(ActorData::new("root@b.com", true))
    }

    #[test]
    fn anonymous_is_denied_everything() {
        for capability in Capability::ALL {
            assert_eq!(
                authorize(&Actor::Anonymous, capability),
                Err(AuthzError::Unauthenticated)
            );
        }
    }

    #[test]
    fn user_is_denied_admin_capabilities() {
        assert_eq!(
            authorize(&user(), Capability::ManageAnyBlog),
            Err(AuthzError::Forbidden(Capability::ManageAnyBlog))
        );
        assert!(!allowed(&user(), Capability::ViewAdminConsole));
        assert!(!allowed(&user(), Capability::DeleteAnyComment));
        assert!(allowed(&user(), Capability::BrowseBlogs));
        assert!(allowed(&user(), Capability::AddComment));
        assert!(allowed(&user(), Capability::ManageOwnComment));
    }

    #[test]
    fn admin_holds_every_capability() {
        for capability in Capability::ALL {
            assert!(allowed(&admin(), capability), "admin denied {capability}");
        }
    }

    #[test]
    fn admin_route_redirects_non_admins_to_listing() {
        assert_eq!(guard(&admin(), Route::Admin), RouteDecision::Allow);
        assert_eq!(guard(&user(), Route::Admin), RouteDecision::Redirect(Route::Posts));
        assert_eq!(
            guard(&Actor::Anonymous, Route::Admin),
            RouteDecision::Redirect(Route::Posts)
        );
        assert_eq!(guard(&Actor::Anonymous, Route::Login), RouteDecision::Allow);
        assert_eq!(guard(&user(), Route::Unknown), RouteDecision::Redirect(Route::Posts));
    }

    #[test]
    fn routes_parse_from_paths() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/admin/"), Route::Admin);
        assert_eq!(Route::from_path("/posts"), Route::Posts);
        assert_eq!(Route::from_path("/nope"), Route::Unknown);
        assert_eq!(Route::from_path(Route::Register.path()), Route::Register);
    }

    #[test]
    fn listing_view_per_actor() {
        assert_eq!(listing_view(&Actor::Anonymous), ListingView::PromptLogin);
        assert_eq!(listing_view(&user()), ListingView::UserView);
        assert_eq!(listing_view(&admin()), ListingView::AdminConsole);
    }

    proptest! {
        #[test]
        fn manage_any_blog_tracks_admin_flag(email in "[a-z]{1,8}@[a-z]{1,8}\\.com", is_admin in any::<bool>()) {
            let actor = Actor::from_data(ActorData::new(email, is_admin));
            prop_assert_eq!(allowed(&actor, Capability::ManageAnyBlog), is_admin);
            prop_assert_eq!(allowed(&actor, Capability::ViewAdminConsole), is_admin);
        }
    }
}
