//! Client-side routing: the static route table and the navigation guard.
//!
//! Routes mirror the views the backend's web frontend exposes. The guard is
//! a pure function of the target route and the session's authentication
//! flag, run synchronously on every navigation.

use tracing::debug;

/// A navigable view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Gallery,
}

/// Static description of a route. Immutable after startup.
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

impl Route {
    pub fn descriptor(&self) -> &'static RouteDescriptor {
        match self {
            Route::Home => &RouteDescriptor {
                path: "/",
                name: "home",
                requires_auth: false,
            },
            Route::Login => &RouteDescriptor {
                path: "/login",
                name: "login",
                requires_auth: false,
            },
            Route::Register => &RouteDescriptor {
                path: "/register",
                name: "register",
                requires_auth: false,
            },
            Route::Gallery => &RouteDescriptor {
                path: "/gallery",
                name: "gallery",
                requires_auth: true,
            },
        }
    }

    pub fn path(&self) -> &'static str {
        self.descriptor().path
    }

    pub fn requires_auth(&self) -> bool {
        self.descriptor().requires_auth
    }

    /// Display title for the navigation bar
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Gallery => "Gallery",
        }
    }
}

/// Resolve a navigation target against the session: a protected route while
/// anonymous redirects to the login view, everything else passes unchanged.
pub fn guard(target: Route, authenticated: bool) -> Route {
    if target.requires_auth() && !authenticated {
        debug!(target = target.path(), "Redirecting unauthenticated navigation to login");
        Route::Login
    } else {
        target
    }
}

/// Tracks the current view, applying the guard on every navigation
pub struct Navigator {
    current: Route,
}

impl Navigator {
    /// Start on the given route, guard already applied by the caller
    pub fn new(initial: Route) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Navigate to `target`, returning the route actually reached
    pub fn navigate(&mut self, target: Route, authenticated: bool) -> Route {
        self.current = guard(target, authenticated);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Register.path(), "/register");
        assert_eq!(Route::Gallery.path(), "/gallery");

        assert!(Route::Gallery.requires_auth());
        assert!(!Route::Home.requires_auth());
        assert!(!Route::Login.requires_auth());
        assert!(!Route::Register.requires_auth());
    }

    #[test]
    fn test_guard_redirects_anonymous_gallery_to_login() {
        assert_eq!(guard(Route::Gallery, false), Route::Login);
    }

    #[test]
    fn test_guard_allows_authenticated_gallery() {
        assert_eq!(guard(Route::Gallery, true), Route::Gallery);
    }

    #[test]
    fn test_guard_always_allows_public_routes() {
        for authenticated in [false, true] {
            assert_eq!(guard(Route::Home, authenticated), Route::Home);
            assert_eq!(guard(Route::Login, authenticated), Route::Login);
            assert_eq!(guard(Route::Register, authenticated), Route::Register);
        }
    }

    #[test]
    fn test_navigator_applies_guard() {
        let mut nav = Navigator::new(Route::Home);

        assert_eq!(nav.navigate(Route::Gallery, false), Route::Login);
        assert_eq!(nav.current(), Route::Login);

        assert_eq!(nav.navigate(Route::Gallery, true), Route::Gallery);
        assert_eq!(nav.current(), Route::Gallery);
    }
}
