//! Authorization Gate
//!
//! Decides, for every navigation, whether a page may render for the
//! current identity. Gating here is advisory: the backend is expected to
//! enforce authorization on every request on its own.

use ehr_core::{Identity, Role};
use std::fmt;

/// Portal pages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Doctors,
    Patients,
    Records,
    MyRecord,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Dashboard,
        Route::Doctors,
        Route::Patients,
        Route::Records,
        Route::MyRecord,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Doctors => "/doctors",
            Route::Patients => "/patients",
            Route::Records => "/records",
            Route::MyRecord => "/my-record",
        }
    }

    /// Resolve a path; anything unknown lands on the dashboard
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p if p.starts_with('/') => p,
            _ => return Route::from_path(&format!("/{}", trimmed)),
        };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Dashboard)
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Role a page is restricted to, if any
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login | Route::Dashboard => None,
            Route::Doctors | Route::Patients => Some(Role::Admin),
            Route::Records => Some(Role::Doctor),
            Route::MyRecord => Some(Role::Patient),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access<'a> {
    /// Render the page for this identity (absent only on the login page)
    Granted(Option<&'a Identity>),
    /// Not signed in: go to the login entry point instead
    Redirect(Route),
    /// Signed in with the wrong role: render the access-denied state
    Denied,
}

/// Check whether `route` may render for `identity`
pub fn authorize(identity: Option<&Identity>, route: Route) -> Access<'_> {
    if !route.requires_auth() {
        return Access::Granted(identity);
    }

    let identity = match identity {
        Some(identity) => identity,
        None => return Access::Redirect(Route::Login),
    };

    match route.required_role() {
        Some(role) if !identity.is(role) => Access::Denied,
        _ => Access::Granted(Some(identity)),
    }
}

/// Sidebar entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

const fn nav(label: &'static str, route: Route) -> NavItem {
    NavItem { label, route }
}

/// Navigation entries visible to `role`
pub fn nav_items(role: Role) -> Vec<NavItem> {
    let mut items = vec![nav("Dashboard", Route::Dashboard)];
    match role {
        Role::Admin => {
            items.push(nav("Doctors", Route::Doctors));
            items.push(nav("Patients", Route::Patients));
        }
        Role::Doctor => items.push(nav("Patient Records", Route::Records)),
        Role::Patient => items.push(nav("My Record", Route::MyRecord)),
    }
    items
}
