//! Route matching module
//!
//! Routes are evaluated in order; the first match wins.

use hyper::Method;

/// Handler a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Single fixture contact
    Contact,
    /// Fixture contact list
    Contacts,
    /// Catch-all echo
    Echo,
}

/// Method condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatch {
    /// Any method
    Any,
    /// GET, and HEAD answered like GET
    Get,
}

/// Path condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// Exact path match
    Exact(String),
    /// Any path
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: MethodMatch,
    pub path: PathMatch,
    pub endpoint: Endpoint,
}

impl Route {
    pub fn get(path: &str, endpoint: Endpoint) -> Self {
        Self {
            method: MethodMatch::Get,
            path: PathMatch::Exact(path.to_string()),
            endpoint,
        }
    }

    pub const fn wildcard(endpoint: Endpoint) -> Self {
        Self {
            method: MethodMatch::Any,
            path: PathMatch::Any,
            endpoint,
        }
    }
}

/// Fixture routes first, then the catch-all
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::get("/contact", Endpoint::Contact),
        Route::get("/contacts", Endpoint::Contacts),
        Route::wildcard(Endpoint::Echo),
    ]
}

/// Find the first matching route for a given method and path
pub fn match_route<'a>(method: &Method, path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes
        .iter()
        .find(|route| match_method(&route.method, method) && match_path(&route.path, path))
}

fn match_method(rule: &MethodMatch, method: &Method) -> bool {
    match rule {
        MethodMatch::Any => true,
        MethodMatch::Get => *method == Method::GET || *method == Method::HEAD,
    }
}

/// Check if a path matches a path rule
pub fn match_path(rule: &PathMatch, path: &str) -> bool {
    match rule {
        PathMatch::Exact(exact) => path == exact.as_str(),
        PathMatch::Any => true,
    }
}
