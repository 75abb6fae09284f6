//! Routing module
//!
//! Ordered route table: fixture routes matched by method and exact path,
//! followed by a wildcard that takes any method and any path.

mod matcher;

pub use matcher::{default_routes, match_route, Endpoint, Route};
