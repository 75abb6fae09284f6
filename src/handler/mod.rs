//! Request handler module
//!
//! Responsible for request routing dispatch and the endpoint handlers:
//! fixture contacts and the catch-all echo.

pub mod echo;
pub mod fixtures;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
