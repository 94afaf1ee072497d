//! Application services.
//!
//! Handlers in `routes` stay thin: they extract, call into one of these
//! modules, and render. Nothing here knows about HTTP requests.

pub mod export;
pub mod google;
pub mod guard;
pub mod identity;
pub mod records;
pub mod session;
pub mod store;
