//! HTTP surface for sprintboard: thin axum handlers over the core engines.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
