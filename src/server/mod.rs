//! HTTP surface for the tool registry.
//!
//! Lets an out-of-process agent list the tools and invoke them by name.
//!
//! # Endpoints
//!
//! - `GET  /health`: Liveness probe
//! - `GET  /tools`: Tool names, descriptions and argument schemas
//! - `POST /invoke`: Run a `ToolCalling`

pub mod routes;

pub use routes::{app_router, AppState};
