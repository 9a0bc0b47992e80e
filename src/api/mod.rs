//! sizepivot API server module
//!
//! HTTP front end over the same pipeline the CLI uses.
//! Run with `sizepivot-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
