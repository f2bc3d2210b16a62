//! HTTP surface: the issue resource handlers and the axum server glue.

pub mod issues;
pub mod server;

pub use issues::AppState;
pub use server::{build_router, serve};
