//! HTTP API module for the stats endpoints and static serving.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
