//! REST API

pub mod routes;
pub mod server;
pub mod state;

pub use server::ApiServer;
pub use state::AppState;
