//! Live feed of published snapshots over WebSocket

pub mod server;
pub mod subscriptions;

pub use server::routes;
pub use subscriptions::Subscriptions;
