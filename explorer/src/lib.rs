//! Kaspa Testnet Explorer backend
//!
//! Keeps a periodically refreshed snapshot of a kaspad node's view of the
//! network and serves it as a JSON API, a live WebSocket feed and a static
//! frontend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod indexer;
pub mod models;
pub mod rpc_client;
pub mod status;
pub mod websocket;

#[cfg(test)]
mod testing;

pub use error::{ExplorerError, Result};
