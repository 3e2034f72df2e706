//! Background refresh of the node snapshot, plus the conversions from node
//! wire models into the explorer's API models.

pub mod service;
pub mod block_indexer;
pub mod transaction_indexer;
pub mod address_indexer;

pub use service::RefreshService;
