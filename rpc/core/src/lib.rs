pub mod api;
pub mod convert;
pub mod model;

pub use api::RpcApi;
pub use model::*;
