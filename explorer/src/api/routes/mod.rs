pub mod addresses;
pub mod blocks;
pub mod info;
pub mod mempool;
pub mod peers;
