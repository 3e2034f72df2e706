//! Connection state of the node, as last observed by the refresher.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rpc_core::{RpcError, RpcServerInfo};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    pub is_connected: bool,
    pub server_info: Option<RpcServerInfo>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Default)]
pub struct NodeStatus {
    state: RwLock<NodeState>,
}

impl NodeStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> NodeState {
        self.state.read().clone()
    }

    /// Returns true when this flips the node from disconnected to connected.
    pub fn record_success(&self, server_info: RpcServerInfo, at: DateTime<Utc>) -> bool {
        let mut state = self.state.write();
        let was_connected = state.is_connected;
        state.is_connected = true;
        state.server_info = Some(server_info);
        state.last_success = Some(at);
        state.last_error = None;
        !was_connected
    }

    /// Returns true when this flips the node from connected to disconnected.
    ///
    /// A node that answers with garbage is still reachable, so only
    /// connection failures clear the connected flag.
    pub fn record_failure(&self, err: &RpcError) -> bool {
        let mut state = self.state.write();
        let was_connected = state.is_connected;
        if err.is_connection_failure() {
            state.is_connected = false;
        }
        state.last_error = Some(err.to_string());
        was_connected && !state.is_connected
    }
}
