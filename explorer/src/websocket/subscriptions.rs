//! Per-connection channel subscriptions for the live feed

use std::collections::BTreeSet;

/// Refresh summaries, one per published snapshot.
pub const SNAPSHOT_CHANNEL: &str = "snapshot";
/// Newest block of each snapshot, when it changed.
pub const BLOCKS_CHANNEL: &str = "blocks";

pub const KNOWN_CHANNELS: &[&str] = &[SNAPSHOT_CHANNEL, BLOCKS_CHANNEL];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriptions {
    channels: BTreeSet<String>,
}

impl Subscriptions {
    /// New connections follow the snapshot channel until they unsubscribe.
    pub fn new() -> Self {
        Self { channels: BTreeSet::from([SNAPSHOT_CHANNEL.to_string()]) }
    }

    /// Returns false for channels this server does not publish.
    pub fn subscribe(&mut self, channel: &str) -> bool {
        if !KNOWN_CHANNELS.contains(&channel) {
            return false;
        }
        self.channels.insert(channel.to_string());
        true
    }

    pub fn unsubscribe(&mut self, channel: &str) -> bool {
        self.channels.remove(channel)
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    pub fn channels(&self) -> Vec<String> {
        self.channels.iter().cloned().collect()
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}
