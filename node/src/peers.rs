//! Per-peer misbehaviour strikes.
//!
//! Every structurally invalid or badly signed message costs the sending peer
//! one strike. Once a peer reaches the limit the networking layer is expected
//! to drop it; this module only keeps the count.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::info;

pub struct PeerScores {
    strikes: Mutex<HashMap<String, u32>>,
    max_strikes: u32,
}

impl PeerScores {
    pub fn new(max_strikes: u32) -> Self {
        Self {
            strikes: Mutex::new(HashMap::new()),
            max_strikes,
        }
    }

    /// Record one strike against `peer` and return its new total.
    pub fn strike(&self, peer: &str) -> u32 {
        let mut strikes = self.strikes.lock();
        let count = strikes.entry(peer.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        if *count == self.max_strikes {
            info!(peer, strikes = *count, "peer reached strike limit");
        }
        *count
    }

    pub fn strikes(&self, peer: &str) -> u32 {
        self.strikes.lock().get(peer).copied().unwrap_or(0)
    }

    pub fn should_disconnect(&self, peer: &str) -> bool {
        self.strikes(peer) >= self.max_strikes
    }

    /// Clear a peer's record, e.g. after it was disconnected.
    pub fn forget(&self, peer: &str) {
        self.strikes.lock().remove(peer);
    }

    pub fn max_strikes(&self) -> u32 {
        self.max_strikes
    }
}
