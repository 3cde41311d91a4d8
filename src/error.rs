//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Transport errors (spec.md §7): the host's `send_packet` failed. Logged
// and otherwise ignored -- the next periodic trigger retries.
#[derive(Debug)]
pub struct Error {
    pub iface: String,
    pub source: std::io::Error,
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        warn!(iface = %self.iface, error = %self.source, "send_packet failed");
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "send_packet on {} failed: {}", self.iface, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
