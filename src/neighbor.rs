//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::net::Ipv4Addr;

// Per-router neighbor record (spec.md §4.B). `ttl_seconds` is decremented
// once per second by `tick()`; a fresh HELLO resets it via `refresh()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NeighborRecord {
    pub router_id: Ipv4Addr,
    pub source_ip: Ipv4Addr,
    pub ttl_seconds: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshOutcome {
    Added,
    Refreshed,
}

// Mapping from router_id to record, replacing the source's hand-rolled
// singly linked list (spec.md §9). Invariant: at most one record per
// router_id.
#[derive(Default)]
pub struct NeighborTable {
    neighbors: HashMap<Ipv4Addr, NeighborRecord>,
}

// ===== impl NeighborTable =====

impl NeighborTable {
    pub fn new() -> Self {
        NeighborTable::default()
    }

    pub fn refresh(&mut self, router_id: Ipv4Addr, source_ip: Ipv4Addr, timeout: u16) -> RefreshOutcome {
        match self.neighbors.get_mut(&router_id) {
            Some(record) => {
                record.source_ip = source_ip;
                record.ttl_seconds = timeout;
                RefreshOutcome::Refreshed
            }
            None => {
                self.neighbors.insert(
                    router_id,
                    NeighborRecord {
                        router_id,
                        source_ip,
                        ttl_seconds: timeout,
                    },
                );
                RefreshOutcome::Added
            }
        }
    }

    // Called once per second. Returns the set of records removed because
    // their TTL reached zero.
    pub fn tick(&mut self) -> Vec<NeighborRecord> {
        let mut expired = Vec::new();
        self.neighbors.retain(|_, record| {
            record.ttl_seconds = record.ttl_seconds.saturating_sub(1);
            if record.ttl_seconds == 0 {
                expired.push(*record);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn lookup(&self, router_id: Ipv4Addr) -> Option<&NeighborRecord> {
        self.neighbors.get(&router_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeighborRecord> {
        self.neighbors.values()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_reports_added_then_refreshed() {
        let mut table = NeighborTable::new();
        let rid = Ipv4Addr::new(2, 2, 2, 2);
        let ip = Ipv4Addr::new(10, 0, 0, 2);

        assert_eq!(table.refresh(rid, ip, 15), RefreshOutcome::Added);
        assert_eq!(table.refresh(rid, ip, 15), RefreshOutcome::Refreshed);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn tick_expires_stale_neighbors_and_reports_them() {
        let mut table = NeighborTable::new();
        let rid = Ipv4Addr::new(2, 2, 2, 2);
        let ip = Ipv4Addr::new(10, 0, 0, 2);
        table.refresh(rid, ip, 2);

        assert!(table.tick().is_empty());
        let expired = table.tick();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].router_id, rid);
        assert!(table.is_empty());
    }

    #[test]
    fn at_most_one_record_per_router_id() {
        let mut table = NeighborTable::new();
        let rid = Ipv4Addr::new(2, 2, 2, 2);
        table.refresh(rid, Ipv4Addr::new(10, 0, 0, 2), 15);
        table.refresh(rid, Ipv4Addr::new(10, 0, 0, 99), 15);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(rid).unwrap().source_ip, Ipv4Addr::new(10, 0, 0, 99));
    }
}
