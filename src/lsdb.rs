//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::packet::Advertisement;

// Outcome of `TopologyDb::ingest` (spec.md §4.D).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IngestOutcome {
    New,
    Updated,
    Stale,
    Duplicate,
}

// One directed link record (spec.md §3). `next_hop_ip` is populated only
// for self-originated records (the local interface's address on that
// link); it is not carried on the wire and SPF never reads it for
// records owned by other routers -- next-hop is always inherited from
// the root's own directly attached interface (spec.md §4.F step 2).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LinkRecord {
    pub router_id: Ipv4Addr,
    pub subnet: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub neighbor_router_id: Ipv4Addr,
    pub next_hop_ip: Ipv4Addr,
    pub seq: u16,
    pub age_seconds: u32,
}

impl LinkRecord {
    pub fn is_stub(&self) -> bool {
        self.neighbor_router_id == crate::packet::lsu::STUB_NEIGHBOR
    }
}

// Keyed by (router_id, subnet), stored in a `BTreeMap` rather than a
// `HashMap` so `snapshot()` yields a deterministic iteration order --
// `spec.md` §4.F's tie-break rule depends on "DB iteration order" being
// stable.
#[derive(Default)]
pub struct TopologyDb {
    records: BTreeMap<(Ipv4Addr, Ipv4Addr), LinkRecord>,
}

// mod-2^16 "is newer" comparison (spec.md §3, §4.D, §8 scenario 6).
fn seq_is_newer(candidate: u16, stored: u16) -> bool {
    candidate != stored && candidate.wrapping_sub(stored) < 0x8000
}

// ===== impl TopologyDb =====

impl TopologyDb {
    pub fn new() -> Self {
        TopologyDb::default()
    }

    pub fn ingest(&mut self, advert: &Advertisement, from_router_id: Ipv4Addr, seq: u16) -> IngestOutcome {
        let key = (from_router_id, advert.subnet);
        match self.records.get_mut(&key) {
            None => {
                self.records.insert(
                    key,
                    LinkRecord {
                        router_id: from_router_id,
                        subnet: advert.subnet,
                        mask: advert.mask,
                        neighbor_router_id: advert.neighbor_router_id,
                        next_hop_ip: Ipv4Addr::UNSPECIFIED,
                        seq,
                        age_seconds: 0,
                    },
                );
                IngestOutcome::New
            }
            Some(record) => {
                if seq_is_newer(seq, record.seq) {
                    record.mask = advert.mask;
                    record.neighbor_router_id = advert.neighbor_router_id;
                    record.seq = seq;
                    record.age_seconds = 0;
                    IngestOutcome::Updated
                } else if seq == record.seq {
                    IngestOutcome::Duplicate
                } else {
                    IngestOutcome::Stale
                }
            }
        }
    }

    // Atomically replaces every record this router originates (spec.md
    // §4.D invariant). `entries` is `(advert, next_hop_ip)` pairs built
    // from the current interface/binding snapshot.
    pub fn rebuild_self(&mut self, router_id: Ipv4Addr, seq: u16, entries: &[(Advertisement, Ipv4Addr)]) {
        self.records.retain(|(rid, _), _| *rid != router_id);
        for (advert, next_hop_ip) in entries {
            self.records.insert(
                (router_id, advert.subnet),
                LinkRecord {
                    router_id,
                    subnet: advert.subnet,
                    mask: advert.mask,
                    neighbor_router_id: advert.neighbor_router_id,
                    next_hop_ip: *next_hop_ip,
                    seq,
                    age_seconds: 0,
                },
            );
        }
    }

    pub fn self_adverts(&self, router_id: Ipv4Addr) -> Vec<Advertisement> {
        self.records
            .values()
            .filter(|record| record.router_id == router_id)
            .map(|record| Advertisement {
                subnet: record.subnet,
                mask: record.mask,
                neighbor_router_id: record.neighbor_router_id,
            })
            .collect()
    }

    // Called once per second. Increments every record's age and purges
    // anything at or past `max_age`.
    pub fn age_tick(&mut self, max_age: u32) -> Vec<LinkRecord> {
        let mut purged = Vec::new();
        self.records.retain(|_, record| {
            record.age_seconds += 1;
            if record.age_seconds >= max_age {
                purged.push(*record);
                false
            } else {
                true
            }
        });
        purged
    }

    // Immutable view for SPF; the caller must hold the subsystem lock
    // while taking it (spec.md §4.D).
    pub fn snapshot(&self) -> BTreeMap<(Ipv4Addr, Ipv4Addr), LinkRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advert(subnet: [u8; 4], mask: [u8; 4], neighbor: [u8; 4]) -> Advertisement {
        Advertisement {
            subnet: Ipv4Addr::from(subnet),
            mask: Ipv4Addr::from(mask),
            neighbor_router_id: Ipv4Addr::from(neighbor),
        }
    }

    #[test]
    fn first_ingest_is_new() {
        let mut db = TopologyDb::new();
        let from = Ipv4Addr::new(2, 2, 2, 2);
        let a = advert([10, 1, 0, 0], [255, 255, 255, 254], [4, 4, 4, 4]);
        assert_eq!(db.ingest(&a, from, 7), IngestOutcome::New);
    }

    #[test]
    fn duplicate_and_stale_and_updated() {
        let mut db = TopologyDb::new();
        let from = Ipv4Addr::new(2, 2, 2, 2);
        let a = advert([10, 1, 0, 0], [255, 255, 255, 254], [4, 4, 4, 4]);
        db.ingest(&a, from, 7);

        assert_eq!(db.ingest(&a, from, 7), IngestOutcome::Duplicate);
        assert_eq!(db.ingest(&a, from, 6), IngestOutcome::Stale);
        assert_eq!(db.ingest(&a, from, 8), IngestOutcome::Updated);
    }

    #[test]
    fn sequence_wraps_around_mod_2_16() {
        let mut db = TopologyDb::new();
        let from = Ipv4Addr::new(2, 2, 2, 2);
        let a = advert([10, 9, 9, 0], [255, 255, 255, 254], [0, 0, 0, 0]);
        db.ingest(&a, from, 0xFFFE);

        assert_eq!(db.ingest(&a, from, 0x0001), IngestOutcome::Updated);
        assert_eq!(db.ingest(&a, from, 0xFFFF), IngestOutcome::Stale);
    }

    #[test]
    fn age_tick_purges_at_max_age() {
        let mut db = TopologyDb::new();
        let from = Ipv4Addr::new(2, 2, 2, 2);
        let a = advert([10, 1, 0, 0], [255, 255, 255, 254], [4, 4, 4, 4]);
        db.ingest(&a, from, 1);

        for _ in 0..59 {
            assert!(db.age_tick(60).is_empty());
        }
        let purged = db.age_tick(60);
        assert_eq!(purged.len(), 1);
    }

    #[test]
    fn rebuild_self_replaces_only_local_records() {
        let mut db = TopologyDb::new();
        let local = Ipv4Addr::new(1, 1, 1, 1);
        let remote = Ipv4Addr::new(2, 2, 2, 2);
        let remote_advert = advert([10, 2, 0, 0], [255, 255, 255, 254], [3, 3, 3, 3]);
        db.ingest(&remote_advert, remote, 1);

        let self_advert = advert([10, 0, 0, 0], [255, 255, 255, 254], [2, 2, 2, 2]);
        db.rebuild_self(local, 1, &[(self_advert, Ipv4Addr::new(10, 0, 0, 2))]);

        let snapshot = db.snapshot();
        assert!(snapshot.contains_key(&(remote, remote_advert.subnet)));
        assert!(snapshot.contains_key(&(local, self_advert.subnet)));
    }
}
