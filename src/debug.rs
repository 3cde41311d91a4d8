//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::lsdb::IngestOutcome;
use crate::packet::DecodeError;

// One variant per loggable event across the HELLO, LSU/flooding, LSDB,
// SPF and scheduler components. Call sites build a value and call
// `.log()`; no formatting happens if the target level is disabled.
pub enum Debug<'a> {
    PacketDecodeError(&'a str, &'a DecodeError),
    AreaMismatch(&'a str, u32),
    HelloTx(&'a str),
    HelloRxSelf(&'a str),
    HelloRxMaskMismatch(&'a str, Ipv4Addr, Ipv4Addr),
    HelloRxIntervalMismatch(&'a str, u16, u16),
    HelloRxAccept(&'a str, Ipv4Addr),
    AdjacencyChange(&'a str, Ipv4Addr),
    NeighborExpired(Ipv4Addr),
    LsuOriginate(u16, usize),
    LsuDropLoopback(Ipv4Addr),
    LsuIngestAdvert(Ipv4Addr, Ipv4Addr, IngestOutcome),
    LsuReflood(&'a str, u8),
    LsdbPurge(Ipv4Addr, Ipv4Addr),
    SpfRun(usize, usize),
}

// ===== impl Debug =====

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::PacketDecodeError(iface, error) => {
                warn!(iface = %iface, %error, "dropping malformed packet");
            }
            Debug::AreaMismatch(iface, area_id) => {
                warn!(iface = %iface, area_id, "dropping packet from mismatched area");
            }
            Debug::HelloTx(iface) => {
                debug!(iface = %iface, "sent HELLO");
            }
            Debug::HelloRxSelf(iface) => {
                debug!(iface = %iface, "dropping self-originated HELLO");
            }
            Debug::HelloRxMaskMismatch(iface, expected, got) => {
                warn!(iface = %iface, %expected, %got, "dropping HELLO with mismatched network mask");
            }
            Debug::HelloRxIntervalMismatch(iface, expected, got) => {
                warn!(iface = %iface, expected, got, "dropping HELLO with mismatched hello interval");
            }
            Debug::HelloRxAccept(iface, router_id) => {
                debug!(iface = %iface, %router_id, "accepted HELLO");
            }
            Debug::AdjacencyChange(iface, router_id) => {
                debug!(iface = %iface, %router_id, "adjacency changed, triggering LSU origination");
            }
            Debug::NeighborExpired(router_id) => {
                debug!(%router_id, "neighbor expired");
            }
            Debug::LsuOriginate(sequence, num_adverts) => {
                debug!(sequence, num_adverts, "originated LSU");
            }
            Debug::LsuDropLoopback(router_id) => {
                debug!(%router_id, "dropping self-originated LSU");
            }
            Debug::LsuIngestAdvert(from, subnet, outcome) => {
                debug!(%from, %subnet, ?outcome, "ingested LSU advertisement");
            }
            Debug::LsuReflood(iface, ttl) => {
                debug!(iface = %iface, ttl, "re-flooding LSU");
            }
            Debug::LsdbPurge(router_id, subnet) => {
                debug!(%router_id, %subnet, "purged aged topology record");
            }
            Debug::SpfRun(routers, routes) => {
                debug!(routers, routes, "SPF run complete");
            }
        }
    }
}
