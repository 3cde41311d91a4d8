//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::interface::InterfaceInfo;
use crate::route::RouteEntry;

// The host-facing API (spec.md §6): everything the core borrows from its
// host rather than owning itself. `holo-ospf` bridges this same seam via
// its `southbound::{rx, tx}` modules against an ibus/gRPC transport; here
// it collapses to plain trait objects since there is no transport to
// bridge across.
pub trait Host: Send + Sync {
    fn send_packet(&self, iface: &str, bytes: Bytes) -> std::io::Result<()>;

    // A snapshot of the current interface inventory. Called once per
    // scheduler tick and once per ingress dispatch; cheap enough to
    // re-fetch rather than cache.
    fn interfaces(&self) -> Vec<InterfaceInfo>;
}

// `routes.add/clear_where/contains` from spec.md §6, adapted to a plain
// trait object. `clear_owned` implements `clear_where(admin_distance ==
// 110)` directly, since that is the only predicate this crate ever
// clears by.
pub trait RoutingTable: Send {
    fn add(&mut self, entry: RouteEntry);
    fn clear_owned(&mut self);
    fn contains(&self, subnet: Ipv4Addr, mask: Ipv4Addr) -> bool;
}
