//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use crate::packet::MacAddr;

// Host-owned interface identity (spec.md §3): name, MAC, IP, mask, and
// whether the host currently has it enabled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceInfo {
    pub name: String,
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub enabled: bool,
}

// Core-owned mutable binding for one interface (spec.md §3, §9: the
// on-wire HELLO_INTERVAL constant is kept separate from this runtime
// countdown). Indexed by interface name in `instance::SubsysState`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterfaceBinding {
    pub neighbor_router_id: Option<Ipv4Addr>,
    pub neighbor_ip: Option<Ipv4Addr>,
    pub hello_countdown: u16,
}
