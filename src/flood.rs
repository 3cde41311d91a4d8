//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::debug::Debug;
use crate::instance::Instance;
use crate::interface::InterfaceInfo;
use crate::lsdb::IngestOutcome;
use crate::packet::eth::{ETHERTYPE_IPV4, MAC_BROADCAST};
use crate::packet::ipv4::IP_PROTO_OSPF;
use crate::packet::lsu::STUB_NEIGHBOR;
use crate::packet::{Advertisement, Body, EthernetHeader, Frame, Ipv4Header, Lsu, OspfHeader, PacketType};

impl Instance {
    // `origin_router_id` is the OSPF `router_id` the frame is stamped with
    // on the wire -- the LSU's originator, not necessarily `self`. A
    // re-flooded LSU must preserve the original originator (spec.md §4.E
    // step 3) so downstream peers dedupe and key the LSDB under the right
    // origin.
    fn lsu_frame(&self, iface: &InterfaceInfo, dst_ip: Ipv4Addr, ttl: u8, origin_router_id: Ipv4Addr, lsu: Lsu) -> Bytes {
        Frame::new(
            EthernetHeader {
                // Resolving the neighbor's MAC is an ARP concern, outside
                // this crate's scope (spec.md §1); the host's forwarding
                // layer rewrites this before transmission.
                dst: MAC_BROADCAST,
                src: iface.mac,
                ethertype: ETHERTYPE_IPV4,
            },
            Ipv4Header {
                ttl,
                protocol: IP_PROTO_OSPF,
                src: iface.ip,
                dst: dst_ip,
                total_length: 0,
            },
            OspfHeader {
                pkt_type: PacketType::Lsu,
                router_id: origin_router_id,
                area_id: self.config.area_id,
            },
            Body::Lsu(lsu),
        )
        .encode()
    }

    fn send_lsu(&self, iface: &InterfaceInfo, dst_ip: Ipv4Addr, ttl: u8, origin_router_id: Ipv4Addr, lsu: Lsu) {
        let bytes = self.lsu_frame(iface, dst_ip, ttl, origin_router_id, lsu);
        if let Err(source) = self.host.send_packet(&iface.name, bytes) {
            crate::error::Error {
                iface: iface.name.clone(),
                source,
            }
            .log();
        }
    }

    // Origination (spec.md §4.E): rebuilds the self-originated records
    // from the current interface/binding snapshot, bumps the sequence
    // counter, and unicasts one LSU copy per neighbor. Called on
    // adjacency change, the periodic refresh timer, and interface
    // enable/disable.
    pub(crate) fn originate_lsu(&self) {
        let interfaces = self.host.interfaces();

        let (sequence, adverts, targets) = {
            let mut state = self.state.lock().unwrap();

            let mut entries = Vec::new();
            let mut targets = Vec::new();
            for iface in &interfaces {
                if !iface.enabled {
                    continue;
                }
                let binding = state.bindings.entry(iface.name.clone()).or_default();
                let subnet = Ipv4Addr::from(u32::from(iface.ip) & u32::from(iface.mask));
                let (neighbor_router_id, next_hop_ip) = match (binding.neighbor_router_id, binding.neighbor_ip) {
                    (Some(rid), Some(ip)) => (rid, ip),
                    _ => (STUB_NEIGHBOR, Ipv4Addr::UNSPECIFIED),
                };
                entries.push((
                    Advertisement {
                        subnet,
                        mask: iface.mask,
                        neighbor_router_id,
                    },
                    next_hop_ip,
                ));
                if let Some(neighbor_ip) = binding.neighbor_ip {
                    targets.push((iface.clone(), neighbor_ip));
                }
            }

            state.sequence = state.sequence.wrapping_add(1);
            let sequence = state.sequence;
            state.lsdb.rebuild_self(self.router_id, sequence, &entries);
            let adverts: Vec<Advertisement> = entries.into_iter().map(|(advert, _)| advert).collect();
            (sequence, adverts, targets)
        };

        Debug::LsuOriginate(sequence, adverts.len()).log();

        for (iface, neighbor_ip) in targets {
            let lsu = Lsu {
                sequence,
                ttl: self.config.lsu_max_hops,
                adverts: adverts.clone(),
            };
            self.send_lsu(&iface, neighbor_ip, self.config.lsu_max_hops, self.router_id, lsu);
        }

        self.request_spf();
    }

    // Ingress processing of an LSU (spec.md §4.E). `ingress` is the
    // interface it arrived on; `source_router_id`/`lsu` come from the
    // decoded OSPF header/body.
    pub(crate) fn receive_lsu(&self, ingress: &InterfaceInfo, source_router_id: Ipv4Addr, lsu: &Lsu) {
        if source_router_id == self.router_id {
            Debug::LsuDropLoopback(source_router_id).log();
            return;
        }

        let mut any_newer = false;
        let mut any_change = false;
        {
            let mut state = self.state.lock().unwrap();
            for advert in &lsu.adverts {
                let outcome = state.lsdb.ingest(advert, source_router_id, lsu.sequence);
                Debug::LsuIngestAdvert(source_router_id, advert.subnet, outcome).log();
                match outcome {
                    IngestOutcome::New | IngestOutcome::Updated => {
                        any_newer = true;
                        any_change = true;
                    }
                    IngestOutcome::Duplicate | IngestOutcome::Stale => {}
                }
            }
        }

        if any_newer {
            let ttl = lsu.ttl.saturating_sub(1);
            if ttl > 0 {
                self.reflood(ingress, ttl, source_router_id, lsu);
            }
        }

        if any_change {
            self.request_spf();
        }
    }

    // Re-floods an unmodified LSU (aside from TTL and checksum) out
    // every interface with a known neighbor except the one it arrived
    // on (spec.md §4.E step 3). `origin_router_id` is the LSU's original
    // originator, preserved on the wire so downstream peers dedupe and
    // key the LSDB under the right origin rather than under this router.
    fn reflood(&self, ingress: &InterfaceInfo, ttl: u8, origin_router_id: Ipv4Addr, lsu: &Lsu) {
        let interfaces = self.host.interfaces();
        let targets: Vec<(InterfaceInfo, Ipv4Addr)> = {
            let state = self.state.lock().unwrap();
            interfaces
                .into_iter()
                .filter(|iface| iface.name != ingress.name)
                .filter_map(|iface| {
                    state
                        .bindings
                        .get(&iface.name)
                        .and_then(|binding| binding.neighbor_ip)
                        .map(|neighbor_ip| (iface, neighbor_ip))
                })
                .collect()
        };

        for (iface, neighbor_ip) in targets {
            Debug::LsuReflood(&iface.name, ttl).log();
            let flooded = Lsu {
                sequence: lsu.sequence,
                ttl,
                adverts: lsu.adverts.clone(),
            };
            self.send_lsu(&iface, neighbor_ip, ttl, origin_router_id, flooded);
        }
    }
}
