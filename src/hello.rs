//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::config::Config;
use crate::debug::Debug;
use crate::instance::Instance;
use crate::interface::InterfaceInfo;
use crate::packet::eth::{ETHERTYPE_IPV4, MAC_ALL_SPF_ROUTERS};
use crate::packet::ipv4::IP_PROTO_OSPF;
use crate::packet::{Body, EthernetHeader, Frame, Hello, Ipv4Header, OspfHeader, PacketType};

// The well-known AllSPFRouters multicast IP address (spec.md §6).
pub const ALL_SPF_ROUTERS: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);

// Reasons a HELLO is rejected at reception (spec.md §4.C). Policy
// rejects; never surfaced past `Debug::log` (spec.md §7).
#[derive(Debug, Eq, PartialEq)]
enum Reject {
    Loopback,
    MaskMismatch(Ipv4Addr, Ipv4Addr),
    IntervalMismatch(u16, u16),
}

fn validate(
    local_router_id: Ipv4Addr,
    src_router_id: Ipv4Addr,
    iface_mask: Ipv4Addr,
    config: &Config,
    hello: &Hello,
) -> Result<(), Reject> {
    if src_router_id == local_router_id {
        return Err(Reject::Loopback);
    }
    if hello.network_mask != iface_mask {
        return Err(Reject::MaskMismatch(iface_mask, hello.network_mask));
    }
    if hello.hello_interval != config.hello_interval {
        return Err(Reject::IntervalMismatch(config.hello_interval, hello.hello_interval));
    }
    Ok(())
}

// Builds one HELLO frame for `iface` (spec.md §4.C): multicast dst MAC/IP,
// proto 89, TTL 1, checksummed last by `Frame::encode`.
pub(crate) fn frame(router_id: Ipv4Addr, area_id: u32, config: &Config, iface: &InterfaceInfo) -> Bytes {
    Frame::new(
        EthernetHeader {
            dst: MAC_ALL_SPF_ROUTERS,
            src: iface.mac,
            ethertype: ETHERTYPE_IPV4,
        },
        Ipv4Header {
            ttl: 1,
            protocol: IP_PROTO_OSPF,
            src: iface.ip,
            dst: ALL_SPF_ROUTERS,
            total_length: 0,
        },
        OspfHeader {
            pkt_type: PacketType::Hello,
            router_id,
            area_id,
        },
        Body::Hello(Hello {
            network_mask: iface.mask,
            hello_interval: config.hello_interval,
        }),
    )
    .encode()
}

impl Instance {
    // Scheduler's 1-second tick drives this per interface (spec.md §4.C,
    // §4.G): a disabled interface is skipped without decrementing its
    // countdown.
    pub(crate) fn hello_tick(&self) {
        let interfaces = self.host.interfaces();
        let mut due = Vec::new();
        {
            let mut state = self.state.lock().unwrap();
            for iface in &interfaces {
                if !iface.enabled {
                    continue;
                }
                let binding = state.bindings.entry(iface.name.clone()).or_insert_with(|| crate::interface::InterfaceBinding {
                    hello_countdown: self.config.hello_interval,
                    ..Default::default()
                });
                binding.hello_countdown = binding.hello_countdown.saturating_sub(1);
                if binding.hello_countdown == 0 {
                    binding.hello_countdown = self.config.hello_interval;
                    due.push(iface.clone());
                }
            }
        }

        for iface in due {
            self.send_hello(&iface);
        }
    }

    fn send_hello(&self, iface: &InterfaceInfo) {
        let bytes = frame(self.router_id, self.config.area_id, &self.config, iface);
        match self.host.send_packet(&iface.name, bytes) {
            Ok(()) => Debug::HelloTx(&iface.name).log(),
            Err(source) => {
                crate::error::Error {
                    iface: iface.name.clone(),
                    source,
                }
                .log();
            }
        }
    }

    // HELLO reception (spec.md §4.C). `ingress` is the interface it
    // arrived on; `ip_src`/`router_id`/`hello` come from the decoded
    // frame.
    pub(crate) fn receive_hello(&self, ingress: &InterfaceInfo, ip_src: Ipv4Addr, router_id: Ipv4Addr, hello: &Hello) {
        if let Err(reject) = validate(self.router_id, router_id, ingress.mask, &self.config, hello) {
            match reject {
                Reject::Loopback => Debug::HelloRxSelf(&ingress.name).log(),
                Reject::MaskMismatch(expected, got) => Debug::HelloRxMaskMismatch(&ingress.name, expected, got).log(),
                Reject::IntervalMismatch(expected, got) => {
                    Debug::HelloRxIntervalMismatch(&ingress.name, expected, got).log();
                }
            }
            return;
        }

        let adjacency_changed = {
            let mut state = self.state.lock().unwrap();
            let binding = state.bindings.entry(ingress.name.clone()).or_default();
            let changed = binding.neighbor_router_id != Some(router_id);
            binding.neighbor_router_id = Some(router_id);
            binding.neighbor_ip = Some(ip_src);
            state.neighbors.refresh(router_id, ip_src, self.config.neighbor_timeout);
            changed
        };
        Debug::HelloRxAccept(&ingress.name, router_id).log();

        if adjacency_changed {
            Debug::AdjacencyChange(&ingress.name, router_id).log();
            self.originate_lsu();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hello() -> Hello {
        Hello {
            network_mask: Ipv4Addr::new(255, 255, 255, 254),
            hello_interval: 5,
        }
    }

    #[test]
    fn accepts_a_valid_hello() {
        let config = Config::default();
        let result = validate(
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(2, 2, 2, 2),
            Ipv4Addr::new(255, 255, 255, 254),
            &config,
            &sample_hello(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_self_sourced_hello() {
        let config = Config::default();
        let result = validate(
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(255, 255, 255, 254),
            &config,
            &sample_hello(),
        );
        assert_eq!(result, Err(Reject::Loopback));
    }

    #[test]
    fn rejects_mask_mismatch() {
        let config = Config::default();
        let result = validate(
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(2, 2, 2, 2),
            Ipv4Addr::new(255, 255, 255, 0),
            &config,
            &sample_hello(),
        );
        assert_eq!(
            result,
            Err(Reject::MaskMismatch(Ipv4Addr::new(255, 255, 255, 0), Ipv4Addr::new(255, 255, 255, 254)))
        );
    }

    #[test]
    fn rejects_interval_mismatch() {
        let config = Config::default();
        let mut hello = sample_hello();
        hello.hello_interval = 10;
        let result = validate(
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(2, 2, 2, 2),
            Ipv4Addr::new(255, 255, 255, 254),
            &config,
            &hello,
        );
        assert_eq!(result, Err(Reject::IntervalMismatch(5, 10)));
    }

    #[test]
    fn builds_a_well_formed_hello_frame() {
        let config = Config::default();
        let iface = InterfaceInfo {
            name: "eth0".to_string(),
            mac: crate::packet::MacAddr([0, 0x11, 0x22, 0x33, 0x44, 0x55]),
            ip: Ipv4Addr::new(10, 0, 0, 1),
            mask: Ipv4Addr::new(255, 255, 255, 254),
            enabled: true,
        };
        let bytes = frame(Ipv4Addr::new(1, 1, 1, 1), config.area_id, &config, &iface);
        let decoded = Frame::decode(&bytes).unwrap();
        assert_eq!(decoded.eth.dst, MAC_ALL_SPF_ROUTERS);
        assert_eq!(decoded.ip.dst, ALL_SPF_ROUTERS);
        assert_eq!(decoded.ip.ttl, 1);
        match decoded.body {
            Body::Hello(hello) => {
                assert_eq!(hello.network_mask, iface.mask);
                assert_eq!(hello.hello_interval, config.hello_interval);
            }
            _ => panic!("expected a HELLO body"),
        }
    }
}
