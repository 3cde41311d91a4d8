//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::net::Ipv4Addr;

use crate::interface::{InterfaceBinding, InterfaceInfo};
use crate::lsdb::LinkRecord;
use crate::route::RouteEntry;

// One pending frontier entry (spec.md §4.F, §9: replaces the source's
// ad-hoc bubble-sorted insertion stack with a standard min-heap).
// `BinaryHeap` is a max-heap, so `Ord` is reversed below; `seq` breaks
// ties by insertion order, giving the "first-settled wins" determinism
// the spec requires for equal-cost candidates.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Candidate {
    cost: u16,
    seq: u32,
    router_id: Ipv4Addr,
    next_hop: Ipv4Addr,
    egress: String,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Settled {
    next_hop: Ipv4Addr,
    egress: String,
}

// Dijkstra over the topology database rooted at `router_id` (spec.md
// §4.F). Takes a DB snapshot rather than the live database, per the
// execution discipline in spec.md §5: the caller releases `subsys_lock`
// before calling this and reacquires it only to install the result.
pub fn compute(
    router_id: Ipv4Addr,
    snapshot: &BTreeMap<(Ipv4Addr, Ipv4Addr), LinkRecord>,
    interfaces: &[InterfaceInfo],
    bindings: &HashMap<String, InterfaceBinding>,
) -> Vec<RouteEntry> {
    let mut frontier = BinaryHeap::new();
    let mut next_seq: u32 = 0;
    let mut settled: BTreeMap<Ipv4Addr, Settled> = BTreeMap::new();

    // Step 1: seed the frontier with every directly attached neighbor.
    // Attached subnets are seeded implicitly: they are never settled as
    // routers, so step 3 below never installs a route for them, and the
    // explicit subnet-suppression check covers the rest.
    for iface in interfaces {
        if !iface.enabled {
            continue;
        }
        let Some(binding) = bindings.get(&iface.name) else {
            continue;
        };
        let (Some(neighbor_router_id), Some(neighbor_ip)) = (binding.neighbor_router_id, binding.neighbor_ip) else {
            continue;
        };
        frontier.push(Candidate {
            cost: 1,
            seq: next_seq,
            router_id: neighbor_router_id,
            next_hop: neighbor_ip,
            egress: iface.name.clone(),
        });
        next_seq += 1;
    }

    // Step 2: settle the lowest-cost unsettled router repeatedly, relaxing
    // its transit links.
    while let Some(candidate) = frontier.pop() {
        if settled.contains_key(&candidate.router_id) {
            continue;
        }
        settled.insert(
            candidate.router_id,
            Settled {
                next_hop: candidate.next_hop,
                egress: candidate.egress.clone(),
            },
        );

        for record in snapshot.values().filter(|record| record.router_id == candidate.router_id) {
            if record.is_stub() || record.neighbor_router_id == router_id {
                continue;
            }
            if settled.contains_key(&record.neighbor_router_id) {
                continue;
            }
            frontier.push(Candidate {
                cost: candidate.cost + 1,
                seq: next_seq,
                router_id: record.neighbor_router_id,
                next_hop: candidate.next_hop,
                egress: candidate.egress.clone(),
            });
            next_seq += 1;
        }
    }

    // Step 3: install a route for every settled router's attached
    // subnets, skipping subnets one of our own interfaces already sits
    // on.
    let local_subnets: Vec<(Ipv4Addr, Ipv4Addr)> = interfaces
        .iter()
        .map(|iface| (Ipv4Addr::from(u32::from(iface.ip) & u32::from(iface.mask)), iface.mask))
        .collect();

    let mut routes = Vec::new();
    for (&(owner, subnet), record) in snapshot {
        let Some(path) = settled.get(&owner) else {
            continue;
        };
        if local_subnets.iter().any(|&(s, m)| s == subnet && m == record.mask) {
            continue;
        }
        routes.push(RouteEntry::owned(subnet, record.mask, path.next_hop, path.egress.clone()));
    }
    routes
}

#[cfg(test)]
mod tests {
    use maplit::hashmap;

    use super::*;
    use crate::packet::MacAddr;

    fn iface(name: &str, ip: [u8; 4]) -> InterfaceInfo {
        InterfaceInfo {
            name: name.to_string(),
            mac: MacAddr([0, 0, 0, 0, 0, 1]),
            ip: Ipv4Addr::from(ip),
            mask: Ipv4Addr::new(255, 255, 255, 254),
            enabled: true,
        }
    }

    fn binding(router_id: [u8; 4], neighbor_ip: [u8; 4]) -> InterfaceBinding {
        InterfaceBinding {
            neighbor_router_id: Some(Ipv4Addr::from(router_id)),
            neighbor_ip: Some(Ipv4Addr::from(neighbor_ip)),
            hello_countdown: 5,
        }
    }

    fn link(router: [u8; 4], subnet: [u8; 4], neighbor: [u8; 4]) -> LinkRecord {
        LinkRecord {
            router_id: Ipv4Addr::from(router),
            subnet: Ipv4Addr::from(subnet),
            mask: Ipv4Addr::new(255, 255, 255, 254),
            neighbor_router_id: Ipv4Addr::from(neighbor),
            next_hop_ip: Ipv4Addr::UNSPECIFIED,
            seq: 1,
            age_seconds: 0,
        }
    }

    // spec.md §8 scenario 4: R1-R2-R3-stub chain, cost 3 from R1.
    #[test]
    fn chain_topology_installs_route_through_intermediate_routers() {
        let root = Ipv4Addr::new(1, 1, 1, 1);
        let r2 = Ipv4Addr::new(2, 2, 2, 2);
        let r3 = Ipv4Addr::new(3, 3, 3, 3);

        let interfaces = vec![iface("eth0", [10, 0, 0, 1])];
        let bindings = hashmap! {
            "eth0".to_string() => binding([2, 2, 2, 2], [10, 0, 0, 2]),
        };

        let mut snapshot = BTreeMap::new();
        snapshot.insert((root, Ipv4Addr::new(10, 0, 0, 0)), link([1, 1, 1, 1], [10, 0, 0, 0], [2, 2, 2, 2]));
        snapshot.insert((r2, Ipv4Addr::new(10, 0, 0, 0)), link([2, 2, 2, 2], [10, 0, 0, 0], [1, 1, 1, 1]));
        snapshot.insert((r2, Ipv4Addr::new(10, 0, 1, 0)), link([2, 2, 2, 2], [10, 0, 1, 0], [3, 3, 3, 3]));
        snapshot.insert((r3, Ipv4Addr::new(10, 0, 1, 0)), link([3, 3, 3, 3], [10, 0, 1, 0], [2, 2, 2, 2]));
        snapshot.insert((r3, Ipv4Addr::new(10, 9, 9, 0)), link([3, 3, 3, 3], [10, 9, 9, 0], [0, 0, 0, 0]));

        let routes = compute(root, &snapshot, &interfaces, &bindings);

        let stub_route = routes
            .iter()
            .find(|route| route.subnet == Ipv4Addr::new(10, 9, 9, 0))
            .expect("route to the stub subnet behind R3");
        assert_eq!(stub_route.next_hop, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(stub_route.egress_iface, "eth0");

        // The subnet between R1 and R2 is one of R1's own interfaces and
        // must be suppressed.
        assert!(!routes.iter().any(|route| route.subnet == Ipv4Addr::new(10, 0, 0, 0)));
    }

    #[test]
    fn stub_links_never_seed_further_settlement() {
        let root = Ipv4Addr::new(1, 1, 1, 1);
        let r2 = Ipv4Addr::new(2, 2, 2, 2);

        let interfaces = vec![iface("eth0", [10, 0, 0, 1])];
        let bindings = hashmap! {
            "eth0".to_string() => binding([2, 2, 2, 2], [10, 0, 0, 2]),
        };

        let mut snapshot = BTreeMap::new();
        snapshot.insert((root, Ipv4Addr::new(10, 0, 0, 0)), link([1, 1, 1, 1], [10, 0, 0, 0], [2, 2, 2, 2]));
        snapshot.insert((r2, Ipv4Addr::new(10, 0, 0, 0)), link([2, 2, 2, 2], [10, 0, 0, 0], [1, 1, 1, 1]));
        snapshot.insert((r2, Ipv4Addr::new(10, 2, 0, 0)), link([2, 2, 2, 2], [10, 2, 0, 0], [0, 0, 0, 0]));

        let routes = compute(root, &snapshot, &interfaces, &bindings);
        let route = routes
            .iter()
            .find(|route| route.subnet == Ipv4Addr::new(10, 2, 0, 0))
            .expect("route to R2's stub subnet");
        assert_eq!(route.admin_distance, crate::route::ADMIN_DISTANCE);
    }
}
