//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::config::Config;
use crate::debug::Debug;
use crate::interface::InterfaceBinding;
use crate::lsdb::TopologyDb;
use crate::neighbor::NeighborTable;
use crate::packet::{Body, Frame};
use crate::southbound::{Host, RoutingTable};
use crate::spf;

// The single owned subsystem value (spec.md §9): replaces the source's
// scattered globals (`nbr_head`, `topology_header`, `router_id`,
// `if_unable`). The host holds exactly one `Arc<Instance>` and drives it
// via `on_packet` and a `tasks::Scheduler`.
pub struct Instance {
    pub router_id: Ipv4Addr,
    pub config: Config,
    pub(crate) host: Arc<dyn Host>,
    pub(crate) routes: Mutex<Box<dyn RoutingTable>>,
    // subsys_lock (spec.md §5): guards the neighbor table, topology DB,
    // per-interface bindings and the sequence counter. Never held across
    // a `send_packet` call.
    pub(crate) state: Mutex<SubsysState>,
    // spf_lock (spec.md §5): serializes SPF runs and route installation.
    // Lock order is unconditional: `subsys_lock` is always acquired (and
    // released) before `spf_lock` is taken.
    spf_lock: Mutex<()>,
    spf_pending: Notify,
    stop: AtomicBool,
}

#[derive(Default)]
pub(crate) struct SubsysState {
    pub neighbors: NeighborTable,
    pub lsdb: TopologyDb,
    pub bindings: HashMap<String, InterfaceBinding>,
    pub sequence: u16,
}

impl Instance {
    pub fn new(router_id: Ipv4Addr, config: Config, host: Arc<dyn Host>, routes: Box<dyn RoutingTable>) -> Arc<Self> {
        Arc::new(Instance {
            router_id,
            config,
            host,
            routes: Mutex::new(routes),
            state: Mutex::new(SubsysState::default()),
            spf_lock: Mutex::new(()),
            spf_pending: Notify::new(),
            stop: AtomicBool::new(false),
        })
    }

    // Ingress dispatcher (spec.md §6): the host calls this for every
    // frame whose IP protocol is 89. Decode errors and area mismatches
    // are silent drops (spec.md §7).
    pub fn on_packet(&self, iface_name: &str, bytes: &[u8]) {
        let frame = match Frame::decode(bytes) {
            Ok(frame) => frame,
            Err(error) => {
                Debug::PacketDecodeError(iface_name, &error).log();
                return;
            }
        };

        if !frame.area_matches(self.config.area_id) {
            Debug::AreaMismatch(iface_name, frame.hdr.area_id).log();
            return;
        }

        let Some(ingress) = self.host.interfaces().into_iter().find(|iface| iface.name == iface_name) else {
            return;
        };
        if !ingress.enabled {
            return;
        }

        match &frame.body {
            Body::Hello(hello) => self.receive_hello(&ingress, frame.ip.src, frame.hdr.router_id, hello),
            Body::Lsu(lsu) => self.receive_lsu(&ingress, frame.hdr.router_id, lsu),
        }
    }

    // Scheduler's 1-second tick (spec.md §4.G): ages neighbors and the
    // topology DB, then drives HELLO emission countdowns.
    pub(crate) fn tick(&self) {
        let (expired, purged) = {
            let mut state = self.state.lock().unwrap();
            let expired = state.neighbors.tick();
            let purged = state.lsdb.age_tick(self.config.lsu_max_age);
            (expired, purged)
        };

        for record in &expired {
            Debug::NeighborExpired(record.router_id).log();
        }
        for record in &purged {
            Debug::LsdbPurge(record.router_id, record.subnet).log();
        }

        if !expired.is_empty() {
            // The binding that pointed at an expired neighbor is no
            // longer valid; clearing it both drops the dead adjacency
            // from the next LSU and lets a later HELLO re-form it from
            // scratch (spec.md §8 scenario 5).
            let mut state = self.state.lock().unwrap();
            for record in &expired {
                for binding in state.bindings.values_mut() {
                    if binding.neighbor_router_id == Some(record.router_id) {
                        binding.neighbor_router_id = None;
                        binding.neighbor_ip = None;
                    }
                }
            }
        }

        self.hello_tick();

        if !expired.is_empty() {
            self.originate_lsu();
        } else if !purged.is_empty() {
            self.request_spf();
        }
    }

    // Enqueues an SPF recomputation. Multiple enqueues collapse to one
    // pending run (spec.md §4.G): `Notify` coalesces wake-ups that land
    // before the worker observes them.
    pub(crate) fn request_spf(&self) {
        self.spf_pending.notify_one();
    }

    // The SPF worker's body (spec.md §5): blocks on its wake signal,
    // then runs one SPF pass per wake-up.
    pub(crate) async fn spf_worker(&self) {
        loop {
            self.spf_pending.notified().await;
            if self.stop.load(AtomicOrdering::Relaxed) {
                return;
            }
            self.run_spf();
        }
    }

    fn run_spf(&self) {
        // Snapshot under subsys_lock and release it before spf_lock is
        // ever taken (spec.md §5: subsys_lock before spf_lock, never
        // nested the other way round).
        let interfaces = self.host.interfaces();
        let (snapshot, bindings) = {
            let state = self.state.lock().unwrap();
            (state.lsdb.snapshot(), state.bindings.clone())
        };

        // spf_lock serializes both the computation and the route
        // installation below against concurrent SPF runs (spec.md §5).
        // Installation itself goes through the dedicated `routes` mutex
        // rather than reacquiring subsys_lock: §5 never lists the routing
        // table among subsys_lock's protected state (only the neighbor
        // table, topology DB, interface bindings and sequence counter),
        // and the host's routing table is borrowed, not owned by the
        // subsystem (spec.md §3). A separate mutex keeps that borrow out
        // of subsys_lock's critical section while still serializing
        // installs against each other via spf_lock.
        let _spf_guard = self.spf_lock.lock().unwrap();

        let routes = spf::compute(self.router_id, &snapshot, &interfaces, &bindings);
        Debug::SpfRun(snapshot.len(), routes.len()).log();

        let mut table = self.routes.lock().unwrap();
        table.clear_owned();
        for route in routes {
            if !table.contains(route.subnet, route.mask) {
                table.add(route);
            }
        }
    }

    // Subsystem shutdown (spec.md §5): sets the stop flag and wakes the
    // SPF worker; `tasks::Scheduler::shutdown` joins every task.
    // In-flight `send_packet` calls are allowed to complete.
    pub fn shutdown(&self) {
        self.stop.store(true, AtomicOrdering::Relaxed);
        self.spf_pending.notify_waiters();
    }
}
