//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::instance::Instance;

// Owns the periodic timers and the SPF worker (spec.md §4.G, §5). Of the
// four minimum logical threads the spec names, packet ingress is the
// host's own synchronous call into `Instance::on_packet` and has no task
// here; the other three -- the 1-second ticker (which also drives HELLO
// emission), the LSU refresh timer, and the SPF worker -- run as tokio
// tasks against the shared `Instance`.
pub struct Scheduler {
    tick: JoinHandle<()>,
    lsu_refresh: JoinHandle<()>,
    spf: JoinHandle<()>,
}

impl Scheduler {
    pub fn spawn(instance: Arc<Instance>) -> Self {
        let tick = {
            let instance = Arc::clone(&instance);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                loop {
                    interval.tick().await;
                    instance.tick();
                }
            })
        };

        let lsu_refresh = {
            let instance = Arc::clone(&instance);
            tokio::spawn(async move {
                let period = Duration::from_secs(instance.config.lsu_refresh as u64);
                let mut interval = tokio::time::interval(period);
                // The first tick fires immediately; adjacency formation
                // already originates an LSU at startup, so skip it here.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    instance.originate_lsu();
                }
            })
        };

        let spf = {
            let instance = Arc::clone(&instance);
            tokio::spawn(async move { instance.spf_worker().await })
        };

        Scheduler { tick, lsu_refresh, spf }
    }

    // Stops and joins every task (spec.md §5). In-flight `send_packet`
    // calls are synchronous and complete before the next await point, so
    // aborting between ticks never cuts one off mid-flight.
    pub async fn shutdown(self, instance: &Instance) {
        instance.shutdown();
        self.tick.abort();
        self.lsu_refresh.abort();
        let _ = self.tick.await;
        let _ = self.lsu_refresh.await;
        let _ = self.spf.await;
    }
}
