//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Tunables named in spec.md §6. Collapsed into one struct since this
// crate has a single area and no per-interface overrides.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub area_id: u32,
    pub hello_interval: u16,
    pub neighbor_timeout: u16,
    pub lsu_refresh: u16,
    pub lsu_max_age: u32,
    pub lsu_max_hops: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            area_id: DEFAULT_AREA_ID,
            hello_interval: HELLO_INTERVAL,
            neighbor_timeout: NEIGHBOR_TIMEOUT,
            lsu_refresh: LSU_REFRESH,
            lsu_max_age: LSU_MAX_AGE,
            lsu_max_hops: LSU_MAX_HOPS,
        }
    }
}

pub const HELLO_INTERVAL: u16 = 5;

// spec.md §6's constant table defines this as `3 * HELLO_INTERVAL` (15 s),
// while §3's prose names "(default 30 s)" for the same timer. The two
// disagree; §6 is the canonical constants table, so the computed value
// wins here. Recorded in DESIGN.md.
pub const NEIGHBOR_TIMEOUT: u16 = 3 * HELLO_INTERVAL;

pub const LSU_REFRESH: u16 = 30;
pub const LSU_MAX_AGE: u32 = 60;
pub const LSU_MAX_HOPS: u8 = 64;
pub const DEFAULT_AREA_ID: u32 = 171;
pub const ADMIN_DISTANCE: u8 = 110;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_constant_table() {
        let config = Config::default();
        assert_eq!(config.hello_interval, 5);
        assert_eq!(config.neighbor_timeout, 15);
        assert_eq!(config.lsu_refresh, 30);
        assert_eq!(config.lsu_max_age, 60);
        assert_eq!(config.lsu_max_hops, 64);
        assert_eq!(config.area_id, 171);
    }
}
