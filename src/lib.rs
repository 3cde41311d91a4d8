//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod config;
pub mod debug;
pub mod error;
pub mod flood;
pub mod hello;
pub mod instance;
pub mod interface;
pub mod lsdb;
pub mod neighbor;
pub mod packet;
pub mod route;
pub mod southbound;
pub mod spf;
pub mod tasks;

pub use config::Config;
pub use instance::Instance;
pub use southbound::{Host, RoutingTable};
pub use tasks::Scheduler;
