// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notifications for reachable IP routes learned over BGP.
//!
//! A [`Watcher`] hands every newly learned [`ReachableIpRoute`] to the
//! callbacks registered with it. [`RouteWatcher`] is the in-process
//! implementation a BGP speaker (or a route feed) announces into.

pub mod error;
mod log;
pub mod types;
pub mod watcher;

pub use error::Error;
pub use types::*;
pub use watcher::{
    RouteCallback, RouteWatcher, WatchRegistration, Watcher,
};

pub const COMPONENT_BGP_WATCH: &str = "bgp-watch";
pub const MOD_WATCHER: &str = "watcher";

#[cfg(test)]
mod test;
