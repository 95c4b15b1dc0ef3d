// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Forwards BGP learned reachable routes into the VPP L3 configuration.
//!
//! A [`Forwarder`] holds a single subscription to a route [`Watcher`]. Every
//! route the watcher reports is handed to a render function, which by
//! default logs the route and pushes it into a [`RouteSink`].
//!
//! [`Watcher`]: bgp_watch::Watcher
//! [`RouteSink`]: vpp_lower::RouteSink

pub mod error;
pub mod forwarder;
mod log;

pub use error::Error;
pub use forwarder::{
    Config, Forwarder, Render, DEFAULT_PLUGIN_ID, DEFAULT_WATCHER_NAME,
};

pub const COMPONENT_BGP_TO_L3: &str = "bgp-to-l3";
pub const MOD_FORWARDER: &str = "forwarder";
