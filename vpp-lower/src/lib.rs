// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lowers reachable routes into VPP as L3 static routes.

use bgp_watch::ReachableIpRoute;
use slog::Logger;
use std::sync::Arc;

pub mod error;
mod log;
pub mod platform;
pub mod route;

pub use error::Error;
pub use platform::{Vpp, VppAgent};
pub use route::{RouteSettings, RouteType, StaticRoute};

use crate::log::vpp_log;


pub const COMPONENT_VPP_LOWER: &str = "vpp-lower";
pub const MOD_SYNC: &str = "sync";
pub const UNIT_VPP: &str = "vpp";

/// Anything that reachable routes can be pushed into.
pub trait RouteSink: Send + Sync {
    /// Install `route` on behalf of `owner`. The owner identity is carried
    /// through to the forwarding plane for attribution.
    fn push(&self, route: &ReachableIpRoute, owner: &str) -> Result<(), Error>;
}

/// Convert `route` to a VPP static route and write it through `vpp`. Blocks
/// the calling thread on `rt`, so this must not be called from within an
/// async context.
pub fn send_static_route_to_vpp<V: Vpp>(
    vpp: &V,
    route: &ReachableIpRoute,
    owner: &str,
    settings: &RouteSettings,
    rt: &tokio::runtime::Handle,
    log: &Logger,
) -> Result<(), Error> {
    let sr = StaticRoute::from_reachable(route, owner, settings)?;
    let key = sr.key();
    rt.block_on(async { vpp.put_static_route(&key, &sr).await })?;
    vpp_log!(log,
        debug,
        "installed static route {}", route;
        "key" => key,
        "owner" => owner.to_string()
    );
    Ok(())
}

/// The production route sink: every pushed route becomes one static route
/// write to VPP.
pub struct VppLower<V: Vpp> {
    vpp: V,
    settings: RouteSettings,
    rt: Arc<tokio::runtime::Handle>,
    log: Logger,
}

impl<V: Vpp> VppLower<V> {
    pub fn new(
        vpp: V,
        settings: RouteSettings,
        rt: Arc<tokio::runtime::Handle>,
        log: Logger,
    ) -> Self {
        Self {
            vpp,
            settings,
            rt,
            log,
        }
    }
}

impl<V: Vpp + Send + Sync> RouteSink for VppLower<V> {
    fn push(&self, route: &ReachableIpRoute, owner: &str) -> Result<(), Error> {
        send_static_route_to_vpp(
            &self.vpp,
            route,
            owner,
            &self.settings,
            &self.rt,
            &self.log,
        )
    }
}
