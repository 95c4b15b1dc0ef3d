// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! VPP L3 static route configuration as the agent expects it.

use crate::error::Error;
use bgp_watch::ReachableIpRoute;
use serde::{Deserialize, Serialize};

const ROUTE_KEY_PREFIX: &str = "config/vpp/v2/route";

#[derive(
    Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    #[default]
    IntraVrf,
}

/// Knobs applied to every route lowered into VPP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSettings {
    pub vrf_id: u32,
    pub weight: u32,
    pub preference: u32,
    /// Empty lets VPP resolve the interface from the next hop.
    pub outgoing_interface: String,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            vrf_id: 0,
            weight: 1,
            preference: 0,
            outgoing_interface: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticRoute {
    #[serde(rename = "type")]
    pub kind: RouteType,
    pub vrf_id: u32,
    pub dst_network: String,
    pub next_hop_addr: String,
    pub outgoing_interface: String,
    pub weight: u32,
    pub preference: u32,
    /// Identity of the plugin that owns this route.
    pub description: String,
}

impl StaticRoute {
    pub fn from_reachable(
        route: &ReachableIpRoute,
        owner: &str,
        settings: &RouteSettings,
    ) -> Result<Self, Error> {
        if !route.same_family() {
            return Err(Error::AddressFamilyMismatch(route.to_string()));
        }
        Ok(Self {
            kind: RouteType::IntraVrf,
            vrf_id: settings.vrf_id,
            dst_network: route.prefix.to_string(),
            next_hop_addr: route.nexthop.to_string(),
            outgoing_interface: settings.outgoing_interface.clone(),
            weight: settings.weight,
            preference: settings.preference,
            description: owner.to_string(),
        })
    }

    /// Key the route is stored under in the agent's configuration space.
    pub fn key(&self) -> String {
        format!(
            "{ROUTE_KEY_PREFIX}/vrf/{}/dst/{}/gw/{}",
            self.vrf_id, self.dst_network, self.next_hop_addr
        )
    }
}
