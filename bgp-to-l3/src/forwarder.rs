// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::log::fwd_log;
use bgp_watch::{ReachableIpRoute, RouteCallback, WatchRegistration, Watcher};
use l3_common::lock;
use slog::Logger;
use std::fmt;
use std::sync::{Arc, Mutex};
use vpp_lower::RouteSink;

/// Identity the forwarder pushes routes under unless configured otherwise.
pub const DEFAULT_PLUGIN_ID: &str = "bgp-to-l3-plugin";

/// Identity the forwarder subscribes to the watcher with unless configured
/// otherwise.
pub const DEFAULT_WATCHER_NAME: &str = "BGP-VPP Ligato plugin";

/// Renders a single reachable route into the forwarding plane. Errors are
/// logged by the forwarder and never end the subscription.
pub type Render =
    Arc<dyn Fn(&ReachableIpRoute) -> anyhow::Result<()> + Send + Sync>;

#[derive(Clone)]
pub struct Config {
    /// Owner identity passed to the route sink with every route.
    pub plugin_id: String,

    /// Name the forwarder registers with the watcher under.
    pub watcher_name: String,

    /// Render function to run for every route. When `None` the forwarder
    /// logs the route at debug level and pushes it into its sink.
    pub render: Option<Render>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
            watcher_name: DEFAULT_WATCHER_NAME.to_string(),
            render: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("plugin_id", &self.plugin_id)
            .field("watcher_name", &self.watcher_name)
            .field("render", &self.render.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Bridges route notifications from a watcher into a route sink.
pub struct Forwarder {
    config: Config,
    watcher: Arc<dyn Watcher>,
    sink: Arc<dyn RouteSink>,
    registration: Mutex<Option<Box<dyn WatchRegistration>>>,
    log: Logger,
}

impl Forwarder {
    pub fn new(
        config: Config,
        watcher: Arc<dyn Watcher>,
        sink: Arc<dyn RouteSink>,
        log: Logger,
    ) -> Self {
        Self {
            config,
            watcher,
            sink,
            registration: Mutex::new(None),
            log,
        }
    }

    /// Register with the watcher. Every route reported from here on runs
    /// through the configured render function.
    ///
    /// The registration lock is not held while subscribing, so a watcher may
    /// deliver routes from inside `watch_ip_routes`.
    pub fn start(&self) -> Result<(), Error> {
        if self.is_registered() {
            return Err(Error::AlreadyRegistered);
        }

        let render = self
            .config
            .render
            .clone()
            .unwrap_or_else(|| self.default_render());

        let log = self.log.clone();
        let callback: RouteCallback =
            Arc::new(move |route: &ReachableIpRoute| {
                if let Err(e) = render(route) {
                    fwd_log!(log,
                        error,
                        "failed to send route {} to vpp: {e:#}", route;
                        "route" => route.to_string(),
                        "error" => format!("{e:#}")
                    );
                }
            });

        let reg = self
            .watcher
            .watch_ip_routes(&self.config.watcher_name, callback)?;

        let mut registration = lock!(self.registration);
        if registration.is_some() {
            // A concurrent start won; drop our subscription.
            drop(registration);
            if let Err(e) = reg.cancel() {
                fwd_log!(self.log,
                    error,
                    "failed to cancel duplicate registration: {e}";
                    "watcher" => self.config.watcher_name.clone()
                );
            }
            return Err(Error::AlreadyRegistered);
        }
        *registration = Some(reg);
        drop(registration);

        fwd_log!(self.log,
            info,
            "initialization of the bgp-to-l3 forwarder has completed";
            "watcher" => self.config.watcher_name.clone(),
            "plugin" => self.config.plugin_id.clone()
        );
        Ok(())
    }

    /// Cancel the watcher registration. When cancelling fails the
    /// registration is kept, the forwarder stays registered, and the error is
    /// returned.
    pub fn stop(&self) -> Result<(), Error> {
        let mut registration = lock!(self.registration);
        let reg = registration.as_ref().ok_or(Error::NotRegistered)?;
        reg.cancel()?;
        *registration = None;
        drop(registration);

        fwd_log!(self.log,
            info,
            "forwarder stopped receiving route notifications";
            "watcher" => self.config.watcher_name.clone()
        );
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        lock!(self.registration).is_some()
    }

    fn default_render(&self) -> Render {
        let sink = self.sink.clone();
        let owner = self.config.plugin_id.clone();
        let log = self.log.clone();
        Arc::new(move |route: &ReachableIpRoute| -> anyhow::Result<()> {
            fwd_log!(log,
                debug,
                "send static route to vpp {}", route;
                "asn" => route.asn
            );
            sink.push(route, &owner)?;
            Ok(())
        })
    }
}
