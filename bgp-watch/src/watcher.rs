// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::log::watch_log;
use crate::types::ReachableIpRoute;
use l3_common::{read_lock, write_lock};
use slog::Logger;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, RwLock};

/// Function invoked once for every reachable route a watcher learns about.
/// It may be called from a thread other than the one that registered it.
pub type RouteCallback = Arc<dyn Fn(&ReachableIpRoute) + Send + Sync>;

/// A source of reachable IP route notifications.
pub trait Watcher: Send + Sync {
    /// Register `callback` to be notified of any newly learned IP-based
    /// routes. `watcher` names the subscriber for logging and attribution
    /// only; it is not used to deduplicate registrations.
    fn watch_ip_routes(
        &self,
        watcher: &str,
        callback: RouteCallback,
    ) -> Result<Box<dyn WatchRegistration>, Error>;
}

/// An active subscription. A failed cancel leaves the handle usable, so the
/// holder can keep it and cancel again later.
pub trait WatchRegistration: Send {
    /// Stop delivering notifications to the registered callback. Must not
    /// call back into the subscriber.
    fn cancel(&self) -> Result<(), Error>;
}

#[derive(Clone)]
struct Subscriber {
    id: u64,
    watcher: String,
    sender: Sender<ReachableIpRoute>,
}

/// In-process watch source. Every subscription gets its own delivery thread
/// so a slow callback only delays its own notifications.
#[derive(Clone)]
pub struct RouteWatcher {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<AtomicU64>,
    log: Logger,
}

impl RouteWatcher {
    pub fn new(log: Logger) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            log,
        }
    }

    /// Hand `route` to every current subscriber. Returns how many
    /// subscribers accepted it.
    pub fn announce(&self, route: &ReachableIpRoute) -> usize {
        let mut delivered = 0;
        for Subscriber {
            id,
            watcher,
            sender,
        } in read_lock!(self.subscribers).iter()
        {
            match sender.send(route.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => watch_log!(self.log,
                    error,
                    "failed to send route to watcher '{}': {e}", watcher;
                    "registration" => *id,
                    "route" => route.to_string()
                ),
            }
        }
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscribers(&self) -> usize {
        read_lock!(self.subscribers).len()
    }

    pub(crate) fn unsubscribe(&self, id: u64) -> Result<(), Error> {
        let mut subscribers = write_lock!(self.subscribers);
        let Some(pos) = subscribers.iter().position(|s| s.id == id) else {
            return Err(Error::UnknownRegistration(id));
        };
        // Dropping the sender ends the delivery thread once it has drained
        // whatever was already queued.
        let removed = subscribers.remove(pos);
        watch_log!(self.log,
            info,
            "watcher '{}' unsubscribed", removed.watcher;
            "registration" => id
        );
        Ok(())
    }
}

impl Watcher for RouteWatcher {
    fn watch_ip_routes(
        &self,
        watcher: &str,
        callback: RouteCallback,
    ) -> Result<Box<dyn WatchRegistration>, Error> {
        if watcher.trim().is_empty() {
            return Err(Error::InvalidWatcher(watcher.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = channel::<ReachableIpRoute>();

        let log = self.log.clone();
        let name = watcher.to_string();
        std::thread::Builder::new()
            .name(format!("route-watch-{id}"))
            .spawn(move || {
                for route in rx.iter() {
                    let result =
                        catch_unwind(AssertUnwindSafe(|| callback(&route)));
                    if result.is_err() {
                        watch_log!(log,
                            error,
                            "watcher '{}' callback panicked", name;
                            "registration" => id,
                            "route" => route.to_string()
                        );
                    }
                }
                watch_log!(log,
                    debug,
                    "delivery for watcher '{}' finished", name;
                    "registration" => id
                );
            })
            .map_err(|e| Error::Spawn(e.to_string()))?;

        write_lock!(self.subscribers).push(Subscriber {
            id,
            watcher: watcher.to_string(),
            sender: tx,
        });

        watch_log!(self.log,
            info,
            "watcher '{}' subscribed to ip routes", watcher;
            "registration" => id
        );

        Ok(Box::new(RouteWatchRegistration {
            id,
            source: self.clone(),
        }))
    }
}

struct RouteWatchRegistration {
    id: u64,
    source: RouteWatcher,
}

impl WatchRegistration for RouteWatchRegistration {
    fn cancel(&self) -> Result<(), Error> {
        self.source.unsubscribe(self.id)
    }
}
