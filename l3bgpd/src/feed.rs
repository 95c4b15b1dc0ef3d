// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Route feed: newline delimited JSON reachable routes announced into a
//! [`RouteWatcher`].

use bgp_watch::{ReachableIpRoute, RouteWatcher};
use slog::{debug, error, warn, Logger};
use std::io::BufRead;

const UNIT_FEED: &str = "feed";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FeedStats {
    pub(crate) announced: usize,
    pub(crate) rejected: usize,
}

pub(crate) fn run_feed<R: BufRead>(
    reader: R,
    watcher: &RouteWatcher,
    log: &Logger,
) -> FeedStats {
    let mut stats = FeedStats::default();
    for (n, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(log, "route feed read error: {e}"; "unit" => UNIT_FEED);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<ReachableIpRoute>(line) {
            Ok(route) => {
                let delivered = watcher.announce(&route);
                debug!(log, "announced {route}";
                    "unit" => UNIT_FEED,
                    "subscribers" => delivered
                );
                stats.announced += 1;
            }
            Err(e) => {
                warn!(log, "skipping malformed route on line {}: {e}", n + 1;
                    "unit" => UNIT_FEED
                );
                stats.rejected += 1;
            }
        }
    }
    stats
}
