// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use bgp_to_l3::{Config, Forwarder, DEFAULT_PLUGIN_ID, DEFAULT_WATCHER_NAME};
use bgp_watch::RouteWatcher;
use clap::Parser;
use l3_common::log::{init_file_logger, init_logger};
use slog::{error, info, Logger};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use vpp_lower::{RouteSettings, VppAgent, VppLower};

mod feed;


/// Forward BGP learned reachable routes into VPP as L3 static routes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, styles = get_styles())]
struct Cli {
    /// Base URL of the VPP agent key/value configuration endpoint.
    #[arg(long, env = "L3BGPD_VPP_AGENT", default_value = "http://localhost:9191/kv")]
    vpp_agent: String,

    /// VRF routes are installed into.
    #[arg(long, default_value_t = 0)]
    vrf_id: u32,

    /// Weight of installed routes.
    #[arg(long, default_value_t = 1)]
    weight: u32,

    /// Preference of installed routes.
    #[arg(long, default_value_t = 0)]
    preference: u32,

    /// Outgoing interface for installed routes. Left empty VPP resolves it
    /// from the next hop.
    #[arg(long, default_value = "")]
    outgoing_interface: String,

    /// Owner identity routes are installed under.
    #[arg(long, env = "L3BGPD_PLUGIN_ID", default_value = DEFAULT_PLUGIN_ID)]
    plugin_id: String,

    /// Name to register with the route watcher under.
    #[arg(long, default_value = DEFAULT_WATCHER_NAME)]
    watcher_name: String,

    /// Route feed to read, one JSON route per line. Reads stdin when omitted.
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Write bunyan logs to this file instead of stdout.
    #[arg(long, env = "L3BGPD_LOG_FILE")]
    log_file: Option<String>,
}

impl Cli {
    fn route_settings(&self) -> RouteSettings {
        RouteSettings {
            vrf_id: self.vrf_id,
            weight: self.weight,
            preference: self.preference,
            outgoing_interface: self.outgoing_interface.clone(),
        }
    }

    fn forwarder_config(&self) -> Config {
        Config {
            plugin_id: self.plugin_id.clone(),
            watcher_name: self.watcher_name.clone(),
            render: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = match &cli.log_file {
        Some(path) => init_file_logger(path)
            .with_context(|| format!("open log file {path}"))?,
        None => init_logger(),
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let reader: Box<dyn BufRead + Send> = match &cli.feed {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("open route feed {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let watcher = RouteWatcher::new(log.clone());
    let sink = VppLower::new(
        VppAgent::new(&cli.vpp_agent),
        cli.route_settings(),
        Arc::new(rt.handle().clone()),
        log.clone(),
    );
    let forwarder = Forwarder::new(
        cli.forwarder_config(),
        Arc::new(watcher.clone()),
        Arc::new(sink),
        log.clone(),
    );

    forwarder.start().context("start forwarder")?;
    info!(log, "forwarding routes to vpp agent {}", cli.vpp_agent);

    let (tx, rx) = channel::<()>();
    termination_handler(tx)?;
    spawn_feed(reader, watcher, log.clone())?;

    // Only a termination signal ends the daemon. The feed ending just means
    // no more routes are coming.
    if rx.recv().is_err() {
        error!(log, "termination channel closed");
    }
    info!(log, "shutting down");

    let result = forwarder.stop().context("stop forwarder");
    rt.shutdown_timeout(std::time::Duration::from_secs(1));
    result
}

fn spawn_feed(
    reader: Box<dyn BufRead + Send>,
    watcher: RouteWatcher,
    log: Logger,
) -> Result<()> {
    std::thread::Builder::new()
        .name("route-feed".into())
        .spawn(move || {
            let stats = feed::run_feed(reader, &watcher, &log);
            info!(log, "route feed finished";
                "announced" => stats.announced,
                "rejected" => stats.rejected
            );
        })
        .context("spawn route feed thread")?;
    Ok(())
}

fn termination_handler(tx: Sender<()>) -> Result<()> {
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .context("set termination handler")
}

/// Themed CLI help.
fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(anstyle::Style::new().bold().underline().fg_color(Some(
            anstyle::Color::Rgb(anstyle::RgbColor(245, 207, 101)),
        )))
        .literal(anstyle::Style::new().bold().fg_color(Some(
            anstyle::Color::Rgb(anstyle::RgbColor(72, 213, 151)),
        )))
        .usage(anstyle::Style::new().bold().fg_color(Some(
            anstyle::Color::Rgb(anstyle::RgbColor(245, 207, 101)),
        )))
        .error(anstyle::Style::new().bold().fg_color(Some(
            anstyle::Color::Rgb(anstyle::RgbColor(232, 104, 134)),
        )))
}
