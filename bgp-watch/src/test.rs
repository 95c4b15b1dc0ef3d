// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    Error, Prefix, Prefix4, ReachableIpRoute, RouteCallback, RouteWatcher,
    Watcher,
};
use l3_common::log::test_logger;
use l3_common::wait_for_eq;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

fn route(prefix: &str, nexthop: &str) -> ReachableIpRoute {
    ReachableIpRoute::new(
        65001,
        prefix.parse().expect("prefix"),
        nexthop.parse().expect("nexthop"),
    )
}

fn recorder() -> (RouteCallback, Arc<Mutex<Vec<ReachableIpRoute>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let cb: RouteCallback = Arc::new(move |r: &ReachableIpRoute| {
        s.lock().unwrap().push(r.clone());
    });
    (cb, seen)
}

#[test]
fn prefix_parse_zeroes_host_bits() {
    let p: Prefix = "10.0.0.77/24".parse().expect("parse prefix");
    assert_eq!(p, Prefix4::new(Ipv4Addr::new(10, 0, 0, 0), 24).into());
    assert_eq!(p.to_string(), "10.0.0.0/24");

    let p6: Prefix = "fd00:1::1/64".parse().expect("parse prefix6");
    assert_eq!(p6.to_string(), "fd00:1::/64");

    assert!("10.0.0.0/33".parse::<Prefix>().is_err());
    assert!("10.0.0.0".parse::<Prefix>().is_err());
    assert!("fd00::/129".parse::<Prefix>().is_err());
}

#[test]
fn route_display_and_json() {
    let r = route("10.0.0.0/24", "192.168.1.1");
    assert_eq!(r.to_string(), "10.0.0.0/24 via 192.168.1.1");
    assert!(r.same_family());

    let json = r#"{"asn":65001,"prefix":"10.0.0.0/24","nexthop":"192.168.1.1"}"#;
    let parsed: ReachableIpRoute =
        serde_json::from_str(json).expect("parse route json");
    assert_eq!(parsed, r);
    assert_eq!(serde_json::to_string(&r).expect("route to json"), json);

    let mixed = route("10.0.0.0/24", "fd00::1");
    assert!(!mixed.same_family());
}

#[test]
fn announce_reaches_every_subscriber() {
    let w = RouteWatcher::new(test_logger());
    let (cb0, seen0) = recorder();
    let (cb1, seen1) = recorder();

    let _r0 = w.watch_ip_routes("a", cb0).expect("watch a");
    let _r1 = w.watch_ip_routes("a", cb1).expect("watch a again");
    assert_eq!(w.subscribers(), 2);

    let r = route("10.0.0.0/24", "192.168.1.1");
    assert_eq!(w.announce(&r), 2);

    wait_for_eq!(seen0.lock().unwrap().len(), 1);
    wait_for_eq!(seen1.lock().unwrap().len(), 1);
    assert_eq!(seen0.lock().unwrap()[0], r);
    assert_eq!(seen1.lock().unwrap()[0], r);
}

#[test]
fn routes_delivered_in_order() {
    let w = RouteWatcher::new(test_logger());
    let (cb, seen) = recorder();
    let _reg = w.watch_ip_routes("ordered", cb).expect("watch");

    let routes: Vec<ReachableIpRoute> = (1..=5)
        .map(|i| route(&format!("10.{i}.0.0/16"), "192.168.1.1"))
        .collect();
    for r in &routes {
        w.announce(r);
    }

    wait_for_eq!(seen.lock().unwrap().len(), routes.len());
    assert_eq!(*seen.lock().unwrap(), routes);
}

#[test]
fn cancel_stops_delivery() {
    let w = RouteWatcher::new(test_logger());
    let (cb, seen) = recorder();
    let reg = w.watch_ip_routes("cancel", cb).expect("watch");

    w.announce(&route("10.0.0.0/24", "192.168.1.1"));
    wait_for_eq!(seen.lock().unwrap().len(), 1);

    reg.cancel().expect("cancel");
    assert_eq!(w.subscribers(), 0);
    assert_eq!(reg.cancel(), Err(Error::UnknownRegistration(1)));
    assert_eq!(w.announce(&route("10.1.0.0/24", "192.168.1.1")), 0);

    std::thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn panicking_callback_keeps_subscription() {
    let w = RouteWatcher::new(test_logger());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let cb: RouteCallback = Arc::new(move |r: &ReachableIpRoute| {
        if r.asn == 666 {
            panic!("bad route");
        }
        s.lock().unwrap().push(r.clone());
    });
    let _reg = w.watch_ip_routes("panicky", cb).expect("watch");

    let mut bad = route("10.0.0.0/24", "192.168.1.1");
    bad.asn = 666;
    let good = route("10.1.0.0/24", "192.168.1.1");
    w.announce(&bad);
    w.announce(&good);

    wait_for_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(seen.lock().unwrap()[0], good);
    assert_eq!(w.subscribers(), 1);
}

#[test]
fn empty_identity_rejected() {
    let w = RouteWatcher::new(test_logger());
    let (cb, _seen) = recorder();
    match w.watch_ip_routes("  ", cb) {
        Err(e) => assert_eq!(e, Error::InvalidWatcher("  ".into())),
        Ok(_) => panic!("empty watcher identity accepted"),
    }
    assert_eq!(w.subscribers(), 0);
}

#[test]
fn cancel_of_removed_registration_errors() {
    let w = RouteWatcher::new(test_logger());
    let (cb, _seen) = recorder();
    let reg = w.watch_ip_routes("twice", cb.clone()).expect("watch");
    let other = w.watch_ip_routes("other", cb).expect("watch other");

    // Remove the first subscription out from under its handle.
    w.unsubscribe(1).expect("unsubscribe");
    assert_eq!(reg.cancel(), Err(Error::UnknownRegistration(1)));
    other.cancel().expect("cancel other");
}
