// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("watch error: {0}")]
    Watch(#[from] bgp_watch::Error),

    #[error("forwarder already registered with the watcher")]
    AlreadyRegistered,

    #[error("forwarder is not registered with the watcher")]
    NotRegistered,
}
