// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid watcher identity {0:?}")]
    InvalidWatcher(String),

    #[error("unknown registration {0}")]
    UnknownRegistration(u64),

    #[error("failed to spawn delivery thread: {0}")]
    Spawn(String),
}
