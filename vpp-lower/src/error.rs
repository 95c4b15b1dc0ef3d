// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("vpp agent request error {0}")]
    Http(#[from] reqwest::Error),

    #[error("vpp agent returned {0}: {1}")]
    AgentStatus(u16, String),

    #[error("address family mismatch {0}")]
    AddressFamilyMismatch(String),
}
