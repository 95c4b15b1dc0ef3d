// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traits that decouple vpp-lower from the VPP agent it talks to. This lets
//! the lowering logic be tested without a running agent.

use crate::error::Error;
use crate::route::StaticRoute;

/// This trait wraps the VPP agent calls vpp-lower uses.
#[allow(async_fn_in_trait)]
pub trait Vpp {
    async fn put_static_route(
        &self,
        key: &str,
        route: &StaticRoute,
    ) -> Result<(), Error>;
}

/// Production VPP implementation that writes configuration through the
/// agent's key/value HTTP endpoint.
pub struct VppAgent {
    client: reqwest::Client,
    base: String,
}

impl VppAgent {
    pub fn new(base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base, key.trim_start_matches('/'))
    }
}

impl Vpp for VppAgent {
    async fn put_static_route(
        &self,
        key: &str,
        route: &StaticRoute,
    ) -> Result<(), Error> {
        let resp = self
            .client
            .put(self.url_for(key))
            .json(route)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::AgentStatus(status.as_u16(), body));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::Vpp;
    use crate::error::Error;
    use crate::route::StaticRoute;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// A stateful mock VPP agent. Carries just enough state to be useful for
    /// tests.
    #[derive(Default)]
    pub(crate) struct TestVpp {
        pub(crate) routes: Mutex<BTreeMap<String, StaticRoute>>,
        pub(crate) puts: Mutex<usize>,
        /// When set, every put fails with this status and body.
        pub(crate) fail_with: Mutex<Option<(u16, String)>>,
    }

    impl Vpp for TestVpp {
        async fn put_static_route(
            &self,
            key: &str,
            route: &StaticRoute,
        ) -> Result<(), Error> {
            *self.puts.lock().unwrap() += 1;
            if let Some((code, body)) = self.fail_with.lock().unwrap().clone()
            {
                return Err(Error::AgentStatus(code, body));
            }
            self.routes
                .lock()
                .unwrap()
                .insert(key.to_string(), route.clone());
            Ok(())
        }
    }
}
