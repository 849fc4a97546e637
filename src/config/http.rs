// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
use serde::Deserialize;
use std::time::Duration;

use super::common::default_timeout;

/// HTTP client options.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpSection {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip verification of the server TLS certificate.
    #[serde(default)]
    pub insecure: bool,
}

impl HttpSection {
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
        }
    }
}
