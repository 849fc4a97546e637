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

use std::fmt;
use std::str::FromStr;

use crate::catalog::error::CatalogProviderError;

/// Identity API version (`major.minor`).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
}

impl ApiVersion {
    /// Identity API v2.0.
    pub const V2_0: ApiVersion = ApiVersion::new(2, 0);
    /// Identity API v3.0, the first version with interface-scoped endpoints.
    pub const V3_0: ApiVersion = ApiVersion::new(3, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parse the version identifier as reported by the version document (`v3.14`,
/// `v2.0`) or as written in the configuration (`3`).
impl FromStr for ApiVersion {
    type Err = CatalogProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogProviderError::VersionDiscovery(format!("invalid version `{s}`"));
        let raw = s.trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);
        let (major, minor) = raw.split_once('.').unwrap_or((raw, "0"));
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}
