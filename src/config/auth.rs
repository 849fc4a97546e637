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
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use super::common::default_domain_id;

/// Credentials used to open the identity API session.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSection {
    /// Identity endpoint. Either versioned (i.e. `http://keystone:5000/v3`)
    /// or the root (`http://keystone:5000`), in which case the highest stable
    /// version listed there is used.
    pub auth_url: Url,

    /// User name.
    pub username: String,

    /// User password.
    pub password: SecretString,

    /// Domain of the user (identity v3 only).
    #[serde(default = "default_domain_id")]
    pub user_domain_id: String,

    /// Name of the project to scope the token to.
    pub project_name: String,

    /// Domain of the project (identity v3 only).
    #[serde(default = "default_domain_id")]
    pub project_domain_id: String,
}
