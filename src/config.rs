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
//! # Configuration
//!
//! Parsing of the cloud configuration file (INI format):
//!
//! ```ini
//! [auth]
//! auth_url = http://keystone:5000/v3
//! username = admin
//! password = secret
//! project_name = admin
//!
//! [catalog]
//! driver = auto
//! ```
//!
//! `auth_url` may also point to the unversioned root of the identity service.
use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;
use std::path::PathBuf;

mod auth;
mod catalog;
mod common;
mod default;
mod http;

pub use auth::AuthSection;
pub use catalog::CatalogSection;
pub use default::DefaultSection;
pub use http::HttpSection;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options
    #[serde(rename = "DEFAULT", default)]
    pub default: DefaultSection,

    /// Identity API credentials.
    pub auth: AuthSection,

    /// Catalog
    #[serde(default)]
    pub catalog: CatalogSection,

    /// HTTP client
    #[serde(default)]
    pub http: HttpSection,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder
            .set_default("auth.user_domain_id", "default")?
            .set_default("auth.project_domain_id", "default")?
            .set_default("catalog.driver", "auto")?
            .set_default("http.timeout", "30")?
            .set_default("http.insecure", "false")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
