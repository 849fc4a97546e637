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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BuilderError;

/// The interface type, which describes the visibility of the endpoint.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// Visible by end users on a publicly available network interface.
    Public,
    /// Visible by end users on an unmetered internal network interface.
    Internal,
    /// Visible by administrative users on a secure network interface.
    Admin,
}

impl Interface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            other => Err(format!(
                "invalid interface `{other}`, expected one of: public, internal, admin"
            )),
        }
    }
}

/// Endpoint as exposed by the identity API v3.
///
/// A single URL tagged with the interface it serves.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct V3Endpoint {
    /// The ID of the endpoint.
    pub id: String,
    /// The UUID of the service to which the endpoint belongs.
    pub service_id: String,
    /// The interface type.
    pub interface: Interface,
    /// The endpoint URL.
    pub url: String,
    /// The ID of the region that contains the service endpoint.
    #[builder(default)]
    pub region: Option<String>,
    /// Indicates whether the endpoint appears in the service catalog.
    #[builder(default = "true")]
    pub enabled: bool,
}

/// Endpoint as exposed by the legacy identity API v2.0.
///
/// One object carries the public, internal and admin URLs of the service in
/// the region.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct V2Endpoint {
    /// The ID of the endpoint.
    pub id: String,
    /// The UUID of the service to which the endpoint belongs.
    pub service_id: String,
    /// The region of the endpoint.
    #[builder(default)]
    pub region: Option<String>,
    /// Public URL.
    #[builder(default)]
    pub public_url: Option<String>,
    /// Internal URL.
    #[builder(default)]
    pub internal_url: Option<String>,
    /// Admin URL.
    #[builder(default)]
    pub admin_url: Option<String>,
    /// Indicates whether the endpoint appears in the service catalog.
    #[builder(default = "true")]
    pub enabled: bool,
}

/// Endpoint of a service in the catalog.
///
/// The variant tells which schema the remote object follows.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    V2(V2Endpoint),
    V3(V3Endpoint),
}

impl Endpoint {
    pub fn id(&self) -> &str {
        match self {
            Self::V2(ep) => &ep.id,
            Self::V3(ep) => &ep.id,
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Self::V2(ep) => ep.region.as_deref(),
            Self::V3(ep) => ep.region.as_deref(),
        }
    }
}

impl From<V2Endpoint> for Endpoint {
    fn from(value: V2Endpoint) -> Self {
        Self::V2(value)
    }
}

impl From<V3Endpoint> for Endpoint {
    fn from(value: V3Endpoint) -> Self {
        Self::V3(value)
    }
}

/// Endpoint search filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct EndpointListParameters {
    /// Filters the response by a service ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Filters the response by an interface.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<Interface>,
}

/// Endpoint creation data.
///
/// Either `interface` with `url` (v3), or any of the legacy `*_url`
/// attributes (v2.0) are expected to be set.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct EndpointCreate {
    pub service_id: String,
    #[builder(default)]
    pub interface: Option<Interface>,
    #[builder(default)]
    pub url: Option<String>,
    #[builder(default)]
    pub region: Option<String>,
    #[builder(default = "true")]
    pub enabled: bool,
    #[builder(default)]
    pub public_url: Option<String>,
    #[builder(default)]
    pub internal_url: Option<String>,
    #[builder(default)]
    pub admin_url: Option<String>,
}

impl EndpointCreate {
    /// Legacy URLs paired with the interface they are published on.
    pub fn legacy_urls(&self) -> impl Iterator<Item = (Interface, &str)> {
        [
            (Interface::Public, &self.public_url),
            (Interface::Internal, &self.internal_url),
            (Interface::Admin, &self.admin_url),
        ]
        .into_iter()
        .filter_map(|(interface, url)| url.as_deref().map(|url| (interface, url)))
    }
}

/// Endpoint update data.
///
/// Only the identity API v3 is able to update endpoints and only these
/// attributes can be changed.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct EndpointUpdate {
    #[builder(default)]
    pub url: Option<String>,
    #[builder(default)]
    pub interface: Option<Interface>,
    #[builder(default)]
    pub region: Option<String>,
}
