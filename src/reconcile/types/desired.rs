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
//! Desired state of the endpoint.
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::catalog::{EndpointCreate, Interface};
use crate::error::BuilderError;
use crate::reconcile::error::ReconcileError;

/// Target state of the endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointState {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for EndpointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

impl FromStr for EndpointState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!(
                "invalid state `{other}`, expected one of: present, absent"
            )),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Raw endpoint parameters as supplied by the caller.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
#[validate(schema(function = "validate_url_schema"))]
pub struct EndpointParameters {
    /// Name of the service.
    #[validate(length(min = 1, max = 255))]
    pub service_name: String,

    /// Type of the service.
    #[validate(length(min = 1, max = 255))]
    pub service_type: String,

    /// Interface of the endpoint (identity API v3).
    #[builder(default)]
    #[serde(default)]
    pub interface: Option<Interface>,

    /// URL of the endpoint (identity API v3).
    #[builder(default)]
    #[serde(default)]
    pub url: Option<String>,

    /// Public URL (identity API v2.0).
    #[builder(default)]
    #[serde(default)]
    pub public_url: Option<String>,

    /// Internal URL (identity API v2.0).
    #[builder(default)]
    #[serde(default)]
    pub internal_url: Option<String>,

    /// Admin URL (identity API v2.0).
    #[builder(default)]
    #[serde(default)]
    pub admin_url: Option<String>,

    /// Region of the endpoint.
    #[builder(default)]
    #[serde(default)]
    pub region: Option<String>,

    #[builder(default = "true")]
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[builder(default)]
    #[serde(default)]
    pub state: EndpointState,
}

impl EndpointParameters {
    fn has_legacy_url(&self) -> bool {
        self.public_url.is_some() || self.internal_url.is_some() || self.admin_url.is_some()
    }
}

fn validate_url_schema(params: &EndpointParameters) -> Result<(), ValidationError> {
    if params.url.is_none() && !params.has_legacy_url() {
        return Err(ValidationError::new("required_one_of").with_message(
            "one of the following is required: url, admin_url, internal_url, public_url".into(),
        ));
    }
    if params.url.is_some() && params.has_legacy_url() {
        return Err(ValidationError::new("mutually_exclusive").with_message(
            "url is mutually exclusive with admin_url, internal_url and public_url".into(),
        ));
    }
    if params.url.is_some() != params.interface.is_some() {
        return Err(ValidationError::new("required_together")
            .with_message("interface and url must be specified together".into()));
    }
    Ok(())
}

/// Endpoint URLs in one of the two schemas.
#[derive(Clone, Debug, PartialEq)]
pub enum EndpointUrls {
    /// Legacy schema with up to three URLs in one endpoint.
    V2 {
        public_url: Option<String>,
        internal_url: Option<String>,
        admin_url: Option<String>,
    },
    /// Single URL tagged with the interface.
    V3 { interface: Interface, url: String },
}

/// Validated desired state of the endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointDesired {
    pub service_name: String,
    pub service_type: String,
    pub urls: EndpointUrls,
    pub region: Option<String>,
    pub enabled: bool,
    pub state: EndpointState,
}

impl EndpointDesired {
    /// Interface of the endpoint when the v3 schema is used.
    pub fn interface(&self) -> Option<Interface> {
        match &self.urls {
            EndpointUrls::V3 { interface, .. } => Some(*interface),
            EndpointUrls::V2 { .. } => None,
        }
    }

    /// Endpoint creation data for the service.
    pub fn to_create<S: Into<String>>(&self, service_id: S) -> EndpointCreate {
        let mut create = EndpointCreate {
            service_id: service_id.into(),
            region: self.region.clone(),
            enabled: self.enabled,
            ..Default::default()
        };
        match &self.urls {
            EndpointUrls::V3 { interface, url } => {
                create.interface = Some(*interface);
                create.url = Some(url.clone());
            }
            EndpointUrls::V2 {
                public_url,
                internal_url,
                admin_url,
            } => {
                create.public_url = public_url.clone();
                create.internal_url = internal_url.clone();
                create.admin_url = admin_url.clone();
            }
        }
        create
    }
}

impl TryFrom<EndpointParameters> for EndpointDesired {
    type Error = ReconcileError;

    fn try_from(value: EndpointParameters) -> Result<Self, Self::Error> {
        value.validate()?;
        let urls = match (value.interface, value.url) {
            (Some(interface), Some(url)) => EndpointUrls::V3 { interface, url },
            _ => EndpointUrls::V2 {
                public_url: value.public_url,
                internal_url: value.internal_url,
                admin_url: value.admin_url,
            },
        };
        Ok(Self {
            service_name: value.service_name,
            service_type: value.service_type,
            urls,
            region: value.region,
            enabled: value.enabled,
            state: value.state,
        })
    }
}
