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

use crate::error::BuilderError;

#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Service {
    /// The ID of the service.
    pub id: String,
    /// The service type.
    #[builder(default)]
    pub r#type: Option<String>,
    /// The service name.
    #[builder(default)]
    pub name: Option<String>,
    /// The service description.
    #[builder(default)]
    pub description: Option<String>,
    /// Defines whether the service and its endpoints appear in the service
    /// catalog.
    #[builder(default = "true")]
    pub enabled: bool,
}

#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ServiceListParameters {
    /// Filters the response by a service name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filters the response by a service type. A valid value is compute, ec2,
    /// identity, image, network, or volume.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

impl ServiceListParameters {
    /// Check whether the service satisfies the filters.
    ///
    /// Used by the drivers whose API ignores (or does not support) the
    /// query filters.
    pub fn matches(&self, service: &Service) -> bool {
        self.name
            .as_ref()
            .is_none_or(|name| service.name.as_ref() == Some(name))
            && self
                .r#type
                .as_ref()
                .is_none_or(|typ| service.r#type.as_ref() == Some(typ))
    }
}
