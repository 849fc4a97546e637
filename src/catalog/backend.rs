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

use async_trait::async_trait;

pub mod v2;
pub mod v3;

pub use v2::V2Backend;
pub use v3::V3Backend;

use crate::catalog::error::CatalogProviderError;
use crate::catalog::types::{
    ApiVersion, Endpoint, EndpointCreate, EndpointListParameters, EndpointUpdate, Service,
    ServiceListParameters,
};
use crate::session::Session;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Identity API version implemented by the driver for the session.
    fn api_version(&self, session: &Session) -> ApiVersion;

    /// List services
    async fn list_services(
        &self,
        session: &Session,
        params: &ServiceListParameters,
    ) -> Result<Vec<Service>, CatalogProviderError>;

    /// List Endpoints
    async fn list_endpoints(
        &self,
        session: &Session,
        params: &EndpointListParameters,
    ) -> Result<Vec<Endpoint>, CatalogProviderError>;

    /// Create endpoint(s)
    async fn create_endpoint(
        &self,
        session: &Session,
        params: &EndpointCreate,
    ) -> Result<Vec<Endpoint>, CatalogProviderError>;

    /// Update endpoint
    async fn update_endpoint<'a>(
        &self,
        session: &Session,
        id: &'a str,
        params: &EndpointUpdate,
    ) -> Result<Endpoint, CatalogProviderError>;

    /// Delete endpoint
    async fn delete_endpoint<'a>(
        &self,
        session: &Session,
        id: &'a str,
    ) -> Result<(), CatalogProviderError>;
}

fn default_true() -> bool {
    true
}
