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

use crate::catalog::CatalogProviderError;

pub use super::endpoint::*;
pub use super::service::*;
pub use super::version::*;

/// Read-only access to the services and endpoints of the catalog.
#[async_trait]
pub trait EndpointDirectory: Send + Sync {
    /// Identity API version the directory operates with.
    fn api_version(&self) -> ApiVersion;

    /// Search services.
    async fn search_services(
        &self,
        params: &ServiceListParameters,
    ) -> Result<Vec<Service>, CatalogProviderError>;

    /// Search endpoints.
    async fn search_endpoints(
        &self,
        params: &EndpointListParameters,
    ) -> Result<Vec<Endpoint>, CatalogProviderError>;
}

/// Modification of the catalog endpoints.
#[async_trait]
pub trait EndpointMutation: Send + Sync {
    /// Create endpoint(s).
    ///
    /// Legacy (public/internal/admin) URLs passed to an identity v3 catalog
    /// result in one endpoint per URL, therefore a list is returned.
    async fn create_endpoint(
        &self,
        params: EndpointCreate,
    ) -> Result<Vec<Endpoint>, CatalogProviderError>;

    /// Update endpoint.
    async fn update_endpoint<'a>(
        &self,
        id: &'a str,
        params: EndpointUpdate,
    ) -> Result<Endpoint, CatalogProviderError>;

    /// Delete endpoint.
    async fn delete_endpoint<'a>(&self, id: &'a str) -> Result<(), CatalogProviderError>;
}
