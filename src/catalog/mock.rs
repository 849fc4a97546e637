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
//! Catalog - internal mocking tools.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

use crate::catalog::error::CatalogProviderError;
use crate::catalog::types::*;

#[cfg(test)]
mock! {
    pub CatalogProvider {}

    #[async_trait]
    impl EndpointDirectory for CatalogProvider {
        fn api_version(&self) -> ApiVersion;

        async fn search_services(
            &self,
            params: &ServiceListParameters,
        ) -> Result<Vec<Service>, CatalogProviderError>;

        async fn search_endpoints(
            &self,
            params: &EndpointListParameters,
        ) -> Result<Vec<Endpoint>, CatalogProviderError>;
    }

    #[async_trait]
    impl EndpointMutation for CatalogProvider {
        async fn create_endpoint(
            &self,
            params: EndpointCreate,
        ) -> Result<Vec<Endpoint>, CatalogProviderError>;

        async fn update_endpoint<'a>(
            &self,
            id: &'a str,
            params: EndpointUpdate,
        ) -> Result<Endpoint, CatalogProviderError>;

        async fn delete_endpoint<'a>(&self, id: &'a str) -> Result<(), CatalogProviderError>;
    }
}
