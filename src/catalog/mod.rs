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
//! # Catalog provider
//!
//! Catalog provider gives access to the services and endpoints registered in
//! the Keystone service catalog over the identity API.
//!
//! Following Keystone concepts are covered:
//!
//! ## Endpoint
//!
//! A network-accessible address, usually a URL, through which you can access a
//! service. The identity API v2.0 stores the public, internal and admin URLs of
//! the service in one endpoint object, while the identity API v3 keeps one URL
//! per endpoint tagged with the interface.
//!
//! ## Service
//!
//! An OpenStack service, such as Compute (nova), Object Storage (swift), or
//! Image service (glance), that provides one or more endpoints through which
//! users can access resources and perform operations.
use async_trait::async_trait;
use tracing::info;

pub mod backend;
pub mod error;
#[cfg(test)]
mod mock;
pub mod types;

use crate::catalog::backend::{CatalogBackend, V2Backend, V3Backend};
use crate::config::Config;
use crate::session::Session;

pub use error::CatalogProviderError;
#[cfg(test)]
pub use mock::MockCatalogProvider;

pub use types::*;

pub struct CatalogProvider {
    backend_driver: Box<dyn CatalogBackend>,
    session: Session,
}

/// Catalog driver named in the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Driver {
    V2,
    V3,
    /// Pick the driver by the discovered identity API version.
    Auto,
}

impl TryFrom<&str> for Driver {
    type Error = CatalogProviderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "v3" => Ok(Self::V3),
            "v2" | "v2.0" => Ok(Self::V2),
            "auto" => Ok(Self::Auto),
            other => Err(CatalogProviderError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl CatalogProvider {
    /// Open the identity API session and select the catalog driver.
    ///
    /// The driver name is checked before authenticating, so no token is
    /// issued for an unusable configuration.
    pub async fn open(config: &Config) -> Result<Self, CatalogProviderError> {
        let driver = Driver::try_from(config.catalog.driver.as_str())?;
        let session = Session::open(&config.auth, &config.http).await?;
        Ok(Self::with_driver(driver, session))
    }

    /// Build the provider on top of the already established session.
    pub fn with_session(config: &Config, session: Session) -> Result<Self, CatalogProviderError> {
        let driver = Driver::try_from(config.catalog.driver.as_str())?;
        Ok(Self::with_driver(driver, session))
    }

    fn with_driver(driver: Driver, session: Session) -> Self {
        let backend_driver: Box<dyn CatalogBackend> = match driver {
            Driver::V3 => Box::new(V3Backend::default()),
            Driver::V2 => Box::new(V2Backend::default()),
            Driver::Auto if session.api_version() >= ApiVersion::V3_0 => {
                Box::new(V3Backend::default())
            }
            Driver::Auto => Box::new(V2Backend::default()),
        };
        info!(
            "Using the identity API {} catalog driver",
            backend_driver.api_version(&session)
        );
        Self {
            backend_driver,
            session,
        }
    }

    /// Release the identity API session.
    pub async fn close(self) {
        self.session.close().await
    }
}

#[async_trait]
impl EndpointDirectory for CatalogProvider {
    fn api_version(&self) -> ApiVersion {
        self.backend_driver.api_version(&self.session)
    }

    /// Search services
    #[tracing::instrument(level = "info", skip(self))]
    async fn search_services(
        &self,
        params: &ServiceListParameters,
    ) -> Result<Vec<Service>, CatalogProviderError> {
        self.backend_driver
            .list_services(&self.session, params)
            .await
    }

    /// Search endpoints
    #[tracing::instrument(level = "info", skip(self))]
    async fn search_endpoints(
        &self,
        params: &EndpointListParameters,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        self.backend_driver
            .list_endpoints(&self.session, params)
            .await
    }
}

#[async_trait]
impl EndpointMutation for CatalogProvider {
    /// Create endpoint(s)
    #[tracing::instrument(level = "info", skip(self))]
    async fn create_endpoint(
        &self,
        params: EndpointCreate,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        self.backend_driver
            .create_endpoint(&self.session, &params)
            .await
    }

    /// Update endpoint
    #[tracing::instrument(level = "info", skip(self))]
    async fn update_endpoint<'a>(
        &self,
        id: &'a str,
        params: EndpointUpdate,
    ) -> Result<Endpoint, CatalogProviderError> {
        self.backend_driver
            .update_endpoint(&self.session, id, &params)
            .await
    }

    /// Delete endpoint
    #[tracing::instrument(level = "info", skip(self))]
    async fn delete_endpoint<'a>(&self, id: &'a str) -> Result<(), CatalogProviderError> {
        self.backend_driver.delete_endpoint(&self.session, id).await
    }
}
