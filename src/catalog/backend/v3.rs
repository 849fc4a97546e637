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
//! # Identity API v3 catalog driver
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogBackend, default_true};
use crate::catalog::error::CatalogProviderError;
use crate::catalog::types::*;
use crate::session::{Session, check_status};

#[derive(Default)]
pub struct V3Backend {}

#[derive(Deserialize)]
struct ServiceList {
    services: Vec<ServiceData>,
}

#[derive(Deserialize)]
struct ServiceData {
    id: String,
    name: Option<String>,
    r#type: Option<String>,
    description: Option<String>,
    #[serde(default = "default_true")]
    enabled: bool,
}

impl TryFrom<ServiceData> for Service {
    type Error = CatalogProviderError;

    fn try_from(value: ServiceData) -> Result<Self, Self::Error> {
        let mut builder = ServiceBuilder::default();
        builder.id(value.id);
        builder.enabled(value.enabled);
        if let Some(name) = value.name {
            builder.name(name);
        }
        if let Some(typ) = value.r#type {
            builder.r#type(typ);
        }
        if let Some(description) = value.description {
            builder.description(description);
        }
        Ok(builder.build()?)
    }
}

#[derive(Deserialize)]
struct EndpointList {
    endpoints: Vec<EndpointData>,
}

#[derive(Deserialize)]
struct EndpointResponse {
    endpoint: EndpointData,
}

#[derive(Deserialize)]
struct EndpointData {
    id: String,
    service_id: String,
    interface: Interface,
    url: String,
    region_id: Option<String>,
    /// Deprecated alias of the `region_id` still returned by Keystone.
    region: Option<String>,
    #[serde(default = "default_true")]
    enabled: bool,
}

impl TryFrom<EndpointData> for Endpoint {
    type Error = CatalogProviderError;

    fn try_from(value: EndpointData) -> Result<Self, Self::Error> {
        let mut builder = V3EndpointBuilder::default();
        builder.id(value.id);
        builder.service_id(value.service_id);
        builder.interface(value.interface);
        builder.url(value.url);
        builder.enabled(value.enabled);
        if let Some(region) = value.region_id.or(value.region) {
            builder.region(region);
        }
        Ok(Endpoint::V3(builder.build()?))
    }
}

#[derive(Serialize)]
struct EndpointRequest<T: Serialize> {
    endpoint: T,
}

#[derive(Serialize)]
struct EndpointCreateData<'a> {
    service_id: &'a str,
    interface: Interface,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_id: Option<&'a str>,
    enabled: bool,
}

#[derive(Serialize)]
struct EndpointUpdateData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interface: Option<Interface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_id: Option<&'a str>,
}

impl V3Backend {
    async fn post_endpoint(
        &self,
        session: &Session,
        data: EndpointCreateData<'_>,
    ) -> Result<Endpoint, CatalogProviderError> {
        let rsp = session
            .client()
            .post(session.url("endpoints")?)
            .json(&EndpointRequest { endpoint: data })
            .send()
            .await?;
        check_status(rsp)
            .await?
            .json::<EndpointResponse>()
            .await?
            .endpoint
            .try_into()
    }
}

#[async_trait]
impl CatalogBackend for V3Backend {
    fn api_version(&self, session: &Session) -> ApiVersion {
        session.api_version()
    }

    /// List Services
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn list_services(
        &self,
        session: &Session,
        params: &ServiceListParameters,
    ) -> Result<Vec<Service>, CatalogProviderError> {
        let rsp = session
            .client()
            .get(session.url("services")?)
            .query(params)
            .send()
            .await?;
        check_status(rsp)
            .await?
            .json::<ServiceList>()
            .await?
            .services
            .into_iter()
            .map(TryInto::<Service>::try_into)
            .filter(|srv| srv.as_ref().map_or(true, |srv| params.matches(srv)))
            .collect()
    }

    /// List Endpoints
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn list_endpoints(
        &self,
        session: &Session,
        params: &EndpointListParameters,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        let rsp = session
            .client()
            .get(session.url("endpoints")?)
            .query(params)
            .send()
            .await?;
        let endpoints = check_status(rsp)
            .await?
            .json::<EndpointList>()
            .await?
            .endpoints
            .into_iter()
            .filter(|ep| {
                params.service_id.as_ref().is_none_or(|id| &ep.service_id == id)
                    && params.interface.is_none_or(|interface| ep.interface == interface)
            })
            .map(TryInto::<Endpoint>::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("found {} endpoint(s)", endpoints.len());
        Ok(endpoints)
    }

    /// Create endpoint(s)
    ///
    /// The legacy URLs are created as separate endpoints with the matching
    /// interface.
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn create_endpoint(
        &self,
        session: &Session,
        params: &EndpointCreate,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        let mut created = Vec::new();
        if let Some(url) = &params.url {
            let interface = params.interface.ok_or_else(|| {
                CatalogProviderError::UnsupportedOperation(
                    "endpoint url requires the interface to be set".into(),
                )
            })?;
            created.push(
                self.post_endpoint(
                    session,
                    EndpointCreateData {
                        service_id: &params.service_id,
                        interface,
                        url,
                        region_id: params.region.as_deref(),
                        enabled: params.enabled,
                    },
                )
                .await?,
            );
        } else {
            for (interface, url) in params.legacy_urls() {
                created.push(
                    self.post_endpoint(
                        session,
                        EndpointCreateData {
                            service_id: &params.service_id,
                            interface,
                            url,
                            region_id: params.region.as_deref(),
                            enabled: params.enabled,
                        },
                    )
                    .await?,
                );
            }
        }
        if created.is_empty() {
            return Err(CatalogProviderError::UnsupportedOperation(
                "endpoint requires at least one url".into(),
            ));
        }
        Ok(created)
    }

    /// Update endpoint
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn update_endpoint<'a>(
        &self,
        session: &Session,
        id: &'a str,
        params: &EndpointUpdate,
    ) -> Result<Endpoint, CatalogProviderError> {
        let rsp = session
            .client()
            .patch(session.url(&format!("endpoints/{id}"))?)
            .json(&EndpointRequest {
                endpoint: EndpointUpdateData {
                    url: params.url.as_deref(),
                    interface: params.interface,
                    region_id: params.region.as_deref(),
                },
            })
            .send()
            .await?;
        check_status(rsp)
            .await?
            .json::<EndpointResponse>()
            .await?
            .endpoint
            .try_into()
    }

    /// Delete endpoint
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn delete_endpoint<'a>(
        &self,
        session: &Session,
        id: &'a str,
    ) -> Result<(), CatalogProviderError> {
        let rsp = session
            .client()
            .delete(session.url(&format!("endpoints/{id}"))?)
            .send()
            .await?;
        check_status(rsp).await?;
        Ok(())
    }
}
