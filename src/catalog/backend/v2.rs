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
//! # Identity API v2.0 catalog driver
//!
//! Services are managed through the `OS-KSADM` admin extension. The API does
//! not filter endpoints on the server side and has no way to update them.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CatalogBackend, default_true};
use crate::catalog::error::CatalogProviderError;
use crate::catalog::types::*;
use crate::session::{Session, check_status};

#[derive(Default)]
pub struct V2Backend {}

#[derive(Deserialize)]
struct ServiceList {
    #[serde(rename = "OS-KSADM:services")]
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

impl From<ServiceData> for Service {
    fn from(value: ServiceData) -> Self {
        Self {
            id: value.id,
            r#type: value.r#type,
            name: value.name,
            description: value.description,
            enabled: value.enabled,
        }
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
    region: Option<String>,
    publicurl: Option<String>,
    internalurl: Option<String>,
    adminurl: Option<String>,
    #[serde(default = "default_true")]
    enabled: bool,
}

impl From<EndpointData> for Endpoint {
    fn from(value: EndpointData) -> Self {
        Endpoint::V2(V2Endpoint {
            id: value.id,
            service_id: value.service_id,
            region: value.region,
            public_url: value.publicurl,
            internal_url: value.internalurl,
            admin_url: value.adminurl,
            enabled: value.enabled,
        })
    }
}

#[derive(Serialize)]
struct EndpointCreateRequest<'a> {
    endpoint: EndpointCreateData<'a>,
}

#[derive(Serialize)]
struct EndpointCreateData<'a> {
    service_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publicurl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    internalurl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adminurl: Option<&'a str>,
}

#[async_trait]
impl CatalogBackend for V2Backend {
    fn api_version(&self, _session: &Session) -> ApiVersion {
        ApiVersion::V2_0
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
            .get(session.url("OS-KSADM/services")?)
            .send()
            .await?;
        Ok(check_status(rsp)
            .await?
            .json::<ServiceList>()
            .await?
            .services
            .into_iter()
            .map(Service::from)
            .filter(|srv| params.matches(srv))
            .collect())
    }

    /// List Endpoints
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn list_endpoints(
        &self,
        session: &Session,
        params: &EndpointListParameters,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        if params.interface.is_some() {
            return Err(CatalogProviderError::UnsupportedOperation(
                "filtering endpoints by interface requires identity API v3".into(),
            ));
        }
        let rsp = session
            .client()
            .get(session.url("endpoints")?)
            .send()
            .await?;
        Ok(check_status(rsp)
            .await?
            .json::<EndpointList>()
            .await?
            .endpoints
            .into_iter()
            .filter(|ep| params.service_id.as_ref().is_none_or(|id| &ep.service_id == id))
            .map(Endpoint::from)
            .collect())
    }

    /// Create endpoint
    #[tracing::instrument(level = "debug", skip(self, session))]
    async fn create_endpoint(
        &self,
        session: &Session,
        params: &EndpointCreate,
    ) -> Result<Vec<Endpoint>, CatalogProviderError> {
        if params.url.is_some() || params.interface.is_some() {
            return Err(CatalogProviderError::UnsupportedOperation(
                "endpoint interface and url require identity API v3".into(),
            ));
        }
        if params.legacy_urls().next().is_none() {
            return Err(CatalogProviderError::UnsupportedOperation(
                "endpoint requires at least one url".into(),
            ));
        }
        let rsp = session
            .client()
            .post(session.url("endpoints")?)
            .json(&EndpointCreateRequest {
                endpoint: EndpointCreateData {
                    service_id: &params.service_id,
                    region: params.region.as_deref(),
                    publicurl: params.public_url.as_deref(),
                    internalurl: params.internal_url.as_deref(),
                    adminurl: params.admin_url.as_deref(),
                },
            })
            .send()
            .await?;
        let endpoint = check_status(rsp)
            .await?
            .json::<EndpointResponse>()
            .await?
            .endpoint;
        Ok(vec![endpoint.into()])
    }

    async fn update_endpoint<'a>(
        &self,
        _session: &Session,
        _id: &'a str,
        _params: &EndpointUpdate,
    ) -> Result<Endpoint, CatalogProviderError> {
        Err(CatalogProviderError::UnsupportedOperation(
            "endpoint update requires identity API v3".into(),
        ))
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
