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
//! # Endpoint reconciliation
//!
//! Brings the endpoint of the service in the catalog to the desired state with
//! a single idempotent pass:
//!
//! 1. the service is resolved by its name and type;
//! 2. the endpoint of the service is looked up (filtered by the interface when
//!    the interface scoped schema is used);
//! 3. the existing endpoint is compared with the desired state and the action
//!    is chosen: nothing, create, update, delete and create again, or delete.
//!
//! The identity API v2.0 is not able to update endpoints, therefore an
//! endpoint described with the legacy public/internal/admin URLs is replaced
//! when it differs. The interface scoped endpoint is updated in place, but the
//! update does not carry the `enabled` flag.
use tracing::{debug, info};

pub mod error;
pub mod plan;
pub mod types;

use crate::catalog::{
    ApiVersion, EndpointDirectory, EndpointListParameters, EndpointMutation,
    ServiceListParameters,
};

pub use error::ReconcileError;
pub use plan::{ReconcilePlan, detect_drift, plan};
pub use types::*;

/// Endpoint reconciler.
///
/// Reads the catalog with the directory and applies the changes with the
/// mutation collaborator. Holds no state between the passes.
pub struct EndpointReconciler<'a, D, M> {
    directory: &'a D,
    mutation: &'a M,
    options: ReconcileOptions,
}

impl<'a, D, M> EndpointReconciler<'a, D, M>
where
    D: EndpointDirectory,
    M: EndpointMutation,
{
    pub fn new(directory: &'a D, mutation: &'a M, options: ReconcileOptions) -> Self {
        Self {
            directory,
            mutation,
            options,
        }
    }

    /// Reconcile the endpoint with the desired state.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(service = %desired.service_name, state = %desired.state, dry_run = self.options.dry_run),
        err
    )]
    pub async fn reconcile(
        &self,
        desired: &EndpointDesired,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        if let EndpointUrls::V3 { .. } = desired.urls {
            let found = self.directory.api_version();
            if found < ApiVersion::V3_0 {
                return Err(ReconcileError::UnsupportedRemoteVersion {
                    found,
                    required: ApiVersion::V3_0,
                });
            }
        }

        let service_id = self.resolve_service(desired).await?;
        let endpoints = self
            .directory
            .search_endpoints(&EndpointListParameters {
                service_id: Some(service_id.clone()),
                interface: desired.interface(),
            })
            .await?;
        if endpoints.len() > 1 {
            return Err(ReconcileError::MultipleEndpoints { service_id });
        }
        let current = endpoints.first();

        let ReconcilePlan { changed, action } =
            plan(desired, current, &service_id, &self.options);
        let kind = ActionKind::from(&action);
        match action {
            EndpointAction::None => {
                debug!("nothing to apply");
            }
            EndpointAction::Create(create) => {
                let created = self.mutation.create_endpoint(create).await?;
                for ep in &created {
                    info!("created endpoint {}", ep.id());
                }
            }
            EndpointAction::Update {
                endpoint_id,
                update,
            } => {
                self.mutation.update_endpoint(&endpoint_id, update).await?;
                info!("updated endpoint {endpoint_id}");
            }
            EndpointAction::Replace {
                endpoint_id,
                create,
            } => {
                self.mutation.delete_endpoint(&endpoint_id).await?;
                info!("deleted endpoint {endpoint_id} to be recreated");
                for ep in &self.mutation.create_endpoint(create).await? {
                    info!("created endpoint {}", ep.id());
                }
            }
            EndpointAction::Delete { endpoint_id } => {
                self.mutation.delete_endpoint(&endpoint_id).await?;
                info!("deleted endpoint {endpoint_id}");
            }
        }

        Ok(ReconcileOutcome {
            changed,
            action: kind,
        })
    }

    async fn resolve_service(&self, desired: &EndpointDesired) -> Result<String, ReconcileError> {
        let services = self
            .directory
            .search_services(&ServiceListParameters {
                name: Some(desired.service_name.clone()),
                r#type: Some(desired.service_type.clone()),
            })
            .await?;
        match services.as_slice() {
            [service] => Ok(service.id.clone()),
            _ => Err(ReconcileError::AmbiguousService {
                name: desired.service_name.clone(),
                count: services.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use reqwest::StatusCode;
    use tracing_test::traced_test;

    use super::*;
    use crate::catalog::*;

    fn keystone_service() -> Service {
        ServiceBuilder::default()
            .id("srv")
            .name("keystone")
            .r#type("identity")
            .build()
            .unwrap()
    }

    fn v3_desired() -> EndpointDesired {
        EndpointParametersBuilder::default()
            .service_name("keystone")
            .service_type("identity")
            .interface(Interface::Internal)
            .url("http://server:5000/v3")
            .region("myregion")
            .build()
            .unwrap()
            .try_into()
            .unwrap()
    }

    fn v2_desired() -> EndpointDesired {
        EndpointParametersBuilder::default()
            .service_name("keystone")
            .service_type("identity")
            .public_url("http://public:5000/v2.0")
            .internal_url("http://internal:5000/v2.0")
            .admin_url("http://admin:35357/v2.0")
            .build()
            .unwrap()
            .try_into()
            .unwrap()
    }

    fn v3_current() -> Endpoint {
        V3EndpointBuilder::default()
            .id("ep")
            .service_id("srv")
            .interface(Interface::Internal)
            .url("http://server:5000/v3")
            .region("myregion")
            .build()
            .unwrap()
            .into()
    }

    fn v2_current() -> Endpoint {
        V2EndpointBuilder::default()
            .id("ep")
            .service_id("srv")
            .public_url("http://public:5000/v2.0")
            .internal_url("http://internal:5000/v2.0")
            .admin_url("http://admin:35357/v2.0")
            .build()
            .unwrap()
            .into()
    }

    /// Mock with the `keystone` service and the endpoint search answering with
    /// the given endpoints.
    fn provider_with(version: ApiVersion, endpoints: Vec<Endpoint>) -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::default();
        provider.expect_api_version().return_const(version);
        provider
            .expect_search_services()
            .withf(|params: &ServiceListParameters| {
                params.name.as_deref() == Some("keystone")
                    && params.r#type.as_deref() == Some("identity")
            })
            .returning(|_| Ok(vec![keystone_service()]));
        provider
            .expect_search_endpoints()
            .returning(move |_| Ok(endpoints.clone()));
        provider
    }

    #[tokio::test]
    #[traced_test]
    async fn test_idempotence() {
        let mut provider = MockCatalogProvider::default();
        let mut seq = Sequence::new();
        provider.expect_api_version().return_const(ApiVersion::V3_0);
        provider
            .expect_search_services()
            .returning(|_| Ok(vec![keystone_service()]));
        provider
            .expect_search_endpoints()
            .withf(|params: &EndpointListParameters| {
                params.service_id.as_deref() == Some("srv")
                    && params.interface == Some(Interface::Internal)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Vec::new()));
        provider
            .expect_create_endpoint()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![v3_current()]));
        provider
            .expect_search_endpoints()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![v3_current()]));

        let reconciler =
            EndpointReconciler::new(&provider, &provider, ReconcileOptions::default());
        let first = reconciler.reconcile(&v3_desired()).await.unwrap();
        assert!(first.changed);
        assert_eq!(ActionKind::Create, first.action);
        let second = reconciler.reconcile(&v3_desired()).await.unwrap();
        assert!(!second.changed);
        assert_eq!(ActionKind::None, second.action);
    }

    #[tokio::test]
    async fn test_absent_on_absent() {
        let mut provider = provider_with(ApiVersion::V3_0, Vec::new());
        provider.expect_create_endpoint().never();
        provider.expect_update_endpoint().never();
        provider.expect_delete_endpoint().never();

        let mut desired = v3_desired();
        desired.state = EndpointState::Absent;
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_dry_run_never_mutates() {
        let options = ReconcileOptions {
            dry_run: true,
            delete_on_drift: true,
        };
        let mut drifted = v3_desired();
        drifted.region = Some("other".into());
        let mut absent = v3_desired();
        absent.state = EndpointState::Absent;

        for (desired, endpoints, changed) in [
            (v3_desired(), Vec::new(), true),
            (drifted, vec![v3_current()], true),
            (absent, vec![v3_current()], false),
            (v2_desired(), vec![v3_current()], true),
        ] {
            let mut provider = provider_with(ApiVersion::V3_0, endpoints);
            provider.expect_create_endpoint().never();
            provider.expect_update_endpoint().never();
            provider.expect_delete_endpoint().never();
            let outcome = EndpointReconciler::new(&provider, &provider, options)
                .reconcile(&desired)
                .await
                .unwrap();
            assert_eq!(changed, outcome.changed);
            assert_eq!(ActionKind::None, outcome.action);
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_legacy_endpoint_is_replaced() {
        let mut provider = provider_with(ApiVersion::V2_0, vec![v2_current()]);
        let mut seq = Sequence::new();
        provider.expect_update_endpoint().never();
        provider
            .expect_delete_endpoint()
            .withf(|id: &'_ str| id == "ep")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        provider
            .expect_create_endpoint()
            .withf(|params: &EndpointCreate| {
                params.service_id == "srv"
                    && params.admin_url.as_deref() == Some("http://new-admin:35357/v2.0")
                    && params.public_url.as_deref() == Some("http://public:5000/v2.0")
                    && params.url.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![v2_current()]));

        let mut desired = v2_desired();
        desired.urls = EndpointUrls::V2 {
            public_url: Some("http://public:5000/v2.0".into()),
            internal_url: Some("http://internal:5000/v2.0".into()),
            admin_url: Some("http://new-admin:35357/v2.0".into()),
        };
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(ActionKind::Replace, outcome.action);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_region_update() {
        let mut provider = provider_with(ApiVersion::new(3, 14), vec![v3_current()]);
        provider.expect_create_endpoint().never();
        provider.expect_delete_endpoint().never();
        provider
            .expect_update_endpoint()
            .withf(|id: &'_ str, params: &EndpointUpdate| {
                id == "ep"
                    && params.region.as_deref() == Some("newregion")
                    && params.url.as_deref() == Some("http://server:5000/v3")
                    && params.interface == Some(Interface::Internal)
            })
            .times(1)
            .returning(|_, _| Ok(v3_current()));

        let mut desired = v3_desired();
        desired.region = Some("newregion".into());
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(ActionKind::Update, outcome.action);
    }

    #[tokio::test]
    async fn test_identical_endpoint() {
        let provider = provider_with(ApiVersion::V3_0, vec![v3_current()]);
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&v3_desired())
            .await
            .unwrap();
        assert_eq!(
            ReconcileOutcome {
                changed: false,
                action: ActionKind::None
            },
            outcome
        );
    }

    #[tokio::test]
    async fn test_enabled_drift_is_not_converged() {
        let mut provider = provider_with(ApiVersion::V3_0, vec![v3_current()]);
        // The update has no way to carry the flag, the endpoint stays enabled.
        provider
            .expect_update_endpoint()
            .withf(|id: &'_ str, params: &EndpointUpdate| {
                id == "ep"
                    && *params
                        == EndpointUpdate {
                            url: Some("http://server:5000/v3".into()),
                            interface: Some(Interface::Internal),
                            region: Some("myregion".into()),
                        }
            })
            .times(2)
            .returning(|_, _| Ok(v3_current()));

        let mut desired = v3_desired();
        desired.enabled = false;
        let reconciler =
            EndpointReconciler::new(&provider, &provider, ReconcileOptions::default());
        for _ in 0..2 {
            let outcome = reconciler.reconcile(&desired).await.unwrap();
            assert!(outcome.changed);
            assert_eq!(ActionKind::Update, outcome.action);
        }
    }

    #[tokio::test]
    async fn test_create_legacy_endpoint() {
        let mut provider = provider_with(ApiVersion::V2_0, Vec::new());
        provider
            .expect_create_endpoint()
            .withf(|params: &EndpointCreate| {
                params.public_url.as_deref() == Some("http://public:5000/v2.0")
                    && params.internal_url.as_deref() == Some("http://internal:5000/v2.0")
                    && params.admin_url.as_deref() == Some("http://admin:35357/v2.0")
                    && params.enabled
            })
            .times(1)
            .returning(|_| Ok(vec![v2_current()]));

        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&v2_desired())
            .await
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(ActionKind::Create, outcome.action);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut provider = provider_with(ApiVersion::V3_0, vec![v3_current()]);
        provider
            .expect_delete_endpoint()
            .withf(|id: &'_ str| id == "ep")
            .times(1)
            .returning(|_| Ok(()));

        let mut desired = v3_desired();
        desired.state = EndpointState::Absent;
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(ActionKind::Delete, outcome.action);
    }

    #[tokio::test]
    async fn test_drifted_absent_endpoint() {
        let mut desired = v3_desired();
        desired.state = EndpointState::Absent;
        desired.urls = EndpointUrls::V3 {
            interface: Interface::Internal,
            url: "http://other:5000/v3".into(),
        };

        let mut provider = provider_with(ApiVersion::V3_0, vec![v3_current()]);
        provider.expect_delete_endpoint().never();
        let outcome = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(!outcome.changed);

        let mut provider = provider_with(ApiVersion::V3_0, vec![v3_current()]);
        provider
            .expect_delete_endpoint()
            .withf(|id: &'_ str| id == "ep")
            .times(1)
            .returning(|_| Ok(()));
        let outcome = EndpointReconciler::new(
            &provider,
            &provider,
            ReconcileOptions {
                dry_run: false,
                delete_on_drift: true,
            },
        )
        .reconcile(&desired)
        .await
        .unwrap();
        assert!(outcome.changed);
        assert_eq!(ActionKind::Delete, outcome.action);
    }

    #[tokio::test]
    async fn test_ambiguous_service() {
        for services in [
            Vec::new(),
            vec![keystone_service(), keystone_service()],
        ] {
            let expected = services.len();
            let mut provider = MockCatalogProvider::default();
            provider.expect_api_version().return_const(ApiVersion::V3_0);
            provider
                .expect_search_services()
                .returning(move |_| Ok(services.clone()));
            provider.expect_search_endpoints().never();

            match EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
                .reconcile(&v3_desired())
                .await
            {
                Err(ReconcileError::AmbiguousService { name, count }) => {
                    assert_eq!("keystone", name);
                    assert_eq!(expected, count);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_multiple_endpoints() {
        let mut provider = provider_with(ApiVersion::V3_0, vec![v3_current(), v3_current()]);
        provider.expect_create_endpoint().never();
        provider.expect_update_endpoint().never();
        provider.expect_delete_endpoint().never();
        match EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&v3_desired())
            .await
        {
            Err(ReconcileError::MultipleEndpoints { service_id }) => {
                assert_eq!("srv", service_id);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_error_message() {
        let mut provider = provider_with(ApiVersion::V3_0, Vec::new());
        provider.expect_create_endpoint().returning(|_| {
            Err(CatalogProviderError::Api {
                status: StatusCode::FORBIDDEN,
                message: "You are not authorized to perform the requested action.".into(),
            })
        });
        let err = EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&v3_desired())
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Remote { .. }));
        assert_eq!(
            "You are not authorized to perform the requested action. (HTTP 403 Forbidden)",
            err.to_string()
        );
    }

    #[tokio::test]
    async fn test_old_api_version() {
        let mut provider = MockCatalogProvider::default();
        provider.expect_api_version().return_const(ApiVersion::V2_0);
        provider.expect_search_services().never();
        provider.expect_search_endpoints().never();
        match EndpointReconciler::new(&provider, &provider, ReconcileOptions::default())
            .reconcile(&v3_desired())
            .await
        {
            Err(ReconcileError::UnsupportedRemoteVersion { found, required }) => {
                assert_eq!(ApiVersion::V2_0, found);
                assert_eq!(ApiVersion::V3_0, required);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
