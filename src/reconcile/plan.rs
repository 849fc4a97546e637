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
//! Drift detection and action planning.
//!
//! Pure functions, the catalog is neither read nor modified here.
use tracing::debug;

use crate::catalog::{Endpoint, EndpointUpdate};
use crate::reconcile::types::*;

/// Decision for the single reconciliation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconcilePlan {
    /// Whether the catalog is (or in the dry run would be) changed.
    pub changed: bool,
    /// Modification to apply.
    pub action: EndpointAction,
}

impl ReconcilePlan {
    fn unchanged() -> Self {
        Self {
            changed: false,
            action: EndpointAction::None,
        }
    }
}

/// Check whether the existing endpoint differs from the desired state.
///
/// The region is compared for both schemas. `enabled` is only compared for
/// the interface scoped endpoints.
pub fn detect_drift(desired: &EndpointDesired, current: &Endpoint) -> bool {
    if current.region() != desired.region.as_deref() {
        debug!("region differs");
        return true;
    }
    match (&desired.urls, current) {
        (EndpointUrls::V3 { url, .. }, Endpoint::V3(ep)) => {
            ep.enabled != desired.enabled || &ep.url != url
        }
        // Legacy endpoint has no single url to compare with.
        (EndpointUrls::V3 { .. }, Endpoint::V2(_)) => true,
        (
            EndpointUrls::V2 {
                public_url,
                internal_url,
                admin_url,
            },
            Endpoint::V2(ep),
        ) => {
            &ep.internal_url != internal_url
                || &ep.admin_url != admin_url
                || &ep.public_url != public_url
        }
        (
            EndpointUrls::V2 {
                public_url,
                internal_url,
                admin_url,
            },
            Endpoint::V3(_),
        ) => public_url.is_some() || internal_url.is_some() || admin_url.is_some(),
    }
}

/// Decide what has to be done with the endpoint.
pub fn plan(
    desired: &EndpointDesired,
    current: Option<&Endpoint>,
    service_id: &str,
    options: &ReconcileOptions,
) -> ReconcilePlan {
    let Some(current) = current else {
        if desired.state == EndpointState::Absent {
            return ReconcilePlan::unchanged();
        }
        return ReconcilePlan {
            changed: true,
            action: if options.dry_run {
                EndpointAction::None
            } else {
                EndpointAction::Create(desired.to_create(service_id))
            },
        };
    };

    let drift = detect_drift(desired, current);
    debug!(drift, state = %desired.state, "compared endpoint {}", current.id());

    if options.dry_run {
        return ReconcilePlan {
            changed: drift && desired.state == EndpointState::Present,
            action: EndpointAction::None,
        };
    }

    let endpoint_id = current.id().to_string();
    let action = match (drift, desired.state) {
        (true, EndpointState::Present) => match &desired.urls {
            EndpointUrls::V3 { interface, url } => EndpointAction::Update {
                endpoint_id,
                update: EndpointUpdate {
                    url: Some(url.clone()),
                    interface: Some(*interface),
                    region: desired.region.clone(),
                },
            },
            EndpointUrls::V2 { .. } => EndpointAction::Replace {
                endpoint_id,
                create: desired.to_create(service_id),
            },
        },
        (true, EndpointState::Absent) if options.delete_on_drift => {
            EndpointAction::Delete { endpoint_id }
        }
        (true, EndpointState::Absent) => EndpointAction::None,
        (false, EndpointState::Absent) => EndpointAction::Delete { endpoint_id },
        (false, EndpointState::Present) => EndpointAction::None,
    };
    ReconcilePlan {
        changed: action != EndpointAction::None,
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Interface, V2Endpoint, V3Endpoint};

    fn v3_desired() -> EndpointDesired {
        EndpointDesired {
            service_name: "keystone".into(),
            service_type: "identity".into(),
            urls: EndpointUrls::V3 {
                interface: Interface::Internal,
                url: "http://server:5000/v3".into(),
            },
            region: Some("myregion".into()),
            enabled: true,
            state: EndpointState::Present,
        }
    }

    fn v2_desired() -> EndpointDesired {
        EndpointDesired {
            urls: EndpointUrls::V2 {
                public_url: Some("http://public:5000/v2.0".into()),
                internal_url: Some("http://internal:5000/v2.0".into()),
                admin_url: Some("http://admin:35357/v2.0".into()),
            },
            ..v3_desired()
        }
    }

    fn v3_current() -> Endpoint {
        Endpoint::V3(V3Endpoint {
            id: "ep".into(),
            service_id: "srv".into(),
            interface: Interface::Internal,
            url: "http://server:5000/v3".into(),
            region: Some("myregion".into()),
            enabled: true,
        })
    }

    fn v2_current() -> Endpoint {
        Endpoint::V2(V2Endpoint {
            id: "ep".into(),
            service_id: "srv".into(),
            region: Some("myregion".into()),
            public_url: Some("http://public:5000/v2.0".into()),
            internal_url: Some("http://internal:5000/v2.0".into()),
            admin_url: Some("http://admin:35357/v2.0".into()),
            enabled: true,
        })
    }

    #[test]
    fn test_drift_v3() {
        assert!(!detect_drift(&v3_desired(), &v3_current()));

        let mut desired = v3_desired();
        desired.urls = EndpointUrls::V3 {
            interface: Interface::Internal,
            url: "http://other:5000/v3".into(),
        };
        assert!(detect_drift(&desired, &v3_current()));

        let mut desired = v3_desired();
        desired.enabled = false;
        assert!(detect_drift(&desired, &v3_current()));

        let mut desired = v3_desired();
        desired.region = None;
        assert!(detect_drift(&desired, &v3_current()));

        assert!(detect_drift(&v3_desired(), &v2_current()));
    }

    #[test]
    fn test_drift_v2() {
        assert!(!detect_drift(&v2_desired(), &v2_current()));
        // enabled is not part of the legacy comparison
        let mut desired = v2_desired();
        desired.enabled = false;
        assert!(!detect_drift(&desired, &v2_current()));

        let mut desired = v2_desired();
        desired.urls = EndpointUrls::V2 {
            public_url: Some("http://public:5000/v2.0".into()),
            internal_url: Some("http://internal:5000/v2.0".into()),
            admin_url: None,
        };
        assert!(detect_drift(&desired, &v2_current()));

        let mut current = v2_current();
        if let Endpoint::V2(ep) = &mut current {
            ep.region = None;
        }
        assert!(detect_drift(&v2_desired(), &current));

        assert!(detect_drift(&v2_desired(), &v3_current()));
    }

    #[test]
    fn test_plan_create() {
        let plan = plan(&v3_desired(), None, "srv", &ReconcileOptions::default());
        assert!(plan.changed);
        assert_eq!(
            EndpointAction::Create(v3_desired().to_create("srv")),
            plan.action
        );
    }

    #[test]
    fn test_plan_absent_on_absent() {
        let mut desired = v3_desired();
        desired.state = EndpointState::Absent;
        assert_eq!(
            ReconcilePlan::unchanged(),
            plan(&desired, None, "srv", &ReconcileOptions::default())
        );
    }

    #[test]
    fn test_plan_update() {
        let mut desired = v3_desired();
        desired.region = Some("other".into());
        let plan = plan(&desired, Some(&v3_current()), "srv", &ReconcileOptions::default());
        assert!(plan.changed);
        assert_eq!(
            EndpointAction::Update {
                endpoint_id: "ep".into(),
                update: EndpointUpdate {
                    url: Some("http://server:5000/v3".into()),
                    interface: Some(Interface::Internal),
                    region: Some("other".into()),
                }
            },
            plan.action
        );
    }

    #[test]
    fn test_plan_replace() {
        let mut desired = v2_desired();
        desired.urls = EndpointUrls::V2 {
            public_url: Some("http://public:5000/v2.0".into()),
            internal_url: Some("http://internal:5000/v2.0".into()),
            admin_url: Some("http://new-admin:35357/v2.0".into()),
        };
        let plan = plan(&desired, Some(&v2_current()), "srv", &ReconcileOptions::default());
        assert!(plan.changed);
        assert_eq!(
            EndpointAction::Replace {
                endpoint_id: "ep".into(),
                create: desired.to_create("srv"),
            },
            plan.action
        );
    }

    #[test]
    fn test_plan_absent() {
        let mut desired = v3_desired();
        desired.state = EndpointState::Absent;

        let plan_same = plan(&desired, Some(&v3_current()), "srv", &ReconcileOptions::default());
        assert!(plan_same.changed);
        assert_eq!(
            EndpointAction::Delete {
                endpoint_id: "ep".into()
            },
            plan_same.action
        );

        desired.enabled = false;
        assert_eq!(
            ReconcilePlan::unchanged(),
            plan(&desired, Some(&v3_current()), "srv", &ReconcileOptions::default())
        );
        let plan_drift = plan(
            &desired,
            Some(&v3_current()),
            "srv",
            &ReconcileOptions {
                dry_run: false,
                delete_on_drift: true,
            },
        );
        assert!(plan_drift.changed);
        assert_eq!(
            EndpointAction::Delete {
                endpoint_id: "ep".into()
            },
            plan_drift.action
        );
    }

    #[test]
    fn test_plan_dry_run() {
        let options = ReconcileOptions {
            dry_run: true,
            delete_on_drift: false,
        };
        let create = plan(&v3_desired(), None, "srv", &options);
        assert!(create.changed);
        assert_eq!(EndpointAction::None, create.action);

        let mut desired = v3_desired();
        desired.urls = EndpointUrls::V3 {
            interface: Interface::Internal,
            url: "http://other:5000/v3".into(),
        };
        let update = plan(&desired, Some(&v3_current()), "srv", &options);
        assert!(update.changed);
        assert_eq!(EndpointAction::None, update.action);

        desired.state = EndpointState::Absent;
        assert_eq!(
            ReconcilePlan::unchanged(),
            plan(&desired, Some(&v3_current()), "srv", &options)
        );
    }
}
