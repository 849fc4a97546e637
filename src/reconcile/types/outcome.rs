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

use crate::catalog::{EndpointCreate, EndpointUpdate};
use crate::error::BuilderError;

/// Catalog modification decided for the endpoint.
#[derive(Clone, Debug, PartialEq)]
pub enum EndpointAction {
    /// Nothing to do.
    None,
    /// Create the endpoint.
    Create(EndpointCreate),
    /// Update the endpoint in place.
    Update {
        endpoint_id: String,
        update: EndpointUpdate,
    },
    /// Delete the endpoint and create it again.
    Replace {
        endpoint_id: String,
        create: EndpointCreate,
    },
    /// Delete the endpoint.
    Delete { endpoint_id: String },
}

/// Kind of the applied action as reported to the caller.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    None,
    Create,
    Update,
    Replace,
    Delete,
}

impl From<&EndpointAction> for ActionKind {
    fn from(value: &EndpointAction) -> Self {
        match value {
            EndpointAction::None => Self::None,
            EndpointAction::Create(_) => Self::Create,
            EndpointAction::Update { .. } => Self::Update,
            EndpointAction::Replace { .. } => Self::Replace,
            EndpointAction::Delete { .. } => Self::Delete,
        }
    }
}

/// Result of the reconciliation pass.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub changed: bool,
    pub action: ActionKind,
}

/// Reconciliation options.
#[derive(Builder, Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct ReconcileOptions {
    /// Only report whether the endpoint would change.
    #[builder(default)]
    #[serde(default)]
    pub dry_run: bool,

    /// Delete the existing endpoint when it differs from the desired state
    /// while the desired state is `absent`. Without it such endpoint is left
    /// untouched.
    #[builder(default)]
    #[serde(default)]
    pub delete_on_drift: bool,
}
