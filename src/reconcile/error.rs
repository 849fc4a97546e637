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
//! # Reconciliation error types
use thiserror::Error;

use crate::catalog::{ApiVersion, CatalogProviderError};

/// Endpoint reconciliation error.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Service name and type do not identify exactly one service.
    #[error("Service {name} not found or more than 1 service have this name ({count} found)")]
    AmbiguousService { name: String, count: usize },

    /// More than one endpoint matches the filters.
    #[error("Service {service_id} has more than 1 endpoint matching the filters")]
    MultipleEndpoints { service_id: String },

    /// Catalog operation failed.
    #[error(transparent)]
    Remote {
        /// The source of the error.
        #[from]
        source: CatalogProviderError,
    },

    /// The identity API is too old for the requested endpoint schema.
    #[error(
        "identity API {found} does not support interface scoped endpoints, at least {required} is required"
    )]
    UnsupportedRemoteVersion {
        found: ApiVersion,
        required: ApiVersion,
    },

    /// Request validation error.
    #[error("request validation error: {}", source)]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },
}
