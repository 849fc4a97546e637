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
//! # Catalog provider error types
use reqwest::StatusCode;
use thiserror::Error;

use crate::error::BuilderError;

/// Catalog provider error.
#[derive(Error, Debug)]
pub enum CatalogProviderError {
    /// The identity API rejected the request.
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    /// Authentication against the identity API failed.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// HTTP client error.
    #[error(transparent)]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// Structures builder error.
    #[error(transparent)]
    StructBuilder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Unsupported driver.
    #[error("unsupported driver {0}")]
    UnsupportedDriver(String),

    /// The operation is not available with the identity API version.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },

    /// The identity API version can not be determined.
    #[error("identity API version discovery failed: {0}")]
    VersionDiscovery(String),
}
