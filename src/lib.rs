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

//! # OpenStack Keystone endpoint reconciler
//!
//! Declarative management of a single endpoint in the Keystone service
//! catalog. The endpoint is described by its desired state (URLs, region,
//! enabled flag, or absence) and the reconciler decides, with a single
//! idempotent pass, whether the catalog needs to be modified and how.
//!
//! Both endpoint schemas of the identity API are supported:
//!
//! - the identity API v3 endpoint, a single URL tagged with the interface
//!   (`public`, `internal` or `admin`);
//!
//! - the legacy identity API v2.0 endpoint carrying the public, internal and
//!   admin URLs of the service at once.
//!
//! The catalog is accessed through the [`catalog::EndpointDirectory`] and
//! [`catalog::EndpointMutation`] traits. [`catalog::CatalogProvider`]
//! implements them over the Keystone HTTP API using the authenticated
//! [`session::Session`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod session;
