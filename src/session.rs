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
//! # Identity API session
//!
//! An authenticated HTTP client bound to the versioned identity endpoint. The
//! session is opened once per invocation and released (token revoked) when
//! the invocation finishes.
use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::catalog::error::CatalogProviderError;
use crate::catalog::types::ApiVersion;
use crate::config::{AuthSection, HttpSection};

const X_AUTH_TOKEN: &str = "x-auth-token";
const X_SUBJECT_TOKEN: &str = "x-subject-token";

/// Authenticated identity API session.
#[derive(Debug)]
pub struct Session {
    /// Client sending the token with every request.
    client: Client,
    /// Versioned identity endpoint, always with the trailing slash.
    identity_url: Url,
    /// Discovered identity API version.
    api_version: ApiVersion,
    /// Session token.
    token: SecretString,
}

/// Version document returned by the identity endpoint. The versioned
/// endpoint describes one `version`, the root lists all of them.
#[derive(Deserialize)]
struct VersionDocument {
    version: Option<VersionInfo>,
    versions: Option<VersionList>,
}

#[derive(Deserialize)]
struct VersionList {
    values: Vec<VersionInfo>,
}

#[derive(Deserialize)]
struct VersionInfo {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    links: Vec<VersionLink>,
}

impl VersionInfo {
    /// Whether the version may be used for new requests.
    fn is_usable(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "stable" | "current" | "supported"
        )
    }

    fn self_link(&self) -> Option<&Url> {
        self.links
            .iter()
            .find(|link| link.rel == "self")
            .map(|link| &link.href)
    }
}

#[derive(Deserialize)]
struct VersionLink {
    href: Url,
    rel: String,
}

/// Identity v2.0 token response.
#[derive(Deserialize)]
struct AccessResponse {
    access: Access,
}

#[derive(Deserialize)]
struct Access {
    token: AccessToken,
}

#[derive(Deserialize)]
struct AccessToken {
    id: String,
}

/// Keystone error response body.
#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorInfo,
}

#[derive(Deserialize)]
struct ErrorInfo {
    message: String,
}

impl Session {
    /// Discover the identity API version and authenticate with the password
    /// credentials.
    #[tracing::instrument(name = "session.open", skip_all, fields(auth_url = %auth.auth_url), err)]
    pub async fn open(
        auth: &AuthSection,
        http: &HttpSection,
    ) -> Result<Self, CatalogProviderError> {
        let anonymous = build_client(http, None)?;

        let (identity_url, api_version) =
            discover_version(&anonymous, &normalize(auth.auth_url.clone())).await?;
        debug!("Discovered identity API version {api_version} at {identity_url}");

        let token = if api_version >= ApiVersion::V3_0 {
            authenticate_v3(&anonymous, &identity_url, auth).await?
        } else {
            authenticate_v2(&anonymous, &identity_url, auth).await?
        };

        Self::from_token(identity_url, api_version, token, http)
    }

    /// Build the session from an already issued token.
    pub fn from_token(
        identity_url: Url,
        api_version: ApiVersion,
        token: SecretString,
        http: &HttpSection,
    ) -> Result<Self, CatalogProviderError> {
        Ok(Self {
            client: build_client(http, Some(&token))?,
            identity_url: normalize(identity_url),
            api_version,
            token,
        })
    }

    /// Identity API version of the session.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Authenticated HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve the path relative to the identity endpoint.
    pub fn url(&self, path: &str) -> Result<Url, CatalogProviderError> {
        Ok(self.identity_url.join(path)?)
    }

    /// Release the session.
    ///
    /// On identity v3 the token is revoked. Failures are only logged since
    /// the outcome of the invocation is already determined at this point.
    #[tracing::instrument(name = "session.close", level = "debug", skip_all)]
    pub async fn close(self) {
        if self.api_version < ApiVersion::V3_0 {
            return;
        }
        let result = async {
            let url = self.url("auth/tokens")?;
            let rsp = self
                .client
                .delete(url)
                .header(X_SUBJECT_TOKEN, self.token.expose_secret())
                .send()
                .await?;
            check_status(rsp).await?;
            Ok::<(), CatalogProviderError>(())
        }
        .await;
        if let Err(e) = result {
            warn!("failed to revoke the session token: {e}");
        }
    }
}

/// Make sure the url ends with `/` so that relative paths are joined under it.
fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn build_client(
    http: &HttpSection,
    token: Option<&SecretString>,
) -> Result<Client, CatalogProviderError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
            CatalogProviderError::Authentication("token is not a valid header value".into())
        })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(X_AUTH_TOKEN), value);
    }
    Ok(Client::builder()
        .timeout(http.get_timeout())
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .danger_accept_invalid_certs(http.insecure)
        .gzip(true)
        .deflate(true)
        .default_headers(headers)
        .build()?)
}

/// Find the identity API version and the versioned endpoint.
///
/// The versioned endpoint is used as is. For the unversioned root the highest
/// usable version is picked and its `self` link becomes the endpoint.
async fn discover_version(
    client: &Client,
    auth_url: &Url,
) -> Result<(Url, ApiVersion), CatalogProviderError> {
    let rsp = client.get(auth_url.clone()).send().await?;
    // The root answers with `300 Multiple Choices`.
    let rsp = if rsp.status() == StatusCode::MULTIPLE_CHOICES {
        rsp
    } else {
        check_status(rsp).await?
    };
    let doc: VersionDocument = rsp.json().await?;

    if let Some(version) = doc.version {
        return Ok((auth_url.clone(), version.id.parse()?));
    }

    let mut candidates = Vec::new();
    for version in doc.versions.map(|list| list.values).unwrap_or_default() {
        if !version.is_usable() {
            debug!("Skipping identity API {} ({})", version.id, version.status);
            continue;
        }
        match version.id.parse::<ApiVersion>() {
            Ok(api_version) => candidates.push((api_version, version)),
            Err(e) => warn!("Ignoring identity API version entry: {e}"),
        }
    }
    let (api_version, version) = candidates
        .into_iter()
        .max_by_key(|(api_version, _)| *api_version)
        .ok_or_else(|| {
            CatalogProviderError::VersionDiscovery(format!(
                "{auth_url} does not list any usable identity API version"
            ))
        })?;
    let identity_url = version.self_link().cloned().ok_or_else(|| {
        CatalogProviderError::VersionDiscovery(format!(
            "identity API {} has no self link",
            version.id
        ))
    })?;
    Ok((normalize(identity_url), api_version))
}

async fn authenticate_v3(
    client: &Client,
    identity_url: &Url,
    auth: &AuthSection,
) -> Result<SecretString, CatalogProviderError> {
    let body = json!({"auth": {
        "identity": {
            "methods": ["password"],
            "password": {
                "user": {
                    "name": auth.username,
                    "password": auth.password.expose_secret(),
                    "domain": {"id": auth.user_domain_id},
                }
            }
        },
        "scope": {
            "project": {
                "name": auth.project_name,
                "domain": {"id": auth.project_domain_id},
            }
        }
    }});
    let rsp = client
        .post(identity_url.join("auth/tokens")?)
        .json(&body)
        .send()
        .await?;
    let rsp = check_auth_status(rsp).await?;

    rsp.headers()
        .get(X_SUBJECT_TOKEN)
        .and_then(|val| val.to_str().ok())
        .map(|val| SecretString::from(val.to_string()))
        .ok_or_else(|| {
            CatalogProviderError::Authentication("token is missing in the response".into())
        })
}

async fn authenticate_v2(
    client: &Client,
    identity_url: &Url,
    auth: &AuthSection,
) -> Result<SecretString, CatalogProviderError> {
    let body = json!({"auth": {
        "passwordCredentials": {
            "username": auth.username,
            "password": auth.password.expose_secret(),
        },
        "tenantName": auth.project_name,
    }});
    let rsp = client
        .post(identity_url.join("tokens")?)
        .json(&body)
        .send()
        .await?;
    let access: AccessResponse = check_auth_status(rsp).await?.json().await?;
    Ok(SecretString::from(access.access.token.id))
}

async fn check_auth_status(rsp: Response) -> Result<Response, CatalogProviderError> {
    match check_status(rsp).await {
        Err(CatalogProviderError::Api { status, message })
            if status == StatusCode::UNAUTHORIZED =>
        {
            Err(CatalogProviderError::Authentication(message))
        }
        other => other,
    }
}

/// Convert the non successful response into the [`CatalogProviderError::Api`]
/// error using the message from the Keystone error document when present.
pub(crate) async fn check_status(rsp: Response) -> Result<Response, CatalogProviderError> {
    let status = rsp.status();
    if status.is_success() {
        return Ok(rsp);
    }
    let body = rsp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error.message,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(CatalogProviderError::Api { status, message })
}
