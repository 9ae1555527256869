//! # LQM Client - The Kit
//!
//! Typed async client for the SD-WAN controller REST API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lqm_client::{ControllerClient, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let mut client = ControllerClient::new("https://api.elcapitan.cloudgenix.com")?;
//!     client.login("ops@example.com", "secret").await?;
//!
//!     for site in client.sites().await? {
//!         println!("{} {}", site.id, site.name);
//!     }
//!
//!     client.logout().await
//! }
//! ```
//!
//! ## Session
//!
//! ```text
//! ┌───────────────┐  POST /login            ┌──────────────────┐
//! │ lqmcfg        │  GET  /profile          │ Controller       │
//! │               │ ◄─────────────────────► │                  │
//! │ ┌───────────┐ │  GET  tenants/{t}/...   │ tenant-scoped    │
//! │ │lqm-client │ │  POST tenants/{t}/...   │ REST resources   │
//! │ └───────────┘ │  GET  /logout           │                  │
//! └───────────────┘                         └──────────────────┘
//! ```
//!
//! Every tenant-scoped call needs the tenant ID learned from the profile, so
//! [`ControllerClient::login`] or [`ControllerClient::use_token`] must succeed
//! first.

use lqm_core::{
    AppDefRecord, ElementId, ElementRecord, ExtensionId, ExtensionPayload, ExtensionRecord,
    LinkRecord, SiteId, SiteRecord,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the controller client.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Controller answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Login did not produce a usable session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A tenant-scoped call was made before logging in.
    #[error("Not authenticated")]
    NotAuthenticated,
}

// =============================================================================
// API PATHS
// =============================================================================

/// Header carrying a static API token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN_PATH: &str = "/v2.0/api/login";
const LOGOUT_PATH: &str = "/v2.0/api/logout";
const PROFILE_PATH: &str = "/v2.1/api/profile";
const SITES_VERSION: &str = "v4.7";
const ELEMENTS_VERSION: &str = "v2.3";
const APPDEFS_VERSION: &str = "v2.5";
const TOPOLOGY_VERSION: &str = "v3.3";
const EXTENSIONS_VERSION: &str = "v2.0";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Operator profile; carries the tenant every other call is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    x_auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct TopologyRequest<'a> {
    #[serde(rename = "type")]
    query_type: &'static str,
    site_id: &'a SiteId,
    links_only: bool,
}

#[derive(Debug, Deserialize)]
struct Items<T> {
    items: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(default)]
    links: Option<Vec<LinkRecord>>,
}

/// Update body: the payload plus the stored extension's identity.
#[derive(Debug, Serialize)]
struct ExtensionUpdate<'a> {
    id: &'a ExtensionId,
    #[serde(rename = "_etag", skip_serializing_if = "Option::is_none")]
    etag: Option<u64>,
    #[serde(flatten)]
    payload: &'a ExtensionPayload,
}

// =============================================================================
// CLIENT OPTIONS
// =============================================================================

/// Transport settings for [`ControllerClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Accept invalid TLS certificates (lab controllers with self-signed certs).
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the controller.
///
/// Keeps a cookie store so password logins carry their session cookie, and
/// sends `X-Auth-Token` once a token is known.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    base_url: String,
    client: reqwest::Client,
    auth_token: Option<String>,
    tenant_id: Option<String>,
}

impl ControllerClient {
    /// Create a client with default options.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::with_options(base_url, &ClientOptions::default())
    }

    /// Create a client with explicit transport options.
    pub fn with_options(base_url: impl Into<String>, options: &ClientOptions) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .cookie_store(true)
            .danger_accept_invalid_certs(options.insecure)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            client,
            auth_token: None,
            tenant_id: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tenant of the current session, once logged in.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tenant_id.is_some()
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the controller rejects the credentials and
    /// [`Error::Auth`] when the resulting profile has no tenant.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Profile, Error> {
        self.auth_token = None;
        self.tenant_id = None;

        let url = self.url(LOGIN_PATH);
        debug!(%url, "login");
        let body = LoginRequest { email, password };
        let bytes = checked(self.request(Method::POST, &url).json(&body))
            .await?
            .bytes()
            .await?;
        let resp: LoginResponse = if bytes.is_empty() {
            LoginResponse::default()
        } else {
            serde_json::from_slice(&bytes)?
        };
        if let Some(token) = resp.x_auth_token {
            self.auth_token = Some(token);
        }

        self.establish_tenant().await
    }

    /// Use a static API token instead of a password login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the token contains characters that cannot
    /// be sent in a header or does not resolve to a tenant.
    pub async fn use_token(&mut self, token: &str) -> Result<Profile, Error> {
        self.tenant_id = None;
        HeaderValue::from_str(token).map_err(|e| Error::Auth(format!("Invalid token: {}", e)))?;
        self.auth_token = Some(token.to_string());

        match self.establish_tenant().await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                self.auth_token = None;
                Err(e)
            }
        }
    }

    /// Fetch the operator profile of the current session.
    pub async fn profile(&self) -> Result<Profile, Error> {
        let url = self.url(PROFILE_PATH);
        send(self.request(Method::GET, &url)).await
    }

    /// End the session. Local credentials are dropped even if the call fails.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let url = self.url(LOGOUT_PATH);
        debug!(%url, "logout");
        let result = send_empty(self.request(Method::GET, &url)).await;
        self.auth_token = None;
        self.tenant_id = None;
        result
    }

    async fn establish_tenant(&mut self) -> Result<Profile, Error> {
        let profile = self.profile().await?;
        match profile.tenant_id.clone() {
            Some(tenant) if !tenant.is_empty() => {
                self.tenant_id = Some(tenant);
                Ok(profile)
            }
            _ => Err(Error::Auth("profile has no tenant_id".to_string())),
        }
    }

    // -------------------------------------------------------------------------
    // Reference lists
    // -------------------------------------------------------------------------

    /// List all sites.
    pub async fn sites(&self) -> Result<Vec<SiteRecord>, Error> {
        let url = self.tenant_url(SITES_VERSION, "/sites")?;
        let resp: Items<SiteRecord> = send(self.request(Method::GET, &url)).await?;
        Ok(resp.items.unwrap_or_default())
    }

    /// List all elements.
    pub async fn elements(&self) -> Result<Vec<ElementRecord>, Error> {
        let url = self.tenant_url(ELEMENTS_VERSION, "/elements")?;
        let resp: Items<ElementRecord> = send(self.request(Method::GET, &url)).await?;
        Ok(resp.items.unwrap_or_default())
    }

    /// List all application definitions.
    pub async fn appdefs(&self) -> Result<Vec<AppDefRecord>, Error> {
        let url = self.tenant_url(APPDEFS_VERSION, "/appdefs")?;
        let resp: Items<AppDefRecord> = send(self.request(Method::GET, &url)).await?;
        Ok(resp.items.unwrap_or_default())
    }

    /// Links of a site's base network topology.
    pub async fn vpn_links(&self, site_id: &SiteId) -> Result<Vec<LinkRecord>, Error> {
        let url = self.tenant_url(TOPOLOGY_VERSION, "/topology")?;
        let body = TopologyRequest {
            query_type: "basenet",
            site_id,
            links_only: true,
        };
        let resp: Links = send(self.request(Method::POST, &url).json(&body)).await?;
        Ok(resp.links.unwrap_or_default())
    }

    // -------------------------------------------------------------------------
    // Element extensions
    // -------------------------------------------------------------------------

    /// Extensions stored on an element.
    pub async fn element_extensions(
        &self,
        site_id: &SiteId,
        element_id: &ElementId,
    ) -> Result<Vec<ExtensionRecord>, Error> {
        let url = self.extensions_url(site_id, element_id)?;
        let resp: Items<ExtensionRecord> = send(self.request(Method::GET, &url)).await?;
        Ok(resp.items.unwrap_or_default())
    }

    /// Create a new extension on an element.
    pub async fn create_element_extension(
        &self,
        site_id: &SiteId,
        element_id: &ElementId,
        payload: &ExtensionPayload,
    ) -> Result<ExtensionRecord, Error> {
        let url = self.extensions_url(site_id, element_id)?;
        debug!(%url, name = %payload.name, "create extension");
        send(self.request(Method::POST, &url).json(payload)).await
    }

    /// Replace a stored extension with a new payload.
    pub async fn update_element_extension(
        &self,
        site_id: &SiteId,
        element_id: &ElementId,
        existing: &ExtensionRecord,
        payload: &ExtensionPayload,
    ) -> Result<ExtensionRecord, Error> {
        let url = format!("{}/{}", self.extensions_url(site_id, element_id)?, existing.id);
        debug!(%url, name = %payload.name, "update extension");
        let body = ExtensionUpdate {
            id: &existing.id,
            etag: existing.etag,
            payload,
        };
        send(self.request(Method::PUT, &url).json(&body)).await
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn tenant_url(&self, version: &str, path: &str) -> Result<String, Error> {
        let tenant = self.tenant_id.as_deref().ok_or(Error::NotAuthenticated)?;
        Ok(self.url(&format!("/{}/api/tenants/{}{}", version, tenant, path)))
    }

    fn extensions_url(&self, site_id: &SiteId, element_id: &ElementId) -> Result<String, Error> {
        self.tenant_url(
            EXTENSIONS_VERSION,
            &format!("/sites/{}/elements/{}/extensions", site_id, element_id),
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.auth_headers() {
            Some(headers) => builder.headers(headers),
            None => builder,
        }
    }

    fn auth_headers(&self) -> Option<HeaderMap> {
        let token = self.auth_token.as_deref()?;
        let value = HeaderValue::from_str(token).ok()?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, value);
        Some(headers)
    }
}

async fn checked(builder: RequestBuilder) -> Result<reqwest::Response, Error> {
    let resp = builder.send().await?;
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }
}

async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, Error> {
    let bytes = checked(builder).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn send_empty(builder: RequestBuilder) -> Result<(), Error> {
    checked(builder).await.map(|_| ())
}
