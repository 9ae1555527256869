//! # Planning
//!
//! Turns a named request into the extensions that must be written.
//!
//! Planning is where every name is checked against the [`Catalog`]. A request
//! naming anything the controller does not know is rejected whole; nothing is
//! planned for it.

use crate::catalog::Catalog;
use crate::error::{LqmError, Result};
use crate::ids::{ElementId, PathId, SiteId};
use crate::kind::LqmKind;
use crate::payload::ExtensionPayload;
use crate::records::ExtensionRecord;
use crate::thresholds::Thresholds;
use std::fmt;

// =============================================================================
// REQUEST
// =============================================================================

/// What a request names, by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LqmTarget {
    Media {
        site: String,
    },
    App {
        site: String,
        element: String,
        app: String,
    },
    AllApps {
        site: String,
        element: String,
    },
}

/// One unit of work: a target plus the thresholds to apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LqmRequest {
    pub target: LqmTarget,
    pub thresholds: Thresholds,
}

impl LqmRequest {
    /// Assemble a request from optional names.
    ///
    /// Blank names count as missing. Names the kind does not use are ignored.
    pub fn new(
        kind: LqmKind,
        site: Option<&str>,
        element: Option<&str>,
        app: Option<&str>,
        thresholds: Thresholds,
    ) -> Result<Self> {
        let require = |value: Option<&str>, field: &'static str| -> Result<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(LqmError::MissingField { kind, field })
        };

        let site = require(site, "site")?;
        let target = match kind {
            LqmKind::Media => LqmTarget::Media { site },
            LqmKind::App => LqmTarget::App {
                site,
                element: require(element, "element")?,
                app: require(app, "app")?,
            },
            LqmKind::AllApps => LqmTarget::AllApps {
                site,
                element: require(element, "element")?,
            },
        };

        Ok(Self { target, thresholds })
    }

    pub fn kind(&self) -> LqmKind {
        match self.target {
            LqmTarget::Media { .. } => LqmKind::Media,
            LqmTarget::App { .. } => LqmKind::App,
            LqmTarget::AllApps { .. } => LqmKind::AllApps,
        }
    }

    pub fn site(&self) -> &str {
        match &self.target {
            LqmTarget::Media { site }
            | LqmTarget::App { site, .. }
            | LqmTarget::AllApps { site, .. } => site,
        }
    }
}

// =============================================================================
// PLANNED EXTENSION
// =============================================================================

/// Human-readable description of where an extension lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    VpnPath {
        site: String,
        element: String,
        path_name: String,
        path_id: PathId,
    },
    App {
        site: String,
        element: String,
        app: String,
    },
    AllApps {
        site: String,
        element: String,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VpnPath {
                site,
                element,
                path_name,
                path_id,
            } => write!(f, "{} {} on path {}:{}", site, element, path_name, path_id),
            Self::App { site, element, app } => write!(f, "{} {} for app {}", site, element, app),
            Self::AllApps { site, element } => write!(f, "{} {} for ALL apps", site, element),
        }
    }
}

/// An extension ready to be written to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExtension {
    pub site_id: SiteId,
    pub element_id: ElementId,
    pub target: Target,
    pub payload: ExtensionPayload,
}

// =============================================================================
// PLANNING
// =============================================================================

/// Resolve a request against the catalog.
///
/// Media requests expand to one extension per VPN path of the site and may
/// legitimately produce none. A site whose topology was never recorded is an
/// error rather than an empty plan. App and all-apps requests produce exactly one.
pub fn plan(catalog: &Catalog, request: &LqmRequest) -> Result<Vec<PlannedExtension>> {
    let site_name = request.site();
    let site_id = catalog
        .site_id(site_name)
        .cloned()
        .ok_or_else(|| LqmError::UnknownSite(site_name.to_string()))?;
    let thresholds = &request.thresholds;

    match &request.target {
        LqmTarget::Media { site } => {
            let paths = catalog
                .vpn_paths(&site_id)
                .ok_or_else(|| LqmError::TopologyUnavailable(site.clone()))?;
            Ok(paths
                .iter()
                .map(|path| {
                    let element = catalog
                        .element_name(&path.element_id)
                        .unwrap_or(path.element_id.as_str())
                        .to_string();
                    PlannedExtension {
                        site_id: site_id.clone(),
                        element_id: path.element_id.clone(),
                        target: Target::VpnPath {
                            site: site.clone(),
                            element,
                            path_name: path.name.clone(),
                            path_id: path.id.clone(),
                        },
                        payload: ExtensionPayload::media(path.id.as_str(), thresholds),
                    }
                })
                .collect())
        }
        LqmTarget::App { site, element, app } => {
            let element_id = resolve_element(catalog, &site_id, site, element)?;
            let app_id = catalog
                .app_id(app)
                .ok_or_else(|| LqmError::UnknownApp(app.clone()))?;
            Ok(vec![PlannedExtension {
                site_id,
                element_id,
                target: Target::App {
                    site: site.clone(),
                    element: element.clone(),
                    app: app.clone(),
                },
                payload: ExtensionPayload::app(app, app_id.as_str(), thresholds),
            }])
        }
        LqmTarget::AllApps { site, element } => {
            let element_id = resolve_element(catalog, &site_id, site, element)?;
            Ok(vec![PlannedExtension {
                site_id,
                element_id,
                target: Target::AllApps {
                    site: site.clone(),
                    element: element.clone(),
                },
                payload: ExtensionPayload::all_apps(thresholds),
            }])
        }
    }
}

fn resolve_element(catalog: &Catalog, site_id: &SiteId, site: &str, element: &str) -> Result<ElementId> {
    let element_id = catalog
        .element_id(element)
        .cloned()
        .ok_or_else(|| LqmError::UnknownElement(element.to_string()))?;

    if catalog.element_site(&element_id) != Some(site_id) {
        return Err(LqmError::ElementNotInSite {
            element: element.to_string(),
            site: site.to_string(),
        });
    }

    Ok(element_id)
}

/// Find the stored extension a payload would replace.
///
/// Extensions are matched on namespace and entity, which together identify
/// a threshold slot on an element.
pub fn find_existing<'a>(existing: &'a [ExtensionRecord], payload: &ExtensionPayload) -> Option<&'a ExtensionRecord> {
    existing
        .iter()
        .find(|ext| ext.namespace == payload.namespace && ext.entity_id == payload.entity_id)
}
