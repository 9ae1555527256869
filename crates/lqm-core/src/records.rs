//! Controller records the catalog is built from.
//!
//! Only the fields name resolution needs are modelled; everything else the
//! controller returns is ignored during deserialization.

use crate::ids::{AppId, ElementId, ExtensionId, PathId, SiteId};
use serde::{Deserialize, Serialize};

/// A site as listed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: SiteId,
    pub name: String,
}

/// An element (branch or data-center appliance).
///
/// Unclaimed elements may have no name and no site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site_id: Option<SiteId>,
}

/// An application definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefRecord {
    pub id: AppId,
    pub display_name: String,
}

/// A link from a site topology query.
///
/// Only links of type `vpn` carry the path and endpoint fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(rename = "type")]
    pub link_type: String,
    #[serde(default)]
    pub path_id: Option<PathId>,
    #[serde(default)]
    pub source_node_id: Option<ElementId>,
    #[serde(default)]
    pub source_site_name: Option<String>,
    #[serde(default)]
    pub source_wan_network: Option<String>,
    #[serde(default)]
    pub target_wan_network: Option<String>,
    #[serde(default)]
    pub target_site_name: Option<String>,
}

impl LinkRecord {
    /// Link type the controller uses for secure fabric paths.
    pub const VPN: &'static str = "vpn";

    pub fn is_vpn(&self) -> bool {
        self.link_type == Self::VPN
    }

    /// `<src site>:<src wan> - <dst wan>:<dst site>`, with blanks for gaps.
    pub fn display_name(&self) -> String {
        let part = |v: &Option<String>| v.clone().unwrap_or_default();
        format!(
            "{}:{} - {}:{}",
            part(&self.source_site_name),
            part(&self.source_wan_network),
            part(&self.target_wan_network),
            part(&self.target_site_name)
        )
    }
}

/// An extension already stored on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub id: ExtensionId,
    #[serde(default)]
    pub name: Option<String>,
    pub namespace: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Revision tag the controller requires on updates.
    #[serde(rename = "_etag", default)]
    pub etag: Option<u64>,
}
