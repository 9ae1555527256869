//! JSON bodies for threshold extensions.
//!
//! Field names and order follow what the controller stores for the
//! `thresholds/lqm/*` namespaces.

use crate::kind::LqmKind;
use crate::thresholds::Thresholds;
use serde::{Deserialize, Serialize};

/// Name shared by every all-applications extension.
pub const ALL_APPS_EXTENSION_NAME: &str = "lqm_all";

/// An element extension as sent to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionPayload {
    pub name: String,
    pub namespace: String,
    /// Entity the thresholds apply to. `None` for all-applications.
    pub entity_id: Option<String>,
    pub disabled: bool,
    pub conf: ExtensionConf,
}

/// Namespace-specific configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtensionConf {
    Media(MediaConf),
    App(AppConf),
}

/// `conf` for `thresholds/lqm/media`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConf {
    pub max_pkt_loss: Option<u32>,
    pub max_jitter: Option<u32>,
    pub max_latency: Option<u32>,
}

/// `conf` for `thresholds/lqm/app` and `thresholds/lqm/app/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConf {
    pub latency: Option<u32>,
    pub latency_en: bool,
    pub jitter: Option<u32>,
    pub jitter_en: bool,
    pub packet_loss: Option<u32>,
    pub packet_loss_en: bool,
}

impl From<&Thresholds> for MediaConf {
    fn from(t: &Thresholds) -> Self {
        Self {
            max_pkt_loss: t.packet_loss,
            max_jitter: t.jitter,
            max_latency: t.latency,
        }
    }
}

impl From<&Thresholds> for AppConf {
    fn from(t: &Thresholds) -> Self {
        Self {
            latency: t.latency,
            latency_en: t.latency_enabled(),
            jitter: t.jitter,
            jitter_en: t.jitter_enabled(),
            packet_loss: t.packet_loss,
            packet_loss_en: t.packet_loss_enabled(),
        }
    }
}

impl ExtensionPayload {
    /// Media thresholds for one VPN path.
    pub fn media(path_id: &str, thresholds: &Thresholds) -> Self {
        Self {
            name: format!("{}_lqm", path_id),
            namespace: LqmKind::Media.namespace().to_string(),
            entity_id: Some(path_id.to_string()),
            disabled: false,
            conf: ExtensionConf::Media(thresholds.into()),
        }
    }

    /// Thresholds for a single application, named after the application.
    pub fn app(app_name: &str, app_id: &str, thresholds: &Thresholds) -> Self {
        Self {
            name: format!("{}_lqm", app_name),
            namespace: LqmKind::App.namespace().to_string(),
            entity_id: Some(app_id.to_string()),
            disabled: false,
            conf: ExtensionConf::App(thresholds.into()),
        }
    }

    /// Thresholds covering every application on the element.
    pub fn all_apps(thresholds: &Thresholds) -> Self {
        Self {
            name: ALL_APPS_EXTENSION_NAME.to_string(),
            namespace: LqmKind::AllApps.namespace().to_string(),
            entity_id: None,
            disabled: false,
            conf: ExtensionConf::App(thresholds.into()),
        }
    }
}
