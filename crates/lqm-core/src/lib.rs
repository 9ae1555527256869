//! # LQM Core
//!
//! Name resolution and payload construction for link-quality-monitoring
//! threshold extensions.
//!
//! The controller addresses everything by opaque IDs while operators think in
//! names. This crate holds the translation tables built from the controller's
//! reference lists ([`Catalog`]) and turns a named request ([`LqmRequest`])
//! into the concrete extensions that must be written ([`PlannedExtension`]).
//!
//! ## Flow
//!
//! ```text
//! sites / elements / appdefs / topology      LqmRequest
//!            │                                   │
//!            ▼                                   ▼
//!      CatalogBuilder ──► Catalog ──► plan() ──► Vec<PlannedExtension>
//!                                                │
//!                                                ▼
//!                                  ExtensionPayload (JSON body)
//! ```
//!
//! Nothing here performs I/O. Fetching records and sending payloads is the
//! job of `lqm-client` and the `lqmcfg` binary.

pub mod catalog;
pub mod error;
pub mod ids;
pub mod kind;
pub mod payload;
pub mod plan;
pub mod records;
pub mod thresholds;

pub use catalog::{Catalog, CatalogBuilder, VpnPath};
pub use error::{LqmError, Result};
pub use ids::{AppId, ElementId, ExtensionId, PathId, SiteId};
pub use kind::LqmKind;
pub use payload::{AppConf, ExtensionConf, ExtensionPayload, MediaConf};
pub use plan::{LqmRequest, LqmTarget, PlannedExtension, Target, find_existing, plan};
pub use records::{AppDefRecord, ElementRecord, ExtensionRecord, LinkRecord, SiteRecord};
pub use thresholds::Thresholds;
