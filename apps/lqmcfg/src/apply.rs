//! Catalog building and extension writes.

use lqm_client::{ControllerClient, Error as ClientError};
use lqm_core::{
    Catalog, ElementId, ExtensionRecord, LqmKind, LqmRequest, PlannedExtension, Result as LqmResult,
    find_existing, plan,
};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Extensions created.
    pub created: usize,
    /// Existing extensions replaced.
    pub updated: usize,
    /// Writes the controller refused.
    pub failed: usize,
    /// CSV rows that could not be parsed.
    pub skipped: usize,
    /// Extensions resolved but not written (dry run).
    pub planned: usize,
}

impl RunSummary {
    pub fn configured(&self) -> usize {
        self.created + self.updated
    }

    /// Nothing failed and no row was skipped.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn log(&self) {
        info!(
            created = self.created,
            updated = self.updated,
            failed = self.failed,
            skipped = self.skipped,
            planned = self.planned,
            "Run complete"
        );
    }
}

/// Fetch reference lists and build the translation tables.
///
/// Site, element, and application lists are mandatory. Topology is fetched
/// per site for media thresholds only; a site whose topology cannot be read
/// is logged and left without topology, so planning for it fails.
pub async fn build_catalog(client: &ControllerClient, kind: LqmKind) -> Result<Catalog, ClientError> {
    info!("Building translation tables");

    debug!("fetching sites");
    let sites = client.sites().await?;
    debug!("fetching elements");
    let elements = client.elements().await?;
    debug!("fetching appdefs");
    let appdefs = client.appdefs().await?;

    let mut builder = Catalog::builder().sites(sites).elements(elements).appdefs(appdefs);

    if kind.needs_topology() {
        debug!("fetching VPN topology");
        for site_id in builder.site_ids() {
            match client.vpn_links(&site_id).await {
                Ok(links) => builder = builder.topology(&site_id, links),
                Err(err) => warn!(site = %site_id, "Could not read topology: {}", err),
            }
        }
    }

    let catalog = builder.build();
    info!(
        sites = catalog.site_count(),
        elements = catalog.element_count(),
        apps = catalog.app_count(),
        vpn_paths = catalog.path_count(),
        "Translation tables ready"
    );
    Ok(catalog)
}

/// How writes are carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

enum Written {
    Created,
    Updated,
}

/// Plan one request and write its extensions.
///
/// Name resolution failures are returned; write failures are logged,
/// counted, and do not stop the remaining writes.
pub async fn apply_request(
    client: &ControllerClient,
    catalog: &Catalog,
    request: &LqmRequest,
    options: ApplyOptions,
    summary: &mut RunSummary,
) -> LqmResult<()> {
    let planned = plan(catalog, request)?;
    if planned.is_empty() {
        info!("No VPNs on site {}", request.site());
        return Ok(());
    }

    let mut stored: BTreeMap<ElementId, Vec<ExtensionRecord>> = BTreeMap::new();
    for item in &planned {
        if options.dry_run {
            let body = serde_json::to_string(&item.payload).unwrap_or_default();
            info!("Dry run: would configure {}: {}", item.target, body);
            summary.planned += 1;
            continue;
        }

        match write_extension(client, item, &mut stored).await {
            Ok(Written::Created) => {
                info!("LQM thresholds added to {}", item.target);
                summary.created += 1;
            }
            Ok(Written::Updated) => {
                info!("LQM thresholds updated on {}", item.target);
                summary.updated += 1;
            }
            Err(err) => {
                error!("Could not configure LQM threshold on {}", item.target);
                error!("{}", err);
                summary.failed += 1;
            }
        }
    }

    Ok(())
}

/// Create the extension, or update it when the element already carries one
/// for the same namespace and entity.
///
/// `stored` caches each element's extension list for the duration of a
/// request, so media paths sharing an element list it once.
async fn write_extension(
    client: &ControllerClient,
    item: &PlannedExtension,
    stored: &mut BTreeMap<ElementId, Vec<ExtensionRecord>>,
) -> Result<Written, ClientError> {
    if !stored.contains_key(&item.element_id) {
        let list = client
            .element_extensions(&item.site_id, &item.element_id)
            .await?;
        stored.insert(item.element_id.clone(), list);
    }
    let on_element = stored.entry(item.element_id.clone()).or_default();

    match find_existing(on_element, &item.payload).cloned() {
        Some(existing) => {
            let updated = client
                .update_element_extension(&item.site_id, &item.element_id, &existing, &item.payload)
                .await?;
            on_element.retain(|ext| ext.id != existing.id);
            on_element.push(updated);
            Ok(Written::Updated)
        }
        None => {
            let created = client
                .create_element_extension(&item.site_id, &item.element_id, &item.payload)
                .await?;
            on_element.push(created);
            Ok(Written::Created)
        }
    }
}
