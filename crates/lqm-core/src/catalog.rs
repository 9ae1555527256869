//! # Catalog
//!
//! Translation tables between the names operators use and the IDs the
//! controller expects.
//!
//! Tables use BTreeMap so iteration (and therefore the order extensions are
//! written in) is stable across runs. When two records share a name, the one
//! seen last wins.

use crate::ids::{AppId, ElementId, PathId, SiteId};
use crate::records::{AppDefRecord, ElementRecord, LinkRecord, SiteRecord};
use std::collections::BTreeMap;

/// A VPN path terminating on a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpnPath {
    pub id: PathId,
    /// Element on the local end of the path; extensions are written here.
    pub element_id: ElementId,
    /// `<src site>:<src wan> - <dst wan>:<dst site>`
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementEntry {
    name: String,
    site_id: SiteId,
}

/// Name/ID translation tables for one controller tenant.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    site_ids: BTreeMap<String, SiteId>,
    site_names: BTreeMap<SiteId, String>,
    element_ids: BTreeMap<String, ElementId>,
    elements: BTreeMap<ElementId, ElementEntry>,
    app_ids: BTreeMap<String, AppId>,
    app_names: BTreeMap<AppId, String>,
    site_paths: BTreeMap<SiteId, Vec<VpnPath>>,
}

impl Catalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn site_id(&self, name: &str) -> Option<&SiteId> {
        self.site_ids.get(name)
    }

    pub fn site_name(&self, id: &SiteId) -> Option<&str> {
        self.site_names.get(id).map(String::as_str)
    }

    pub fn element_id(&self, name: &str) -> Option<&ElementId> {
        self.element_ids.get(name)
    }

    pub fn element_name(&self, id: &ElementId) -> Option<&str> {
        self.elements.get(id).map(|e| e.name.as_str())
    }

    /// Site the element is assigned to.
    pub fn element_site(&self, id: &ElementId) -> Option<&SiteId> {
        self.elements.get(id).map(|e| &e.site_id)
    }

    pub fn app_id(&self, name: &str) -> Option<&AppId> {
        self.app_ids.get(name)
    }

    pub fn app_name(&self, id: &AppId) -> Option<&str> {
        self.app_names.get(id).map(String::as_str)
    }

    /// VPN paths of a site.
    ///
    /// `None` means topology was never recorded for the site, while an empty
    /// slice means the site has no VPN paths.
    pub fn vpn_paths(&self, site: &SiteId) -> Option<&[VpnPath]> {
        self.site_paths.get(site).map(Vec::as_slice)
    }

    /// Catalogued site IDs, in ID order.
    pub fn site_ids(&self) -> impl Iterator<Item = &SiteId> {
        self.site_names.keys()
    }

    pub fn site_count(&self) -> usize {
        self.site_names.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn app_count(&self) -> usize {
        self.app_names.len()
    }

    pub fn path_count(&self) -> usize {
        self.site_paths.values().map(Vec::len).sum()
    }
}

/// Incremental builder for [`Catalog`].
///
/// Sites must be added before their topology so links can be attributed to a
/// known site.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Record sites, skipping the unassigned pseudo-site.
    pub fn sites(mut self, records: impl IntoIterator<Item = SiteRecord>) -> Self {
        for site in records {
            if site.id.is_unassigned() {
                continue;
            }
            self.catalog.site_ids.insert(site.name.clone(), site.id.clone());
            self.catalog.site_names.insert(site.id, site.name);
        }
        self
    }

    /// Record elements, skipping unassigned or unnamed ones.
    pub fn elements(mut self, records: impl IntoIterator<Item = ElementRecord>) -> Self {
        for elem in records {
            let (Some(name), Some(site_id)) = (elem.name, elem.site_id) else {
                continue;
            };
            if site_id.is_unassigned() {
                continue;
            }
            self.catalog.element_ids.insert(name.clone(), elem.id.clone());
            self.catalog
                .elements
                .insert(elem.id, ElementEntry { name, site_id });
        }
        self
    }

    /// Record application definitions by display name.
    pub fn appdefs(mut self, records: impl IntoIterator<Item = AppDefRecord>) -> Self {
        for app in records {
            self.catalog.app_ids.insert(app.display_name.clone(), app.id.clone());
            self.catalog.app_names.insert(app.id, app.display_name);
        }
        self
    }

    /// Record the topology links of one site.
    ///
    /// Non-VPN links and VPN links missing their path or source element are
    /// ignored. The site gets an entry even when no VPN path survives, so
    /// "no VPNs" can be told apart from "topology unknown".
    pub fn topology(mut self, site: &SiteId, links: impl IntoIterator<Item = LinkRecord>) -> Self {
        let paths = links
            .into_iter()
            .filter(LinkRecord::is_vpn)
            .filter_map(|link| {
                let name = link.display_name();
                Some(VpnPath {
                    id: link.path_id?,
                    element_id: link.source_node_id?,
                    name,
                })
            })
            .collect();
        self.catalog.site_paths.insert(site.clone(), paths);
        self
    }

    /// Sites recorded so far; these are the sites whose topology is wanted.
    pub fn site_ids(&self) -> Vec<SiteId> {
        self.catalog.site_names.keys().cloned().collect()
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn site(id: &str, name: &str) -> SiteRecord {
        SiteRecord {
            id: SiteId::from(id),
            name: name.to_string(),
        }
    }

    pub(crate) fn element(id: &str, name: &str, site_id: &str) -> ElementRecord {
        ElementRecord {
            id: ElementId::from(id),
            name: Some(name.to_string()),
            site_id: Some(SiteId::from(site_id)),
        }
    }

    pub(crate) fn app(id: &str, name: &str) -> AppDefRecord {
        AppDefRecord {
            id: AppId::from(id),
            display_name: name.to_string(),
        }
    }

    pub(crate) fn vpn_link(path: &str, element_id: &str, src: &str, dst: &str) -> LinkRecord {
        LinkRecord {
            link_type: LinkRecord::VPN.to_string(),
            path_id: Some(PathId::from(path)),
            source_node_id: Some(ElementId::from(element_id)),
            source_site_name: Some(src.to_string()),
            source_wan_network: Some("ISP".to_string()),
            target_wan_network: Some("MPLS".to_string()),
            target_site_name: Some(dst.to_string()),
        }
    }

    /// Two branches and a data center; Branch-A has two VPN paths.
    pub(crate) fn sample() -> Catalog {
        let branch_a = SiteId::from("s-a");
        let branch_b = SiteId::from("s-b");
        Catalog::builder()
            .sites([
                site("1", "Unassigned"),
                site("s-a", "Branch-A"),
                site("s-b", "Branch-B"),
                site("s-dc", "DC"),
            ])
            .elements([
                element("e-a", "branch-a-ion", "s-a"),
                element("e-b", "branch-b-ion", "s-b"),
                element("e-spare", "spare-ion", "1"),
            ])
            .appdefs([app("a-zoom", "zoom"), app("a-o365", "office365")])
            .topology(
                &branch_a,
                [
                    vpn_link("p-1", "e-a", "Branch-A", "DC"),
                    vpn_link("p-2", "e-a", "Branch-A", "DC"),
                    LinkRecord {
                        link_type: "internet-stub".to_string(),
                        path_id: None,
                        source_node_id: None,
                        source_site_name: None,
                        source_wan_network: None,
                        target_wan_network: None,
                        target_site_name: None,
                    },
                ],
            )
            .topology(&branch_b, Vec::new())
            .build()
    }

    #[test]
    fn unassigned_site_skipped() {
        let catalog = sample();
        assert!(catalog.site_id("Unassigned").is_none());
        assert_eq!(catalog.site_count(), 3);
    }

    #[test]
    fn site_lookup_both_directions() {
        let catalog = sample();
        let id = catalog.site_id("Branch-A").cloned();
        assert_eq!(id, Some(SiteId::from("s-a")));
        assert_eq!(catalog.site_name(&SiteId::from("s-a")), Some("Branch-A"));
    }

    #[test]
    fn unassigned_element_skipped() {
        let catalog = sample();
        assert!(catalog.element_id("spare-ion").is_none());
        assert_eq!(catalog.element_count(), 2);
    }

    #[test]
    fn unnamed_element_skipped() {
        let catalog = Catalog::builder()
            .elements([ElementRecord {
                id: ElementId::from("e-x"),
                name: None,
                site_id: Some(SiteId::from("s-a")),
            }])
            .build();
        assert_eq!(catalog.element_count(), 0);
    }

    #[test]
    fn element_site_recorded() {
        let catalog = sample();
        let site = catalog.element_site(&ElementId::from("e-b"));
        assert_eq!(site, Some(&SiteId::from("s-b")));
    }

    #[test]
    fn apps_by_display_name() {
        let catalog = sample();
        assert_eq!(catalog.app_id("zoom"), Some(&AppId::from("a-zoom")));
        assert_eq!(catalog.app_name(&AppId::from("a-o365")), Some("office365"));
    }

    #[test]
    fn only_vpn_links_become_paths() {
        let catalog = sample();
        let paths = catalog.vpn_paths(&SiteId::from("s-a")).unwrap_or_default();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].name, "Branch-A:ISP - MPLS:DC");
        assert_eq!(paths[0].element_id, ElementId::from("e-a"));
    }

    #[test]
    fn empty_topology_distinct_from_unknown() {
        let catalog = sample();
        assert_eq!(catalog.vpn_paths(&SiteId::from("s-b")).map(<[_]>::len), Some(0));
        assert!(catalog.vpn_paths(&SiteId::from("s-dc")).is_none());
    }

    #[test]
    fn later_duplicate_name_wins() {
        let catalog = Catalog::builder()
            .sites([site("s-1", "Branch"), site("s-2", "Branch")])
            .build();
        assert_eq!(catalog.site_id("Branch"), Some(&SiteId::from("s-2")));
    }

    #[test]
    fn path_count_sums_sites() {
        assert_eq!(sample().path_count(), 2);
    }
}
