use tracing::{debug, warn};

use travbot_game::models::{
    buildings::{Building, SiteLabel},
    village::{VillageSnapshot, is_resource_site, is_village_site},
};
use travbot_types::{buildings::BuildingName, errors::WorkflowError};

use crate::{
    driver::PageDriver,
    locators::Locator,
    parsers::{parse_site_id, parse_site_label},
    screens::{Screen, open_screen},
};

const HREF: &str = "href";
const ALT: &str = "alt";

/// Reads which building stands on which site.
///
/// Any marker that can't be parsed fails the whole read: a partial picture of
/// the village is never returned.
pub struct VillageInspector<'a> {
    driver: &'a dyn PageDriver,
    server_url: &'a str,
}

impl<'a> VillageInspector<'a> {
    pub fn new(driver: &'a dyn PageDriver, server_url: &'a str) -> Self {
        Self { driver, server_url }
    }

    /// Listing screen that shows a building type.
    pub fn screen_for(name: &BuildingName) -> Screen {
        if name.is_resource_field() {
            Screen::Overview
        } else {
            Screen::Village
        }
    }

    /// Parses every site marker of a listing screen.
    pub async fn scan(&self, screen: Screen) -> Result<VillageSnapshot, WorkflowError> {
        open_screen(self.driver, self.server_url, &screen).await?;

        let rows = self
            .driver
            .read_all_attributes(&Locator::SiteMarkers, &[HREF, ALT])
            .await;

        let mut sites = Vec::with_capacity(rows.len());
        for row in rows {
            let (Some(href), Some(alt)) = (row.first(), row.get(1)) else {
                return Err(WorkflowError::parse("site marker", row.join("|")));
            };

            let site_id = parse_site_id(href).ok_or_else(|| {
                warn!("Unreadable site link {href:?}");
                WorkflowError::parse("site id", href)
            })?;

            let on_screen = match screen {
                Screen::Overview => is_resource_site(site_id),
                _ => is_village_site(site_id),
            };
            if !on_screen {
                debug!("Skipping marker for site {site_id} on {screen:?}");
                continue;
            }

            let label = parse_site_label(alt).ok_or_else(|| {
                warn!("Unreadable label {alt:?} on site {site_id}");
                WorkflowError::parse("site label", alt)
            })?;
            sites.push((site_id, label));
        }

        let snapshot = VillageSnapshot::from_sites(sites);
        debug!(?screen, "Scanned {} building types", snapshot.iter().count());

        Ok(snapshot)
    }

    /// Occurrences of `name`, ascending by level then descending by site.
    pub async fn get_buildings(&self, name: BuildingName) -> Result<Vec<Building>, WorkflowError> {
        let snapshot = self.scan(Self::screen_for(&name)).await?;
        Ok(snapshot.occurrences(&name).to_vec())
    }

    /// Highest level occurrence of `name`.
    pub async fn find_building(
        &self,
        name: BuildingName,
    ) -> Result<Option<Building>, WorkflowError> {
        Ok(self.get_buildings(name).await?.last().copied())
    }

    /// Both listing screens, failing on the first unreadable one.
    pub async fn village_snapshot(&self) -> Result<VillageSnapshot, WorkflowError> {
        let mut snapshot = self.scan(Screen::Overview).await?;
        snapshot.merge(self.scan(Screen::Village).await?);

        Ok(snapshot)
    }

    /// Free village sites, ascending.
    pub async fn empty_places(&self) -> Result<Vec<u8>, WorkflowError> {
        Ok(self.scan(Screen::Village).await?.empty_places())
    }

    /// Label of a single site, read from its listing screen.
    pub async fn site_label(&self, site_id: u8) -> Result<SiteLabel, WorkflowError> {
        if !is_resource_site(site_id) && !is_village_site(site_id) {
            return Err(WorkflowError::InvalidSite { site_id });
        }
        open_screen(self.driver, self.server_url, &Screen::listing_for(site_id)).await?;

        let alt = self
            .driver
            .read_attribute(&Locator::SiteMarker(site_id), ALT)
            .await
            .ok_or(WorkflowError::InvalidSite { site_id })?;

        parse_site_label(&alt).ok_or_else(|| {
            warn!("Unreadable label {alt:?} on site {site_id}");
            WorkflowError::parse("site label", alt)
        })
    }
}
