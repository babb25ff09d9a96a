//! In-memory game for tests.
//!
//! [`MockGame`] renders the few pages the workflow reads (listings, site
//! contracts, the demolition panel, the login form) from a plain map of sites,
//! and plays the game rules the workflow depends on: costs, storage capacity,
//! resource production, a single build queue and demolitions. Time only moves
//! when the workflow sleeps on it.

use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use travbot_game::{
    catalog::Catalog,
    models::village::{RALLY_POINT_SITE_ID, WALL_SITE_ID, is_village_site, reserved_site},
    test_utils::village_sites_factory,
};
use travbot_types::{
    buildings::{BuildingGroup, BuildingName, StorageKind},
    common::ResourceGroup,
    errors::DriverError,
};

use crate::{
    app::BotBus,
    config::Config,
    driver::{GameClock, PageDriver, PageLoad, TEXT},
    locators::{Contract, Locator},
    screens::Screen,
};

pub const MOCK_SERVER_URL: &str = "https://ts1.travbot.test";
/// Capacity of each storage kind while none is built.
pub const BASE_STORAGE: u32 = 800;

/// Cost of raising a building to `level`.
pub fn mock_cost(level: u8) -> ResourceGroup {
    let f = level as u32;
    ResourceGroup::new(80 * f, 70 * f, 60 * f, 30 * f)
}

pub fn mock_duration(level: u8) -> u32 {
    60 * level as u32
}

pub fn mock_demolition_duration(level: u8) -> u32 {
    30 * level.max(1) as u32
}

/// Total capacity of the given storage levels.
pub fn storage_capacity(levels: &[u8]) -> u32 {
    if levels.is_empty() {
        return BASE_STORAGE;
    }
    levels
        .iter()
        .map(|level| BASE_STORAGE + 400 * *level as u32)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub site_id: u8,
    pub building: BuildingName,
    pub level: u8,
}

#[derive(Debug, Clone)]
pub struct MockGameOptions {
    /// Occupied sites: `site_id -> (building, level)`.
    pub sites: BTreeMap<u8, (BuildingName, u8)>,
    /// Wall type offered on the wall site.
    pub wall: BuildingName,
    pub stock: ResourceGroup,
    /// Production per second.
    pub production: ResourceGroup,
    /// A construction already running on site 1, ending after this many seconds.
    pub busy_workers_secs: Option<u32>,
    /// Timers show a trailing `?` until the page is refreshed.
    pub jammed_timers: bool,
    /// Starts logged out, expecting these credentials.
    pub credentials: Option<(String, String)>,
    pub unreachable: bool,
    /// Replace the label of a site marker.
    pub label_overrides: Vec<(u8, String)>,
}

impl Default for MockGameOptions {
    fn default() -> Self {
        Self {
            sites: village_sites_factory(Default::default()),
            wall: BuildingName::CityWall,
            stock: ResourceGroup::new(750, 750, 750, 750),
            production: ResourceGroup::new(5, 5, 5, 5),
            busy_workers_secs: None,
            jammed_timers: false,
            credentials: None,
            unreachable: false,
            label_overrides: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Work {
    site_id: u8,
    building: BuildingName,
    level: u8,
    finishes_at: u64,
}

/// A contract the current page offers.
#[derive(Debug, Clone, Copy)]
struct Offer {
    site_id: u8,
    building: BuildingName,
    level: u8,
    contract: Contract,
}

#[derive(Debug, Default)]
struct Blockers {
    max_level: bool,
    storage: Option<StorageKind>,
    shortage_secs: Option<u64>,
    workers_busy: bool,
}

impl Blockers {
    fn clear(&self) -> bool {
        !self.max_level && self.storage.is_none() && self.shortage_secs.is_none() && !self.workers_busy
    }
}

#[derive(Debug)]
struct MockState {
    url: String,
    sites: BTreeMap<u8, (BuildingName, u8)>,
    wall: BuildingName,
    stock: ResourceGroup,
    production: ResourceGroup,
    now: u64,
    construction: Option<Work>,
    demolition: Option<Work>,
    demolish_selected: Option<u8>,
    jammed: bool,
    credentials: Option<(String, String)>,
    typed_name: String,
    typed_password: String,
    logged_in: bool,
    unreachable: bool,
    label_overrides: BTreeMap<u8, String>,
    navigations: Vec<String>,
    clicks: Vec<Locator>,
    submissions: Vec<Submission>,
    demolitions: Vec<u8>,
    refreshes: u32,
}

pub struct MockGame {
    catalog: Catalog,
    server_url: String,
    state: Mutex<MockState>,
}

impl MockGame {
    pub fn new(options: MockGameOptions) -> Self {
        let construction = options.busy_workers_secs.map(|secs| {
            let (building, level) = options
                .sites
                .get(&1)
                .copied()
                .unwrap_or((BuildingName::Woodcutter, 0));
            Work {
                site_id: 1,
                building,
                level: level + 1,
                finishes_at: secs as u64,
            }
        });

        let state = MockState {
            url: "about:blank".to_string(),
            sites: options.sites,
            wall: options.wall,
            stock: options.stock,
            production: options.production,
            now: 0,
            construction,
            demolition: None,
            demolish_selected: None,
            jammed: options.jammed_timers,
            logged_in: options.credentials.is_none(),
            credentials: options.credentials,
            typed_name: String::new(),
            typed_password: String::new(),
            unreachable: options.unreachable,
            label_overrides: options.label_overrides.into_iter().collect(),
            navigations: vec![],
            clicks: vec![],
            submissions: vec![],
            demolitions: vec![],
            refreshes: 0,
        };

        Self {
            catalog: Catalog::embedded().unwrap(),
            server_url: MOCK_SERVER_URL.to_string(),
            state: Mutex::new(state),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn demolitions(&self) -> Vec<u8> {
        self.state.lock().unwrap().demolitions.clone()
    }

    pub fn refreshes(&self) -> u32 {
        self.state.lock().unwrap().refreshes
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.state.lock().unwrap().now
    }

    pub fn site(&self, site_id: u8) -> Option<(BuildingName, u8)> {
        self.state.lock().unwrap().sites.get(&site_id).copied()
    }

    pub fn stock(&self) -> ResourceGroup {
        self.state.lock().unwrap().stock
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.lock().unwrap().logged_in
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState, &Catalog) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state, &self.catalog)
    }
}

impl MockState {
    fn screen(&self) -> Option<Screen> {
        Screen::from_url(&self.url)
    }

    fn label(&self, site_id: u8) -> String {
        if let Some(label) = self.label_overrides.get(&site_id) {
            return label.clone();
        }
        match self.sites.get(&site_id) {
            Some((name, level)) => format!("{name} level {level}"),
            None if site_id == RALLY_POINT_SITE_ID => "Build a Rally Point".to_string(),
            None if site_id == WALL_SITE_ID => format!("Build a {}", self.wall),
            None => "Empty place".to_string(),
        }
    }

    fn markers(&self) -> Vec<(u8, String)> {
        let range = match self.screen() {
            Some(Screen::Overview) => 1..=18,
            Some(Screen::Village) => 19..=40,
            _ => return vec![],
        };

        let mut markers = vec![];
        for site_id in range {
            markers.push((site_id, self.label(site_id)));
            // the game draws a built wall with two markers
            if site_id == WALL_SITE_ID && self.sites.contains_key(&site_id) {
                markers.push((site_id, self.label(site_id)));
            }
        }
        markers
    }

    fn highest_level(&self, name: BuildingName) -> Option<u8> {
        self.sites
            .values()
            .filter(|(building, _)| *building == name)
            .map(|(_, level)| *level)
            .max()
    }

    fn capacity(&self, kind: StorageKind) -> u32 {
        let levels: Vec<u8> = self
            .sites
            .values()
            .filter(|(building, level)| *building == kind.building() && *level > 0)
            .map(|(_, level)| *level)
            .collect();
        storage_capacity(&levels)
    }

    fn main_building_page(&self) -> bool {
        let Some(Screen::Site { site_id, .. }) = self.screen() else {
            return false;
        };
        self.sites
            .get(&site_id)
            .is_some_and(|(name, level)| *name == BuildingName::MainBuilding && *level > 0)
    }

    fn offer(&self, contract: Contract, catalog: &Catalog) -> Option<Offer> {
        let Some(Screen::Site { site_id, category }) = self.screen() else {
            return None;
        };

        match contract {
            Contract::Upgrade => {
                let (building, level) = self.sites.get(&site_id)?;
                Some(Offer {
                    site_id,
                    building: *building,
                    level: level + 1,
                    contract,
                })
            }
            Contract::New(building) => {
                let info = catalog.building(&building);
                let reserved_ok = match reserved_site(&building) {
                    Some(reserved) => reserved == site_id,
                    None => site_id != RALLY_POINT_SITE_ID && site_id != WALL_SITE_ID,
                };
                let offered = !self.sites.contains_key(&site_id)
                    && is_village_site(site_id)
                    && info.group != BuildingGroup::Resources
                    && reserved_ok
                    && (!building.is_wall() || building == self.wall)
                    && category.unwrap_or(1) == info.group.category()
                    && (info.duplicates || self.highest_level(building).is_none())
                    && info.requirements.iter().all(|requirement| {
                        self.highest_level(requirement.building)
                            .is_some_and(|level| level >= requirement.level)
                    });

                offered.then_some(Offer {
                    site_id,
                    building,
                    level: 1,
                    contract,
                })
            }
        }
    }

    fn blockers(&self, offer: &Offer, catalog: &Catalog) -> Blockers {
        if offer.level > catalog.building(&offer.building).max_level {
            return Blockers {
                max_level: true,
                ..Default::default()
            };
        }

        let cost = mock_cost(offer.level);
        let storage = if cost.max_material() > self.capacity(StorageKind::Warehouse) {
            Some(StorageKind::Warehouse)
        } else if cost.crop() > self.capacity(StorageKind::Granary) {
            Some(StorageKind::Granary)
        } else {
            None
        };

        let shortage_secs = (storage.is_none() && !self.stock.covers(&cost)).then(|| {
            let missing = cost - self.stock;
            [
                (missing.lumber(), self.production.lumber()),
                (missing.clay(), self.production.clay()),
                (missing.iron(), self.production.iron()),
                (missing.crop(), self.production.crop()),
            ]
            .into_iter()
            .map(|(missing, rate)| match (missing, rate) {
                (0, _) => 0,
                // never enough, the page still shows a countdown
                (_, 0) => 1,
                (missing, rate) => (missing as u64).div_ceil(rate as u64),
            })
            .max()
            .unwrap_or(0)
        });

        Blockers {
            max_level: false,
            storage,
            shortage_secs,
            workers_busy: self.construction.is_some(),
        }
    }

    fn timer(&self, secs: u64) -> String {
        let suffix = if self.jammed { "?" } else { "" };
        format!(
            "{:02}:{:02}:{:02}{suffix}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }

    fn contract_text(&self, locator: &Locator, catalog: &Catalog) -> Option<String> {
        let contract = match locator {
            Locator::ContractCost(contract) | Locator::ResourceShortage(contract) => *contract,
            _ => return None,
        };
        let offer = self.offer(contract, catalog)?;
        let blockers = self.blockers(&offer, catalog);
        if blockers.max_level {
            return None;
        }

        match locator {
            Locator::ContractCost(_) => {
                let cost = mock_cost(offer.level);
                Some(format!(
                    "{}|{}|{}|{}|1|{}",
                    cost.lumber(),
                    cost.clay(),
                    cost.iron(),
                    cost.crop(),
                    Self::plain_time(mock_duration(offer.level) as u64)
                ))
            }
            _ => blockers.shortage_secs.map(|secs| self.timer(secs)),
        }
    }

    fn plain_time(secs: u64) -> String {
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    fn is_visible(&self, locator: &Locator, catalog: &Catalog) -> bool {
        let contract_state = |contract: &Contract| {
            self.offer(*contract, catalog)
                .map(|offer| self.blockers(&offer, catalog))
        };

        match locator {
            Locator::SiteMarkers => {
                matches!(self.screen(), Some(Screen::Overview | Screen::Village))
            }
            Locator::SiteMarker(site_id) => self.markers().iter().any(|(id, _)| id == site_id),
            Locator::MaxLevelReached(contract) => {
                contract_state(contract).is_some_and(|blockers| blockers.max_level)
            }
            Locator::ContractCost(contract) => {
                contract_state(contract).is_some_and(|blockers| !blockers.max_level)
            }
            Locator::StorageTooSmall(contract, kind) => contract_state(contract)
                .is_some_and(|blockers| blockers.storage == Some(*kind)),
            Locator::ResourceShortage(contract) => contract_state(contract)
                .is_some_and(|blockers| blockers.shortage_secs.is_some()),
            Locator::WorkersBusy(contract) => contract_state(contract)
                .is_some_and(|blockers| !blockers.max_level && blockers.workers_busy),
            Locator::ContractSubmit(contract) => {
                contract_state(contract).is_some_and(|blockers| blockers.clear())
            }
            Locator::BuildQueueTimer => {
                self.screen() == Some(Screen::Overview) && self.construction.is_some()
            }
            Locator::DemolishSelect | Locator::DemolishSubmit => {
                self.main_building_page() && self.demolition.is_none()
            }
            Locator::DemolishTimer => self.main_building_page() && self.demolition.is_some(),
            Locator::LoginName | Locator::LoginPassword | Locator::LoginSubmit => {
                self.screen() == Some(Screen::Login) && !self.logged_in
            }
        }
    }

    fn read_attribute(&self, locator: &Locator, attribute: &str, catalog: &Catalog) -> Option<String> {
        match locator {
            Locator::SiteMarker(site_id) => {
                let (_, label) = self.markers().into_iter().find(|(id, _)| id == site_id)?;
                match attribute {
                    "alt" => Some(label),
                    "href" => Some(format!("build.php?id={site_id}")),
                    _ => None,
                }
            }
            Locator::ContractCost(_) | Locator::ResourceShortage(_) if attribute == TEXT => {
                self.contract_text(locator, catalog)
            }
            Locator::BuildQueueTimer if attribute == TEXT => {
                if !self.is_visible(locator, catalog) {
                    return None;
                }
                let work = self.construction?;
                Some(self.timer(work.finishes_at.saturating_sub(self.now)))
            }
            Locator::DemolishTimer if attribute == TEXT => {
                if !self.is_visible(locator, catalog) {
                    return None;
                }
                let work = self.demolition?;
                Some(self.timer(work.finishes_at.saturating_sub(self.now)))
            }
            _ => None,
        }
    }

    fn click(&mut self, locator: &Locator, catalog: &Catalog, server_url: &str) -> bool {
        self.clicks.push(*locator);
        if !self.is_visible(locator, catalog) {
            return false;
        }

        match locator {
            Locator::ContractSubmit(contract) => {
                let Some(offer) = self.offer(*contract, catalog) else {
                    return false;
                };
                self.stock = self.stock - mock_cost(offer.level);
                if let Contract::New(building) = offer.contract {
                    self.sites.insert(offer.site_id, (building, 0));
                }
                self.construction = Some(Work {
                    site_id: offer.site_id,
                    building: offer.building,
                    level: offer.level,
                    finishes_at: self.now + mock_duration(offer.level) as u64,
                });
                self.submissions.push(Submission {
                    site_id: offer.site_id,
                    building: offer.building,
                    level: offer.level,
                });
                self.url = Screen::listing_for(offer.site_id).url(server_url);
                true
            }
            Locator::DemolishSubmit => {
                let Some(site_id) = self.demolish_selected.take() else {
                    return false;
                };
                let Some((building, level)) = self.sites.get(&site_id).copied() else {
                    return false;
                };
                self.demolition = Some(Work {
                    site_id,
                    building,
                    level: level.saturating_sub(1),
                    finishes_at: self.now + mock_demolition_duration(level) as u64,
                });
                self.demolitions.push(site_id);
                true
            }
            Locator::LoginSubmit => {
                let accepted = self.credentials.as_ref().is_some_and(|(name, password)| {
                    *name == self.typed_name && *password == self.typed_password
                });
                if accepted {
                    self.logged_in = true;
                    self.url = Screen::Overview.url(server_url);
                }
                accepted
            }
            _ => false,
        }
    }

    fn type_text(&mut self, locator: &Locator, text: &str, catalog: &Catalog) -> bool {
        if !self.is_visible(locator, catalog) {
            return false;
        }

        match locator {
            Locator::DemolishSelect => {
                let selected = text.trim().parse::<u8>().ok().filter(|site_id| {
                    self.sites.contains_key(site_id)
                        && is_village_site(*site_id)
                        && *site_id != WALL_SITE_ID
                });
                self.demolish_selected = selected;
                selected.is_some()
            }
            Locator::LoginName => {
                self.typed_name = text.to_string();
                true
            }
            Locator::LoginPassword => {
                self.typed_password = text.to_string();
                true
            }
            _ => false,
        }
    }

    fn navigate(&mut self, url: &str, server_url: &str) -> Result<(), DriverError> {
        self.navigations.push(url.to_string());

        let unreachable = |reason: &str| DriverError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        if self.unreachable {
            return Err(unreachable("connection refused"));
        }
        if !url.starts_with(server_url) {
            return Err(unreachable("unknown host"));
        }
        let screen = Screen::from_url(url).ok_or_else(|| unreachable("not found"))?;

        self.url = if !self.logged_in && screen != Screen::Login {
            Screen::Login.url(server_url)
        } else if self.logged_in && screen == Screen::Login {
            Screen::Overview.url(server_url)
        } else {
            url.to_string()
        };
        Ok(())
    }

    fn tick(&mut self, secs: u64) {
        self.now += secs;

        let warehouse = self.capacity(StorageKind::Warehouse) as u64;
        let granary = self.capacity(StorageKind::Granary) as u64;
        let grow = |stock: u32, rate: u32, cap: u64| -> u32 {
            let stock = stock as u64;
            if stock >= cap {
                return stock as u32;
            }
            (stock + rate as u64 * secs).min(cap) as u32
        };
        self.stock = ResourceGroup::new(
            grow(self.stock.lumber(), self.production.lumber(), warehouse),
            grow(self.stock.clay(), self.production.clay(), warehouse),
            grow(self.stock.iron(), self.production.iron(), warehouse),
            grow(self.stock.crop(), self.production.crop(), granary),
        );

        if let Some(work) = self.construction.filter(|work| work.finishes_at <= self.now) {
            self.sites.insert(work.site_id, (work.building, work.level));
            self.construction = None;
        }

        if let Some(work) = self.demolition.filter(|work| work.finishes_at <= self.now) {
            if work.level == 0 {
                self.sites.remove(&work.site_id);
            } else {
                self.sites.insert(work.site_id, (work.building, work.level));
            }
            self.demolition = None;
        }
    }
}

#[async_trait]
impl PageDriver for MockGame {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let server_url = self.server_url.clone();
        self.with_state(|state, _| state.navigate(url, &server_url))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.with_state(|state, _| state.url.clone()))
    }

    async fn refresh(&self) -> Result<(), DriverError> {
        self.with_state(|state, _| {
            state.refreshes += 1;
            state.jammed = false;
        });
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> bool {
        self.with_state(|state, catalog| state.is_visible(locator, catalog))
    }

    async fn read_attribute(&self, locator: &Locator, attribute: &str) -> Option<String> {
        self.with_state(|state, catalog| state.read_attribute(locator, attribute, catalog))
    }

    async fn read_all_attributes(
        &self,
        locator: &Locator,
        attributes: &[&str],
    ) -> Vec<Vec<String>> {
        self.with_state(|state, _| {
            if *locator != Locator::SiteMarkers {
                return vec![];
            }
            state
                .markers()
                .into_iter()
                .map(|(site_id, label)| {
                    attributes
                        .iter()
                        .map(|attribute| match *attribute {
                            "href" => format!("build.php?id={site_id}"),
                            "alt" => label.clone(),
                            _ => String::new(),
                        })
                        .collect()
                })
                .collect()
        })
    }

    async fn click(&self, locator: &Locator, _load: PageLoad) -> bool {
        let server_url = self.server_url.clone();
        self.with_state(|state, catalog| state.click(locator, catalog, &server_url))
    }

    async fn type_text(&self, locator: &Locator, text: &str, _load: PageLoad) -> bool {
        self.with_state(|state, catalog| state.type_text(locator, text, catalog))
    }
}

#[async_trait]
impl GameClock for MockGame {
    async fn sleep(&self, duration: Duration) {
        self.with_state(|state, _| state.tick(duration.as_secs()));
    }
}

/// Bus wired to a fresh [`MockGame`].
pub fn mock_bus(options: MockGameOptions) -> (Arc<MockGame>, BotBus) {
    mock_bus_with_config(options, |_| {})
}

pub fn mock_bus_with_config(
    options: MockGameOptions,
    configure: impl FnOnce(&mut Config),
) -> (Arc<MockGame>, BotBus) {
    let game = Arc::new(MockGame::new(options));
    let mut config = Config::for_server(game.server_url());
    configure(&mut config);

    let bus = BotBus::new(
        game.clone(),
        game.clone(),
        Arc::new(Catalog::embedded().unwrap()),
        Arc::new(config),
    );
    (game, bus)
}
