use travbot_types::buildings::{BuildingName, StorageKind};

/// Contract box shown on a site page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
    /// Next level of the building already standing on the site.
    Upgrade,
    /// New building offered by the build menu of an empty site.
    New(BuildingName),
}

impl Contract {
    fn scope(&self) -> String {
        match self {
            Contract::Upgrade => "#contract".to_string(),
            Contract::New(name) => format!("#contract_building{}", name.id()),
        }
    }
}

/// Page elements the workflow reads or interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Every site marker of the current listing screen (`href` + `alt`).
    SiteMarkers,
    SiteMarker(u8),
    /// Cost line: `lumber|clay|iron|crop|upkeep|hh:mm:ss`.
    ContractCost(Contract),
    ContractSubmit(Contract),
    /// Shown when a storage can't hold the contract cost.
    StorageTooSmall(Contract, StorageKind),
    /// Countdown until resources are enough.
    ResourceShortage(Contract),
    WorkersBusy(Contract),
    MaxLevelReached(Contract),
    /// Countdown of the first running construction (overview screen).
    BuildQueueTimer,
    DemolishSelect,
    DemolishSubmit,
    DemolishTimer,
    LoginName,
    LoginPassword,
    LoginSubmit,
}

impl Locator {
    /// CSS selector matching the element on the live game.
    pub fn css(&self) -> String {
        match self {
            Locator::SiteMarkers => "map area[href*='id=']".to_string(),
            Locator::SiteMarker(site_id) => format!("map area[href$='id={site_id}']"),
            Locator::ContractCost(contract) => {
                format!("{} .resourceWrapper", contract.scope())
            }
            Locator::ContractSubmit(contract) => {
                format!("{} .section1 button.green.build", contract.scope())
            }
            Locator::StorageTooSmall(contract, StorageKind::Warehouse) => {
                format!("{} .errorMessage .warehouse", contract.scope())
            }
            Locator::StorageTooSmall(contract, StorageKind::Granary) => {
                format!("{} .errorMessage .granary", contract.scope())
            }
            Locator::ResourceShortage(contract) => {
                format!("{} .errorMessage .timer", contract.scope())
            }
            Locator::WorkersBusy(contract) => {
                format!("{} .errorMessage.workersBusy", contract.scope())
            }
            Locator::MaxLevelReached(contract) => {
                format!("{} .messages .maxLevel", contract.scope())
            }
            Locator::BuildQueueTimer => ".buildingList li:first-child .timer".to_string(),
            Locator::DemolishSelect => "#demolish select[name='abriss']".to_string(),
            Locator::DemolishSubmit => "#demolish button#btn_demolish".to_string(),
            Locator::DemolishTimer => "#demolish .timer".to_string(),
            Locator::LoginName => "form[name='login'] input[name='name']".to_string(),
            Locator::LoginPassword => "form[name='login'] input[name='password']".to_string(),
            Locator::LoginSubmit => "form[name='login'] button[type='submit']".to_string(),
        }
    }
}
