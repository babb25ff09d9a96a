//! Building construction, upgrade and demolition workflow.
//!
//! A [`BuildingWorkflow`] borrows the browser session, the clock, the catalog
//! and the configuration for the duration of one operation. Every call starts
//! from a fresh look at the live pages: nothing read from the village is kept
//! between two operations.

use serde::Serialize;
use tracing::{debug, warn};

use travbot_game::catalog::Catalog;
use travbot_types::{
    buildings::{BuildingGroup, BuildingName},
    errors::{PreconditionKind, WorkflowError},
};

use crate::{
    config::Config,
    driver::{GameClock, PageDriver},
    inspector::VillageInspector,
    locators::Contract,
    screens::{Screen, open_screen},
};

/// How a construction or upgrade deals with what stands in its way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Wait out or fix unmet preconditions and dependencies instead of failing.
    pub forced: bool,
    /// Block until the build timer has run out.
    pub wait_to_finish: bool,
}

impl BuildOptions {
    /// Options of the nested builds a forced operation triggers.
    pub const DEPENDENCY: BuildOptions = BuildOptions {
        forced: true,
        wait_to_finish: true,
    };

    pub fn new(forced: bool, wait_to_finish: bool) -> Self {
        Self {
            forced,
            wait_to_finish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildOutcome {
    /// Nothing to do. `site_id` is `None` for resource fields.
    AlreadyConstructed { site_id: Option<u8> },
    Submitted {
        site_id: u8,
        building: BuildingName,
        duration_secs: u32,
    },
    Completed {
        site_id: u8,
        building: BuildingName,
        duration_secs: u32,
    },
}

impl BuildOutcome {
    pub fn site_id(&self) -> Option<u8> {
        match self {
            BuildOutcome::AlreadyConstructed { site_id } => *site_id,
            BuildOutcome::Submitted { site_id, .. } | BuildOutcome::Completed { site_id, .. } => {
                Some(*site_id)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemolishedSite {
    pub site_id: u8,
    pub waited_secs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemolitionReport {
    pub sites: Vec<DemolishedSite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    LocatingSite,
    CheckingPreconditions,
    Submitting,
    WaitingForCompletion,
    Done,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Failed)
    }

    pub fn can_advance_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;

        match (self, next) {
            (Done | Failed, _) => false,
            (_, Failed) => true,
            // resource fields, already built buildings
            (Idle | LocatingSite, Done) => true,
            (Idle, LocatingSite) => true,
            (LocatingSite, CheckingPreconditions) => true,
            (CheckingPreconditions, Submitting) => true,
            (Submitting, WaitingForCompletion | Done) => true,
            (WaitingForCompletion, Done) => true,
            _ => false,
        }
    }
}

/// State of a single construct or level-up invocation.
#[derive(Debug)]
pub struct BuildJob {
    label: String,
    state: WorkflowState,
}

impl BuildJob {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn advance(&mut self, next: WorkflowState) {
        if !self.state.can_advance_to(next) {
            warn!(job = %self.label, from = ?self.state, to = ?next, "Unexpected workflow transition");
        }
        debug!(job = %self.label, from = ?self.state, to = ?next, "Workflow transition");
        self.state = next;
    }

    /// Moves to the terminal state matching `result`.
    pub fn settle<T>(&mut self, result: &Result<T, WorkflowError>) {
        match result {
            Ok(_) if self.state != WorkflowState::Done => self.advance(WorkflowState::Done),
            Ok(_) => {}
            Err(err) => {
                debug!(job = %self.label, "Failed: {err}");
                self.advance(WorkflowState::Failed);
            }
        }
    }
}

/// Bounds the work a forced operation may do on its own initiative.
///
/// One budget is created per top-level call and shared by every nested
/// construction, upgrade and wait that call triggers.
#[derive(Debug, Clone)]
pub struct ForcedBudget {
    retries_left: u32,
    depth: u32,
    max_depth: u32,
}

impl ForcedBudget {
    pub fn new(max_retries: u32, max_depth: u32) -> Self {
        Self {
            retries_left: max_retries,
            depth: 0,
            max_depth,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_forced_retries, config.max_dependency_depth)
    }

    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Consumes one forced fix of `kind`.
    pub fn spend(&mut self, kind: PreconditionKind) -> Result<(), WorkflowError> {
        if self.retries_left == 0 {
            return Err(WorkflowError::RetryBudgetExhausted(kind));
        }
        self.retries_left -= 1;
        Ok(())
    }

    pub fn enter(&mut self, name: BuildingName) -> Result<(), WorkflowError> {
        if self.depth >= self.max_depth {
            return Err(WorkflowError::DependencyDepthExceeded(name));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Site and contract a construction or upgrade is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget {
    pub site_id: u8,
    pub contract: Contract,
    /// Build menu tab, only for new buildings.
    pub category: Option<u8>,
}

impl BuildTarget {
    pub fn upgrade(site_id: u8) -> Self {
        Self {
            site_id,
            contract: Contract::Upgrade,
            category: None,
        }
    }

    pub fn new_building(site_id: u8, name: BuildingName, group: BuildingGroup) -> Self {
        Self {
            site_id,
            contract: Contract::New(name),
            category: Some(group.category()),
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::Site {
            site_id: self.site_id,
            category: self.category,
        }
    }
}

pub struct BuildingWorkflow<'a> {
    pub(crate) driver: &'a dyn PageDriver,
    pub(crate) clock: &'a dyn GameClock,
    pub(crate) catalog: &'a Catalog,
    pub(crate) config: &'a Config,
}

impl<'a> BuildingWorkflow<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        clock: &'a dyn GameClock,
        catalog: &'a Catalog,
        config: &'a Config,
    ) -> Self {
        Self {
            driver,
            clock,
            catalog,
            config,
        }
    }

    pub fn inspector(&self) -> VillageInspector<'a> {
        VillageInspector::new(self.driver, &self.config.server_url)
    }

    /// Constructs `name` on a free site, resolving its requirements first.
    pub async fn construct_building(
        &self,
        name: BuildingName,
        options: BuildOptions,
    ) -> Result<BuildOutcome, WorkflowError> {
        let mut budget = ForcedBudget::from_config(self.config);
        self.construct(name, options, &mut budget).await
    }

    /// Raises the building standing on `site_id` by one level.
    pub async fn level_up_building_at(
        &self,
        site_id: u8,
        options: BuildOptions,
    ) -> Result<BuildOutcome, WorkflowError> {
        let mut budget = ForcedBudget::from_config(self.config);
        self.level_up(site_id, options, &mut budget).await
    }

    /// Demolishes one level of each site, in order, from the Main Building.
    pub async fn demolish_buildings_at(
        &self,
        site_ids: &[u8],
    ) -> Result<DemolitionReport, WorkflowError> {
        self.demolish(site_ids).await
    }

    /// Makes sure every requirement of `name` is met, building them when `forced`.
    pub async fn ensure_requirements(
        &self,
        name: BuildingName,
        forced: bool,
    ) -> Result<(), WorkflowError> {
        let mut budget = ForcedBudget::from_config(self.config);
        self.resolve_requirements(name, forced, &mut budget).await
    }

    pub(crate) async fn open(&self, screen: &Screen) -> Result<(), WorkflowError> {
        open_screen(self.driver, &self.config.server_url, screen).await
    }
}
