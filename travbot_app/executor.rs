use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, info, warn};

use travbot_game::{
    catalog::{BuildingInfo, SpecialRequirement},
    models::{
        buildings::{Building, SiteLabel},
        village::{WALL_SITE_ID, is_village_site, reserved_site},
    },
};
use travbot_types::{buildings::BuildingName, errors::WorkflowError};

use crate::{
    driver::{PageLoad, TEXT},
    locators::Locator,
    parsers::parse_contract_cost,
    screens::Screen,
    timers::{read_countdown, wait_secs},
    workflow::{
        BuildJob, BuildOptions, BuildOutcome, BuildTarget, BuildingWorkflow, DemolishedSite,
        DemolitionReport, ForcedBudget, WorkflowState,
    },
};

/// Where a construction lands.
enum SiteChoice {
    Existing(Building),
    Free(u8),
}

impl BuildingWorkflow<'_> {
    // Construction and upgrade recurse into each other through requirements and
    // storage fixes, so both hand out boxed futures.

    pub(crate) fn construct<'s>(
        &'s self,
        name: BuildingName,
        options: BuildOptions,
        budget: &'s mut ForcedBudget,
    ) -> LocalBoxFuture<'s, Result<BuildOutcome, WorkflowError>> {
        async move {
            let mut job = BuildJob::new(format!("construct {name}"));

            let result = if name.is_resource_field() {
                Ok(BuildOutcome::AlreadyConstructed { site_id: None })
            } else {
                match budget.enter(name) {
                    Ok(()) => {
                        let result = self.run_construct(&mut job, name, options, budget).await;
                        budget.leave();
                        result
                    }
                    Err(err) => Err(err),
                }
            };

            job.settle(&result);
            result
        }
        .boxed_local()
    }

    pub(crate) fn level_up<'s>(
        &'s self,
        site_id: u8,
        options: BuildOptions,
        budget: &'s mut ForcedBudget,
    ) -> LocalBoxFuture<'s, Result<BuildOutcome, WorkflowError>> {
        async move {
            let mut job = BuildJob::new(format!("level up site {site_id}"));
            let result = self.run_level_up(&mut job, site_id, options, budget).await;
            job.settle(&result);
            result
        }
        .boxed_local()
    }

    async fn run_construct(
        &self,
        job: &mut BuildJob,
        name: BuildingName,
        options: BuildOptions,
        budget: &mut ForcedBudget,
    ) -> Result<BuildOutcome, WorkflowError> {
        let info = self.catalog.building(&name);

        self.check_special_requirements(info).await?;
        self.resolve_requirements(name, options.forced, budget).await?;

        job.advance(WorkflowState::LocatingSite);
        let site_id = match self.locate_site(info).await? {
            SiteChoice::Existing(building) => {
                info!("{name} already stands on site {}", building.site_id);
                return Ok(BuildOutcome::AlreadyConstructed {
                    site_id: Some(building.site_id),
                });
            }
            SiteChoice::Free(site_id) => site_id,
        };
        debug!("Constructing {name} on site {site_id}");

        let target = BuildTarget::new_building(site_id, name, info.group);
        self.build_on(job, &target, name, options, budget).await
    }

    async fn run_level_up(
        &self,
        job: &mut BuildJob,
        site_id: u8,
        options: BuildOptions,
        budget: &mut ForcedBudget,
    ) -> Result<BuildOutcome, WorkflowError> {
        job.advance(WorkflowState::LocatingSite);

        let (name, level) = match self.inspector().site_label(site_id).await? {
            SiteLabel::Built { name, level } => (name, level),
            SiteLabel::EmptyPlace | SiteLabel::Unbuilt(_) => {
                return Err(WorkflowError::EmptySite { site_id });
            }
        };
        if level >= self.catalog.building(&name).max_level {
            info!("{name} on site {site_id} is at max level {level}");
            return Err(WorkflowError::MaxLevel { site_id });
        }

        budget.enter(name)?;
        let result = self
            .build_on(job, &BuildTarget::upgrade(site_id), name, options, budget)
            .await;
        budget.leave();

        result
    }

    /// Gates, submits and optionally waits out the build timer.
    async fn build_on(
        &self,
        job: &mut BuildJob,
        target: &BuildTarget,
        name: BuildingName,
        options: BuildOptions,
        budget: &mut ForcedBudget,
    ) -> Result<BuildOutcome, WorkflowError> {
        job.advance(WorkflowState::CheckingPreconditions);
        self.check_preconditions(target, options.forced, budget)
            .await?;

        job.advance(WorkflowState::Submitting);
        let (duration_secs, return_url) = self.submit(target).await?;
        info!(
            site_id = target.site_id,
            building = %name,
            duration_secs,
            "Construction submitted"
        );

        if !options.wait_to_finish {
            return Ok(BuildOutcome::Submitted {
                site_id: target.site_id,
                building: name,
                duration_secs,
            });
        }

        job.advance(WorkflowState::WaitingForCompletion);
        if let Err(err) = self.driver.navigate(&return_url).await {
            warn!("Can't go back to {return_url}: {err}");
            return Err(WorkflowError::NavigationFailed { url: return_url });
        }
        wait_secs(self.clock, duration_secs).await;
        info!(site_id = target.site_id, building = %name, "Construction completed");

        Ok(BuildOutcome::Completed {
            site_id: target.site_id,
            building: name,
            duration_secs,
        })
    }

    /// Presses the contract button, returning the build duration and the page to come back to.
    async fn submit(&self, target: &BuildTarget) -> Result<(u32, String), WorkflowError> {
        let return_url = self.driver.current_url().await?;

        // the cost box changes once the contract is submitted
        let text = self
            .driver
            .read_attribute(&Locator::ContractCost(target.contract), TEXT)
            .await
            .ok_or(WorkflowError::ContractNotFound {
                site_id: target.site_id,
            })?;
        let cost = parse_contract_cost(&text).ok_or_else(|| {
            warn!("Unreadable contract cost {text:?}");
            WorkflowError::parse("contract cost", &text)
        })?;

        if !self
            .driver
            .click(&Locator::ContractSubmit(target.contract), PageLoad::Wait)
            .await
        {
            return Err(WorkflowError::SubmitRejected {
                site_id: target.site_id,
            });
        }

        Ok((cost.duration_secs, return_url))
    }

    async fn locate_site(&self, info: &BuildingInfo) -> Result<SiteChoice, WorkflowError> {
        let inspector = self.inspector();
        let highest = inspector.find_building(info.name).await?;

        if let Some(site_id) = reserved_site(&info.name) {
            // placeholders of the reserved sites are listed at level 0
            return Ok(match highest {
                Some(building) if building.level > 0 => SiteChoice::Existing(building),
                _ => SiteChoice::Free(site_id),
            });
        }

        if let Some(building) = highest.filter(|_| !info.duplicates) {
            return Ok(SiteChoice::Existing(building));
        }

        inspector
            .empty_places()
            .await?
            .first()
            .map(|site_id| SiteChoice::Free(*site_id))
            .ok_or(WorkflowError::VillageFull)
    }

    async fn check_special_requirements(&self, info: &BuildingInfo) -> Result<(), WorkflowError> {
        for requirement in &info.special_requirements {
            let unmet = match requirement {
                SpecialRequirement::OnlyCapital => self.config.capital == Some(false),
                SpecialRequirement::NonCapital => self.config.capital == Some(true),
                SpecialRequirement::Tribe(tribe) => {
                    self.config.tribe.is_some_and(|own| own != *tribe)
                }
                SpecialRequirement::ConflictsWith(other) => self
                    .inspector()
                    .find_building(*other)
                    .await?
                    .is_some_and(|building| building.level > 0),
                SpecialRequirement::WorldWonderVillage | SpecialRequirement::ConstructionPlan => {
                    debug!("{requirement:?} for {} is left to the game", info.name);
                    false
                }
            };

            if unmet {
                return Err(WorkflowError::SpecialRequirementUnmet {
                    building: info.name,
                    requirement: format!("{requirement:?}"),
                });
            }
        }

        Ok(())
    }

    pub(crate) async fn demolish(&self, site_ids: &[u8]) -> Result<DemolitionReport, WorkflowError> {
        if let Some(site_id) = site_ids
            .iter()
            .copied()
            .find(|site_id| *site_id == WALL_SITE_ID || !is_village_site(*site_id))
        {
            return Err(WorkflowError::InvalidSite { site_id });
        }

        let mut report = DemolitionReport::default();
        if site_ids.is_empty() {
            return Ok(report);
        }

        let main_building = self
            .inspector()
            .find_building(BuildingName::MainBuilding)
            .await?
            .filter(|building| building.level > 0)
            .ok_or(WorkflowError::BuildingNotFound(BuildingName::MainBuilding))?;
        let screen = Screen::site(main_building.site_id);

        for site_id in site_ids.iter().copied() {
            self.open(&screen).await?;
            if !self.driver.is_visible(&Locator::DemolishSelect).await {
                return Err(WorkflowError::ContractNotFound {
                    site_id: main_building.site_id,
                });
            }

            if !self
                .driver
                .type_text(&Locator::DemolishSelect, &site_id.to_string(), PageLoad::NoWait)
                .await
            {
                return Err(WorkflowError::InvalidSite { site_id });
            }
            if !self
                .driver
                .click(&Locator::DemolishSubmit, PageLoad::Wait)
                .await
            {
                return Err(WorkflowError::SubmitRejected { site_id });
            }
            info!("Demolition of site {site_id} started");

            let waited_secs = self.wait_for_demolition(&screen, site_id).await?;
            report.sites.push(DemolishedSite {
                site_id,
                waited_secs,
            });
        }

        Ok(report)
    }

    async fn wait_for_demolition(&self, screen: &Screen, site_id: u8) -> Result<u32, WorkflowError> {
        let mut waited = 0;

        for _ in 0..self.config.poll_limit {
            self.open(screen).await?;
            if !self.driver.is_visible(&Locator::DemolishTimer).await {
                info!("Demolition of site {site_id} done after {waited}s");
                return Ok(waited);
            }

            let secs = read_countdown(self.driver, &Locator::DemolishTimer).await?;
            waited += wait_secs(self.clock, secs).await;
        }

        Err(WorkflowError::TimerStuck { site_id })
    }
}
