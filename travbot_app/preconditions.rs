//! Gates checked on a contract right before submitting it.
//!
//! Every check opens the target page itself and leaves it open when it passes.
//! In forced mode a blocked check fixes or waits out the blocker and looks
//! again, each round paid from the operation's [`ForcedBudget`].

use tracing::{debug, info};

use travbot_types::{
    buildings::StorageKind,
    errors::{PreconditionKind, WorkflowError},
};

use crate::{
    locators::Locator,
    screens::Screen,
    timers::{read_countdown, wait_secs},
    workflow::{BuildOptions, BuildTarget, BuildingWorkflow, ForcedBudget},
};

impl BuildingWorkflow<'_> {
    /// Runs every gate in order: max level, contract, storage, resources, workers.
    pub async fn check_preconditions(
        &self,
        target: &BuildTarget,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        self.check_not_max_level(target).await?;
        self.check_contract(target).await?;
        self.check_storage(target, forced, budget).await?;
        self.check_resources(target, forced, budget).await?;
        self.check_workers(target, forced, budget).await?;

        Ok(())
    }

    /// Terminal whatever the mode: a maxed building can't go further.
    pub async fn check_not_max_level(&self, target: &BuildTarget) -> Result<(), WorkflowError> {
        self.open(&target.screen()).await?;

        if self
            .driver
            .is_visible(&Locator::MaxLevelReached(target.contract))
            .await
        {
            info!("Site {} is at max level", target.site_id);
            return Err(WorkflowError::MaxLevel {
                site_id: target.site_id,
            });
        }

        Ok(())
    }

    /// The page must offer the contract at all.
    pub async fn check_contract(&self, target: &BuildTarget) -> Result<(), WorkflowError> {
        self.open(&target.screen()).await?;

        if !self
            .driver
            .is_visible(&Locator::ContractCost(target.contract))
            .await
        {
            return Err(WorkflowError::ContractNotFound {
                site_id: target.site_id,
            });
        }

        Ok(())
    }

    pub async fn check_storage(
        &self,
        target: &BuildTarget,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        loop {
            self.open(&target.screen()).await?;

            let Some(kind) = self.storage_shortage(target).await else {
                return Ok(());
            };
            let precondition = PreconditionKind::Storage(kind);
            if !forced {
                debug!("{kind:?} too small for site {}", target.site_id);
                return Err(WorkflowError::PreconditionUnmet(precondition));
            }

            budget.spend(precondition)?;
            info!("{kind:?} too small for site {}, enlarging it", target.site_id);
            self.enlarge_storage(kind, budget).await?;
        }
    }

    pub async fn check_resources(
        &self,
        target: &BuildTarget,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        let shortage = Locator::ResourceShortage(target.contract);

        loop {
            self.open(&target.screen()).await?;

            if !self.driver.is_visible(&shortage).await {
                return Ok(());
            }
            if !forced {
                debug!("Not enough resources for site {}", target.site_id);
                return Err(WorkflowError::PreconditionUnmet(PreconditionKind::Resources));
            }

            budget.spend(PreconditionKind::Resources)?;
            let secs = read_countdown(self.driver, &shortage).await?;
            info!("Not enough resources for site {}, waiting {secs}s", target.site_id);
            wait_secs(self.clock, secs).await;
        }
    }

    pub async fn check_workers(
        &self,
        target: &BuildTarget,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        let busy = Locator::WorkersBusy(target.contract);

        loop {
            self.open(&target.screen()).await?;

            if !self.driver.is_visible(&busy).await {
                return Ok(());
            }
            if !forced {
                debug!("Workers are busy, site {} has to wait", target.site_id);
                return Err(WorkflowError::PreconditionUnmet(PreconditionKind::Workers));
            }

            budget.spend(PreconditionKind::Workers)?;
            // the busy message carries no duration, the overview queue does
            self.open(&Screen::Overview).await?;
            let secs = if self.driver.is_visible(&Locator::BuildQueueTimer).await {
                read_countdown(self.driver, &Locator::BuildQueueTimer).await?
            } else {
                0
            };
            info!("Workers are busy, waiting {secs}s");
            wait_secs(self.clock, secs).await;
        }
    }

    async fn storage_shortage(&self, target: &BuildTarget) -> Option<StorageKind> {
        for kind in [StorageKind::Warehouse, StorageKind::Granary] {
            if self
                .driver
                .is_visible(&Locator::StorageTooSmall(target.contract, kind))
                .await
            {
                return Some(kind);
            }
        }
        None
    }

    /// Upgrades the highest storage that can still grow, or builds a new one.
    async fn enlarge_storage(
        &self,
        kind: StorageKind,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        let name = kind.building();
        let max_level = self.catalog.building(&name).max_level;
        let storages = self.inspector().get_buildings(name).await?;

        match storages
            .iter()
            .rev()
            .find(|storage| storage.level > 0 && storage.level < max_level)
        {
            Some(storage) => {
                self.level_up(storage.site_id, BuildOptions::DEPENDENCY, budget)
                    .await?
            }
            None => self.construct(name, BuildOptions::DEPENDENCY, budget).await?,
        };

        Ok(())
    }
}
