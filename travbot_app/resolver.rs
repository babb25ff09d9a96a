use tracing::{debug, info};

use travbot_game::{catalog::BuildingRequirement, models::buildings::Building};
use travbot_types::{buildings::BuildingName, errors::WorkflowError};

use crate::workflow::{BuildOptions, BuildingWorkflow, ForcedBudget};

impl BuildingWorkflow<'_> {
    /// Walks the requirements of `name` in declared order, stopping at the first
    /// one that can't be met.
    pub(crate) async fn resolve_requirements(
        &self,
        name: BuildingName,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        for requirement in &self.catalog.building(&name).requirements {
            self.satisfy(requirement, forced, budget).await?;
        }

        Ok(())
    }

    async fn satisfy(
        &self,
        requirement: &BuildingRequirement,
        forced: bool,
        budget: &mut ForcedBudget,
    ) -> Result<(), WorkflowError> {
        let BuildingRequirement { building, level } = *requirement;
        let unmet = || WorkflowError::DependencyUnmet { building, level };

        let mut highest = self.highest_built(building).await?;
        if highest.is_none() {
            if !forced {
                debug!("Requirement {building} missing");
                return Err(unmet());
            }
            info!("Requirement {building} missing, constructing it");
            self.construct(building, BuildOptions::DEPENDENCY, budget)
                .await?;
            highest = self.highest_built(building).await?;
        }
        let mut highest = highest.ok_or_else(unmet)?;

        while highest.level < level {
            if !forced {
                debug!(
                    "Requirement {building} at level {}, needs {level}",
                    highest.level
                );
                return Err(unmet());
            }

            let before = highest.level;
            info!(
                "Requirement {building} at level {before}, raising site {}",
                highest.site_id
            );
            self.level_up(highest.site_id, BuildOptions::DEPENDENCY, budget)
                .await?;

            highest = self.highest_built(building).await?.ok_or_else(unmet)?;
            if highest.level <= before {
                return Err(unmet());
            }
        }

        Ok(())
    }

    /// Highest occurrence that actually stands, placeholders excluded.
    async fn highest_built(&self, name: BuildingName) -> Result<Option<Building>, WorkflowError> {
        let highest = self.inspector().find_building(name).await?;
        Ok(highest.filter(|building| name.is_resource_field() || building.level > 0))
    }
}
