use travbot_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, commands::LevelUpBuilding},
    workflow::{BuildOutcome, BuildingWorkflow},
};

pub struct LevelUpBuildingCommandHandler {}

impl Default for LevelUpBuildingCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelUpBuildingCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait(?Send)]
impl CommandHandler<LevelUpBuilding> for LevelUpBuildingCommandHandler {
    async fn handle(
        &self,
        command: LevelUpBuilding,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<BuildOutcome, ApplicationError> {
        Ok(workflow
            .level_up_building_at(command.site_id, command.options)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use travbot_game::test_utils::{VillageSitesFactoryOptions, village_sites_factory};
    use travbot_types::{
        buildings::BuildingName,
        errors::{PreconditionKind, WorkflowError},
    };

    use super::*;
    use crate::{
        test_utils::{MockGameOptions, Submission, mock_bus},
        workflow::BuildOptions,
    };

    fn village(buildings: Vec<(u8, BuildingName, u8)>) -> MockGameOptions {
        MockGameOptions {
            sites: village_sites_factory(VillageSitesFactoryOptions {
                field_level: Some(2),
                buildings,
            }),
            ..Default::default()
        }
    }

    fn level_up(site_id: u8, forced: bool, wait: bool) -> LevelUpBuilding {
        LevelUpBuilding {
            site_id,
            options: BuildOptions::new(forced, wait),
        }
    }

    #[tokio::test]
    async fn test_level_up_resource_field() {
        let (game, bus) = mock_bus(village(vec![]));

        let outcome = bus
            .execute(level_up(4, false, true), LevelUpBuildingCommandHandler::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BuildOutcome::Completed {
                site_id: 4,
                building: BuildingName::IronMine,
                duration_secs: 180
            }
        );
        assert_eq!(game.site(4), Some((BuildingName::IronMine, 3)));
    }

    #[tokio::test]
    async fn test_level_up_without_waiting() {
        let (game, bus) = mock_bus(village(vec![(26, BuildingName::MainBuilding, 1)]));

        let outcome = bus
            .execute(level_up(26, false, false), LevelUpBuildingCommandHandler::new())
            .await
            .unwrap();

        assert!(matches!(outcome, BuildOutcome::Submitted { site_id: 26, .. }));
        assert_eq!(
            game.submissions(),
            vec![Submission {
                site_id: 26,
                building: BuildingName::MainBuilding,
                level: 2
            }]
        );
        // still running
        assert_eq!(game.site(26), Some((BuildingName::MainBuilding, 1)));
    }

    #[tokio::test]
    async fn test_cranny_at_max_level() {
        let (game, bus) = mock_bus(village(vec![(25, BuildingName::Cranny, 10)]));

        let result = bus
            .execute(level_up(25, true, true), LevelUpBuildingCommandHandler::new())
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Workflow(WorkflowError::MaxLevel { site_id: 25 }))
        ));
        assert!(game.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_empty_site() {
        let (game, bus) = mock_bus(village(vec![]));

        for site_id in [30, 39] {
            let result = bus
                .execute(
                    level_up(site_id, true, false),
                    LevelUpBuildingCommandHandler::new(),
                )
                .await;
            assert!(matches!(
                result,
                Err(ApplicationError::Workflow(WorkflowError::EmptySite { .. }))
            ));
        }
        assert!(game.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_busy_workers() {
        let (game, bus) = mock_bus(MockGameOptions {
            busy_workers_secs: Some(90),
            ..village(vec![(26, BuildingName::MainBuilding, 1)])
        });

        let result = bus
            .execute(level_up(26, false, false), LevelUpBuildingCommandHandler::new())
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Workflow(WorkflowError::PreconditionUnmet(
                PreconditionKind::Workers
            )))
        ));

        bus.execute(level_up(26, true, true), LevelUpBuildingCommandHandler::new())
            .await
            .unwrap();
        assert_eq!(game.site(26), Some((BuildingName::MainBuilding, 2)));
        assert_eq!(game.elapsed_secs(), 90 + 120);
    }
}
