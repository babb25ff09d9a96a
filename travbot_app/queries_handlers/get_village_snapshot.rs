use async_trait::async_trait;

use travbot_types::errors::ApplicationError;

use crate::{
    cqrs::{Query, QueryHandler, queries::GetVillageSnapshot},
    workflow::BuildingWorkflow,
};

pub struct GetVillageSnapshotHandler {}

impl GetVillageSnapshotHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait(?Send)]
impl QueryHandler<GetVillageSnapshot> for GetVillageSnapshotHandler {
    async fn handle(
        &self,
        _query: GetVillageSnapshot,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<<GetVillageSnapshot as Query>::Output, ApplicationError> {
        Ok(workflow.inspector().village_snapshot().await?)
    }
}

#[cfg(test)]
mod tests {
    use travbot_game::test_utils::{VillageSitesFactoryOptions, village_sites_factory};
    use travbot_types::{buildings::BuildingName, errors::WorkflowError};

    use super::*;
    use crate::test_utils::{MockGameOptions, mock_bus};

    #[tokio::test]
    async fn test_snapshot_covers_both_screens() {
        let (game, bus) = mock_bus(MockGameOptions {
            sites: village_sites_factory(VillageSitesFactoryOptions {
                field_level: Some(1),
                buildings: vec![
                    (26, BuildingName::MainBuilding, 3),
                    (22, BuildingName::Barracks, 1),
                ],
            }),
            ..Default::default()
        });

        let snapshot = bus
            .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
            .await
            .unwrap();

        assert_eq!(snapshot.occurrences(&BuildingName::Cropland).len(), 6);
        assert!(snapshot.satisfies(&BuildingName::MainBuilding, 3));
        assert!(snapshot.is_built(&BuildingName::Barracks));
        assert!(!snapshot.is_built(&BuildingName::RallyPoint));
        assert!(!snapshot.empty_places().contains(&22));
        assert!(game.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_all_or_nothing() {
        let (_game, bus) = mock_bus(MockGameOptions {
            label_overrides: vec![(7, "Iron Mine level x".to_string())],
            ..Default::default()
        });

        let result = bus
            .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Workflow(WorkflowError::ParseFailed { .. }))
        ));
    }
}
