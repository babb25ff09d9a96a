use travbot_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, commands::ConstructBuilding},
    workflow::{BuildOutcome, BuildingWorkflow},
};

pub struct ConstructBuildingCommandHandler {}

impl Default for ConstructBuildingCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructBuildingCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait(?Send)]
impl CommandHandler<ConstructBuilding> for ConstructBuildingCommandHandler {
    async fn handle(
        &self,
        command: ConstructBuilding,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<BuildOutcome, ApplicationError> {
        Ok(workflow
            .construct_building(command.name, command.options)
            .await?)
    }
}
