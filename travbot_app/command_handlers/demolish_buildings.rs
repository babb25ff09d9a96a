use travbot_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, commands::DemolishBuildings},
    workflow::{BuildingWorkflow, DemolitionReport},
};

pub struct DemolishBuildingsCommandHandler {}

impl Default for DemolishBuildingsCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DemolishBuildingsCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait(?Send)]
impl CommandHandler<DemolishBuildings> for DemolishBuildingsCommandHandler {
    async fn handle(
        &self,
        command: DemolishBuildings,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<DemolitionReport, ApplicationError> {
        Ok(workflow.demolish_buildings_at(&command.site_ids).await?)
    }
}
