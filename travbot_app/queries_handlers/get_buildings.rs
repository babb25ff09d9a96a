use async_trait::async_trait;

use travbot_types::errors::ApplicationError;

use crate::{
    cqrs::{Query, QueryHandler, queries::GetBuildings},
    workflow::BuildingWorkflow,
};

pub struct GetBuildingsHandler {}

impl GetBuildingsHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait(?Send)]
impl QueryHandler<GetBuildings> for GetBuildingsHandler {
    async fn handle(
        &self,
        query: GetBuildings,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<<GetBuildings as Query>::Output, ApplicationError> {
        Ok(workflow.inspector().get_buildings(query.name).await?)
    }
}
