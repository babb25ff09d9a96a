use async_trait::async_trait;

use travbot_types::errors::ApplicationError;

use crate::workflow::BuildingWorkflow;

/// A marker trait for Query structs.
/// Queries only read the village, they never submit anything.
pub trait Query: Send + Sync {
    /// The data type that this query will return.
    type Output: Send + Sync;
}

#[async_trait(?Send)]
pub trait QueryHandler<Q: Query> {
    async fn handle(
        &self,
        query: Q,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<Q::Output, ApplicationError>;
}
