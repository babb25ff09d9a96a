use async_trait::async_trait;

use travbot_types::errors::ApplicationError;

use crate::workflow::BuildingWorkflow;

/// A marker trait for Command structs.
/// Commands are operations that change the state of the village.
pub trait Command: Send + Sync {
    /// What the handler reports back on success.
    type Output;
}

/// A trait for handlers that execute Commands.
/// It receives the command and a workflow bound to the bus' browser session.
#[async_trait(?Send)]
pub trait CommandHandler<C: Command> {
    async fn handle(
        &self,
        cmd: C,
        workflow: &BuildingWorkflow<'_>,
    ) -> Result<C::Output, ApplicationError>;
}
