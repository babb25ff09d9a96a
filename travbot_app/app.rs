use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use travbot_game::catalog::Catalog;
use travbot_types::errors::ApplicationError;

use crate::{
    config::Config,
    cqrs::{Command, CommandHandler, Query, QueryHandler},
    driver::{GameClock, PageDriver},
    session,
    workflow::BuildingWorkflow,
};

/// BotBus (Mediator)
/// Central entry point for everything the bot does in the game.
/// It owns the browser session and hands handlers a workflow bound to it,
/// one operation at a time.
pub struct BotBus {
    driver: Arc<dyn PageDriver>,
    clock: Arc<dyn GameClock>,
    catalog: Arc<Catalog>,
    config: Arc<Config>,
    // the browser session can't run two operations at once
    session: Mutex<()>,
}

impl BotBus {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        clock: Arc<dyn GameClock>,
        catalog: Arc<Catalog>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            driver,
            clock,
            catalog,
            config,
            session: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn workflow(&self) -> BuildingWorkflow<'_> {
        BuildingWorkflow::new(
            self.driver.as_ref(),
            self.clock.as_ref(),
            &self.catalog,
            &self.config,
        )
    }

    pub async fn login(&self) -> Result<(), ApplicationError> {
        let _session = self.session.lock().await;
        session::login(self.driver.as_ref(), &self.config).await
    }

    /// Executes a command.
    /// A command may submit constructions, upgrades or demolitions to the game.
    pub async fn execute<C, H>(&self, cmd: C, handler: H) -> Result<C::Output, ApplicationError>
    where
        C: Command + std::fmt::Debug,
        H: CommandHandler<C>,
    {
        let _session = self.session.lock().await;
        debug!(?cmd, "Executing command");

        let result = handler.handle(cmd, &self.workflow()).await;
        if let Err(err) = &result {
            warn!("Command failed: {err}");
        }
        result
    }

    /// Executes a query.
    /// A query only reads the village and never submits anything.
    pub async fn query<Q, H>(&self, query: Q, handler: H) -> Result<Q::Output, ApplicationError>
    where
        Q: Query + std::fmt::Debug,
        H: QueryHandler<Q>,
    {
        let _session = self.session.lock().await;
        debug!(?query, "Executing query");

        handler.handle(query, &self.workflow()).await
    }
}
