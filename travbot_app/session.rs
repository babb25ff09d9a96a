use tracing::info;

use travbot_types::errors::{AppError, ApplicationError, WorkflowError};

use crate::{
    config::Config,
    driver::{PageDriver, PageLoad},
    locators::Locator,
    screens::{Screen, open_screen},
};

/// Logs the browser session in, unless it already is.
pub async fn login(driver: &dyn PageDriver, config: &Config) -> Result<(), ApplicationError> {
    let username = config
        .username
        .as_deref()
        .ok_or(AppError::MissingEnv("TRAVBOT_USERNAME"))?;
    let password = config
        .password
        .as_deref()
        .ok_or(AppError::MissingEnv("TRAVBOT_PASSWORD"))?;

    let url = Screen::Login.url(&config.server_url);
    if driver.navigate(&url).await.is_err() {
        return Err(WorkflowError::NavigationFailed { url }.into());
    }

    if driver.is_visible(&Locator::LoginName).await {
        let submitted = driver
            .type_text(&Locator::LoginName, username, PageLoad::NoWait)
            .await
            && driver
                .type_text(&Locator::LoginPassword, password, PageLoad::NoWait)
                .await
            && driver.click(&Locator::LoginSubmit, PageLoad::Wait).await;
        if !submitted {
            return Err(AppError::LoginFailed(username.to_string()).into());
        }
    } else {
        info!("Session already logged in");
    }

    open_screen(driver, &config.server_url, &Screen::Overview).await?;
    info!("Logged in as {username}");

    Ok(())
}
