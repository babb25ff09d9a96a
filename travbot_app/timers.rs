use std::time::Duration;
use tracing::{debug, warn};

use travbot_types::errors::WorkflowError;

use crate::{
    driver::{GameClock, PageDriver, TEXT},
    locators::Locator,
    parsers::parse_countdown,
};

/// Shortest wait, so a zero countdown still lets the game catch up.
pub const MIN_WAIT_SECS: u32 = 1;

/// Reads the countdown behind `locator` in seconds.
///
/// A jammed timer (trailing `?`) gets one page refresh before being read again,
/// whatever is read then is parsed with the `?` stripped.
pub async fn read_countdown(
    driver: &dyn PageDriver,
    locator: &Locator,
) -> Result<u32, WorkflowError> {
    let text = read_text(driver, locator).await?;
    let countdown = parse_countdown(&text).ok_or_else(|| WorkflowError::parse("countdown", &text))?;
    if !countdown.jammed {
        return Ok(countdown.secs);
    }

    warn!("Countdown {text:?} is stuck, refreshing");
    driver.refresh().await?;

    let text = read_text(driver, locator).await?;
    parse_countdown(&text)
        .map(|countdown| countdown.secs)
        .ok_or_else(|| WorkflowError::parse("countdown", text))
}

/// Sleeps for `secs`, never less than [`MIN_WAIT_SECS`].
pub async fn wait_secs(clock: &dyn GameClock, secs: u32) -> u32 {
    let secs = secs.max(MIN_WAIT_SECS);
    debug!("Waiting {secs}s");
    clock.sleep(Duration::from_secs(secs as u64)).await;
    secs
}

async fn read_text(driver: &dyn PageDriver, locator: &Locator) -> Result<String, WorkflowError> {
    driver
        .read_attribute(locator, TEXT)
        .await
        .ok_or_else(|| WorkflowError::parse("countdown", format!("missing {locator:?}")))
}
