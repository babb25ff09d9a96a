//! Seams between the workflow and the outside world.
//!
//! The workflow never talks to a browser directly: it drives a [`PageDriver`]
//! and waits through a [`GameClock`], so the same code runs against Chromium
//! and against the in-memory game used by tests.

use async_trait::async_trait;
use std::time::Duration;

use travbot_types::errors::DriverError;

use crate::locators::Locator;

/// Attribute name that reads an element's text instead of an HTML attribute.
pub const TEXT: &str = "textContent";

/// Whether an interaction is expected to load a new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    Wait,
    NoWait,
}

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Loads `url` and waits for the page to settle.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    async fn refresh(&self) -> Result<(), DriverError>;

    async fn is_visible(&self, locator: &Locator) -> bool;

    /// First matching element's attribute, `None` when missing.
    async fn read_attribute(&self, locator: &Locator, attribute: &str) -> Option<String>;

    /// One row per matching element, one column per requested attribute.
    /// Missing attributes are read as empty strings.
    async fn read_all_attributes(&self, locator: &Locator, attributes: &[&str])
    -> Vec<Vec<String>>;

    /// Returns `false` when the element can't be found or clicked.
    async fn click(&self, locator: &Locator, load: PageLoad) -> bool;

    async fn type_text(&self, locator: &Locator, text: &str, load: PageLoad) -> bool;
}

/// Passing of game time.
#[async_trait]
pub trait GameClock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl GameClock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_clock_sleeps() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
