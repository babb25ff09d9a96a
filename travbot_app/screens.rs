use tracing::{debug, warn};

use travbot_game::models::village::is_resource_site;
use travbot_types::errors::WorkflowError;

use crate::driver::PageDriver;

/// Game pages the bot knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    /// Resource fields (`dorf1.php`), sites 1-18, also shows the build queue.
    Overview,
    /// Village center (`dorf2.php`), sites 19-40.
    Village,
    /// A single site, optionally on a build menu tab.
    Site { site_id: u8, category: Option<u8> },
}

impl Screen {
    pub fn site(site_id: u8) -> Self {
        Screen::Site {
            site_id,
            category: None,
        }
    }

    /// Listing screen a site is drawn on.
    pub fn listing_for(site_id: u8) -> Self {
        if is_resource_site(site_id) {
            Screen::Overview
        } else {
            Screen::Village
        }
    }

    pub fn path(&self) -> String {
        match self {
            Screen::Login => "login.php".to_string(),
            Screen::Overview => "dorf1.php".to_string(),
            Screen::Village => "dorf2.php".to_string(),
            Screen::Site {
                site_id,
                category: None,
            } => format!("build.php?id={site_id}"),
            Screen::Site {
                site_id,
                category: Some(category),
            } => format!("build.php?id={site_id}&category={category}"),
        }
    }

    pub fn url(&self, server_url: &str) -> String {
        format!("{}/{}", server_url.trim_end_matches('/'), self.path())
    }

    /// Recognizes a screen from any absolute or relative game url.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let page = path.rsplit('/').next().unwrap_or_default();

        let param = |key: &str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| v.parse::<u8>().ok())
        };

        match page {
            "login.php" => Some(Screen::Login),
            "dorf1.php" => Some(Screen::Overview),
            "dorf2.php" => Some(Screen::Village),
            "build.php" => Some(Screen::Site {
                site_id: param("id")?,
                category: param("category"),
            }),
            _ => None,
        }
    }

    /// Same page, ignoring the build menu tab.
    pub fn same_page(&self, other: &Screen) -> bool {
        match (self, other) {
            (Screen::Site { site_id: a, .. }, Screen::Site { site_id: b, .. }) => a == b,
            (a, b) => a == b,
        }
    }
}

/// Navigates to `screen` and checks the browser actually landed there.
pub async fn open_screen(
    driver: &dyn PageDriver,
    server_url: &str,
    screen: &Screen,
) -> Result<(), WorkflowError> {
    let url = screen.url(server_url);
    debug!("Opening {url}");

    if let Err(err) = driver.navigate(&url).await {
        warn!("Navigation to {url} failed: {err}");
        return Err(WorkflowError::NavigationFailed { url });
    }

    let landed = driver.current_url().await?;
    match Screen::from_url(&landed) {
        Some(actual) if actual.same_page(screen) => Ok(()),
        _ => {
            warn!("Expected {url}, landed on {landed}");
            Err(WorkflowError::NavigationFailed { url })
        }
    }
}
