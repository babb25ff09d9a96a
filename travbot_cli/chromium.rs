//! [`PageDriver`] over a Chromium instance driven through the DevTools protocol.
//!
//! Reads go through small scripts evaluated in the page, so a missing element
//! is an answer (`false`, `None`, no rows) rather than an error. Only
//! navigation and page loads can fail, and both are bounded by the configured
//! page timeout.

use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::{
    Page,
    browser::{Browser, BrowserConfig},
};
use futures::StreamExt;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, warn};

use travbot_app::{
    config::Config,
    driver::{PageDriver, PageLoad, TEXT},
    locators::Locator,
};
use travbot_types::errors::DriverError;

const LOAD_POLL: Duration = Duration::from_millis(100);

pub struct ChromiumDriver {
    _browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    page_timeout: Duration,
}

impl ChromiumDriver {
    pub async fn launch(config: &Config) -> anyhow::Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1280, 1024)
            .arg("--disable-dev-shm-usage");

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(DriverError::LaunchFailed)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::LaunchFailed(e.to_string()))
            .context("can't start chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("Browser event error: {err}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("can't open the game tab")?;
        debug!(headless = config.headless, "Browser launched");

        Ok(Self {
            _browser: browser,
            handler,
            page,
            page_timeout: Duration::from_millis(config.page_timeout_ms),
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, DriverError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;

        result
            .into_value::<T>()
            .map_err(|e| DriverError::Evaluation(e.to_string()))
    }

    /// Polls the document until it is loaded and, when marked stale before an
    /// action, replaced by a new one.
    async fn wait_for_load(&self) -> Result<(), DriverError> {
        let deadline = Instant::now() + self.page_timeout;

        loop {
            let settled = self
                .eval::<DocumentState>(DocumentState::SCRIPT.to_string())
                .await
                .is_ok_and(|state| state.settled());
            if settled {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(self.page_timeout.as_millis() as u64));
            }
            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    /// Flags the current document, a reload drops the flag with it.
    async fn mark_stale(&self, load: PageLoad) {
        if matches!(load, PageLoad::NoWait) {
            return;
        }
        if let Err(err) = self.eval::<bool>(DocumentState::MARK_SCRIPT.to_string()).await {
            debug!("Can't mark the page as stale: {err}");
        }
    }

    async fn settle(&self, load: PageLoad) -> bool {
        if matches!(load, PageLoad::NoWait) {
            return true;
        }

        match tokio::time::timeout(self.page_timeout, self.page.wait_for_navigation()).await {
            Ok(Err(err)) => debug!("Navigation wait failed: {err}"),
            Err(_) => debug!("No navigation within {:?}", self.page_timeout),
            Ok(Ok(_)) => {}
        }

        match self.wait_for_load().await {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }
}

/// What the page says about its own document.
#[derive(Debug, Deserialize)]
struct DocumentState {
    ready: String,
    stale: bool,
}

impl DocumentState {
    const SCRIPT: &'static str =
        "({ ready: document.readyState, stale: window.__travbotStale === true })";
    const MARK_SCRIPT: &'static str = "(() => { window.__travbotStale = true; return true; })()";

    /// The old document, even fully loaded, still counts as loading.
    fn settled(&self) -> bool {
        !self.stale && self.ready == "complete"
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// JS string literal for `value`.
fn js_str(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("Navigating to {url}");
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_load().await
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;

        Ok(url.unwrap_or_default())
    }

    async fn refresh(&self) -> Result<(), DriverError> {
        self.page
            .reload()
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;

        self.wait_for_load().await
    }

    async fn is_visible(&self, locator: &Locator) -> bool {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                if (el.tagName === 'AREA') return true;
                const style = window.getComputedStyle(el);
                return style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && el.getClientRects().length > 0;
            }})()"#,
            selector = js_str(&locator.css()),
        );

        self.eval(script).await.unwrap_or_else(|err| {
            debug!("Visibility of {locator:?} unknown: {err}");
            false
        })
    }

    async fn read_attribute(&self, locator: &Locator, attribute: &str) -> Option<String> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return null;
                const value = {attribute} === {text} ? el.textContent : el.getAttribute({attribute});
                return value === null ? null : value.trim();
            }})()"#,
            selector = js_str(&locator.css()),
            attribute = js_str(attribute),
            text = js_str(TEXT),
        );

        self.eval::<Option<String>>(script)
            .await
            .inspect_err(|err| debug!("Can't read {attribute} of {locator:?}: {err}"))
            .ok()
            .flatten()
    }

    async fn read_all_attributes(
        &self,
        locator: &Locator,
        attributes: &[&str],
    ) -> Vec<Vec<String>> {
        let attributes = serde_json::Value::from(attributes.to_vec()).to_string();
        let script = format!(
            r#"Array.from(document.querySelectorAll({selector})).map(el =>
                {attributes}.map(a => ((a === {text} ? el.textContent : el.getAttribute(a)) || '').trim())
            )"#,
            selector = js_str(&locator.css()),
            text = js_str(TEXT),
        );

        self.eval(script).await.unwrap_or_else(|err| {
            debug!("Can't read {locator:?}: {err}");
            vec![]
        })
    }

    async fn click(&self, locator: &Locator, load: PageLoad) -> bool {
        let element = match self.page.find_element(locator.css()).await {
            Ok(element) => element,
            Err(err) => {
                debug!("Can't find {locator:?}: {err}");
                return false;
            }
        };
        self.mark_stale(load).await;
        if let Err(err) = element.click().await {
            warn!("Click on {locator:?} failed: {err}");
            return false;
        }

        self.settle(load).await
    }

    async fn type_text(&self, locator: &Locator, text: &str, load: PageLoad) -> bool {
        // dropdowns take the option value, inputs are cleared then typed into
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return 'missing';
                if (el.tagName === 'SELECT') {{
                    const option = Array.from(el.options).find(o => o.value === {text});
                    if (!option) return 'missing';
                    el.value = option.value;
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return 'selected';
                }}
                el.value = '';
                el.focus();
                return 'input';
            }})()"#,
            selector = js_str(&locator.css()),
            text = js_str(text),
        );

        self.mark_stale(load).await;
        match self.eval::<String>(script).await.as_deref() {
            Ok("selected") => self.settle(load).await,
            Ok("input") => {
                let typed = match self.page.find_element(locator.css()).await {
                    Ok(element) => element.type_str(text).await.map(|_| ()),
                    Err(err) => Err(err),
                };
                if let Err(err) = typed {
                    warn!("Typing into {locator:?} failed: {err}");
                    return false;
                }
                self.settle(load).await
            }
            Ok(_) => false,
            Err(err) => {
                debug!("Can't type into {locator:?}: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ready: &str, stale: bool) -> DocumentState {
        DocumentState {
            ready: ready.to_string(),
            stale,
        }
    }

    #[test]
    fn test_submitted_page_waits_for_the_next_document() {
        // right after a click the old document is still complete
        assert!(!state("complete", true).settled());
        assert!(!state("loading", false).settled());
        assert!(!state("interactive", false).settled());
        assert!(state("complete", false).settled());
    }

    #[test]
    fn test_document_state_reads_the_page_answer() {
        let answer: DocumentState =
            serde_json::from_str(r#"{"ready":"complete","stale":true}"#).unwrap();
        assert!(!answer.settled());
        assert!(DocumentState::SCRIPT.contains("__travbotStale"));
        assert!(DocumentState::MARK_SCRIPT.contains("__travbotStale = true"));
    }

    #[test]
    fn test_js_str_escapes_quotes() {
        assert_eq!(js_str("map area[href$='id=3']"), r#""map area[href$='id=3']""#);
        assert_eq!(js_str(r#"a "b""#), r#""a \"b\"""#);
    }
}
