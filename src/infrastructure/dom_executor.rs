//! DOM executor - infrastructure layer
//!
//! Sole owner of the page; exposes navigation, script evaluation, and
//! bounded waits for page state. All DOM access goes through evaluated
//! JS with JSON-escaped arguments.

use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Interval between readiness probes inside a bounded wait.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Escape a Rust string as a JS string literal.
fn js_str(s: &str) -> String {
    JsonValue::String(s.to_owned()).to_string()
}

/// DOM executor
///
/// Responsibilities:
/// - hold the single Page resource
/// - expose eval / wait / DOM manipulation capabilities
/// - stay ignorant of concepts and workflow order
pub struct DomExecutor {
    page: Page,
}

impl DomExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate the page to `url`.
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    /// Evaluate JS in the page and return the JSON result.
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// Evaluate JS and deserialize the result into `T`.
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// Poll a boolean probe until it returns true or `timeout` elapses.
    ///
    /// Probe evaluation can race a page navigation; a failed evaluation
    /// counts as not-ready and the loop keeps polling.
    pub async fn try_wait(&self, probe_js: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.eval_as::<bool>(probe_js).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => debug!("probe evaluation failed, retrying: {}", e),
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Like [`try_wait`](Self::try_wait), but a lapsed timeout is an error
    /// naming the awaited state.
    pub async fn wait_until(
        &self,
        probe_js: &str,
        timeout: Duration,
        what: &str,
    ) -> AppResult<()> {
        if self.try_wait(probe_js, timeout).await {
            Ok(())
        } else {
            Err(AppError::wait_timed_out(what, timeout.as_secs()))
        }
    }

    // ========== Probe builders ==========

    /// True when an element with `id` exists, is rendered, and is enabled.
    pub fn id_clickable_probe(id: &str) -> String {
        format!(
            "(() => {{ const el = document.getElementById({}); \
             return el !== null && el.offsetParent !== null && !el.disabled; }})()",
            js_str(id)
        )
    }

    /// True when the first node matching `xpath` exists and is rendered.
    pub fn xpath_visible_probe(xpath: &str) -> String {
        format!(
            "(() => {{ const node = document.evaluate({}, document, null, \
             XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue; \
             return node !== null && node.offsetParent !== null; }})()",
            js_str(xpath)
        )
    }

    /// True when the current page URL contains `fragment`.
    pub fn url_contains_probe(fragment: &str) -> String {
        format!("window.location.href.includes({})", js_str(fragment))
    }

    // ========== DOM actions ==========

    /// Clear any residual value of the element with `id`, then set `value`,
    /// dispatching input/change events so framework listeners fire.
    pub async fn set_value_by_id(&self, id: &str, value: &str) -> AppResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.getElementById({id});
                if (el === null) return false;
                el.value = '';
                el.value = {value};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            id = js_str(id),
            value = js_str(value),
        );
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Other(format!("no element with id '{}'", id)))
        }
    }

    /// Click the first node matching `xpath`.
    pub async fn click_xpath(&self, xpath: &str) -> AppResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const node = document.evaluate({xpath}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                if (node === null) return false;
                node.click();
                return true;
            }})()
            "#,
            xpath = js_str(xpath),
        );
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Other(format!("no element matching {}", xpath)))
        }
    }

    /// Trimmed text content of the first node matching `xpath`.
    pub async fn text_of_xpath(&self, xpath: &str) -> AppResult<String> {
        let js_code = format!(
            r#"
            (() => {{
                const node = document.evaluate({xpath}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                return node === null ? null : node.textContent.trim();
            }})()
            "#,
            xpath = js_str(xpath),
        );
        self.eval_as::<Option<String>>(js_code)
            .await?
            .ok_or_else(|| AppError::Other(format!("no element matching {}", xpath)))
    }

    /// Trimmed text content of every node matching `xpath`, in document order.
    pub async fn texts_of_xpath(&self, xpath: &str) -> AppResult<Vec<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const result = document.evaluate({xpath}, document, null,
                    XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                const texts = [];
                for (let i = 0; i < result.snapshotLength; i++) {{
                    texts.push(result.snapshotItem(i).textContent.trim());
                }}
                return texts;
            }})()
            "#,
            xpath = js_str(xpath),
        );
        self.eval_as::<Vec<String>>(js_code).await
    }

    /// Select the option whose visible text equals `text` in the dropdown
    /// with `id`, dispatching a change event.
    pub async fn select_by_visible_text(&self, id: &str, text: &str) -> AppResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.getElementById({id});
                if (el === null) return false;
                for (const option of el.options) {{
                    if (option.text.trim() === {text}) {{
                        el.value = option.value;
                        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                        return true;
                    }}
                }}
                return false;
            }})()
            "#,
            id = js_str(id),
            text = js_str(text),
        );
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Other(format!(
                "no option '{}' in select '{}'",
                text, id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_str_escapes_quotes_and_newlines() {
        assert_eq!(js_str("plain"), r#""plain""#);
        assert_eq!(js_str(r#"a "quoted" name"#), r#""a \"quoted\" name""#);
        assert_eq!(js_str("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn probes_embed_escaped_arguments() {
        let probe = DomExecutor::id_clickable_probe("namesByLocale[en].name");
        assert!(probe.contains(r#""namesByLocale[en].name""#));

        let probe = DomExecutor::xpath_visible_probe("//th[contains(text(), 'Id')]");
        assert!(probe.contains(r#"//th[contains(text(), 'Id')]"#));

        let probe = DomExecutor::url_contains_probe("/openmrs/spa/home");
        assert!(probe.contains(r#""/openmrs/spa/home""#));
    }
}
