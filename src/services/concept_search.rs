//! Concept dictionary search - capability layer
//!
//! Drives the search page for the lookup pipeline: enter a name, trigger
//! the search, find the exact-matching result, open its detail view.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::DomExecutor;

const SEARCH_LANDMARK_XPATH: &str =
    "//span[contains(text(), 'Find a concept by typing in its name or Id:')]";
const SEARCH_INPUT_ID: &str = "inputNode";
const SEARCH_BUTTON_XPATH: &str =
    "//input[@type='button' and @name='searchButton' and @value='Search']";
const RESULT_TEXT_XPATH: &str = "//table[@id='openmrsSearchTable']//tbody//tr/td/span";
const DETAIL_LANDMARK_XPATH: &str = "//th[contains(text(), 'Fully Specified Name')]";

/// Exact match after trimming and case-folding — never substring or fuzzy.
pub fn is_exact_match(candidate: &str, target: &str) -> bool {
    candidate.trim().to_lowercase() == target.trim().to_lowercase()
}

/// Concept dictionary search
pub struct ConceptSearch {
    index_url: String,
    field_wait: Duration,
}

impl ConceptSearch {
    pub fn new(config: &Config) -> Self {
        Self {
            index_url: config.index_url.clone(),
            field_wait: config.field_wait(),
        }
    }

    /// Open the dictionary index page and confirm its landmark.
    pub async fn open(&self, executor: &DomExecutor) -> Result<()> {
        executor.goto(&self.index_url).await?;
        executor
            .wait_until(
                &DomExecutor::xpath_visible_probe(SEARCH_LANDMARK_XPATH),
                self.field_wait,
                "dictionary search landmark",
            )
            .await
            .context("dictionary search page did not load as expected")?;
        debug!("Concept dictionary loaded");
        Ok(())
    }

    /// Enter the name into the search box and trigger the search.
    pub async fn search(&self, executor: &DomExecutor, name: &str) -> Result<()> {
        executor
            .wait_until(
                &DomExecutor::id_clickable_probe(SEARCH_INPUT_ID),
                self.field_wait,
                "search input",
            )
            .await?;
        executor.set_value_by_id(SEARCH_INPUT_ID, name).await?;
        executor.click_xpath(SEARCH_BUTTON_XPATH).await?;
        debug!("Search triggered for '{}'", name);
        Ok(())
    }

    /// Scan the rendered result list for an entry whose text equals `name`
    /// case-insensitively, and open its detail view.
    ///
    /// Returns false when no result list renders or no entry matches.
    pub async fn open_matching_result(&self, executor: &DomExecutor, name: &str) -> Result<bool> {
        let results_probe = DomExecutor::xpath_visible_probe(RESULT_TEXT_XPATH);
        if !executor.try_wait(&results_probe, self.field_wait).await {
            warn!("No search results rendered for '{}'", name);
            return Ok(false);
        }

        let texts = executor.texts_of_xpath(RESULT_TEXT_XPATH).await?;
        let position = match texts.iter().position(|text| is_exact_match(text, name)) {
            Some(position) => position,
            None => {
                debug!(
                    "No exact case-insensitive match for '{}' among {} results",
                    name,
                    texts.len()
                );
                return Ok(false);
            }
        };

        // XPath positions are 1-based; click the matching entry's row.
        let row_xpath = format!("({})[{}]/ancestor::tr", RESULT_TEXT_XPATH, position + 1);
        executor.click_xpath(&row_xpath).await?;
        executor
            .wait_until(
                &DomExecutor::xpath_visible_probe(DETAIL_LANDMARK_XPATH),
                self.field_wait,
                "concept detail landmark",
            )
            .await
            .context("concept detail view did not open")?;
        debug!("Opened detail view for '{}'", name);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::is_exact_match;

    #[test]
    fn matching_ignores_case() {
        assert!(is_exact_match("fever", "Fever"));
        assert!(is_exact_match("FEVER", "fever"));
    }

    #[test]
    fn matching_ignores_surrounding_whitespace() {
        assert!(is_exact_match("  Fever \n", "fever"));
    }

    #[test]
    fn substring_is_not_a_match() {
        assert!(!is_exact_match("Fever", "Fev"));
        assert!(!is_exact_match("Fev", "Fever"));
        assert!(!is_exact_match("Yellow Fever", "Fever"));
    }
}
