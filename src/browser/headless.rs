use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, BrowserError};

/// Launch a browser and open a blank page.
///
/// Operators watching a run can set `headless = false` to get a visible
/// window; unattended runs keep the headless default.
pub async fn launch_browser(headless: bool) -> AppResult<(Browser, Page)> {
    info!("Launching browser (headless: {})...", headless);

    let mut builder = BrowserConfig::builder();
    if headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--remote-debugging-port=0",
        ])
        .build()
        .map_err(|e| {
            error!("Browser configuration failed: {}", e);
            AppError::Other(format!("browser configuration failed: {}", e))
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("Browser launch failed: {}", e);
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(e),
        })
    })?;
    debug!("Browser launched");

    // Drain browser events in the background.
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Brief settle so the browser finishes syncing state.
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("Page creation failed: {}", e);
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(e),
        })
    })?;

    info!("Browser session ready");
    Ok((browser, page))
}
