//! Run controller - orchestration layer
//!
//! Iterates every table row through the configured flow, one browser
//! session, one row at a time. Row failures are caught at the row
//! boundary, logged with full detail, and marked with the ERROR sentinel;
//! the run continues. Whatever happens, the table is saved and the browser
//! closed before the process ends, so partial results are never lost.

use std::future::Future;

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::DomExecutor;
use crate::models::{ConceptTable, ERROR};
use crate::services::{Authenticator, ErrorLog};
use crate::workflow::{RowCtx, RowFlow, RowOutcome};

/// Application main structure
pub struct App {
    config: Config,
    browser: Browser,
    executor: DomExecutor,
    error_log: ErrorLog,
}

impl App {
    /// Launch the browser session and wire up the error log.
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let error_log = ErrorLog::new(&config.error_log_path);

        let (browser, page) = match browser::launch_browser(config.headless).await {
            Ok(pair) => pair,
            Err(e) => {
                // Browser startup is a fatal pre-run failure; it still goes
                // into the error log before the run aborts.
                if let Err(log_err) = error_log
                    .append(&format!("browser start error: {:#}", e))
                    .await
                {
                    error!("Could not write to error log: {:#}", log_err);
                }
                return Err(e.into());
            }
        };
        let executor = DomExecutor::new(page);

        Ok(Self {
            config,
            browser,
            executor,
            error_log,
        })
    }

    /// Run the pipeline to completion, then block for operator
    /// acknowledgment when configured to.
    pub async fn run(mut self) -> Result<RunStats> {
        let result = self.execute().await;
        if self.config.wait_on_exit {
            wait_for_ack().await;
        }
        result
    }

    async fn execute(&mut self) -> Result<RunStats> {
        let mut table = match ConceptTable::load(&self.config.input_path) {
            Ok(table) => table,
            Err(e) => {
                error!("Could not load input table: {}", e);
                if let Err(log_err) =
                    self.error_log.append(&format!("table load error: {}", e)).await
                {
                    error!("Could not write to error log: {:#}", log_err);
                }
                self.shutdown_browser().await;
                return Err(e.into());
            }
        };

        let run_result = self.process_rows(&mut table).await;

        // Guaranteed finalization: the table is persisted and the session
        // closed whether the loop completed or a fatal error escaped it.
        info!("Cleaning up...");
        finalize(&table, &self.config.output_path, &self.error_log).await;
        self.shutdown_browser().await;

        match run_result {
            Ok(stats) => {
                print_final_stats(&stats, &self.config);
                Ok(stats)
            }
            Err(e) => {
                error!("Run aborted: {:#}", e);
                if let Err(log_err) =
                    self.error_log.append(&format!("fatal error: {:#}", e)).await
                {
                    error!("Could not write to error log: {:#}", log_err);
                }
                Err(e)
            }
        }
    }

    /// Authenticate, then drive every row through the flow in input order.
    async fn process_rows(&self, table: &mut ConceptTable) -> Result<RunStats> {
        if table.is_empty() {
            warn!("Input table has no rows, nothing to process");
            return Ok(RunStats::default());
        }

        Authenticator::new(&self.config).login(&self.executor).await?;

        let flow = RowFlow::for_config(&self.config);
        let flow = &flow;
        let executor = &self.executor;
        drive_rows(table, &self.error_log, move |_index, name, ctx| async move {
            flow.run(executor, &name, &ctx).await
        })
        .await
    }

    async fn shutdown_browser(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        } else {
            info!("Browser closed");
        }
    }
}

/// Drive every row through `step` in input order.
///
/// A step failure is caught at the row boundary, written to the error log,
/// and marked with the ERROR sentinel; the loop continues. Only a failure
/// of the error log itself (or an impossible row index) escapes the
/// boundary and aborts the remaining rows.
async fn drive_rows<F, Fut>(
    table: &mut ConceptTable,
    error_log: &ErrorLog,
    mut step: F,
) -> Result<RunStats>
where
    F: FnMut(usize, String, RowCtx) -> Fut,
    Fut: Future<Output = Result<RowOutcome>>,
{
    let total = table.len();
    let mut stats = RunStats {
        total,
        ..Default::default()
    };

    for index in 0..total {
        let name = table.name(index)?.to_string();
        let ctx = RowCtx::new(index, &name);
        log_row_start(&ctx, total);

        match step(index, name, ctx.clone()).await {
            Ok(outcome) => {
                info!("[{}] Outcome: {}", ctx, outcome.label());
                let (concept_id, uuid) = outcome.result_fields();
                table.set_result(index, &concept_id, &uuid)?;
                stats.record(&outcome);
            }
            Err(e) => {
                // Row boundary: one row's failure never aborts the run.
                error!("[{}] Processing failed: {:#}", ctx, e);
                error_log
                    .append_row_error(ctx.sheet_row, &format!("{:#}", e))
                    .await?;
                table.set_result(index, ERROR, ERROR)?;
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

/// Persist the table regardless of how the run ended. Save failures are
/// reported and logged, never raised, so the session teardown that follows
/// always runs.
async fn finalize(table: &ConceptTable, output_path: &str, error_log: &ErrorLog) {
    match table.save(output_path) {
        Ok(()) => info!("Table saved to {}", output_path),
        Err(e) => {
            error!("Could not save output table: {}", e);
            if let Err(log_err) = error_log.append(&format!("table save error: {}", e)).await {
                error!("Could not write to error log: {:#}", log_err);
            }
        }
    }
}

/// Whole-run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub created: usize,
    pub found: usize,
    pub duplicates: usize,
    pub not_found: usize,
    pub errors: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Created { .. } => self.created += 1,
            RowOutcome::Found { .. } => self.found += 1,
            RowOutcome::Duplicate => self.duplicates += 1,
            RowOutcome::NotFound => self.not_found += 1,
        }
    }
}

// ========== Console output helpers ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("Concept batch run - {} pipeline", config.workflow.as_str());
    info!("Input:  {}", config.input_path);
    info!("Output: {}", config.output_path);
    info!("Target: {}", config.login_url);
    info!("{}", "=".repeat(60));
}

fn log_row_start(ctx: &RowCtx, total: usize) {
    info!("{}", "-".repeat(40));
    info!("Processing {} (index {} of {} data rows)", ctx, ctx.index + 1, total);
}

fn print_final_stats(stats: &RunStats, config: &Config) {
    info!("{}", "=".repeat(60));
    info!("Run complete at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Total rows:  {}", stats.total);
    info!("Created:     {}", stats.created);
    info!("Found:       {}", stats.found);
    info!("Duplicates:  {}", stats.duplicates);
    info!("Not found:   {}", stats.not_found);
    info!("Errors:      {}", stats.errors);
    info!("{}", "=".repeat(60));
    info!("Errors (if any) logged to: {}", config.error_log_path);
}

/// Keep the window open on attended runs so the operator can read the
/// final status before it closes. The stdin read blocks, so it runs on a
/// blocking thread rather than a runtime worker.
async fn wait_for_ack() {
    println!("Press Enter to exit...");
    let _ = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    })
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConceptRecord;
    use anyhow::anyhow;
    use std::fs;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("concept_batch_submit_{}_{}", std::process::id(), name));
        path.to_string_lossy().to_string()
    }

    fn table_of(names: &[&str]) -> ConceptTable {
        ConceptTable::from_rows(names.iter().map(|n| ConceptRecord::new(*n)).collect())
    }

    #[test]
    fn stats_record_every_outcome_kind() {
        let mut stats = RunStats {
            total: 4,
            ..Default::default()
        };
        stats.record(&RowOutcome::Created {
            concept_id: "1".to_string(),
            uuid: "u1".to_string(),
        });
        stats.record(&RowOutcome::Duplicate);
        stats.record(&RowOutcome::Duplicate);
        stats.record(&RowOutcome::NotFound);

        assert_eq!(stats.created, 1);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.errors, 0);
    }

    #[tokio::test]
    async fn row_failure_is_isolated_and_marked() {
        let log_path = temp_path("row_isolation_log.txt");
        let _ = fs::remove_file(&log_path);
        let error_log = ErrorLog::new(&log_path);
        let mut table = table_of(&["Headache", "Fever", "Cough"]);

        let stats = drive_rows(&mut table, &error_log, |index, name, _ctx| async move {
            if index == 1 {
                Err(anyhow!("name input never appeared"))
            } else {
                Ok(RowOutcome::Created {
                    concept_id: format!("{}", 100 + index),
                    uuid: format!("uuid-{}", name),
                })
            }
        })
        .await
        .unwrap();

        // The failed row is marked and the rows after it still processed.
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.created, 2);
        assert_eq!(table.rows()[1].concept_id.as_deref(), Some(ERROR));
        assert_eq!(table.rows()[1].uuid.as_deref(), Some(ERROR));
        assert_eq!(table.rows()[2].concept_id.as_deref(), Some("102"));

        let log = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 1);
        // Spreadsheet row number, not the zero-based index.
        assert!(lines[0].contains("row 3 error: name input never appeared"));

        fs::remove_file(&log_path).unwrap();
    }

    #[tokio::test]
    async fn fatal_error_mid_loop_still_persists_partial_results() {
        let out_path = temp_path("fatal_partial_out.csv");
        let _ = fs::remove_file(&out_path);
        // The error log path is a directory, so row 3's failure cannot be
        // logged and escapes the row boundary as a fatal error.
        let error_log = ErrorLog::new(std::env::temp_dir().to_string_lossy().to_string());
        let mut table = table_of(&["Headache", "Fever", "Cough", "Nausea", "Fatigue"]);

        let run_result = drive_rows(&mut table, &error_log, |index, _name, _ctx| async move {
            if index < 2 {
                Ok(RowOutcome::Created {
                    concept_id: (index + 1).to_string(),
                    uuid: format!("uuid-{}", index + 1),
                })
            } else {
                Err(anyhow!("save control vanished"))
            }
        })
        .await;
        assert!(run_result.is_err());

        // Finalization still runs, exactly as execute() does after the loop.
        finalize(&table, &out_path, &error_log).await;

        let reloaded = ConceptTable::load(&out_path).unwrap();
        assert_eq!(reloaded.len(), 5);
        assert_eq!(reloaded.rows()[0].concept_id.as_deref(), Some("1"));
        assert_eq!(reloaded.rows()[1].concept_id.as_deref(), Some("2"));
        assert_eq!(reloaded.rows()[1].uuid.as_deref(), Some("uuid-2"));
        for row in &reloaded.rows()[2..] {
            assert!(!row.is_processed());
        }

        fs::remove_file(&out_path).unwrap();
    }

    #[tokio::test]
    async fn finalize_swallows_save_failures() {
        // Output path is a directory: the save fails but finalize returns
        // normally so teardown can proceed.
        let table = table_of(&["Headache"]);
        let log_path = temp_path("finalize_save_fail_log.txt");
        let _ = fs::remove_file(&log_path);
        let error_log = ErrorLog::new(&log_path);

        let dir = std::env::temp_dir().to_string_lossy().to_string();
        finalize(&table, &dir, &error_log).await;

        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("table save error"));

        fs::remove_file(&log_path).unwrap();
    }
}
