use concept_batch_submit::browser::launch_browser;
use concept_batch_submit::infrastructure::DomExecutor;
use concept_batch_submit::services::Authenticator;
use concept_batch_submit::utils;
use concept_batch_submit::{Config, ConceptTable, Workflow};

// Browser-dependent tests are ignored by default; run them manually
// against a reachable target with: cargo test -- --ignored

#[tokio::test]
#[ignore]
async fn test_browser_launch() {
    utils::logging::init();

    let result = launch_browser(true).await;
    assert!(result.is_ok(), "browser should launch");

    let (mut browser, _page) = result.unwrap();
    let _ = browser.close().await;
}

#[tokio::test]
#[ignore]
async fn test_login() {
    utils::logging::init();

    let config = Config::from_env(Workflow::Create);
    let (mut browser, page) = launch_browser(config.headless)
        .await
        .expect("browser should launch");
    let executor = DomExecutor::new(page);

    let result = Authenticator::new(&config).login(&executor).await;
    assert!(result.is_ok(), "login should succeed: {:?}", result.err());

    let _ = browser.close().await;
}

#[tokio::test]
#[ignore]
async fn test_load_input_table() {
    utils::logging::init();

    let config = Config::from_env(Workflow::Create);
    let table = ConceptTable::load(&config.input_path).expect("input table should load");

    println!("loaded {} rows from {}", table.len(), config.input_path);
    assert!(!table.is_empty(), "input table should have rows");
}
