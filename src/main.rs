use anyhow::Result;
use concept_batch_submit::{utils, App, Config, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init();

    // Pipeline selection: CLI argument first, WORKFLOW env second,
    // create by default.
    let workflow = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WORKFLOW").ok())
        .and_then(|v| Workflow::parse(&v))
        .unwrap_or(Workflow::Create);
    let config = Config::from_env(workflow);

    App::initialize(config).await?.run().await?;

    Ok(())
}
