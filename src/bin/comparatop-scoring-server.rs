//! ComparaTop scoring HTTP server binary

use anyhow::Context;
use comparatop_scoring::{server, InMemoryCatalog, ScoringEngine, ServiceConfig, SicKnowledgeBase};
use comparatop_scoring::{CategoryRegistry, HmumAggregator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("ComparaTop Scoring Core");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = ServiceConfig::from_env()?;

    let catalog = match config.catalog_path {
        Some(ref path) => {
            println!("✓ Catalog: {}", path.display());
            InMemoryCatalog::load(path).await?
        }
        None => {
            println!("✓ Catalog: bundled demo");
            println!("   (set COMPARATOP_CATALOG_PATH to load your own)");
            InMemoryCatalog::demo()?
        }
    };
    println!("✓ {} products loaded", catalog.len());

    let categories = CategoryRegistry::builtin(config.weight_policy).context("invalid category configs")?;
    let sic = SicKnowledgeBase::builtin().context("invalid component mappings")?;

    let engine = ScoringEngine::new(
        Box::new(catalog),
        categories,
        sic,
        HmumAggregator::default(),
        config.energy_rate,
    );

    println!("✓ Scoring engine initialized ({:?} weight policy)", config.weight_policy);
    println!("✓ Starting HTTP server on port {}...", config.port);
    println!();

    server::run_server(engine, config.port).await?;

    Ok(())
}
