//! `cafebot setup`: provision the index and import the knowledge base.

use std::path::Path;

use anyhow::Result;

use crate::infrastructure::config::ConfigLoader;
use crate::services::IngestionService;

/// Queries used by `--verify` to smoke-test the freshly imported index.
const VERIFY_QUERIES: [&str; 3] = ["ราคาลาเต้", "ร้านเปิดกี่โมง", "ที่อยู่ร้าน"];

pub async fn execute(data: &Path, verify: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    let embedder = super::load_embedder()?;
    let index = super::build_index(&config)?;

    let ingestion = IngestionService::new(embedder, index);
    let count = ingestion.run(data).await?;
    println!("Imported {count} documents into '{}'.", config.retrieval.index_name);

    if verify {
        ingestion.verify(&VERIFY_QUERIES).await?;
    }

    Ok(())
}
