//! `cafebot chat`: one-shot question answering for local testing.

use anyhow::{Context, Result};

use crate::infrastructure::config::ConfigLoader;

pub async fn execute(question: &str) -> Result<()> {
    let config = ConfigLoader::load()?;

    let index = super::build_index(&config)?;
    index
        .connect()
        .await
        .context("failed to reach the vector index")?;

    let pipeline = super::build_pipeline(&config, index)?;
    let reply = pipeline.process_message(question).await;

    println!("{}", reply.reply_text);

    if !reply.sources.is_empty() {
        println!("\nSources: {}", reply.sources.join(", "));
    }
    if !reply.quick_replies.is_empty() {
        let chips: Vec<&str> = reply.quick_replies.iter().map(|c| c.text()).collect();
        println!("Quick replies: {}", chips.join(" | "));
    }

    Ok(())
}
