//! `cafebot serve`: run the webhook server.

use anyhow::{Context, Result};

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::line::LineClient;
use crate::infrastructure::server::{self, AppState};

pub async fn execute(port: Option<u16>) -> Result<()> {
    let config = ConfigLoader::load()?;
    let port = port.unwrap_or(config.server.port);

    // Resolve the index host now so a bad index name or API key aborts
    // startup instead of degrading every message to the no-data reply.
    let index = super::build_index(&config)?;
    index
        .connect()
        .await
        .context("failed to reach the vector index")?;

    let pipeline = super::build_pipeline(&config, index)?;
    let line = LineClient::new(config.line_channel_access_token.clone())?;

    let state = AppState {
        pipeline,
        line,
        channel_secret: config.line_channel_secret.clone(),
    };

    server::serve(state, &config.server.host, port).await
}
