//! clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cafebot")]
#[command(about = "Coffee Corner RAG bot for LINE", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server
    Serve {
        /// Listener port, overriding the configured value
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Provision the vector index and import the knowledge base
    Setup {
        /// Path to the knowledge base JSON file
        #[arg(short, long, default_value = "data/cafe_data.json")]
        data: PathBuf,

        /// Run verification queries after the import
        #[arg(long)]
        verify: bool,
    },

    /// Answer one question from the command line, without LINE
    Chat {
        /// The question to ask
        question: String,
    },
}
