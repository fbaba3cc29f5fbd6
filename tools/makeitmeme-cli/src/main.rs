//! MakeItMeme CLI: compose memes and exercise the shared feed offline.
//!
//! Usage:
//!   makeitmeme compose <INPUT>   Caption one image and write a PNG
//!   makeitmeme catalog           List the base image catalog
//!   makeitmeme studio            Run a draft: swap, caption, commit
//!   makeitmeme feed-demo         Publish and observe on an in-process feed
//!   makeitmeme config            Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use makeitmeme_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "makeitmeme",
    about = "Caption images and share them on a realtime feed",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Caption a single image file
    Compose {
        /// Base image to caption
        input: PathBuf,

        /// Top caption
        #[arg(long, default_value = "")]
        top: String,

        /// Bottom caption
        #[arg(long, default_value = "")]
        bottom: String,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Bound on the longest edge (defaults to the configured value)
        #[arg(long)]
        max_edge: Option<u32>,
    },

    /// List the base image catalog
    Catalog {
        /// Catalog directory (defaults to the configured assets_dir)
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Run one draft: optional swaps, captions, then commit
    Studio {
        /// Catalog directory (defaults to the configured assets_dir)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Where committed memes are saved (defaults to the configured output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of base image swaps to spend before committing
        #[arg(long, default_value = "0")]
        swaps: u8,

        /// Top caption
        #[arg(long, default_value = "")]
        top: String,

        /// Bottom caption
        #[arg(long, default_value = "")]
        bottom: String,

        /// Seed for reproducible asset choices
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Publish messages and reactions on an in-process feed and print it
    FeedDemo {
        /// Messages to publish, in order
        #[arg(default_values_t = vec!["hello".to_string(), "nice meme".to_string()])]
        messages: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    makeitmeme_common::logging::init_logging(&logging);
    tracing::debug!(path = %AppConfig::path().display(), "Configuration loaded");

    match cli.command {
        Commands::Compose {
            input,
            top,
            bottom,
            output,
            max_edge,
        } => commands::compose::run(&config, input, top, bottom, output, max_edge),
        Commands::Catalog { assets } => commands::catalog::run(&config, assets),
        Commands::Studio {
            assets,
            output,
            swaps,
            top,
            bottom,
            seed,
        } => commands::studio::run(&config, assets, output, swaps, top, bottom, seed).await,
        Commands::FeedDemo { messages } => commands::feed_demo::run(&config, messages).await,
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
