//! Fingerspell - English text and speech to ASL fingerspelling
//!
//! HTTP service converting typed or spoken English into sequences of
//! fingerspelling images.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use fingerspell::asr::WyomingClient;
use fingerspell::config::Config;
use fingerspell::core::{Normalizer, OllamaGrammar};
use fingerspell::glyphs::GlyphMapper;
use fingerspell::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// ASL image asset directory (overrides config)
    #[arg(short, long)]
    assets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Fingerspell v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(assets) = args.assets {
        config.asl_image_dir = assets.to_string_lossy().to_string();
    }

    let asset_dir = config.asl_image_path();
    if !asset_dir.is_dir() {
        warn!("Asset directory {:?} does not exist; all glyph lookups will miss", asset_dir);
    }

    // Process-wide collaborators, constructed once and never reinitialized
    let grammar = OllamaGrammar::new(&config);
    if grammar.is_enabled() && !grammar.health_check().await {
        warn!("Grammar model not reachable; corrections will fall back to input");
    }

    let speech = WyomingClient::new(&config.asr_host, config.asr_port);
    if !speech.health_check().await {
        warn!("Speech recognition service not reachable; /voice-to-asl will fail");
    }

    let state = Arc::new(AppState {
        normalizer: Normalizer::new(Arc::new(grammar), config.grammar_max_length),
        mapper: GlyphMapper::new(asset_dir.clone()),
        speech: Arc::new(speech),
        asset_dir,
    });

    server::serve(state, &config.bind_host, config.bind_port).await;

    Ok(())
}
