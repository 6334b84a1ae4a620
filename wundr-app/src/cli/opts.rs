use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wundr_core::Level;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Json,
    Sqlite,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "wundr", version, about = "Wundr CLI/API")]
pub struct Cli {
    /// Storage backend (applies to CLI/API unless overridden)
    #[arg(long, value_enum, default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// Backend file path (defaults to app data dir)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Proxy host serving /api/labels, /api/translate, /api/prompts
    #[arg(long, default_value = "https://wundr-delta.vercel.app")]
    pub base_url: String,

    /// Learner's native language (the L1 side of prompts)
    #[arg(long, default_value = "en")]
    pub native: String,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Detect candidate object names in a captured image
    Labels(LabelsCmd),
    /// Resolve study material for an object (cache first)
    Resolve(ResolveCmd),
    /// Saved flashcard operations
    #[command(subcommand)]
    Cards(CardsCmd),
    /// Launch Axum HTTP API
    Api(ApiCmd),
}

#[derive(Debug, Args, Clone)]
pub struct LabelsCmd {
    /// Image file to send to the detector
    #[arg(long)]
    pub image: PathBuf,
    /// Also run text detection
    #[arg(long)]
    pub include_text: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ResolveCmd {
    #[arg(long)]
    pub object: String,
    /// Target language code, e.g. es or fr
    #[arg(long)]
    pub target: String,
    #[arg(long, default_value = "A2")]
    pub level: Level,
    /// Reference to the captured image, kept on the card as-is
    #[arg(long)]
    pub image_uri: Option<String>,
    /// Persist the resolved card after printing it
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CardsCmd {
    /// All saved cards, newest first
    List {
        /// Group into language sections
        #[arg(long)]
        by_lang: bool,
    },
    /// One card, looked up by its tuple
    Show {
        #[arg(long)]
        target: String,
        #[arg(long)]
        object: String,
        #[arg(long, default_value = "A2")]
        level: Level,
    },
    /// Delete one card by its tuple
    Rm {
        #[arg(long)]
        target: String,
        #[arg(long)]
        object: String,
        #[arg(long, default_value = "A2")]
        level: Level,
    },
    /// Delete every saved card
    Clear,
}

#[derive(Debug, Args, Clone)]
pub struct ApiCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}
