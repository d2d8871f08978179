use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sprandcli::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Generate a randomized playlist
    Generate(GenerateOptions),

    /// List the configured featured playlists
    Featured,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Generate a randomized playlist from source playlists")]
pub struct GenerateOptions {
    /// Source playlist ID to sample from; can be repeated. Defaults to the
    /// configured reference playlists when omitted.
    #[clap(long = "playlist", action = ArgAction::Append, num_args = 1)]
    pub playlists: Vec<String>,

    /// Generate from the featured playlist with this index (see `featured`)
    #[clap(long, conflicts_with = "playlists")]
    pub featured: Option<usize>,

    /// Number of songs in the generated playlist
    #[clap(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub songs: u32,

    /// Exclude songs already on the reference playlists
    #[clap(long)]
    pub exclude_reference: bool,

    /// Start playback on the first available device after creation
    #[clap(long)]
    pub play: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }

        Command::Generate(opt) => {
            cli::generate(
                opt.playlists,
                opt.featured,
                opt.songs,
                opt.exclude_reference,
                opt.play,
            )
            .await
        }

        Command::Featured => cli::featured().await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
