#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod api;
mod convert;
mod error;
mod health;
mod prelude;
mod upload;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert AI skills between Claude, ChatGPT, and Gemini"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the conversion service
    #[clap(long, env = "SKILLCONV_API_URL", global = true)]
    api_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "SKILLCONV_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert pasted or piped skill content
    Convert(convert::Options),

    /// Upload a skill file and convert it
    Upload(upload::Options),

    /// Check that the conversion service is reachable
    Health(health::Options),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Convert(options) => convert::run(options, app.global).await,
        SubCommands::Upload(options) => upload::run(options, app.global).await,
        SubCommands::Health(options) => health::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
