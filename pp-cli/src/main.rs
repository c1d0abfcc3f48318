//! PowerPlot CLI - fetch home energy data and print or export dashboard views.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "powerplot",
    version,
    about = "Home energy usage dashboard in the terminal"
)]
struct Cli {
    #[command(flatten)]
    global: pp_cmd::GlobalArgs,

    #[command(subcommand)]
    command: pp_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("{:?}", cli.global);
    pp_cmd::run(cli.global, cli.command).await
}
