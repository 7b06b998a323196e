use clap::Parser;

use reserva_rs::cli::{Cli, Commands, load_settings};
use reserva_rs::db::run_migrations;
use reserva_rs::logger::init_logger;
use reserva_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logger(&settings.logger)?;

    match cli.command.unwrap_or_default() {
        Commands::Serve => Server::new(settings).run().await,
        Commands::Migrate => run_migrations(&settings.database.url).await,
    }
}
