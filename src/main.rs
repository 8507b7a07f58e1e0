#[macro_use]
extern crate rust_i18n;

mod commands;
mod shutdown;
mod startup;

use clap::Parser;
use tokio::sync::oneshot;
use tracing::info;

// Initialize i18n
i18n!("locales", fallback = "en");

/// JuzEng administration console
#[derive(Parser, Debug)]
#[command(name = "juzeng")]
#[command(version, about, long_about = None)]
struct Args {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = Args::parse();

    // Initialize logging
    startup::init_logging(args.verbose)?;

    info!("Starting JuzEng console");

    // Load configuration
    let config = startup::load_config()?;

    let (ctx, components) = startup::build_app(config).await?;

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(shutdown::handle_signals(shutdown_send));

    let result = tokio::select! {
        result = commands::run(args.command, &ctx, &components) => result,
        _ = shutdown_recv => {
            eprintln!("{}", t!("interrupted"));
            Ok(())
        }
    };

    components.shutdown_all().await?;
    Ok(result?)
}
