use clap::Parser;
use ledgerwatch::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let result = match Cli::parse().command {
        Commands::Run(args) => cli::run::execute(&args).await,
        Commands::Check(args) => cli::check::execute(&args.config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
