mod commands;
mod console;

use clap::{Parser, Subcommand};
use fairdice_core::DiceError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair non-transitive dice against the computer")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds against the computer
    Play {
        /// At least three dice, each a comma-separated list of integer faces
        #[arg(allow_hyphen_values = true)]
        dice: Vec<String>,
    },
    /// Show the win probability of every die against every other
    Table {
        /// At least three dice, each a comma-separated list of integer faces
        #[arg(allow_hyphen_values = true)]
        dice: Vec<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a revealed key and value against an HMAC shown earlier
    Verify {
        /// Key (hex) from the reveal message
        #[arg(short, long)]
        key: String,
        /// Revealed value
        #[arg(long)]
        value: u64,
        /// HMAC (hex) from the commit message
        #[arg(short, long)]
        digest: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging on stderr so it stays out of the game transcript
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "fairdice={},fairdice_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Play { dice } => commands::play(&dice).await,
        Commands::Table { dice, json } => commands::show_table(&dice, json),
        Commands::Verify { key, value, digest } => commands::verify(&key, value, &digest),
    };

    if let Err(e) = result {
        match e.downcast_ref::<DiceError>() {
            Some(DiceError::Configuration(msg)) => {
                eprintln!("Error: {}", msg);
                eprintln!("Each die is a comma-separated list of integers, e.g. 2,2,4,4,9,9");
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
