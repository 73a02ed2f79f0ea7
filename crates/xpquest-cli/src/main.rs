use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "xpquest", version, about = "xpquest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// XP, level, streak and theme summary
    Status,
    /// Award XP for an action
    Award {
        /// XP to add
        amount: u64,
        /// What earned it
        #[arg(long, default_value = "cli")]
        source: String,
    },
    /// Report challenge progress and award the computed XP
    Challenge {
        /// Minutes spent on the challenge
        #[arg(long)]
        time_spent: f64,
        /// Progress increased since the last report
        #[arg(long)]
        progress: bool,
        /// The challenge was completed
        #[arg(long)]
        completed: bool,
    },
    /// Achievement catalog with unlock state
    Achievements,
    /// Level ladder
    Levels,
    /// Theme catalog and purchases
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Recent XP awards, newest first
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Erase all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Award { amount, source } => commands::award::run(amount, &source),
        Commands::Challenge {
            time_spent,
            progress,
            completed,
        } => commands::challenge::run(time_spent, progress, completed),
        Commands::Achievements => commands::achievements::run(),
        Commands::Levels => commands::levels::run(),
        Commands::Theme { action } => commands::theme::run(action),
        Commands::History { limit } => commands::history::run(limit),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
