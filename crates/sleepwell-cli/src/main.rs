use clap::{Parser, Subcommand};
use sleepwell_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "sleepwell", version, about = "Sleep debt and circadian productivity CLI")]
struct Cli {
    /// User to act for (default: engine.default_user)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sleep profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Nightly sleep entries
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Current sleep debt
    Debt(commands::debt::DebtArgs),
    /// Productivity curve and recommendations
    Curve(commands::curve::CurveArgs),
    /// Period summaries
    Summary {
        #[command(subcommand)]
        action: commands::summary::SummaryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays parseable. RUST_LOG overrides the
/// configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    let ctx = commands::Context::new(config, cli.user);
    tracing::debug!(user = %ctx.user, "resolved user");
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(ctx, action),
        Commands::Entry { action } => commands::entry::run(ctx, action),
        Commands::Debt(args) => commands::debt::run(ctx, args),
        Commands::Curve(args) => commands::curve::run(ctx, args),
        Commands::Summary { action } => commands::summary::run(ctx, action),
        Commands::Config { action } => commands::config::run(ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
