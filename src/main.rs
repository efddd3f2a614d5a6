use clap::Parser;
use pwvault::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(&cli, force),
        Commands::Set {
            ref domain,
            ref value,
        } => commands::set::execute(&cli, domain, value.as_deref()),
        Commands::Get { ref domain } => commands::get::execute(&cli, domain),
        Commands::Remove { ref domain, force } => commands::remove::execute(&cli, domain, force),
        Commands::Verify => commands::verify::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        pwvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
