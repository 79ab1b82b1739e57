use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("vox error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = vox_config::VoxConfig::load_with_dotenv()?;

    // Auth commands manage the session itself and run before bootstrap.
    if let cli::Commands::Auth { action } = &cli.command {
        return commands::auth::handle(action, cli.format, &config).await;
    }

    let mut ctx = context::AppContext::init(config, cli.org.as_deref()).await?;

    match &cli.command {
        cli::Commands::Auth { .. } => unreachable!("handled above"),
        cli::Commands::Org { action } => commands::org::handle(action, cli.format, &mut ctx).await,
        cli::Commands::Team { action } => commands::team::handle(action, cli.format, &mut ctx).await,
        cli::Commands::Assistant { action } => {
            commands::assistant::handle(action, cli.format, &mut ctx).await
        }
        cli::Commands::Call { action } => commands::call::handle(action, cli.format, &ctx).await,
        cli::Commands::Status => commands::status::handle(cli.format, &ctx),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("VOXBOARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
