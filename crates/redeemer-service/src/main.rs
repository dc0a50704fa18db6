use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redeemer_config::{Config, ConfigLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod factory;
mod report;

#[derive(Parser, Debug)]
#[command(name = "redeemer")]
#[command(about = "Redeems settled Polymarket positions through the relayer", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Optional TOML configuration file. Environment variables override it.
	#[arg(short, long, value_name = "FILE", env = "CONFIG_FILE")]
	config: Option<PathBuf>,

	/// Report what would be redeemed without signing or submitting anything.
	#[arg(long)]
	dry_run: bool,

	#[arg(long, env = "REDEEMER_LOG_LEVEL", default_value = "info")]
	log_level: String,

	/// Emit logs as JSON lines.
	#[arg(long)]
	json_logs: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
	/// Fetch, filter, approve and redeem (default)
	Run,
	/// Load and validate configuration without touching the network
	Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
	// A missing .env file is fine; real environment variables win.
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	setup_tracing(&cli.log_level, cli.json_logs);

	let result = match cli.command {
		Some(Commands::Run) | None => run(&cli).await,
		Some(Commands::Validate) => validate(&cli).await,
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {:#}", e);
			ExitCode::FAILURE
		}
	}
}

async fn load_config(cli: &Cli) -> Result<Config> {
	let mut loader = ConfigLoader::new();
	if let Some(path) = &cli.config {
		info!("Loading configuration from {:?}", path);
		loader = loader.with_file(path);
	}

	let config = loader.load().await.context("Failed to load configuration")?;
	Ok(apply_cli_overrides(config, cli))
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
	if cli.dry_run {
		config.redemption.dry_run = true;
	}
	config
}

async fn run(cli: &Cli) -> Result<()> {
	let config = load_config(cli).await?;
	info!(
		chain_id = config.chain.chain_id,
		funder = %config.account.funder_address,
		relayer = %config.relayer.url,
		inventory = %config.inventory.url,
		conditional_tokens = %config.chain.conditional_tokens_address,
		collateral = %config.chain.collateral_token_address,
		dry_run = config.redemption.dry_run,
		min_redeemable_usd = %config.redemption.min_redeemable_usd,
		"starting redemption run"
	);

	let engine = factory::build_engine(config)?;
	let outcome = engine.run().await.context("Redemption run failed")?;

	print!("{}", report::render_outcome(&outcome));
	Ok(())
}

async fn validate(cli: &Cli) -> Result<()> {
	let config = load_config(cli).await?;
	info!("Configuration is valid");
	print!("{}", report::render_config(&config));
	Ok(())
}

fn setup_tracing(log_level: &str, json: bool) {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	let registry = tracing_subscriber::registry().with(env_filter);
	if json {
		registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}
