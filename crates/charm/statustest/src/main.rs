//! statustest - run the status test charm against a config file
//!
//! Builds the charm, delivers one event, and prints the status the unit or
//! application would show. Component statuses can be saved to a JSON state
//! file so a later run starts from them.

use std::path::PathBuf;

use anyhow::Context;
use charm_status::{
    JsonFileStatusStore, NoopSink, NoopStatusStore, PrefixStyle, RecordingSink, Status,
    StatusConfig, StatusGroup, StatusScope, StatusStore,
};
use charm_statustest::{CharmConfig, CliSettings, EventKind, Framework, StatustestCharm};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Status test charm CLI
#[derive(Parser)]
#[command(name = "statustest")]
#[command(about = "Run the status test charm and show its aggregate status", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file path
    #[arg(short, long, env = "STATUSTEST_SETTINGS")]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Deliver an event to the charm and print the resulting status
    Run {
        /// Charm config (TOML)
        #[arg(short, long)]
        charm_config: PathBuf,

        /// JSON file component statuses are loaded from and saved to
        #[arg(long)]
        state: Option<PathBuf>,

        /// Status scope (unit, application)
        #[arg(long)]
        scope: Option<StatusScope>,

        /// Component prefix style (bracket, parenthesis)
        #[arg(long)]
        prefix_style: Option<PrefixStyle>,

        /// Event to deliver
        #[arg(short, long, default_value = "config-changed")]
        event: EventKind,
    },

    /// Show saved component statuses, most urgent first
    Show {
        /// JSON state file
        #[arg(long)]
        state: Option<PathBuf>,

        /// Component prefix style (bracket, parenthesis)
        #[arg(long)]
        prefix_style: Option<PrefixStyle>,
    },
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON document
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = CliSettings::load(cli.settings.as_deref()).context("loading settings")?;
    debug!(?settings, "Loaded settings");

    match cli.command {
        Commands::Run {
            charm_config,
            state,
            scope,
            prefix_style,
            event,
        } => {
            let config = CharmConfig::load(&charm_config)
                .with_context(|| format!("loading charm config {}", charm_config.display()))?;
            let status_config = settings.status_config(scope, prefix_style);
            let store = open_store(state.or_else(|| settings.state_path.clone()));
            run(config, store, status_config, event, cli.output)
        }
        Commands::Show {
            state,
            prefix_style,
        } => {
            let path = state
                .or_else(|| settings.state_path.clone())
                .context("no state file given (use --state or state_path in settings)")?;
            let status_config = settings.status_config(None, prefix_style);
            show(JsonFileStatusStore::new(path), status_config, cli.output)
        }
    }
}

fn open_store(path: Option<PathBuf>) -> Box<dyn StatusStore> {
    match path {
        Some(path) => Box::new(JsonFileStatusStore::new(path)),
        None => Box::new(NoopStatusStore),
    }
}

fn run(
    config: CharmConfig,
    store: Box<dyn StatusStore>,
    status_config: StatusConfig,
    event: EventKind,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let scope = status_config.scope;
    let sink = RecordingSink::new();
    let mut framework = Framework::new();
    let mut charm =
        StatustestCharm::new(&mut framework, sink.clone(), store, status_config, &config)?;

    framework
        .dispatch(&mut charm, event, &config)
        .with_context(|| format!("dispatching {event}"))?;

    let status = sink.current(scope).unwrap_or_else(|| charm.status());
    match output {
        OutputFormat::Text => {
            println!("{scope} status: {status}");
            for (name, component) in charm.group().all() {
                println!("  {name}: {component}");
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "scope": scope,
                "status": status,
                "components": charm.group().statuses(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn show(
    store: JsonFileStatusStore,
    status_config: StatusConfig,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let saved = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?;

    let mut group = StatusGroup::new(NoopSink, NoopStatusStore, status_config);
    for (name, status) in saved {
        group.register_with_status(name, status)?;
    }

    let aggregate: Status = group.highest_prefixed();
    match output {
        OutputFormat::Text => {
            println!("aggregate: {aggregate}");
            for (name, status) in group.all() {
                println!("  {name}: {status}");
            }
        }
        OutputFormat::Json => {
            let components: Vec<_> = group
                .all()
                .into_iter()
                .map(|(name, status)| json!({ "component": name, "status": status }))
                .collect();
            let doc = json!({ "aggregate": aggregate, "components": components });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
