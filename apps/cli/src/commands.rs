//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use limitrofe_core::{
    LoadStatus, OptionBuffer, ProgressReporter, ResultDisplay, ResultView, Session,
    session_from_config,
};
use limitrofe_shared::{AppConfig, LoadConfig, SelectOption, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Limitrofe: which municipalities border this one?
#[derive(Parser)]
#[command(
    name = "limitrofe",
    version,
    about = "Look up bordering municipalities in an adjacency CSV.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Dataset location: HTTP(S) URL or file path (overrides config).
    #[arg(long, env = "LIMITROFE_SOURCE", global = true)]
    pub source: Option<String>,

    /// Header name of the municipality column (overrides config).
    #[arg(long, global = true)]
    pub entity_column: Option<String>,

    /// Header name of the bordering-municipality column (overrides config).
    #[arg(long, global = true)]
    pub neighbor_column: Option<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the municipalities offered by the selector.
    #[command(alias = "list")]
    Municipalities {
        /// Only show names containing this text (case and accents ignored).
        #[arg(short, long)]
        search: Option<String>,

        /// Print the selector entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the municipalities bordering NAME.
    Neighbors {
        /// Exact municipality name, as listed by `municipalities`.
        name: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show record and entity counts for the dataset.
    Inspect {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "limitrofe=warn",
        1 => "limitrofe=info",
        2 => "limitrofe=debug",
        _ => "limitrofe=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let load = LoadConfig::from(&config).with_overrides(
        cli.source.as_deref(),
        cli.entity_column.as_deref(),
        cli.neighbor_column.as_deref(),
    );

    match cli.command {
        Command::Municipalities { search, json } => {
            cmd_municipalities(&config, &load, search.as_deref(), json).await
        }
        Command::Neighbors { name, json } => cmd_neighbors(&config, &load, &name, json).await,
        Command::Inspect { json } => cmd_inspect(&config, &load, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(&config, &load).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the dataset, failing the command when the load fails.
async fn load_session(config: &AppConfig, load: &LoadConfig) -> Result<(Session, OptionBuffer)> {
    let (mut session, source, opts) = session_from_config(load, config.display.clone())?;
    let mut sink = OptionBuffer::default();

    info!(%source, "loading dataset");
    let reporter = CliProgress::new();
    let status = session.load(&source, &opts, &mut sink, &reporter).await;

    match status {
        LoadStatus::Ready { .. } => Ok((session, sink)),
        LoadStatus::Failed(failure) => Err(eyre!(
            "{} ({}): {}",
            config.display.load_error,
            failure.kind,
            failure.message
        )),
        LoadStatus::Stale => Err(eyre!("load was superseded by a newer one")),
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _status: &LoadStatus) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Result output
// ---------------------------------------------------------------------------

/// Prints a result view to stdout, as a list or as JSON.
struct StdoutDisplay {
    json: bool,
}

impl ResultDisplay for StdoutDisplay {
    fn show(&mut self, view: &ResultView) {
        if self.json {
            match serde_json::to_string_pretty(view) {
                Ok(s) => println!("{s}"),
                Err(e) => tracing::error!(error = %e, "failed to serialize result"),
            }
            return;
        }

        match view {
            ResultView::Neighbors { neighbors } => {
                for name in neighbors {
                    println!("  {name}");
                }
            }
            ResultView::NothingSelected { message } | ResultView::NoData { message } => {
                println!("  {message}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_municipalities(
    config: &AppConfig,
    load: &LoadConfig,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let (session, sink) = load_session(config, load).await?;

    let options: Vec<SelectOption> = match (search, session.dataset()) {
        (Some(term), Some(dataset)) => std::iter::once(SelectOption::placeholder(
            &config.display.placeholder,
        ))
        .chain(dataset.search(term).into_iter().map(SelectOption::entity))
        .collect(),
        _ => sink.options,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for option in options.iter().filter(|o| !o.is_placeholder()) {
        println!("{}", option.label);
    }
    info!(count = options.len().saturating_sub(1), "municipalities listed");

    Ok(())
}

async fn cmd_neighbors(config: &AppConfig, load: &LoadConfig, name: &str, json: bool) -> Result<()> {
    let (session, _sink) = load_session(config, load).await?;

    let view = session.select(name);
    if !json {
        println!();
        println!("  {name}");
        println!();
    }
    StdoutDisplay { json }.show(&view);
    if !json {
        println!();
    }

    Ok(())
}

async fn cmd_inspect(config: &AppConfig, load: &LoadConfig, json: bool) -> Result<()> {
    let (session, _sink) = load_session(config, load).await?;
    let dataset = session
        .dataset()
        .ok_or_else(|| eyre!("dataset not loaded"))?;
    let summary = dataset.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("  Source:          {}", load.location);
    println!("  Records:         {}", summary.records);
    println!("  Municipalities:  {}", summary.entities);
    println!("  With neighbors:  {}", summary.entities_with_neighbors);
    println!("  Blank lines:     {}", summary.parse.blank_lines);
    println!("  Short rows:      {}", summary.parse.short_rows);
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig, load: &LoadConfig) -> Result<()> {
    let mut resolved = config.clone();
    resolved.source.location = load.location.clone();
    resolved.columns.entity = load.columns.entity.clone();
    resolved.columns.neighbor = load.columns.neighbor.clone();

    let toml_str = toml::to_string_pretty(&resolved)?;
    println!("{toml_str}");
    Ok(())
}
