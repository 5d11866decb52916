use std::{error::Error, num::NonZeroU32, process};

use clap::{command, Parser, Subcommand, ValueHint};
use log::{debug, error, info, LevelFilter};

use musicatalog::{
    catalog::Client,
    config::Config,
    protocol::catalog::{ChartRequest, EntityKind, ItemId},
    registry::{Properties, Property},
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Group name for mutually exclusive property options.
const ARGS_GROUP_PROPERTIES: &str = "properties";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    ///
    /// Ensure that this file is kept secure and not shared publicly, as it
    /// contains tokens that grant access to the catalog service and your
    /// account.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("catalog.toml"))]
    config: String,

    /// Storefront to query
    ///
    /// [default: from the configuration file, or the storefront of the
    /// user account]
    #[arg(short, long, env = "MUSICATALOG_STOREFRONT")]
    storefront: Option<String>,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Fetch catalog charts
    Charts {
        /// Entity kinds to chart
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "songs,albums,playlists,music-videos"
        )]
        types: Vec<EntityKind>,

        /// Genre to narrow the charts to
        #[arg(short, long)]
        genre: Option<String>,

        /// Maximum number of items per chart
        #[arg(short, long)]
        limit: Option<NonZeroU32>,
    },

    /// Fetch record labels by identifier
    RecordLabel {
        /// Record label identifiers
        #[arg(required = true)]
        ids: Vec<String>,

        /// Expand all views
        #[arg(short, long, default_value_t = false, group = ARGS_GROUP_PROPERTIES)]
        all: bool,

        /// View to expand; may be repeated
        #[arg(short, long = "property", value_name = "NAME", group = ARGS_GROUP_PROPERTIES)]
        properties: Vec<Property>,
    },
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

/// Runs the requested command and prints its result.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded or the fetch
/// fails.
async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = Config::from_file(&args.config)?;
    if let Some(storefront) = args.storefront {
        config.storefront = Some(storefront.parse()?);
    }
    debug!("{config:#?}");

    let client = Client::from_config(&config)?;

    match args.command {
        Command::Charts {
            types,
            genre,
            limit,
        } => {
            let mut request = ChartRequest::new(types)?;
            if let Some(genre) = genre {
                request = request.with_genre(genre)?;
            }
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }

            let charts = client.charts(&request).await?;
            println!("{charts:#?}");
        }

        Command::RecordLabel {
            ids,
            all,
            properties,
        } => {
            let properties = if all {
                Properties::All
            } else {
                properties.into_iter().collect()
            };

            let labels = client
                .record_labels(ids.into_iter().map(ItemId::from), properties)
                .await?;
            if labels.is_empty() {
                info!("no record labels found");
            }
            println!("{labels:#?}");
        }
    }

    Ok(())
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and runs the requested command.
#[tokio::main]
async fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
