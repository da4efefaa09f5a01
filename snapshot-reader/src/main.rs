use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use snapshot_reader::store::{EventQuery, RelationalSnapshotStore, TimeRange};
use snapshot_reader::{ReaderConfig, ReaderFacade};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapshot-reader")]
#[command(about = "Reads and normalizes trading-strategy snapshots")]
struct Cli {
    /// Directory holding snapshot_<variant>.json files
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Path of the relational mirror database (unset = file backend)
    #[arg(long, default_value = "")]
    database: PathBuf,

    /// Strategy instance identifier
    #[arg(long, default_value = "default")]
    instance_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every variant with a stored snapshot
    List,
    /// Print the normalized view model of one variant
    Show {
        /// Variant label (e.g. "15m")
        variant: String,
    },
    /// Print recent event-log rows, newest first
    Events {
        /// Variant label
        variant: String,
        /// Only events of this vt_symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Only events of this type
        #[arg(long)]
        event_type: Option<String>,
        /// Window start (ISO-8601), requires --end
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Window end (ISO-8601), requires --start
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Maximum rows (clamped server-side)
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Print historical bars for a code.venue identifier
    Bars {
        /// Combined identifier, e.g. rb2501.SHFE
        vt_symbol: String,
        /// Interval token (1m, 1h, 1d, 1w or synonyms)
        interval: String,
        /// Window start (ISO-8601)
        #[arg(long)]
        start: String,
        /// Window end (ISO-8601)
        #[arg(long)]
        end: String,
        /// Keep at most this many of the most recent bars
        #[arg(long, default_value_t = 500)]
        limit: usize,
    },
    /// Create the mirror tables if absent
    InitDb,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ReaderConfig::new(&cli.instance_id, &cli.data_dir, &cli.database);
    let facade = ReaderFacade::new(config.clone());

    // Absence of data is not an error for any of these commands; they print
    // the empty form and exit 0.
    match cli.command {
        Commands::List => print_json(&facade.list_strategies())?,
        Commands::Show { variant } => print_json(&facade.get_strategy_data(&variant))?,
        Commands::Events {
            variant,
            symbol,
            event_type,
            start,
            end,
            limit,
        } => {
            let query = EventQuery {
                vt_symbol: symbol,
                time_range: start
                    .zip(end)
                    .map(|(start, end)| TimeRange::new(start, end)),
                event_type,
                limit,
            };
            print_json(&facade.get_events(&variant, &query))?;
        }
        Commands::Bars {
            vt_symbol,
            interval,
            start,
            end,
            limit,
        } => {
            let range = TimeRange::new(start, end);
            print_json(&facade.get_bars(&vt_symbol, &range, &interval, limit))?;
        }
        Commands::InitDb => {
            let store = RelationalSnapshotStore::new(config);
            store.ensure_tables();
            info!("Schema bootstrap attempted");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("Failed to serialize command output")?;
    println!("{rendered}");
    Ok(())
}
