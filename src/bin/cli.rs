//! hoopsync CLI
//!
//! Local entry point: runs the incremental sync against the cache database
//! and offers one subcommand per page type for targeted pulls.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hoopsync::{
    error::Result,
    models::{Config, current_season},
    pipeline,
    services::{
        HttpClient, get_boxscore, get_play_by_play, get_plus_minus, get_schedule, get_teams,
    },
    storage::{StatCache, StatTable},
};

/// hoopsync - basketball statistics cache
#[derive(Parser, Debug)]
#[command(name = "hoopsync", version, about = "Basketball statistics scraper and cache")]
struct Cli {
    /// Path to the config file (default: {base dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full sync: schedule, boxscore, plus-minus, play-by-play
    Sync {
        /// Last season to pull, labeled by its ending year (default: current)
        #[arg(long)]
        season: Option<i32>,
    },

    /// List the teams active in a season
    Teams {
        #[arg(long, default_value_t = current_season())]
        season: i32,
    },

    /// Fetch one team's season schedule
    Schedule {
        /// Team short code, e.g. NOP
        team: String,
        #[arg(long, default_value_t = current_season())]
        season: i32,
    },

    /// Fetch one game's boxscore
    Boxscore { game_id: String },

    /// Fetch one game's play-by-play log
    PlayByPlay { game_id: String },

    /// Fetch one game's substitution plus-minus
    PlusMinus { game_id: String },

    /// Validate the configuration
    Validate,

    /// Show cache contents summary
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config
        .unwrap_or_else(|| Config::base_dir().join("config.toml"));
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Command::Sync { season } => {
            config.validate()?;
            let season = season.unwrap_or_else(current_season);
            let client = HttpClient::new(&config.http)?;
            let mut cache = StatCache::open(config.db_path())?;

            log::info!("syncing through season {season} into {}", config.db_path().display());
            let report = pipeline::run_sync(&client, &mut cache, &config, season)?;
            log::info!(
                "seasons {}-{}: {} schedule rows, {} new boxscores",
                report.first_season,
                report.last_season,
                report.schedule_rows,
                report.boxscore_games
            );
        }

        Command::Teams { season } => {
            let client = HttpClient::new(&config.http)?;
            for code in get_teams(&client, season)? {
                println!("{code}");
            }
        }

        Command::Schedule { team, season } => {
            let client = HttpClient::new(&config.http)?;
            for row in get_schedule(&client, &team, season)? {
                println!("{row:?}");
            }
        }

        Command::Boxscore { game_id } => {
            let client = HttpClient::new(&config.http)?;
            for row in get_boxscore(&client, &game_id)? {
                println!("{row:?}");
            }
        }

        Command::PlayByPlay { game_id } => {
            let client = HttpClient::new(&config.http)?;
            for event in get_play_by_play(&client, &game_id)? {
                println!("{event:?}");
            }
        }

        Command::PlusMinus { game_id } => {
            let client = HttpClient::new(&config.http)?;
            for interval in get_plus_minus(&client, &game_id)? {
                println!("{interval:?}");
            }
        }

        Command::Validate => {
            config.validate()?;
            log::info!("config OK: base_url={}", config.http.base_url);
        }

        Command::Info => {
            let cache = StatCache::open(config.db_path())?;
            println!("cache: {}", config.db_path().display());
            match cache.latest_season()? {
                Some(season) => println!("latest season: {season}"),
                None => println!("latest season: none"),
            }
            for table in StatTable::ALL {
                println!("{}: {} rows", table.as_str(), cache.row_count(table)?);
            }
        }
    }

    Ok(())
}
