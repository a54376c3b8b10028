#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use waymark::cli::{AddArgs, Cli, Cmd};
use waymark::config::{self, ConfiguredLocator};
use waymark::error::TrackerError;
use waymark::map::MapView;
use waymark::storage::SqliteStorage;
use waymark::tracker::{Tracker, WorkoutForm};
use waymark::types::Coords;
use waymark::view::TerminalView;
use waymark::{gpx, utils};

#[macro_use]
extern crate waymark;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let app_config = config::load_config(&config_path)
        .with_context(|| format!("Loading config: {}", config_path.display()))?;

    let db_path = cli.db.unwrap_or_else(config::default_db_path);
    let storage = SqliteStorage::open(&db_path)
        .with_context(|| format!("Opening workout store: {}", db_path.display()))?;

    let cmd = cli.cmd.unwrap_or(Cmd::List);
    dlog!(
        "cmd={cmd:?} db={} config={} zoom={}",
        db_path.display(),
        config_path.display(),
        app_config.map_zoom_level
    );

    let show_list = matches!(cmd, Cmd::List | Cmd::Add(_));
    let mut tracker = Tracker::start(storage, TerminalView::new(show_list), &app_config)
        .context("Restoring saved workouts")?;
    tracker.load_map(&ConfiguredLocator::from_env_or(&app_config));

    match cmd {
        Cmd::Add(args) => {
            let at = pick_location(&args)?;
            tracker.show_form(at);

            let form = WorkoutForm {
                activity: Some(args.activity),
                distance: args.distance.unwrap_or_default(),
                duration: args.duration.unwrap_or_default(),
                cadence: args.cadence.unwrap_or_default(),
                elevation_gain: args.elevation_gain.unwrap_or_default(),
            };

            match tracker.create_workout(&form) {
                Ok(w) => {
                    tracing::info!(id = %w.id(), label = %w.label(), "saved");
                    Ok(ExitCode::SUCCESS)
                }
                // Already shown to the user by the view.
                Err(TrackerError::Validation) => Ok(ExitCode::FAILURE),
                Err(e) => Err(e).context("Saving workout"),
            }
        }
        Cmd::List => {
            if tracker.is_empty() {
                tracing::info!("no workouts yet; add one with `waymark add`");
            }
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Select { id } => {
            tracker.select_workout(&id);
            if let Some(map) = tracker.map() {
                println!("{}\tzoom={}", map.center(), map.zoom());
            }
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Clear { yes } => {
            if !yes {
                bail!(
                    "Refusing to delete {} workout(s) without --yes",
                    tracker.len()
                );
            }
            tracker.clear_all().context("Clearing workouts")?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Markers { output } => {
            let markers = tracker.map().map_or(&[][..], MapView::markers);
            if tracker.map().is_none() {
                tracing::warn!("map not loaded; exporting no markers");
            }

            if output.as_os_str() == "-" {
                gpx::write_markers(io::stdout().lock(), markers)?;
            } else {
                let f = File::create(&output)
                    .with_context(|| format!("Creating GPX file: {}", output.display()))?;
                gpx::write_markers(BufWriter::new(f), markers)?;
                tracing::info!(path = %output.display(), markers = markers.len(), "wrote markers");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn pick_location(args: &AddArgs) -> Result<Coords> {
    if let Some(path) = &args.from_gpx {
        return gpx::track_start(path);
    }

    let raw = args.at.as_deref().unwrap_or_default();
    utils::parse_coords(raw).with_context(|| {
        format!("--at must be \"lat,lng\" with lat in [-90, 90] and lng in [-180, 180], got {raw:?}")
    })
}
