use crate::types::Activity;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "waymark",
    version,
    about = "Log running and cycling workouts against map locations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// SQLite file holding the workout snapshot.
    ///
    /// Default: waymark.sqlite in the platform data directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Config file (map zoom, storage key, current position).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Record a workout at a location
    Add(AddArgs),
    /// Print every workout, oldest first (default)
    List,
    /// Recenter the map on a workout
    Select {
        /// Workout id as shown by `list`
        id: String,
    },
    /// Delete every stored workout
    Clear {
        /// Confirm; without it nothing is deleted
        #[arg(long)]
        yes: bool,
    },
    /// Export the map markers as GPX waypoints
    Markers {
        /// Output path (`-` for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(value_enum)]
    pub activity: Activity,

    /// Location as "lat,lng"
    #[arg(long, allow_hyphen_values = true, required_unless_present = "from_gpx", conflicts_with = "from_gpx")]
    pub at: Option<String>,

    /// Use the first track point of a GPX file as the location
    #[arg(long, value_name = "FILE")]
    pub from_gpx: Option<PathBuf>,

    /// km
    #[arg(long, allow_hyphen_values = true)]
    pub distance: Option<String>,

    /// min
    #[arg(long, allow_hyphen_values = true)]
    pub duration: Option<String>,

    /// steps/min (running)
    #[arg(long, allow_hyphen_values = true)]
    pub cadence: Option<String>,

    /// meters (cycling)
    #[arg(long, allow_hyphen_values = true)]
    pub elevation_gain: Option<String>,
}
