use crate::types::Coords;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,waymark={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

static COORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*[,;\s]\s*([+-]?\d+(?:\.\d+)?)\s*$")
        .expect("coordinate pattern is valid")
});

/// Parse `"lat,lng"` (comma, semicolon or whitespace separated).
///
/// Returns `None` for malformed input or out-of-range degrees.
pub fn parse_coords(raw: &str) -> Option<Coords> {
    let caps = COORDS_RE.captures(raw)?;
    let lat = caps[1].parse::<f64>().ok()?;
    let lng = caps[2].parse::<f64>().ok()?;
    let c = Coords::new(lat, lng);
    c.in_range().then_some(c)
}

/// Read a form field as a number. Blank or unparsable input becomes NaN so
/// that it fails the finiteness check like any other bad value.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
