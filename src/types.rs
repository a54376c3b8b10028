use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (latitude, longitude) pair in degrees. Persisted as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn in_range(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Activity {
    Running,
    Cycling,
}

impl Activity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific fields. The derived metric is computed once by
/// [`Workout::recorded_at`] and stored alongside the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        /// steps/min
        cadence: f64,
        /// min/km
        pace: f64,
    },
    #[serde(rename_all = "camelCase")]
    Cycling {
        /// meters
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

impl WorkoutKind {
    pub const fn activity(&self) -> Activity {
        match self {
            Self::Running { .. } => Activity::Running,
            Self::Cycling { .. } => Activity::Cycling,
        }
    }
}

/// A single recorded session.
///
/// Every field is fixed at construction. Older snapshots name the timestamp
/// `date` and the label `description`; both are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    #[serde(alias = "date")]
    created_at: DateTime<Utc>,
    coords: Coords,
    /// km
    distance: f64,
    /// min
    duration: f64,
    #[serde(flatten)]
    kind: WorkoutKind,
    #[serde(alias = "description")]
    label: String,
}

impl Workout {
    /// Build a workout stamped with the current time.
    ///
    /// `metric` is the cadence for running and the elevation gain for cycling.
    /// Inputs are trusted; validation happens in [`crate::tracker`].
    pub fn new(activity: Activity, coords: Coords, distance: f64, duration: f64, metric: f64) -> Self {
        Self::recorded_at(Utc::now(), activity, coords, distance, duration, metric)
    }

    pub fn recorded_at(
        created_at: DateTime<Utc>,
        activity: Activity,
        coords: Coords,
        distance: f64,
        duration: f64,
        metric: f64,
    ) -> Self {
        let kind = match activity {
            Activity::Running => WorkoutKind::Running {
                cadence: metric,
                pace: duration / distance,
            },
            Activity::Cycling => WorkoutKind::Cycling {
                elevation_gain: metric,
                speed: distance / (duration / 60.0),
            },
        };

        Self {
            id: workout_id(created_at),
            created_at,
            coords,
            distance,
            duration,
            kind,
            label: derive_label(activity, created_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub const fn activity(&self) -> Activity {
        self.kind.activity()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub const fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }

    pub const fn cadence(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => Some(cadence),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub const fn elevation_gain(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { elevation_gain, .. } => Some(elevation_gain),
            WorkoutKind::Running { .. } => None,
        }
    }
}

/// Low-order 10 digits of the creation time in milliseconds.
pub fn workout_id(created_at: DateTime<Utc>) -> String {
    let ms = created_at.timestamp_millis().to_string();
    ms[ms.len().saturating_sub(10)..].to_string()
}

/// "Running on April". Month only, in local time.
pub fn derive_label(activity: Activity, created_at: DateTime<Utc>) -> String {
    let month = created_at.with_timezone(&Local).format("%B");
    format!("{} on {month}", activity.title())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn april() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn running_caches_pace_and_label() {
        let w = Workout::recorded_at(april(), Activity::Running, Coords::new(48.85, 2.35), 5.0, 30.0, 180.0);

        assert_eq!(w.pace(), Some(6.0));
        assert_eq!(w.speed(), None);
        assert_eq!(w.cadence(), Some(180.0));
        assert_eq!(w.label(), "Running on April");
        assert_eq!(w.activity(), Activity::Running);
    }

    #[test]
    fn cycling_caches_speed() {
        let w = Workout::recorded_at(april(), Activity::Cycling, Coords::new(48.85, 2.35), 20.0, 60.0, 150.0);

        assert_eq!(w.speed(), Some(20.0));
        assert_eq!(w.elevation_gain(), Some(150.0));
        assert_eq!(w.label(), "Cycling on April");
    }

    #[test]
    fn derived_metrics_follow_formulas() {
        for (distance, duration) in [(0.4, 3.0), (42.195, 211.5), (7.3, 0.9), (123.0, 480.0)] {
            let run = Workout::recorded_at(april(), Activity::Running, Coords::new(0.0, 0.0), distance, duration, 170.0);
            let ride = Workout::recorded_at(april(), Activity::Cycling, Coords::new(0.0, 0.0), distance, duration, 0.0);

            assert!((run.pace().unwrap() - duration / distance).abs() < 1e-12);
            assert!((ride.speed().unwrap() - distance / (duration / 60.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn id_is_last_ten_digits_of_millis() {
        let t = Utc.timestamp_millis_opt(1_776_168_000_123).unwrap();
        assert_eq!(workout_id(t), "6168000123");
    }

    #[test]
    fn coords_serialize_as_pair() {
        let json = serde_json::to_string(&Coords::new(51.5, -0.12)).unwrap();
        assert_eq!(json, "[51.5,-0.12]");
        assert!(!Coords::new(91.0, 0.0).in_range());
    }

    #[test]
    fn snapshot_record_is_flat() {
        let w = Workout::recorded_at(april(), Activity::Cycling, Coords::new(1.0, 2.0), 20.0, 60.0, 150.0);
        let v = serde_json::to_value(&w).unwrap();

        assert_eq!(v["type"], "cycling");
        assert_eq!(v["elevationGain"], 150.0);
        assert_eq!(v["speed"], 20.0);
        assert_eq!(v["coords"], serde_json::json!([1.0, 2.0]));
        assert_eq!(v["label"], "Cycling on April");
        assert!(v.get("kind").is_none());
    }

    #[test]
    fn reads_legacy_field_names() {
        let raw = r#"{
            "date": "2026-04-14T09:30:00.000Z",
            "id": "6158600000",
            "distance": 5,
            "duration": 30,
            "coords": [48.85, 2.35],
            "type": "running",
            "cadence": 180,
            "pace": 6,
            "description": "Running on April"
        }"#;

        let w: Workout = serde_json::from_str(raw).unwrap();
        assert_eq!(w.id(), "6158600000");
        assert_eq!(w.pace(), Some(6.0));
        assert_eq!(w.label(), "Running on April");
        assert_eq!(w.coords(), Coords::new(48.85, 2.35));
    }
}
