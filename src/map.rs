use crate::types::{Coords, Workout};
use std::time::Duration;

pub const DEFAULT_ZOOM_LEVEL: u8 = 13;

/// Pan length used when recentering on a selected workout.
pub const PAN_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub workout_id: String,
    pub coords: Coords,
    pub icon: &'static str,
    pub popup: String,
    /// Popup CSS class, e.g. `running-popup`.
    pub class_name: String,
}

impl Marker {
    pub fn for_workout(w: &Workout) -> Self {
        let activity = w.activity();
        Self {
            workout_id: w.id().to_string(),
            coords: w.coords(),
            icon: activity.icon(),
            popup: format!("{} {activity}", activity.icon()),
            class_name: format!("{activity}-popup"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pan {
    pub animate: bool,
    pub duration: Duration,
}

/// In-process stand-in for the map widget: where it is looking and what it
/// has drawn. Only exists once the startup position lookup succeeded.
#[derive(Debug, Clone)]
pub struct MapView {
    center: Coords,
    zoom: u8,
    markers: Vec<Marker>,
    last_pan: Option<Pan>,
}

impl MapView {
    pub fn new(center: Coords, zoom: u8) -> Self {
        tracing::info!(center = %center, zoom, "map loaded");
        Self {
            center,
            zoom,
            markers: Vec::new(),
            last_pan: None,
        }
    }

    pub fn add_marker(&mut self, marker: Marker) {
        tracing::debug!(id = %marker.workout_id, at = %marker.coords, popup = %marker.popup, "marker");
        self.markers.push(marker);
    }

    pub fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        self.center = center;
        self.zoom = zoom;
        self.last_pan = animate.then_some(Pan {
            animate,
            duration: PAN_DURATION,
        });
        tracing::info!(center = %center, zoom, animate, "map recentered");
    }

    pub const fn center(&self) -> Coords {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub const fn last_pan(&self) -> Option<Pan> {
        self.last_pan
    }
}
