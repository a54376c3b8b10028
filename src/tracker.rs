//! The workout store and the controller around it.
//!
//! [`Tracker`] owns the collection for the whole session. Every mutation goes
//! through it, and every successful mutation is followed by a full snapshot
//! write to the [`Storage`] sink.

use crate::config::{AppConfig, Locator};
use crate::dlog;
use crate::error::{INVALID_INPUT_MESSAGE, Result, TrackerError};
use crate::map::{MapView, Marker};
use crate::storage::Storage;
use crate::types::{Activity, Coords, Workout, workout_id};
use crate::utils::parse_number;
use crate::view::{ListItem, View};
use chrono::{Duration, Utc};

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct WorkoutForm {
    pub activity: Option<Activity>,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation_gain: String,
}

impl WorkoutForm {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            activity: Some(Activity::Running),
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation_gain: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation_gain: &str) -> Self {
        Self {
            activity: Some(Activity::Cycling),
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation_gain: elevation_gain.to_string(),
        }
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidInput {
    pub activity: Activity,
    pub distance: f64,
    pub duration: f64,
    pub metric: f64,
}

/// The activity type is required. Every number must be finite. Distance, duration and cadence must be
/// strictly positive; elevation gain must not be negative.
pub fn validate(form: &WorkoutForm) -> Result<ValidInput> {
    let activity = form.activity.ok_or(TrackerError::Validation)?;
    let distance = parse_number(&form.distance);
    let duration = parse_number(&form.duration);

    let metric = match activity {
        Activity::Running => parse_number(&form.cadence),
        Activity::Cycling => parse_number(&form.elevation_gain),
    };

    let all_finite = [distance, duration, metric].iter().all(|v| v.is_finite());
    if !all_finite {
        return Err(TrackerError::Validation);
    }

    let metric_ok = match activity {
        Activity::Running => metric > 0.0,
        Activity::Cycling => metric >= 0.0,
    };
    if distance <= 0.0 || duration <= 0.0 || !metric_ok {
        return Err(TrackerError::Validation);
    }

    Ok(ValidInput {
        activity,
        distance,
        duration,
        metric,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    /// Form visible; holds the location the user picked.
    AwaitingInput { at: Coords },
}

pub struct Tracker<S: Storage, V: View> {
    storage: S,
    view: V,
    storage_key: String,
    zoom_level: u8,
    workouts: Vec<Workout>,
    map: Option<MapView>,
    /// Answer of the startup position lookup; the map is rebuilt here on reload.
    position: Option<Coords>,
    form: FormState,
}

impl<S: Storage, V: View> Tracker<S, V> {
    /// Build the session state and restore whatever the sink holds.
    pub fn start(storage: S, view: V, config: &AppConfig) -> Result<Self> {
        let mut tracker = Self {
            storage,
            view,
            storage_key: config.storage_key.clone(),
            zoom_level: config.map_zoom_level,
            workouts: Vec::new(),
            map: None,
            position: None,
            form: FormState::Idle,
        };
        tracker.restore()?;
        Ok(tracker)
    }

    /// Load the snapshot into the collection and list it. Markers wait for the
    /// map; see [`Self::load_map`]. Expects an empty list and marker set.
    fn restore(&mut self) -> Result<()> {
        let Some(raw) = self.storage.get(&self.storage_key)? else {
            dlog!("no snapshot under key={}", self.storage_key);
            self.workouts.clear();
            return Ok(());
        };

        self.workouts = serde_json::from_str(&raw)?;
        tracing::info!(workouts = self.workouts.len(), "restored workouts");

        for w in &self.workouts {
            self.view.render_list_item(&ListItem::for_workout(w));
        }
        if let Some(map) = self.map.as_mut() {
            for w in &self.workouts {
                map.add_marker(Marker::for_workout(w));
            }
        }
        Ok(())
    }

    /// Write the whole collection to the sink, replacing the previous snapshot.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.workouts)?;
        self.storage.set(&self.storage_key, &json)?;
        dlog!("persisted workouts={}", self.workouts.len());
        Ok(())
    }

    /// Run the startup position lookup. On success the map is created and
    /// every workout already in the collection gets its marker. On failure the
    /// user is told and the map stays absent.
    pub fn load_map(&mut self, locator: &impl Locator) {
        match locator.current_position() {
            Ok(position) => self.attach_map(position),
            Err(e) => {
                tracing::warn!(err = %e, "position lookup failed; map unavailable");
                self.view.alert(&e.to_string());
            }
        }
    }

    pub fn attach_map(&mut self, position: Coords) {
        let mut map = MapView::new(position, self.zoom_level);
        for w in &self.workouts {
            map.add_marker(Marker::for_workout(w));
        }
        self.map = Some(map);
        self.position = Some(position);
    }

    /// A location was picked on the map: show the form.
    pub fn show_form(&mut self, at: Coords) {
        self.form = FormState::AwaitingInput { at };
        self.view.show_form();
    }

    /// Submit the form. On rejection the user is alerted, the form stays open
    /// and nothing else changes.
    pub fn create_workout(&mut self, form: &WorkoutForm) -> Result<&Workout> {
        let FormState::AwaitingInput { at } = self.form else {
            return Err(TrackerError::NoLocation);
        };

        let input = match validate(form) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(?form, "rejected workout input");
                self.view.alert(INVALID_INPUT_MESSAGE);
                return Err(e);
            }
        };

        let workout = Workout::recorded_at(
            self.unused_timestamp(),
            input.activity,
            at,
            input.distance,
            input.duration,
            input.metric,
        );
        tracing::info!(
            id = %workout.id(),
            activity = %workout.activity(),
            distance = workout.distance(),
            duration = workout.duration(),
            "workout created"
        );

        if let Some(map) = self.map.as_mut() {
            map.add_marker(Marker::for_workout(&workout));
        }
        self.view.render_list_item(&ListItem::for_workout(&workout));
        self.workouts.push(workout);

        self.form = FormState::Idle;
        self.view.hide_form();

        self.persist()?;

        Ok(&self.workouts[self.workouts.len() - 1])
    }

    /// Recenter the map on a listed workout. Unknown ids and a missing map
    /// are ignored.
    pub fn select_workout(&mut self, id: &str) {
        let Some(w) = self.workouts.iter().find(|w| w.id() == id) else {
            dlog!("select: no workout with id={id}");
            return;
        };
        let Some(map) = self.map.as_mut() else {
            dlog!("select: map not loaded");
            return;
        };
        map.set_view(w.coords(), self.zoom_level, true);
    }

    /// Erase the snapshot and reload: all in-memory state is dropped and the
    /// session restarts from the now-empty sink.
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.remove(&self.storage_key)?;
        tracing::info!(discarded = self.workouts.len(), "cleared all workouts");

        self.workouts = Vec::new();
        self.form = FormState::Idle;
        self.view.hide_form();
        self.view.clear_list();
        self.map = self
            .position
            .map(|position| MapView::new(position, self.zoom_level));
        self.restore()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub const fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub const fn form_state(&self) -> FormState {
        self.form
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Now, nudged forward a millisecond at a time until its id is free.
    fn unused_timestamp(&self) -> chrono::DateTime<Utc> {
        let mut ts = Utc::now();
        while self.workouts.iter().any(|w| w.id() == workout_id(ts)) {
            ts += Duration::milliseconds(1);
        }
        ts
    }
}
