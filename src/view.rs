use crate::types::{Activity, Workout, WorkoutKind};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// A workout formatted for the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: String,
    pub activity: Activity,
    pub title: String,
    pub details: Vec<Detail>,
}

impl ListItem {
    pub fn for_workout(w: &Workout) -> Self {
        let mut details = vec![
            Detail {
                icon: w.activity().icon(),
                value: w.distance().to_string(),
                unit: "km",
            },
            Detail {
                icon: "⏱",
                value: w.duration().to_string(),
                unit: "min",
            },
        ];

        match *w.kind() {
            WorkoutKind::Running { cadence, pace } => {
                details.push(Detail {
                    icon: "⚡️",
                    value: format!("{pace:.1}"),
                    unit: "min/km",
                });
                details.push(Detail {
                    icon: "🦶🏼",
                    value: cadence.to_string(),
                    unit: "spm",
                });
            }
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            } => {
                details.push(Detail {
                    icon: "⚡️",
                    value: format!("{speed:.1}"),
                    unit: "km/h",
                });
                details.push(Detail {
                    icon: "⛰",
                    value: elevation_gain.to_string(),
                    unit: "m",
                });
            }
        }

        Self {
            id: w.id().to_string(),
            activity: w.activity(),
            title: w.label().to_string(),
            details,
        }
    }

    pub fn to_line(&self) -> String {
        let mut line = format!("{}\t{}", self.id, self.title);
        for d in &self.details {
            let _ = write!(line, "\t{} {} {}", d.icon, d.value, d.unit);
        }
        line
    }
}

/// Output port for everything that is not the map: the workout list, the
/// entry form and blocking alerts.
pub trait View {
    fn render_list_item(&mut self, item: &ListItem);
    /// Drop every list item shown so far.
    fn clear_list(&mut self);
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn alert(&mut self, message: &str);
}

/// Writes list items to stdout and alerts to stderr.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub show_list: bool,
}

impl TerminalView {
    pub const fn new(show_list: bool) -> Self {
        Self { show_list }
    }
}

impl View for TerminalView {
    fn render_list_item(&mut self, item: &ListItem) {
        if self.show_list {
            println!("{}", item.to_line());
        }
    }

    fn clear_list(&mut self) {}

    fn show_form(&mut self) {
        tracing::debug!("form shown, focus on distance");
    }

    fn hide_form(&mut self) {
        tracing::debug!("form hidden, fields reset");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Collects everything it is asked to show. Useful for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub items: Vec<ListItem>,
    pub alerts: Vec<String>,
    pub form_visible: bool,
}

impl View for RecordingView {
    fn render_list_item(&mut self, item: &ListItem) {
        self.items.push(item.clone());
    }

    fn clear_list(&mut self) {
        self.items.clear();
    }

    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
