//! Capabilities the settings core needs from whatever renders the panel.

use chrono::{DateTime, Duration, Local};
use std::collections::BTreeMap;

use crate::registry::{SettingKind, SettingsRegistry};
use crate::theme::{apply_theme, ThemeId};

// ── Capability traits ─────────────────────────────────────────────────────────

/// Controls addressed by stable id. Setters return `false` when the control
/// does not exist on this surface.
pub trait Controls {
    fn control_ids(&self) -> Vec<String>;
    fn is_checked(&self, id: &str) -> Option<bool>;
    fn set_checked(&mut self, id: &str, checked: bool) -> bool;
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    /// Text of a display-only label.
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    /// Tells the control its state was changed programmatically.
    fn dispatch_change(&mut self, id: &str);
}

pub trait ThemeSink {
    fn set_color_var(&mut self, name: &str, value: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub trait Notifier {
    fn notify(&mut self, message: &str, level: NotificationLevel);
}

pub trait Surface: Controls + ThemeSink + Notifier {}

impl<T: Controls + ThemeSink + Notifier> Surface for T {}

// ── In-memory surface ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    pub checked: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub raised_at: DateTime<Local>,
}

/// How long a notification stays visible.
pub const NOTIFICATION_TTL_MS: i64 = 3000;

/// Plain-data surface. Backs the terminal screen and doubles as the fake
/// in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    controls: BTreeMap<String, ControlState>,
    vars: BTreeMap<String, String>,
    notifications: Vec<Notification>,
    changes: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_control(&mut self, id: &str, state: ControlState) {
        self.controls.insert(id.to_string(), state);
    }

    /// Every control the registry declares, in its default state, with the
    /// default palette applied.
    pub fn for_registry(registry: &SettingsRegistry) -> Self {
        let mut surface = Self::new();
        for spec in registry.iter() {
            match &spec.kind {
                SettingKind::Toggle => surface.add_control(spec.control_id, ControlState::default()),
                SettingKind::Slider { unit, range } => {
                    let value = range.default.to_string();
                    if let Some(label) = &spec.label_id {
                        surface.add_control(
                            label,
                            ControlState {
                                checked: false,
                                value: unit.format(&value),
                            },
                        );
                    }
                    surface.add_control(spec.control_id, ControlState { checked: false, value });
                }
                SettingKind::Radio { options } => {
                    for (i, opt) in options.iter().enumerate() {
                        surface.add_control(
                            opt.id,
                            ControlState {
                                checked: i == 0,
                                value: opt.id.to_string(),
                            },
                        );
                    }
                }
                SettingKind::Theme => {
                    for theme in ThemeId::ALL {
                        surface.add_control(
                            theme.id(),
                            ControlState {
                                checked: theme == ThemeId::Default,
                                value: theme.id().to_string(),
                            },
                        );
                    }
                }
                SettingKind::Dropdown { default, .. } => surface.add_control(
                    spec.control_id,
                    ControlState {
                        checked: false,
                        value: default.to_string(),
                    },
                ),
                SettingKind::Text => surface.add_control(spec.control_id, ControlState::default()),
            }
        }
        apply_theme(ThemeId::Default, &mut surface);
        surface
    }

    pub fn control(&self, id: &str) -> Option<&ControlState> {
        self.controls.get(id)
    }

    pub fn controls(&self) -> &BTreeMap<String, ControlState> {
        &self.controls
    }

    pub fn color_var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn color_vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Drops notifications older than [`NOTIFICATION_TTL_MS`].
    pub fn expire_notifications(&mut self, now: DateTime<Local>) {
        let ttl = Duration::milliseconds(NOTIFICATION_TTL_MS);
        self.notifications.retain(|n| now - n.raised_at < ttl);
    }

    /// Ids passed to `dispatch_change`, oldest first.
    pub fn dispatched_changes(&self) -> &[String] {
        &self.changes
    }
}

impl Controls for MemorySurface {
    fn control_ids(&self) -> Vec<String> {
        self.controls.keys().cloned().collect()
    }

    fn is_checked(&self, id: &str) -> Option<bool> {
        self.controls.get(id).map(|c| c.checked)
    }

    fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.controls.get_mut(id) {
            Some(c) => {
                c.checked = checked;
                true
            }
            None => false,
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        self.controls.get(id).map(|c| c.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.controls.get_mut(id) {
            Some(c) => {
                c.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_value(id, text)
    }

    fn dispatch_change(&mut self, id: &str) {
        self.changes.push(id.to_string());
    }
}

impl ThemeSink for MemorySurface {
    fn set_color_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }
}

impl Notifier for MemorySurface {
    fn notify(&mut self, message: &str, level: NotificationLevel) {
        self.notifications.push(Notification {
            message: message.to_string(),
            level,
            raised_at: Local::now(),
        });
    }
}
