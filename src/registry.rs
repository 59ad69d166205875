//! Declared kinds for every known setting id.
//!
//! Controls are looked up through this table instead of guessing from
//! substrings of the key.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderUnit {
    Plain,
    Percent,
    Seconds,
}

impl SliderUnit {
    pub fn format(self, value: &str) -> String {
        match self {
            SliderUnit::Plain => value.to_string(),
            SliderUnit::Percent => format!("{value}%"),
            SliderUnit::Seconds => format!("{value}s"),
        }
    }
}

/// Inclusive bounds and step used by front ends when nudging a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    Toggle,
    Slider { unit: SliderUnit, range: SliderRange },
    /// Exactly one of `options` (control ids) is checked.
    Radio { options: Vec<RadioOption> },
    Theme,
    Dropdown {
        choices: Vec<&'static str>,
        default: &'static str,
    },
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: SettingKind,
    /// Control that holds the value. Usually equal to `id`.
    pub control_id: &'static str,
    /// Companion label showing the formatted value, for sliders.
    pub label_id: Option<String>,
}

impl SettingSpec {
    pub fn new(id: &'static str, title: &'static str, kind: SettingKind) -> Self {
        let label_id = matches!(kind, SettingKind::Slider { .. }).then(|| format!("{id}-value"));
        Self {
            id,
            title,
            kind,
            control_id: id,
            label_id,
        }
    }

    pub fn bound_to(mut self, control_id: &'static str) -> Self {
        self.control_id = control_id;
        self
    }
}

/// Ordered table of setting specs keyed by setting id.
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    specs: Vec<SettingSpec>,
    index: BTreeMap<&'static str, usize>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: SettingSpec) {
        match self.index.get(spec.id) {
            Some(&i) => self.specs[i] = spec,
            None => {
                self.index.insert(spec.id, self.specs.len());
                self.specs.push(spec);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SettingSpec> {
        self.index.get(id).map(|&i| &self.specs[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The CyberShield dashboard's settings panel.
    pub fn cybershield() -> Self {
        let mut reg = Self::new();

        reg.register(SettingSpec::new("theme", "Theme", SettingKind::Theme));

        for (id, title) in TOGGLES {
            reg.register(SettingSpec::new(id, title, SettingKind::Toggle));
        }

        for (id, title, unit, range) in SLIDERS {
            reg.register(SettingSpec::new(
                id,
                title,
                SettingKind::Slider { unit, range },
            ));
        }

        reg.register(SettingSpec::new(
            PROTECTION_MODE,
            "Protection Mode",
            SettingKind::Radio {
                options: vec![
                    RadioOption { id: "protection-normal", label: "Normal Protection" },
                    RadioOption { id: "protection-aggressive", label: "Aggressive Protection" },
                    RadioOption { id: "protection-learning", label: "Learning Mode" },
                ],
            },
        ));

        reg.register(SettingSpec::new(
            "log-level",
            "Log Level",
            SettingKind::Dropdown {
                choices: vec!["debug", "info", "warning", "error"],
                default: "info",
            },
        ));

        reg.register(
            SettingSpec::new("email-recipients", "Email Recipients", SettingKind::Text)
                .bound_to("email-recipient"),
        );

        reg
    }
}

pub const PROTECTION_MODE: &str = "protection-mode";

const TOGGLES: [(&str, &str); 11] = [
    ("density-toggle", "Comfortable Density"),
    ("animation-toggle", "Animations"),
    ("email-toggle", "Email Alerts"),
    ("sms-toggle", "SMS Alerts"),
    ("desktop-toggle", "Desktop Notifications"),
    ("auto-refresh-toggle", "Auto Refresh"),
    ("real-time-toggle", "Real-time Monitoring"),
    ("tooltips-toggle", "Tooltips"),
    ("developer-toggle", "Developer Mode"),
    ("api-toggle", "API Access"),
    ("debug-toggle", "Debug Logging"),
];

const SLIDERS: [(&str, &str, SliderUnit, SliderRange); 4] = [
    (
        "scan-frequency",
        "Scan Frequency",
        SliderUnit::Plain,
        SliderRange { min: 1, max: 10, step: 1, default: 5 },
    ),
    (
        "suspicious-threshold",
        "Suspicious Threshold",
        SliderUnit::Percent,
        SliderRange { min: 0, max: 100, step: 5, default: 70 },
    ),
    (
        "confidence-threshold",
        "Confidence Threshold",
        SliderUnit::Percent,
        SliderRange { min: 0, max: 100, step: 5, default: 60 },
    ),
    (
        "refresh-interval",
        "Refresh Interval",
        SliderUnit::Seconds,
        SliderRange { min: 1, max: 60, step: 1, default: 5 },
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cybershield_registry_declares_every_panel_control() {
        let reg = SettingsRegistry::cybershield();
        assert_eq!(reg.len(), 1 + 11 + 4 + 1 + 1 + 1);
        assert_eq!(reg.get("debug-toggle").unwrap().kind, SettingKind::Toggle);
        assert_eq!(reg.get("email-recipients").unwrap().control_id, "email-recipient");
        assert_eq!(
            reg.get("refresh-interval").unwrap().label_id.as_deref(),
            Some("refresh-interval-value")
        );
        assert!(reg.get("toggle-that-does-not-exist").is_none());
    }

    #[test]
    fn slider_units_format_labels() {
        assert_eq!(SliderUnit::Plain.format("5"), "5");
        assert_eq!(SliderUnit::Percent.format("60"), "60%");
        assert_eq!(SliderUnit::Seconds.format("30"), "30s");
    }

    #[test]
    fn register_replaces_existing_id_in_place() {
        let mut reg = SettingsRegistry::cybershield();
        let before: Vec<_> = reg.iter().map(|s| s.id).collect();
        reg.register(SettingSpec::new("log-level", "Verbosity", SettingKind::Text));
        let after: Vec<_> = reg.iter().map(|s| s.id).collect();
        assert_eq!(before, after);
        assert_eq!(reg.get("log-level").unwrap().title, "Verbosity");
    }
}
