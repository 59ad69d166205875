use std::time::Duration;

use crate::value::SettingValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Comfortable,
    Compact,
}

/// Runtime behaviour driven by the special toggles and sliders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub animation_duration: Duration,
    pub density: Density,
    pub auto_refresh: bool,
    pub real_time: bool,
    pub developer_mode: bool,
    pub refresh_interval: Duration,
    pub confidence_threshold: i64,
}

const ANIMATION_ON: Duration = Duration::from_millis(300);

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            animation_duration: ANIMATION_ON,
            density: Density::Compact,
            auto_refresh: false,
            real_time: false,
            developer_mode: false,
            refresh_interval: Duration::from_secs(5),
            confidence_threshold: 60,
        }
    }
}

impl DashboardState {
    pub fn animations_enabled(&self) -> bool {
        !self.animation_duration.is_zero()
    }

    /// Side effect of a toggle. Unknown toggles have none.
    pub fn apply_toggle(&mut self, id: &str, checked: bool) {
        match id {
            "animation-toggle" => {
                self.animation_duration = if checked { ANIMATION_ON } else { Duration::ZERO };
            }
            "density-toggle" => {
                self.density = if checked {
                    Density::Comfortable
                } else {
                    Density::Compact
                };
            }
            "auto-refresh-toggle" => self.auto_refresh = checked,
            "real-time-toggle" => self.real_time = checked,
            "developer-toggle" => self.developer_mode = checked,
            _ => {}
        }
    }

    /// Side effect of a slider. Non-numeric input leaves the state as is.
    pub fn apply_slider(&mut self, id: &str, value: &SettingValue) {
        let Some(n) = value.as_i64() else {
            log::debug!("ignoring non-numeric value {value} for {id}");
            return;
        };
        match id {
            "refresh-interval" => self.refresh_interval = Duration::from_secs(n.max(0) as u64),
            "confidence-threshold" => self.confidence_threshold = n,
            _ => {}
        }
    }
}
