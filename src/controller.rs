use crate::effects::DashboardState;
use crate::error::Result;
use crate::registry::{SettingKind, SettingsRegistry};
use crate::storage::Storage;
use crate::store::{parse_import, ExportArtifact, SettingsStore};
use crate::surface::{NotificationLevel, Surface};
use crate::theme::{apply_theme, ThemeId};
use crate::value::{SettingValue, SettingsMap};

const THEME_KEY: &str = "theme";

/// Binds the persisted settings to the controls of a [`Surface`].
///
/// Every handler is a synchronous read-modify-write on the store; the
/// surface is borrowed per call so the same controller can drive a
/// terminal screen or a test fake.
pub struct SettingsController<S: Storage> {
    store: SettingsStore<S>,
    registry: SettingsRegistry,
    dashboard: DashboardState,
}

impl<S: Storage> SettingsController<S> {
    pub fn new(store: SettingsStore<S>, registry: SettingsRegistry) -> Self {
        Self {
            store,
            registry,
            dashboard: DashboardState::default(),
        }
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SettingsStore<S> {
        &mut self.store
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    // ── Startup ───────────────────────────────────────────────────────────────

    /// Applies only the stored theme, silently. Run before [`Self::load_all`]
    /// so the first frame is already themed.
    pub fn load_theme<U: Surface>(&self, ui: &mut U) -> Option<ThemeId> {
        let value = self.store.get(THEME_KEY)?;
        apply_stored_theme(&value, ui)
    }

    /// Pushes every stored setting into its control. Keys missing from the
    /// registry and controls missing from the surface are skipped.
    pub fn load_all<U: Surface>(&mut self, ui: &mut U, theme_already_applied: bool) {
        let map = self.store.get_all();
        for (key, value) in &map {
            self.apply_setting(ui, key, value, theme_already_applied);
        }
    }

    fn apply_setting<U: Surface>(
        &mut self,
        ui: &mut U,
        key: &str,
        value: &SettingValue,
        theme_already_applied: bool,
    ) {
        let Some(spec) = self.registry.get(key) else {
            log::debug!("ignoring unknown setting {key}");
            return;
        };
        match &spec.kind {
            SettingKind::Toggle => {
                let Some(checked) = value.as_bool() else {
                    log::warn!("setting {key} is not a boolean: {value}");
                    return;
                };
                if ui.set_checked(spec.control_id, checked) {
                    ui.dispatch_change(spec.control_id);
                    self.dashboard.apply_toggle(key, checked);
                }
            }
            SettingKind::Slider { unit, .. } => {
                let text = value.to_string();
                if ui.set_value(spec.control_id, &text) {
                    if let Some(label) = &spec.label_id {
                        ui.set_text(label, &unit.format(&text));
                    }
                    self.dashboard.apply_slider(key, value);
                }
            }
            SettingKind::Radio { options } => {
                let Some(selected) = value.as_str() else {
                    log::warn!("setting {key} is not an option id: {value}");
                    return;
                };
                if !options.iter().any(|o| o.id == selected) || ui.is_checked(selected).is_none() {
                    log::warn!("setting {key} names unknown option {selected}");
                    return;
                }
                for opt in options {
                    ui.set_checked(opt.id, opt.id == selected);
                }
            }
            SettingKind::Theme => {
                if !theme_already_applied {
                    apply_stored_theme(value, ui);
                }
            }
            SettingKind::Dropdown { .. } | SettingKind::Text => {
                ui.set_value(spec.control_id, &value.to_string());
            }
        }
    }

    // ── Control events ────────────────────────────────────────────────────────

    pub fn toggle_changed(&mut self, id: &str, checked: bool) {
        let _ = self.store.set(id, checked);
        self.dashboard.apply_toggle(id, checked);
    }

    pub fn slider_input<U: Surface>(&mut self, ui: &mut U, id: &str, value: &str) {
        if let Some(spec) = self.registry.get(id) {
            if let (SettingKind::Slider { unit, .. }, Some(label)) = (&spec.kind, &spec.label_id) {
                ui.set_text(label, &unit.format(value));
            }
        }
        let _ = self.store.set(id, value);
        self.dashboard.apply_slider(id, &SettingValue::from(value));
    }

    /// A radio option became checked. Persists the group's setting and
    /// announces the new mode.
    pub fn radio_selected<U: Surface>(&mut self, ui: &mut U, option_id: &str) {
        let found = self.registry.iter().find_map(|spec| match &spec.kind {
            SettingKind::Radio { options } => options
                .iter()
                .find(|o| o.id == option_id)
                .map(|o| (spec.id, options, o.label)),
            _ => None,
        });
        let Some((setting_id, options, label)) = found else {
            log::warn!("no radio group declares option {option_id}");
            return;
        };
        for opt in options {
            ui.set_checked(opt.id, opt.id == option_id);
        }
        let _ = self.store.set(setting_id, option_id);
        ui.notify(&format!("{label} enabled"), NotificationLevel::Info);
    }

    pub fn theme_selected<U: Surface>(&mut self, ui: &mut U, theme: ThemeId) {
        select_theme_option(theme, ui);
        apply_theme(theme, ui);
        ui.notify("Theme applied", NotificationLevel::Success);
        let _ = self.store.set(THEME_KEY, theme.id());
    }

    pub fn dropdown_changed(&mut self, id: &str, value: &str) {
        let _ = self.store.set(id, value);
    }

    /// Text field left after editing.
    pub fn text_committed(&mut self, id: &str, value: &str) {
        let _ = self.store.set(id, value);
    }

    /// Reads every registered control and persists its current state in one
    /// write.
    pub fn save_all<U: Surface>(&mut self, ui: &mut U) {
        let mut map = self.store.get_all();
        for spec in self.registry.iter() {
            let value: Option<SettingValue> = match &spec.kind {
                SettingKind::Toggle => ui.is_checked(spec.control_id).map(SettingValue::from),
                SettingKind::Slider { .. } | SettingKind::Dropdown { .. } | SettingKind::Text => {
                    ui.value(spec.control_id).map(SettingValue::from)
                }
                SettingKind::Radio { options } => options
                    .iter()
                    .find(|o| ui.is_checked(o.id) == Some(true))
                    .map(|o| SettingValue::from(o.id)),
                SettingKind::Theme => ThemeId::ALL
                    .into_iter()
                    .find(|t| ui.is_checked(t.id()) == Some(true))
                    .map(|t| SettingValue::from(t.id())),
            };
            if let Some(value) = value {
                map.insert(spec.id.to_string(), value);
            }
        }
        match self.store.replace_all(&map) {
            Ok(()) => ui.notify("Settings saved successfully", NotificationLevel::Success),
            Err(e) => {
                log::error!("error saving settings: {e}");
                ui.notify("Failed to save settings", NotificationLevel::Error);
            }
        }
    }

    // ── Import / export ───────────────────────────────────────────────────────

    pub fn export_all<U: Surface>(&self, ui: &mut U) -> Option<ExportArtifact> {
        match self.store.export_all() {
            Ok(artifact) => {
                ui.notify(
                    "Configuration exported successfully",
                    NotificationLevel::Success,
                );
                Some(artifact)
            }
            Err(e) => {
                log::error!("error exporting settings: {e}");
                ui.notify("Failed to export configuration", NotificationLevel::Error);
                None
            }
        }
    }

    /// Replaces the whole map with `raw` and reapplies it. Invalid input
    /// leaves the store untouched.
    pub fn import_all<U: Surface>(&mut self, ui: &mut U, raw: &str) -> Result<SettingsMap> {
        let map = match parse_import(raw) {
            Ok(map) => map,
            Err(e) => {
                log::error!("error importing settings: {e}");
                ui.notify("Invalid configuration file", NotificationLevel::Error);
                return Err(e);
            }
        };
        if let Err(e) = self.store.replace_all(&map) {
            log::error!("error storing imported settings: {e}");
            ui.notify("Failed to store configuration", NotificationLevel::Error);
            return Err(e);
        }
        self.load_all(ui, false);
        ui.notify(
            "Configuration imported successfully",
            NotificationLevel::Success,
        );
        Ok(map)
    }
}

/// Marks `theme` selected among the theme options. `false` when this
/// surface has no option for it.
fn select_theme_option<U: Surface>(theme: ThemeId, ui: &mut U) -> bool {
    if ui.is_checked(theme.id()).is_none() {
        return false;
    }
    for t in ThemeId::ALL {
        ui.set_checked(t.id(), t == theme);
    }
    true
}

fn apply_stored_theme<U: Surface>(value: &SettingValue, ui: &mut U) -> Option<ThemeId> {
    let Some(theme) = value.as_str().and_then(ThemeId::from_id) else {
        log::warn!("stored theme {value} is not a known theme");
        return None;
    };
    if !select_theme_option(theme, ui) {
        log::debug!("no option for theme {} on this surface", theme.id());
        return None;
    }
    apply_theme(theme, ui);
    Some(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STORE_KEY;
    use crate::storage::MemoryStorage;
    use crate::surface::{Controls, MemorySurface};
    use std::time::Duration;

    fn setup() -> (SettingsController<MemoryStorage>, MemorySurface) {
        let registry = SettingsRegistry::cybershield();
        let surface = MemorySurface::for_registry(&registry);
        let controller = SettingsController::new(SettingsStore::new(MemoryStorage::new()), registry);
        (controller, surface)
    }

    #[test]
    fn empty_store_load_theme_changes_nothing() {
        let (controller, mut ui) = setup();
        let before = ui.color_vars().clone();
        assert_eq!(controller.load_theme(&mut ui), None);
        assert_eq!(ui.color_vars(), &before);
        assert!(ui.notifications().is_empty());
    }

    #[test]
    fn stored_matrix_theme_loads_silently() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("theme", "theme-matrix").unwrap();

        assert_eq!(controller.load_theme(&mut ui), Some(ThemeId::Matrix));
        assert_eq!(ui.color_var("--primary"), Some("#00FF00"));
        assert_eq!(ui.color_var("--darker"), Some("#001100"));
        assert_eq!(ui.is_checked("theme-matrix"), Some(true));
        assert_eq!(ui.is_checked("theme-default"), Some(false));
        assert!(ui.notifications().is_empty());
    }

    #[test]
    fn unknown_stored_theme_is_skipped() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("theme", "theme-neon").unwrap();
        assert_eq!(controller.load_theme(&mut ui), None);
        assert_eq!(ui.color_var("--primary"), Some("#23C8FF"));
    }

    #[test]
    fn slider_labels_use_declared_units() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("scan-frequency", "5").unwrap();
        controller.store_mut().set("confidence-threshold", "60").unwrap();
        controller.store_mut().set("refresh-interval", "30").unwrap();
        controller.load_all(&mut ui, true);

        assert_eq!(ui.value("scan-frequency").as_deref(), Some("5"));
        assert_eq!(ui.value("scan-frequency-value").as_deref(), Some("5"));
        assert_eq!(ui.value("confidence-threshold-value").as_deref(), Some("60%"));
        assert_eq!(ui.value("refresh-interval-value").as_deref(), Some("30s"));
        assert_eq!(controller.dashboard().refresh_interval, Duration::from_secs(30));
    }

    #[test]
    fn unknown_keys_touch_no_control() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("mystery-toggle", true).unwrap();
        controller.store_mut().set("future-threshold", "99").unwrap();
        let before = ui.controls().clone();

        controller.load_all(&mut ui, false);
        assert_eq!(ui.controls(), &before);
        assert!(ui.dispatched_changes().is_empty());
    }

    #[test]
    fn toggles_dispatch_change_and_apply_side_effects() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("developer-toggle", true).unwrap();
        controller.store_mut().set("animation-toggle", "false").unwrap();
        controller.load_all(&mut ui, true);

        assert_eq!(ui.is_checked("developer-toggle"), Some(true));
        assert!(ui.dispatched_changes().iter().any(|id| id == "developer-toggle"));
        assert!(controller.dashboard().developer_mode);
        assert!(!controller.dashboard().animations_enabled());
    }

    #[test]
    fn theme_key_respects_already_applied_flag() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("theme", "theme-crimson").unwrap();

        controller.load_all(&mut ui, true);
        assert_eq!(ui.color_var("--primary"), Some("#23C8FF"));

        controller.load_all(&mut ui, false);
        assert_eq!(ui.color_var("--primary"), Some("#FF5252"));
        assert_eq!(ui.is_checked("theme-crimson"), Some(true));
    }

    #[test]
    fn radio_dropdown_and_text_are_restored() {
        let (mut controller, mut ui) = setup();
        controller
            .store_mut()
            .set("protection-mode", "protection-learning")
            .unwrap();
        controller.store_mut().set("log-level", "debug").unwrap();
        controller
            .store_mut()
            .set("email-recipients", "soc@example.com")
            .unwrap();
        controller.load_all(&mut ui, true);

        assert_eq!(ui.is_checked("protection-learning"), Some(true));
        assert_eq!(ui.is_checked("protection-normal"), Some(false));
        assert_eq!(ui.value("log-level").as_deref(), Some("debug"));
        assert_eq!(ui.value("email-recipient").as_deref(), Some("soc@example.com"));
    }

    #[test]
    fn missing_controls_are_skipped() {
        let registry = SettingsRegistry::cybershield();
        let mut ui = MemorySurface::new();
        let mut controller =
            SettingsController::new(SettingsStore::new(MemoryStorage::new()), registry);
        controller.store_mut().set("debug-toggle", true).unwrap();
        controller.store_mut().set("theme", "theme-matrix").unwrap();

        controller.load_all(&mut ui, false);
        assert!(ui.controls().is_empty());
        assert!(ui.color_vars().is_empty());
    }

    #[test]
    fn non_boolean_toggle_value_is_skipped() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("debug-toggle", "yes").unwrap();
        controller.store_mut().set("sms-toggle", "on").unwrap();
        let before = ui.controls().clone();

        controller.load_all(&mut ui, true);
        assert_eq!(ui.controls(), &before);
        assert!(ui.dispatched_changes().is_empty());
    }

    #[test]
    fn unknown_radio_option_is_skipped() {
        let (mut controller, mut ui) = setup();
        controller
            .store_mut()
            .set("protection-mode", "protection-bogus")
            .unwrap();
        let before = ui.controls().clone();

        controller.load_all(&mut ui, true);
        assert_eq!(ui.controls(), &before);
        assert_eq!(ui.is_checked("protection-normal"), Some(true));
    }

    #[test]
    fn huge_refresh_interval_import_loads_without_panicking() {
        let (mut controller, mut ui) = setup();
        controller
            .import_all(&mut ui, r#"{"refresh-interval":"99999999999999999"}"#)
            .unwrap();

        assert_eq!(
            ui.value("refresh-interval-value").as_deref(),
            Some("99999999999999999s")
        );
        assert_eq!(
            controller.dashboard().refresh_interval,
            Duration::from_secs(99_999_999_999_999_999)
        );
        assert_eq!(
            ui.latest_notification().unwrap().message,
            "Configuration imported successfully"
        );

        // Startup replays the stored value too.
        let mut fresh = MemorySurface::for_registry(controller.registry());
        controller.load_all(&mut fresh, false);
        assert_eq!(fresh.value("refresh-interval").as_deref(), Some("99999999999999999"));
    }

    #[test]
    fn invalid_import_leaves_store_byte_for_byte() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("log-level", "warning").unwrap();
        let before = controller.store().storage().raw(STORE_KEY).map(str::to_owned);

        assert!(controller.import_all(&mut ui, "{\"theme\": ").is_err());
        assert_eq!(
            controller.store().storage().raw(STORE_KEY).map(str::to_owned),
            before
        );
        let note = ui.latest_notification().unwrap();
        assert_eq!(note.message, "Invalid configuration file");
        assert_eq!(note.level, NotificationLevel::Error);
    }

    #[test]
    fn import_then_export_round_trips() {
        let (mut controller, mut ui) = setup();
        let raw = r#"{
            "theme": "theme-midnight",
            "debug-toggle": true,
            "scan-frequency": "7",
            "confidence-threshold": 75,
            "unknown-key": "kept"
        }"#;

        controller.import_all(&mut ui, raw).unwrap();
        assert_eq!(ui.color_var("--primary"), Some("#7B42F6"));
        assert_eq!(ui.value("scan-frequency-value").as_deref(), Some("7"));
        assert_eq!(ui.value("confidence-threshold").as_deref(), Some("75"));
        assert_eq!(ui.value("confidence-threshold-value").as_deref(), Some("75%"));
        assert_eq!(controller.dashboard().confidence_threshold, 75);

        let artifact = controller.export_all(&mut ui).unwrap();
        let exported: serde_json::Value = serde_json::from_str(&artifact.contents).unwrap();
        let imported: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(exported, imported);
        assert_eq!(
            ui.latest_notification().unwrap().message,
            "Configuration exported successfully"
        );
    }

    #[test]
    fn import_replaces_rather_than_merges() {
        let (mut controller, mut ui) = setup();
        controller.store_mut().set("sms-toggle", true).unwrap();
        controller.import_all(&mut ui, r#"{"log-level":"error"}"#).unwrap();
        let all = controller.store().get_all();
        assert_eq!(all.len(), 1);
        assert!(!all.contains_key("sms-toggle"));
    }

    #[test]
    fn radio_selection_persists_and_announces_mode() {
        let (mut controller, mut ui) = setup();
        controller.radio_selected(&mut ui, "protection-aggressive");

        assert_eq!(
            controller.store().get("protection-mode"),
            Some(SettingValue::from("protection-aggressive"))
        );
        assert_eq!(ui.is_checked("protection-normal"), Some(false));
        let note = ui.latest_notification().unwrap();
        assert_eq!(note.message, "Aggressive Protection enabled");
        assert_eq!(note.level, NotificationLevel::Info);
    }

    #[test]
    fn theme_selection_notifies_and_persists() {
        let (mut controller, mut ui) = setup();
        controller.theme_selected(&mut ui, ThemeId::Midnight);
        assert_eq!(ui.color_var("--border"), Some("#253354"));
        assert_eq!(ui.latest_notification().unwrap().message, "Theme applied");
        assert_eq!(
            controller.store().get("theme"),
            Some(SettingValue::from("theme-midnight"))
        );
    }

    #[test]
    fn slider_input_updates_label_and_state() {
        let (mut controller, mut ui) = setup();
        controller.slider_input(&mut ui, "confidence-threshold", "85");
        assert_eq!(ui.value("confidence-threshold-value").as_deref(), Some("85%"));
        assert_eq!(controller.dashboard().confidence_threshold, 85);
        assert_eq!(
            controller.store().get("confidence-threshold"),
            Some(SettingValue::from("85"))
        );
    }

    #[test]
    fn save_all_reads_radio_from_the_group_load_all_writes() {
        let (mut controller, mut ui) = setup();
        ui.set_checked("protection-normal", false);
        ui.set_checked("protection-learning", true);
        ui.set_checked("tooltips-toggle", true);
        ui.set_value("email-recipient", "a@b.c");

        controller.save_all(&mut ui);
        let all = controller.store().get_all();
        assert_eq!(all["protection-mode"], SettingValue::from("protection-learning"));
        assert_eq!(all["tooltips-toggle"], SettingValue::Bool(true));
        assert_eq!(all["email-recipients"], SettingValue::from("a@b.c"));
        assert_eq!(all["theme"], SettingValue::from("theme-default"));
        assert_eq!(all["scan-frequency"], SettingValue::from("5"));
        assert_eq!(
            ui.latest_notification().unwrap().message,
            "Settings saved successfully"
        );

        let (mut reloaded, mut fresh) = setup();
        reloaded.store_mut().replace_all(&all).unwrap();
        reloaded.load_all(&mut fresh, false);
        assert_eq!(fresh.is_checked("protection-learning"), Some(true));
    }

    #[test]
    fn toggle_and_value_events_persist() {
        let (mut controller, _ui) = setup();
        controller.toggle_changed("auto-refresh-toggle", true);
        controller.text_committed("email-recipients", "ops@example.com");
        controller.dropdown_changed("log-level", "warning");
        assert!(controller.dashboard().auto_refresh);
        assert_eq!(
            controller.store().get("email-recipients"),
            Some(SettingValue::from("ops@example.com"))
        );
        assert_eq!(
            controller.store().get("log-level"),
            Some(SettingValue::from("warning"))
        );
    }
}
