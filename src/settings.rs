use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::controller::SettingsController;
use crate::registry::{SettingKind, SettingsRegistry, SliderRange};
use crate::status::render_status_bar;
use crate::storage::Storage;
use crate::surface::{Controls, MemorySurface, NotificationLevel, Notifier};
use crate::theme::ThemeId;
use crate::ui::{pad_horizontal, render_header, render_separator, Styles, Term};

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Export,
    Import,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Separator,
    Theme(ThemeId),
    Toggle { id: &'static str, title: &'static str },
    Slider { id: &'static str, title: &'static str, range: SliderRange },
    Radio { id: &'static str, label: &'static str },
    Dropdown { id: &'static str, title: &'static str, choices: Vec<&'static str> },
    Text { id: &'static str, control_id: &'static str, title: &'static str },
    Action(Action),
}

impl Row {
    fn selectable(&self) -> bool {
        !matches!(self, Row::Separator)
    }
}

/// One row per control, grouped by kind in registry order, then the
/// panel actions.
pub fn build_rows(registry: &SettingsRegistry) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut last_group = None;
    for spec in registry.iter() {
        let group = std::mem::discriminant(&spec.kind);
        if last_group.is_some_and(|g| g != group) {
            rows.push(Row::Separator);
        }
        last_group = Some(group);
        match &spec.kind {
            SettingKind::Theme => rows.extend(ThemeId::ALL.into_iter().map(Row::Theme)),
            SettingKind::Toggle => rows.push(Row::Toggle { id: spec.id, title: spec.title }),
            SettingKind::Slider { range, .. } => rows.push(Row::Slider {
                id: spec.id,
                title: spec.title,
                range: *range,
            }),
            SettingKind::Radio { options } => rows.extend(
                options
                    .iter()
                    .map(|o| Row::Radio { id: o.id, label: o.label }),
            ),
            SettingKind::Dropdown { choices, .. } => rows.push(Row::Dropdown {
                id: spec.id,
                title: spec.title,
                choices: choices.clone(),
            }),
            SettingKind::Text => rows.push(Row::Text {
                id: spec.id,
                control_id: spec.control_id,
                title: spec.title,
            }),
        }
    }
    rows.push(Row::Separator);
    rows.extend(
        [Action::Save, Action::Export, Action::Import, Action::Quit]
            .into_iter()
            .map(Row::Action),
    );
    rows
}

// ── Screen ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    EditText { id: &'static str, control_id: &'static str, buf: String },
    ImportPath { buf: String },
}

/// Interactive settings panel over an in-memory surface.
pub struct SettingsScreen<S: Storage> {
    controller: SettingsController<S>,
    surface: MemorySurface,
    rows: Vec<Row>,
    idx: usize,
    mode: Mode,
    export_dir: PathBuf,
}

impl<S: Storage> SettingsScreen<S> {
    /// Loads the theme first, then everything else.
    pub fn new(mut controller: SettingsController<S>, export_dir: PathBuf) -> Self {
        let mut surface = MemorySurface::for_registry(controller.registry());
        controller.load_theme(&mut surface);
        controller.load_all(&mut surface, true);
        let rows = build_rows(controller.registry());
        let idx = rows.iter().position(Row::selectable).unwrap_or(0);
        Self {
            controller,
            surface,
            rows,
            idx,
            mode: Mode::Browse,
            export_dir,
        }
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn controller(&self) -> &SettingsController<S> {
        &self.controller
    }

    pub fn selected(&self) -> Option<&Row> {
        self.rows.get(self.idx)
    }

    pub fn run(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            self.surface.expire_notifications(Local::now());
            self.draw(terminal)?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press { continue; }
                    if !self.handle_key(key.code) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the screen should close.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(code),
            Mode::EditText { id, control_id, mut buf } => {
                match code {
                    KeyCode::Enter => {
                        self.surface.set_value(control_id, &buf);
                        self.controller.text_committed(id, &buf);
                    }
                    KeyCode::Esc => {}
                    other => {
                        edit_buffer(&mut buf, other);
                        self.mode = Mode::EditText { id, control_id, buf };
                    }
                }
                true
            }
            Mode::ImportPath { mut buf } => {
                match code {
                    KeyCode::Enter => self.import_from(buf.trim()),
                    KeyCode::Esc => {}
                    other => {
                        edit_buffer(&mut buf, other);
                        self.mode = Mode::ImportPath { buf };
                    }
                }
                true
            }
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1),
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(),
            KeyCode::Char('q') | KeyCode::Esc => return false,
            _ => {}
        }
        true
    }

    fn move_selection(&mut self, delta: isize) {
        let mut i = self.idx as isize;
        loop {
            i += delta;
            if i < 0 || i >= self.rows.len() as isize {
                return;
            }
            if self.rows[i as usize].selectable() {
                self.idx = i as usize;
                return;
            }
        }
    }

    fn nudge(&mut self, direction: i64) {
        let Some(Row::Slider { id, range, .. }) = self.rows.get(self.idx).cloned() else {
            return;
        };
        let current = self
            .surface
            .value(id)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(range.default);
        let next = (current + direction * range.step).clamp(range.min, range.max);
        if next == current {
            return;
        }
        let value = next.to_string();
        self.surface.set_value(id, &value);
        self.controller.slider_input(&mut self.surface, id, &value);
    }

    fn activate(&mut self) -> bool {
        let Some(row) = self.rows.get(self.idx).cloned() else {
            return true;
        };
        match row {
            Row::Separator => {}
            Row::Theme(theme) => self.controller.theme_selected(&mut self.surface, theme),
            Row::Toggle { id, .. } => {
                let checked = !self.surface.is_checked(id).unwrap_or(false);
                self.surface.set_checked(id, checked);
                self.controller.toggle_changed(id, checked);
            }
            Row::Slider { .. } => self.nudge(1),
            Row::Radio { id, .. } => self.controller.radio_selected(&mut self.surface, id),
            Row::Dropdown { id, choices, .. } => {
                let current = self.surface.value(id).unwrap_or_default();
                let next = choices
                    .iter()
                    .position(|c| *c == current)
                    .map(|i| (i + 1) % choices.len())
                    .unwrap_or(0);
                if let Some(choice) = choices.get(next) {
                    self.surface.set_value(id, choice);
                    self.controller.dropdown_changed(id, choice);
                }
            }
            Row::Text { id, control_id, .. } => {
                let buf = self.surface.value(control_id).unwrap_or_default();
                self.mode = Mode::EditText { id, control_id, buf };
            }
            Row::Action(Action::Save) => self.controller.save_all(&mut self.surface),
            Row::Action(Action::Export) => self.export(),
            Row::Action(Action::Import) => {
                self.mode = Mode::ImportPath {
                    buf: self
                        .export_dir
                        .join(crate::config::EXPORT_FILE_NAME)
                        .display()
                        .to_string(),
                };
            }
            Row::Action(Action::Quit) => return false,
        }
        true
    }

    fn export(&mut self) {
        let Some(artifact) = self.controller.export_all(&mut self.surface) else {
            return;
        };
        let path = self.export_dir.join(artifact.file_name);
        if let Err(e) = std::fs::write(&path, &artifact.contents) {
            log::error!("failed to write {}: {e}", path.display());
            self.surface
                .notify("Could not write export file", NotificationLevel::Error);
        } else {
            log::info!("exported settings to {}", path.display());
        }
    }

    fn import_from(&mut self, path: &str) {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                // Failures are already reported on the surface.
                let _ = self.controller.import_all(&mut self.surface, &raw);
            }
            Err(e) => {
                log::error!("failed to read {path}: {e}");
                self.surface
                    .notify("Could not read configuration file", NotificationLevel::Error);
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn row_label(&self, row: &Row) -> String {
        let mark = |on: bool| if on { "(*)" } else { "( )" };
        match row {
            Row::Separator => String::new(),
            Row::Theme(t) => format!(
                "{} Theme: {}",
                mark(self.surface.is_checked(t.id()) == Some(true)),
                t.name()
            ),
            Row::Toggle { id, title } => {
                if self.surface.is_checked(id) == Some(true) {
                    format!("{title}: ON  [toggle]")
                } else {
                    format!("{title}: OFF [toggle]")
                }
            }
            Row::Slider { id, title, .. } => {
                let label = self
                    .controller
                    .registry()
                    .get(id)
                    .and_then(|s| s.label_id.as_deref())
                    .and_then(|l| self.surface.value(l))
                    .unwrap_or_default();
                format!("{title}: {label} [<- ->]")
            }
            Row::Radio { id, label } => {
                format!("{} {label}", mark(self.surface.is_checked(id) == Some(true)))
            }
            Row::Dropdown { id, title, .. } => {
                format!("{title}: {} [cycle]", self.surface.value(id).unwrap_or_default())
            }
            Row::Text { control_id, title, .. } => match &self.mode {
                Mode::EditText { control_id: editing, buf, .. } if editing == control_id => {
                    format!("{title}: {buf}█")
                }
                _ => format!(
                    "{title}: {} [edit]",
                    self.surface.value(control_id).unwrap_or_default()
                ),
            },
            Row::Action(Action::Save) => "Save Settings".to_string(),
            Row::Action(Action::Export) => "Export Configuration".to_string(),
            Row::Action(Action::Import) => match &self.mode {
                Mode::ImportPath { buf } => format!("Import from: {buf}█"),
                _ => "Import Configuration".to_string(),
            },
            Row::Action(Action::Quit) => "Back".to_string(),
        }
    }

    fn draw(&self, terminal: &mut Term) -> Result<()> {
        let styles = Styles::from_surface(&self.surface);
        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(size);

            render_header(f, chunks[0], &styles);
            render_separator(f, chunks[1], &styles);

            let content_area = pad_horizontal(chunks[2]);
            let visible = content_area.height as usize;
            let offset = (self.idx + 1).saturating_sub(visible);
            let lines: Vec<Line> = self
                .rows
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(i, row)| {
                    if *row == Row::Separator {
                        return Line::from(Span::styled("", styles.dim()));
                    }
                    let label = self.row_label(row);
                    if i == self.idx {
                        Line::from(Span::styled(format!("  > {label}"), styles.sel()))
                    } else if matches!(row, Row::Action(_)) {
                        Line::from(Span::styled(format!("    {label}"), styles.accent()))
                    } else {
                        Line::from(Span::styled(format!("    {label}"), styles.normal()))
                    }
                })
                .collect();
            f.render_widget(Paragraph::new(lines), content_area);

            let hint = match self.mode {
                Mode::Browse => "↑↓ move   ←→ adjust   Enter = select   q/Esc = back",
                _ => "Enter = confirm   Esc = cancel",
            };
            f.render_widget(
                Paragraph::new(hint).alignment(Alignment::Left).style(styles.dim()),
                pad_horizontal(chunks[3]),
            );
            render_status_bar(f, chunks[4], &styles, self.surface.latest_notification());
        })?;
        Ok(())
    }
}

fn edit_buffer(buf: &mut String, code: KeyCode) {
    match code {
        KeyCode::Backspace => {
            buf.pop();
        }
        KeyCode::Char(c) if (c as u32) >= 32 => buf.push(c),
        _ => {}
    }
}
