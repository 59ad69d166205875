use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

use crate::config::HEADER_LINES;
use crate::surface::{MemorySurface, NotificationLevel};
use crate::theme::{hex_color, DEFAULT_PALETTE};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

pub fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Padding ───────────────────────────────────────────────────────────────────
// Horizontal padding applied to every screen so text never touches the edges.
const H_PAD: u16 = 3;

/// Shrink a rect by H_PAD columns on each side.
pub fn pad_horizontal(area: Rect) -> Rect {
    let pad = H_PAD.min(area.width / 2);
    Rect {
        x: area.x + pad,
        y: area.y,
        width: area.width.saturating_sub(pad * 2),
        height: area.height,
    }
}

// ── Color helpers ─────────────────────────────────────────────────────────────

/// Terminal styles resolved from the surface's current colour variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub border: Color,
    pub background: Color,
}

impl Styles {
    pub fn from_surface(surface: &MemorySurface) -> Self {
        let var = |name: &str| {
            surface
                .color_var(name)
                .or_else(|| DEFAULT_PALETTE.iter().find(|(n, _)| *n == name).map(|(_, v)| *v))
                .and_then(hex_color)
                .unwrap_or(Color::Reset)
        };
        Self {
            primary: var("--primary"),
            secondary: var("--secondary"),
            success: var("--success"),
            warning: var("--warning"),
            danger: var("--danger"),
            border: var("--border"),
            background: var("--darker"),
        }
    }

    pub fn normal(&self) -> Style { Style::default().fg(self.primary) }
    pub fn sel(&self)    -> Style { Style::default().fg(self.background).bg(self.primary).add_modifier(Modifier::BOLD) }
    pub fn title(&self)  -> Style { Style::default().fg(self.primary).add_modifier(Modifier::BOLD) }
    pub fn dim(&self)    -> Style { Style::default().fg(self.border) }
    pub fn accent(&self) -> Style { Style::default().fg(self.secondary) }

    pub fn level(&self, level: NotificationLevel) -> Style {
        let fg = match level {
            NotificationLevel::Info => self.primary,
            NotificationLevel::Success => self.success,
            NotificationLevel::Warning => self.warning,
            NotificationLevel::Error => self.danger,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}

// ── Header ────────────────────────────────────────────────────────────────────

pub fn render_header(f: &mut Frame, area: Rect, styles: &Styles) {
    let inner = pad_horizontal(area);
    let lines: Vec<Line> = HEADER_LINES
        .iter()
        .map(|l| Line::from(Span::styled(*l, styles.title())))
        .collect();
    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, inner);
}

pub fn render_separator(f: &mut Frame, area: Rect, styles: &Styles) {
    let inner = pad_horizontal(area);
    let sep = "=".repeat(inner.width as usize);
    let p = Paragraph::new(sep).alignment(Alignment::Center).style(styles.dim());
    f.render_widget(p, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SettingsRegistry;
    use crate::theme::{apply_theme, ThemeId};

    #[test]
    fn pad_never_exceeds_width() {
        let r = pad_horizontal(Rect::new(0, 0, 4, 1));
        assert_eq!(r.x, 2);
        assert_eq!(r.width, 0);
        let r = pad_horizontal(Rect::new(1, 0, 40, 2));
        assert_eq!((r.x, r.width, r.height), (4, 34, 2));
    }

    #[test]
    fn styles_follow_applied_theme() {
        let mut surface = MemorySurface::for_registry(&SettingsRegistry::cybershield());
        assert_eq!(Styles::from_surface(&surface).primary, Color::Rgb(0x23, 0xC8, 0xFF));

        apply_theme(ThemeId::Matrix, &mut surface);
        let styles = Styles::from_surface(&surface);
        assert_eq!(styles.primary, Color::Rgb(0, 255, 0));
        assert_eq!(styles.background, Color::Rgb(0, 0x11, 0));
    }

    #[test]
    fn empty_surface_falls_back_to_default_palette() {
        let styles = Styles::from_surface(&MemorySurface::new());
        assert_eq!(styles.danger, Color::Rgb(0xFF, 0x52, 0x52));
    }
}
