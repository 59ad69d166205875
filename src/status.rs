use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::surface::Notification;
use crate::ui::Styles;

// ── Status bar ────────────────────────────────────────────────────────────────

/// Clock on the left, the latest live notification on the right.
pub fn render_status_bar(f: &mut Frame, area: Rect, styles: &Styles, note: Option<&Notification>) {
    if area.height == 0 { return; }

    let now = Local::now().format("%A, %d. %B - %I:%M%p").to_string();
    let left = Span::styled(format!(" {now}"), styles.sel());
    let (text, style) = match note {
        Some(n) => (format!("{} ", n.message), styles.level(n.level)),
        None => (String::new(), styles.sel()),
    };

    // Pad center
    let used = now.chars().count() + 1 + text.chars().count();
    let pad = " ".repeat((area.width as usize).saturating_sub(used));

    let line = Line::from(vec![left, Span::styled(pad, styles.sel()), Span::styled(text, style)]);
    f.render_widget(Paragraph::new(line), area);
}
