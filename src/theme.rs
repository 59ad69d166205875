use ratatui::style::Color;

use crate::surface::ThemeSink;

// ── Theme ids ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeId {
    Default,
    Midnight,
    Matrix,
    Crimson,
}

impl ThemeId {
    pub const ALL: [ThemeId; 4] = [
        ThemeId::Default,
        ThemeId::Midnight,
        ThemeId::Matrix,
        ThemeId::Crimson,
    ];

    /// Control id of the theme's option, as stored under the `theme` key.
    pub fn id(self) -> &'static str {
        match self {
            ThemeId::Default => "theme-default",
            ThemeId::Midnight => "theme-midnight",
            ThemeId::Matrix => "theme-matrix",
            ThemeId::Crimson => "theme-crimson",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeId::Default => "Cyber Blue",
            ThemeId::Midnight => "Midnight",
            ThemeId::Matrix => "Matrix",
            ThemeId::Crimson => "Crimson",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    fn overrides(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ThemeId::Default => &[],
            ThemeId::Midnight => &[
                ("--primary", "#7B42F6"),
                ("--primary-dark", "#6535D4"),
                ("--dark", "#0D1324"),
                ("--darker", "#030B16"),
                ("--light-dark", "#162039"),
                ("--border", "#253354"),
                ("--tertiary", "#FF3C7A"),
            ],
            ThemeId::Matrix => &[
                ("--primary", "#00FF00"),
                ("--primary-dark", "#00CC00"),
                ("--dark", "#001800"),
                ("--darker", "#001100"),
                ("--light-dark", "#002200"),
                ("--border", "#003300"),
                ("--success", "#00FFAA"),
                ("--secondary", "#AAFF00"),
                ("--tertiary", "#00FFFF"),
            ],
            ThemeId::Crimson => &[
                ("--primary", "#FF5252"),
                ("--primary-dark", "#D43535"),
                ("--dark", "#1A0D0D"),
                ("--darker", "#1A0505"),
                ("--light-dark", "#2B1616"),
                ("--border", "#3B2121"),
                ("--tertiary", "#FF9C3C"),
                ("--secondary", "#FF3C7A"),
            ],
        }
    }
}

pub const DEFAULT_PALETTE: [(&str, &str); 11] = [
    ("--primary", "#23C8FF"),
    ("--primary-dark", "#15A1D9"),
    ("--secondary", "#FFB629"),
    ("--tertiary", "#FF4081"),
    ("--success", "#1CEFAF"),
    ("--warning", "#F5C346"),
    ("--danger", "#FF5252"),
    ("--dark", "#111A2C"),
    ("--darker", "#0A0E1A"),
    ("--light-dark", "#1E293B"),
    ("--border", "#2B3A55"),
];

/// Resets every colour variable to the default palette, then applies the
/// theme's overrides.
pub fn apply_theme(theme: ThemeId, sink: &mut impl ThemeSink) {
    for (name, value) in DEFAULT_PALETTE {
        sink.set_color_var(name, value);
    }
    for &(name, value) in theme.overrides() {
        sink.set_color_var(name, value);
    }
}

// ── Terminal colours ──────────────────────────────────────────────────────────

/// `#RRGGBB` to a terminal colour.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let n = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((n >> 16) as u8, (n >> 8) as u8, n as u8))
}
