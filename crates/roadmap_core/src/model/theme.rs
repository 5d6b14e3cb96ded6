//! Display theme catalogue.

/// One selectable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub preview_color: &'static str,
}

impl Theme {
    const fn new(id: &'static str, preview_color: &'static str) -> Self {
        Self { id, preview_color }
    }
}

pub const THEMES: &[Theme] = &[
    Theme::new("theme-warm", "#f5e8c7"),
    Theme::new("theme-calm-dark", "#2d2d2d"),
    Theme::new("theme-ocean", "#e0f7fa"),
    Theme::new("theme-ocean-dark", "#006064"),
    Theme::new("theme-forest", "#e8f5e9"),
    Theme::new("theme-forest-dark", "#1b5e20"),
    Theme::new("theme-vibrant", "#fff3e0"),
    Theme::new("theme-vibrant-dark", "#333"),
    Theme::new("theme-sunset", "#fbe9e7"),
    Theme::new("theme-sunset-dark", "#e65100"),
    Theme::new("theme-lava", "#ffebee"),
    Theme::new("theme-lava-dark", "#d32f2f"),
];

/// Index into `THEMES` used when nothing valid is stored.
pub const DEFAULT_THEME_INDEX: usize = 0;

/// Finds a theme by identifier.
pub fn theme_index(id: &str) -> Option<usize> {
    THEMES.iter().position(|theme| theme.id == id)
}

/// Theme at `index`, wrapping around the catalogue.
pub fn theme_at(index: usize) -> Theme {
    THEMES[index % THEMES.len()]
}
