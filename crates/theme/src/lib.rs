pub mod colors;

pub use colors::Color;

use vibe_config::ThemeConfig;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings. Calling [`Theme::from_config`] is infallible — invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Foreground at half opacity, for secondary text.
    pub dim:        Color,
    pub grid:       Color,
    /// Line colors, one per series, reused cyclically.
    series:         Vec<Color>,
    pub font_size:  f32,
    pub line_width: f32,
    pub padding:    u16,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let mut series: Vec<Color> = cfg
            .series
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
        if series.is_empty() {
            series.push(Color::RED);
        }

        let foreground = Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE);

        Self {
            background: Color::from_hex(&cfg.background).unwrap_or(Color::DARK),
            foreground,
            dim:        foreground.faded(),
            grid:       Color::from_hex(&cfg.grid).unwrap_or(Color::GREY),
            series,
            font_size:  cfg.font_size,
            line_width: cfg.line_width.max(0.5),
            padding:    cfg.padding,
        }
    }

    /// Line color of series `index`.
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
