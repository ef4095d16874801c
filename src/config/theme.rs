//! Overlay theme options
//!
//! Every visual knob of the overlay card is an optional setting with an
//! explicit default, exported as CSS custom properties the page template
//! consumes.

use super::{as_f64, as_i64};

/// Recognized theme settings with their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTheme {
    pub font_family: String,
    pub text_color: String,
    pub muted_opacity: f64,

    pub card_bg: String,
    pub card_radius_px: i64,
    pub card_shadow: String,
    pub card_min_width_px: i64,
    pub card_gap_px: i64,
    pub card_padding_y_px: i64,
    pub card_padding_x_px: i64,

    pub cover_size_px: i64,
    pub cover_radius_px: i64,

    pub title_size_px: i64,
    pub artist_size_px: i64,
    pub time_size_px: i64,

    pub progress_track_bg: String,
    pub progress_height_px: i64,
    pub accent_start: String,
    pub accent_end: String,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            font_family: r#""Segoe UI", sans-serif"#.to_string(),
            text_color: "#f4f4f5".to_string(),
            muted_opacity: 0.8,

            card_bg: "rgba(10, 10, 10, 0.75)".to_string(),
            card_radius_px: 14,
            card_shadow: "0 8px 24px rgba(0, 0, 0, 0.45)".to_string(),
            card_min_width_px: 320,
            card_gap_px: 16,
            card_padding_y_px: 16,
            card_padding_x_px: 20,

            cover_size_px: 96,
            cover_radius_px: 12,

            title_size_px: 18,
            artist_size_px: 14,
            time_size_px: 12,

            progress_track_bg: "rgba(255, 255, 255, 0.2)".to_string(),
            progress_height_px: 6,
            accent_start: "#60a5fa".to_string(),
            accent_end: "#34d399".to_string(),
        }
    }
}

impl OverlayTheme {
    /// Build a theme from a settings lookup, falling back per field.
    pub(super) fn resolve(pick: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            font_family: css_value(pick("OVERLAY_THEME_FONT_FAMILY"), defaults.font_family),
            text_color: css_value(pick("OVERLAY_THEME_TEXT_COLOR"), defaults.text_color),
            muted_opacity: as_f64(pick("OVERLAY_THEME_MUTED_OPACITY"), defaults.muted_opacity),
            card_bg: css_value(pick("OVERLAY_THEME_CARD_BG"), defaults.card_bg),
            card_radius_px: as_i64(pick("OVERLAY_THEME_CARD_RADIUS_PX"), defaults.card_radius_px),
            card_shadow: css_value(pick("OVERLAY_THEME_CARD_SHADOW"), defaults.card_shadow),
            card_min_width_px: as_i64(
                pick("OVERLAY_THEME_CARD_MIN_WIDTH_PX"),
                defaults.card_min_width_px,
            ),
            card_gap_px: as_i64(pick("OVERLAY_THEME_CARD_GAP_PX"), defaults.card_gap_px),
            card_padding_y_px: as_i64(
                pick("OVERLAY_THEME_CARD_PADDING_Y_PX"),
                defaults.card_padding_y_px,
            ),
            card_padding_x_px: as_i64(
                pick("OVERLAY_THEME_CARD_PADDING_X_PX"),
                defaults.card_padding_x_px,
            ),
            cover_size_px: as_i64(pick("OVERLAY_THEME_COVER_SIZE_PX"), defaults.cover_size_px),
            cover_radius_px: as_i64(
                pick("OVERLAY_THEME_COVER_RADIUS_PX"),
                defaults.cover_radius_px,
            ),
            title_size_px: as_i64(pick("OVERLAY_THEME_TITLE_SIZE_PX"), defaults.title_size_px),
            artist_size_px: as_i64(pick("OVERLAY_THEME_ARTIST_SIZE_PX"), defaults.artist_size_px),
            time_size_px: as_i64(pick("OVERLAY_THEME_TIME_SIZE_PX"), defaults.time_size_px),
            progress_track_bg: css_value(
                pick("OVERLAY_THEME_PROGRESS_TRACK_BG"),
                defaults.progress_track_bg,
            ),
            progress_height_px: as_i64(
                pick("OVERLAY_THEME_PROGRESS_HEIGHT_PX"),
                defaults.progress_height_px,
            ),
            accent_start: css_value(pick("OVERLAY_THEME_ACCENT_START"), defaults.accent_start),
            accent_end: css_value(pick("OVERLAY_THEME_ACCENT_END"), defaults.accent_end),
        }
    }

    /// CSS custom properties consumed by the page template.
    ///
    /// Keep the names stable; the template's stylesheet depends on them.
    pub fn to_css_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--overlay-font-family", self.font_family.clone()),
            ("--overlay-text-color", self.text_color.clone()),
            ("--overlay-muted-opacity", self.muted_opacity.to_string()),
            ("--overlay-card-bg", self.card_bg.clone()),
            ("--overlay-card-radius", format!("{}px", self.card_radius_px)),
            ("--overlay-card-shadow", self.card_shadow.clone()),
            (
                "--overlay-card-min-width",
                format!("{}px", self.card_min_width_px),
            ),
            ("--overlay-card-gap", format!("{}px", self.card_gap_px)),
            (
                "--overlay-card-padding-y",
                format!("{}px", self.card_padding_y_px),
            ),
            (
                "--overlay-card-padding-x",
                format!("{}px", self.card_padding_x_px),
            ),
            ("--overlay-cover-size", format!("{}px", self.cover_size_px)),
            (
                "--overlay-cover-radius",
                format!("{}px", self.cover_radius_px),
            ),
            ("--overlay-title-size", format!("{}px", self.title_size_px)),
            ("--overlay-artist-size", format!("{}px", self.artist_size_px)),
            ("--overlay-time-size", format!("{}px", self.time_size_px)),
            (
                "--overlay-progress-track-bg",
                self.progress_track_bg.clone(),
            ),
            (
                "--overlay-progress-height",
                format!("{}px", self.progress_height_px),
            ),
            ("--overlay-accent-start", self.accent_start.clone()),
            ("--overlay-accent-end", self.accent_end.clone()),
        ]
    }
}

/// Best-effort sanitation for values embedded into a `<style>` tag.
///
/// Strips newlines and control whitespace so a value cannot break out of the
/// stylesheet, while leaving normal CSS tokens (rgba(...), #hex, font lists)
/// alone.
fn css_value(raw: Option<String>, default: String) -> String {
    match raw {
        Some(value) => {
            let cleaned = value.replace(['\r', '\n'], " ").trim().to_string();
            if cleaned.is_empty() { default } else { cleaned }
        }
        None => default,
    }
}
