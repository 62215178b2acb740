//! Theme system for the table widget.
//!
//! Two layers:
//! - `ThemeSettings`: user preferences, read from `[appearance]` in config
//! - `Theme`: computed colors and metrics derived from settings + system appearance

use gpui::{hsla, px, App, Global, Hsla, Pixels, SharedString};

use dnd_table_core::{AppearanceConfig, Stripe, ThemeMode};

// =============================================================================
// Theme Settings (User-Configurable)
// =============================================================================

#[derive(Debug, Clone)]
pub struct ThemeSettings {
    /// Light, dark, or follow system.
    pub appearance: Appearance,
    /// Accent hue (0.0-1.0). Default is blue (210/360).
    pub accent_hue: f32,
    pub font_family: SharedString,
    pub font_size: Pixels,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            appearance: Appearance::System,
            accent_hue: 210.0 / 360.0,
            font_family: "Inter".into(),
            font_size: px(14.0),
        }
    }
}

impl ThemeSettings {
    /// Settings from the `[appearance]` config table. Hue is given in degrees.
    pub fn from_config(config: &AppearanceConfig) -> Self {
        let defaults = Self::default();
        Self {
            appearance: config.theme.into(),
            accent_hue: config
                .accent_hue
                .map(|deg| deg.rem_euclid(360.0) / 360.0)
                .unwrap_or(defaults.accent_hue),
            ..defaults
        }
    }
}

impl Global for ThemeSettings {}

/// Appearance mode preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
    #[default]
    System,
}

impl From<ThemeMode> for Appearance {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Appearance::Light,
            ThemeMode::Dark => Appearance::Dark,
            ThemeMode::System => Appearance::System,
        }
    }
}

// =============================================================================
// Theme (Computed)
// =============================================================================

/// The active theme. Access via `cx.theme()` in render methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub is_dark: bool,

    // -------------------------------------------------------------------------
    // Background Colors
    // -------------------------------------------------------------------------
    pub background: Hsla,
    /// Header row background.
    pub header: Hsla,
    /// Background of rows striped odd (the first, third, ...).
    pub row_odd: Hsla,
    pub row_even: Hsla,
    /// Background behind an expanded inner group.
    pub inner_background: Hsla,

    // -------------------------------------------------------------------------
    // Text Colors
    // -------------------------------------------------------------------------
    pub text: Hsla,
    pub text_muted: Hsla,

    // -------------------------------------------------------------------------
    // Drag Feedback
    // -------------------------------------------------------------------------
    /// Drop edge highlight.
    pub accent: Hsla,
    /// Opacity of the floating shadow row.
    pub shadow_opacity: f32,

    pub border: Hsla,

    // -------------------------------------------------------------------------
    // Typography
    // -------------------------------------------------------------------------
    pub font_family: SharedString,
    pub font_size: Pixels,
    pub font_size_small: Pixels,

    // -------------------------------------------------------------------------
    // Metrics
    // -------------------------------------------------------------------------
    pub row_height: Pixels,
    pub header_height: Pixels,
    pub icon_size: Pixels,
    /// Thickness of the drop edge highlight.
    pub highlight_width: Pixels,
}

impl Theme {
    /// Create a theme from settings and system appearance.
    pub fn from_settings(settings: &ThemeSettings, system_is_dark: bool) -> Self {
        let is_dark = match settings.appearance {
            Appearance::Dark => true,
            Appearance::Light => false,
            Appearance::System => system_is_dark,
        };

        let palette = if is_dark {
            Palette::dark(settings.accent_hue)
        } else {
            Palette::light(settings.accent_hue)
        };

        let base_size: f32 = settings.font_size.into();

        Self {
            is_dark,

            background: palette.bg_base,
            header: palette.bg_header,
            row_odd: palette.bg_stripe,
            row_even: palette.bg_base,
            inner_background: palette.bg_inner,

            text: palette.fg_primary,
            text_muted: palette.fg_secondary,

            accent: palette.accent,
            shadow_opacity: if is_dark { 0.45 } else { 0.35 },

            border: palette.border,

            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
            font_size_small: px(base_size - 2.0),

            row_height: px(36.0),
            header_height: px(32.0),
            icon_size: px(16.0),
            highlight_width: px(2.0),
        }
    }

    pub fn dark() -> Self {
        Self::from_settings(&ThemeSettings::default(), true)
    }

    pub fn light() -> Self {
        Self::from_settings(&ThemeSettings::default(), false)
    }

    /// Row background for a stripe.
    pub fn stripe(&self, stripe: Stripe) -> Hsla {
        match stripe {
            Stripe::Odd => self.row_odd,
            Stripe::Even => self.row_even,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Global for Theme {}

// =============================================================================
// Palette (Internal)
// =============================================================================

struct Palette {
    bg_base: Hsla,
    bg_header: Hsla,
    bg_stripe: Hsla,
    bg_inner: Hsla,
    fg_primary: Hsla,
    fg_secondary: Hsla,
    accent: Hsla,
    border: Hsla,
}

impl Palette {
    fn dark(accent_hue: f32) -> Self {
        Self {
            bg_base: hsla(0.0, 0.0, 0.12, 1.0),
            bg_header: hsla(0.0, 0.0, 0.18, 1.0),
            bg_stripe: hsla(0.0, 0.0, 0.16, 1.0),
            bg_inner: hsla(0.0, 0.0, 0.09, 1.0),
            fg_primary: hsla(0.0, 0.0, 0.95, 0.90),
            fg_secondary: hsla(0.0, 0.0, 0.60, 0.90),
            accent: hsla(accent_hue, 0.80, 0.60, 1.0),
            border: hsla(0.0, 0.0, 1.0, 0.12),
        }
    }

    fn light(accent_hue: f32) -> Self {
        Self {
            bg_base: hsla(0.0, 0.0, 1.0, 1.0),
            bg_header: hsla(0.0, 0.0, 0.92, 1.0),
            bg_stripe: hsla(0.0, 0.0, 0.96, 1.0),
            bg_inner: hsla(0.0, 0.0, 0.98, 1.0),
            fg_primary: hsla(0.0, 0.0, 0.10, 1.0),
            fg_secondary: hsla(0.0, 0.0, 0.45, 1.0),
            accent: hsla(accent_hue, 0.80, 0.50, 1.0),
            border: hsla(0.0, 0.0, 0.0, 0.12),
        }
    }
}

// =============================================================================
// Theme Extensions
// =============================================================================

/// Extension trait for convenient theme access.
pub trait ThemeExt {
    fn theme(&self) -> &Theme;
}

impl ThemeExt for App {
    fn theme(&self) -> &Theme {
        self.global::<Theme>()
    }
}

// =============================================================================
// Tests
// =============================================================================
