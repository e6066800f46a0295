use eframe::egui::{Color32, FontFamily, FontId};

use crate::config::Settings;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Chrome text and the progress track.
    pub muted: Color32,
    pub panel: Color32,
    pub family: FontFamily,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xE8, 0xE8, 0xE8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0xFF, 0xC1, 0x07),
            muted: Color32::from_rgb(0x80, 0x80, 0x80),
            panel: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            family: FontFamily::Proportional,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0xD3, 0x2F, 0x2F),
            muted: Color32::from_rgb(0x88, 0x88, 0x88),
            panel: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            family: FontFamily::Proportional,
        }
    }

    /// Unknown names fall back to dark, the default theme.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            family: font_family(&settings.font),
            ..Self::from_name(&settings.theme)
        }
    }

    pub fn font(&self, size: f32) -> FontId {
        FontId::new(size, self.family.clone())
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}

/// egui ships no serif face, so serif shares the proportional family.
pub fn font_family(font: &str) -> FontFamily {
    match font {
        "monospace" => FontFamily::Monospace,
        _ => FontFamily::Proportional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_is_dark() {
        assert_eq!(Theme::from_name("neon").name, "dark");
        assert_eq!(Theme::from_name("light").name, "light");
    }

    #[test]
    fn test_settings_pick_family() {
        let settings = Settings {
            theme: "light".to_string(),
            font: "monospace".to_string(),
            animations: false,
        };
        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.name, "light");
        assert_eq!(theme.family, FontFamily::Monospace);
        assert_eq!(font_family("serif"), FontFamily::Proportional);
    }

    #[test]
    fn test_with_opacity_clamps() {
        assert_eq!(Theme::with_opacity(Color32::WHITE, 2.0).a(), 255);
        assert_eq!(Theme::with_opacity(Color32::WHITE, -1.0).a(), 0);
    }
}
