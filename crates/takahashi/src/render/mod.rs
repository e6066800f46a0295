pub mod image_cache;

use eframe::egui;
use eframe::egui::text::LayoutJob;

use crate::parser::{IMAGE_PLACEHOLDER, Slide, SlideKind};
use crate::player::Frame;
use crate::theme::Theme;

use image_cache::{ImageCache, ImageState};

/// Length of the entrance fade, in seconds.
pub const ENTRANCE_SECS: f32 = 0.4;

/// Slide text never takes more than this share of the slide height.
const MAX_TEXT_HEIGHT: f32 = 0.85;

/// Opacity and upward offset (as a share of the slide height) during the
/// entrance animation.
pub fn entrance(elapsed_secs: f32) -> (f32, f32) {
    let t = (elapsed_secs / ENTRANCE_SECS).clamp(0.0, 1.0);
    let eased = 1.0 - (1.0 - t) * (1.0 - t);
    (eased, (1.0 - eased) * 0.03)
}

/// Font size for a slide: `font_scale` percent of the slide width.
pub fn slide_font_size(width: f32, font_scale: f32) -> f32 {
    width * font_scale / 100.0
}

fn centered_galley(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    size: f32,
    color: egui::Color32,
    wrap_width: f32,
) -> std::sync::Arc<egui::Galley> {
    let mut job = LayoutJob::simple(text.to_string(), theme.font(size), color, wrap_width);
    job.halign = egui::Align::Center;
    ui.painter().layout_job(job)
}

/// Lay out text at `size`, shrinking until it fits inside `area`.
fn fitted_galley(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    mut size: f32,
    color: egui::Color32,
    area: egui::Rect,
) -> std::sync::Arc<egui::Galley> {
    let mut galley = centered_galley(ui, text, theme, size, color, area.width());
    while galley.size().y > area.height() && size > 8.0 {
        size *= 0.9;
        galley = centered_galley(ui, text, theme, size, color, area.width());
    }
    galley
}

fn paint_centered(ui: &egui::Ui, galley: std::sync::Arc<egui::Galley>, center: egui::Pos2) {
    let pos = center - galley.rect.center().to_vec2();
    ui.painter().galley(pos, galley, egui::Color32::PLACEHOLDER);
}

/// Draw one slide filling `rect`.
pub fn render_slide(
    ui: &egui::Ui,
    slide: &Slide,
    font_scale: f32,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    image_cache: &ImageCache,
) {
    let size = slide_font_size(rect.width(), font_scale);
    let text_area = egui::Rect::from_center_size(
        rect.center(),
        egui::vec2(rect.width() * 0.9, rect.height() * MAX_TEXT_HEIGHT),
    );

    let (text, color) = match &slide.kind {
        SlideKind::Image { url, caption } => {
            render_image(ui, url, caption.as_deref(), size, theme, rect, opacity, image_cache);
            return;
        }
        SlideKind::Title { text } => (text, theme.heading_color),
        SlideKind::Emphasis { text } => (text, theme.accent),
        SlideKind::Plain { text } => (text, theme.foreground),
    };

    let color = Theme::with_opacity(color, opacity);
    let galley = fitted_galley(ui, text, theme, size, color, text_area);
    paint_centered(ui, galley, text_area.center());
}

#[allow(clippy::too_many_arguments)]
fn render_image(
    ui: &egui::Ui,
    url: &str,
    caption: Option<&str>,
    size: f32,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    image_cache: &ImageCache,
) {
    let padding = rect.width() * 0.05;
    let inner = rect.shrink(padding);
    let (image_area, caption_area) = match caption {
        Some(_) => {
            let split = inner.top() + inner.height() * 0.75;
            (
                egui::Rect::from_min_max(inner.left_top(), egui::pos2(inner.right(), split)),
                Some(egui::Rect::from_min_max(
                    egui::pos2(inner.left(), split),
                    inner.right_bottom(),
                )),
            )
        }
        None => (inner, None),
    };

    match image_cache.get(ui.ctx(), url) {
        ImageState::Ready(texture) => {
            let draw_rect = contain(texture.size_vec2(), image_area);
            let tint = Theme::with_opacity(egui::Color32::WHITE, opacity);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), draw_rect, uv, tint);
        }
        ImageState::Loading => {}
        ImageState::Failed => draw_image_placeholder(ui, theme, image_area, opacity),
    }

    if let (Some(text), Some(area)) = (caption, caption_area) {
        let color = Theme::with_opacity(theme.foreground, opacity);
        // Captions stay below the image no matter how short they are
        let galley = fitted_galley(ui, text, theme, size.min(area.height() * 0.6), color, area);
        paint_centered(ui, galley, area.center());
    }
}

/// Fit `tex_size` inside `available`, preserving aspect ratio, centered.
fn contain(tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    if tex_size.x <= 0.0 || tex_size.y <= 0.0 {
        return available;
    }
    let scale = (available.width() / tex_size.x).min(available.height() / tex_size.y);
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}

fn draw_image_placeholder(ui: &egui::Ui, theme: &Theme, area: egui::Rect, opacity: f32) {
    let bg = Theme::with_opacity(theme.panel, opacity);
    let color = Theme::with_opacity(theme.muted, opacity);
    let rect = egui::Rect::from_center_size(area.center(), area.size() * 0.6);
    let rounding = rect.height() * 0.04;
    ui.painter().rect_filled(rect, rounding, bg);
    ui.painter().rect_stroke(
        rect,
        rounding,
        egui::Stroke::new(1.0, color),
        egui::StrokeKind::Outside,
    );
    let galley = centered_galley(
        ui,
        IMAGE_PLACEHOLDER,
        theme,
        rect.height() * 0.15,
        color,
        rect.width(),
    );
    paint_centered(ui, galley, rect.center());
}

/// Progress bar, counter, timer, and percentage, each gated by its toggle.
pub fn draw_chrome(ui: &egui::Ui, frame: &Frame<'_>, theme: &Theme, rect: egui::Rect) {
    let scale = (rect.width() / 1920.0).min(rect.height() / 1080.0);
    let painter = ui.painter();
    let text_size = (20.0 * scale).max(11.0);
    let margin = 24.0 * scale;
    let color = theme.muted;

    if frame.toggles.progress {
        let height = (6.0 * scale).max(3.0);
        let track = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - height),
            rect.right_bottom(),
        );
        painter.rect_filled(track, 0.0, Theme::with_opacity(theme.muted, 0.25));
        let mut fill = track;
        fill.set_width(track.width() * frame.progress);
        painter.rect_filled(fill, 0.0, theme.accent);
    }

    let baseline = rect.bottom() - margin - text_size;
    if frame.toggles.counter {
        let galley =
            painter.layout_no_wrap(frame.counter.clone(), egui::FontId::monospace(text_size), color);
        let pos = egui::pos2(rect.right() - galley.rect.width() - margin, baseline);
        painter.galley(pos, galley, color);
    }

    if frame.toggles.percentage {
        let galley = painter.layout_no_wrap(
            frame.percentage.clone(),
            egui::FontId::monospace(text_size),
            color,
        );
        painter.galley(egui::pos2(rect.left() + margin, baseline), galley, color);
    }

    if frame.toggles.timer {
        let galley =
            painter.layout_no_wrap(frame.timer.clone(), egui::FontId::monospace(text_size), color);
        let pos = egui::pos2(rect.right() - galley.rect.width() - margin, rect.top() + margin);
        painter.galley(pos, galley, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_tracks_width() {
        assert_eq!(slide_font_size(1000.0, 20.0), 200.0);
        assert_eq!(slide_font_size(1000.0, 4.0), 40.0);
        assert_eq!(slide_font_size(500.0, 10.0), 50.0);
    }

    #[test]
    fn test_entrance_curve() {
        assert_eq!(entrance(0.0), (0.0, 0.03));
        let (opacity, offset) = entrance(ENTRANCE_SECS);
        assert_eq!(opacity, 1.0);
        assert_eq!(offset, 0.0);
        assert_eq!(entrance(10.0).0, 1.0);
        let (mid, _) = entrance(ENTRANCE_SECS / 2.0);
        assert!(mid > 0.5 && mid < 1.0);
    }

    #[test]
    fn test_contain_preserves_aspect() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 400.0));
        let r = contain(egui::vec2(200.0, 100.0), area);
        assert_eq!(r.size(), egui::vec2(400.0, 200.0));
        assert_eq!(r.center(), area.center());
    }
}
