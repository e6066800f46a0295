use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::commands::export::ExportJob;
use crate::config::{Config, Settings};
use crate::parser::{self, Slide};
use crate::player::input::KeyInput;
use crate::player::{Command, Effect, ExportRequest, PlaybackController};
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::source::{ContentSource, FileWatch};
use crate::theme::Theme;

const SHORTCUTS: &[(&str, &str)] = &[
    ("\u{2192} / \u{2193} / Space / PgDn", "Next slide"),
    ("\u{2190} / \u{2191} / PgUp", "Previous slide"),
    ("Home / End", "First / last slide"),
    ("Click left / right third", "Previous / next slide"),
    ("F", "Toggle fullscreen"),
    ("P", "Toggle progress bar"),
    ("C", "Toggle slide counter"),
    ("T", "Toggle timer"),
    ("%", "Toggle percentage"),
    ("H", "Toggle all chrome"),
    ("R", "Reset timer"),
    ("O", "Slide overview"),
    ("A", "Toggle animations"),
    ("E", "Export slides as PNG"),
    ("?", "Toggle this help"),
    ("Esc", "Exit"),
];

/// How the window starts out.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub windowed: bool,
    /// 1-based.
    pub slide: Option<usize>,
    pub overview: bool,
    /// Overrides both the stored default and the deck.
    pub animations: Option<bool>,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    const DURATION: f32 = 2.5;
    const FADE_START: f32 = 2.0;

    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < Self::FADE_START {
            1.0
        } else {
            (1.0 - (elapsed - Self::FADE_START) / (Self::DURATION - Self::FADE_START)).max(0.0)
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= Self::DURATION
    }
}

struct PresenterApp {
    controller: PlaybackController,
    source: Box<dyn ContentSource>,
    watch: Option<FileWatch>,
    base_dir: PathBuf,
    theme: Theme,
    image_cache: ImageCache,
    export: Option<ExportJob>,
    toast: Option<Toast>,
    /// Epoch of the slide whose entrance is playing, and when it started.
    entrance: (u64, Instant),
}

fn key_input(key: egui::Key) -> Option<KeyInput> {
    use egui::Key;
    let input = match key {
        Key::ArrowRight => KeyInput::ArrowRight,
        Key::ArrowDown => KeyInput::ArrowDown,
        Key::ArrowLeft => KeyInput::ArrowLeft,
        Key::ArrowUp => KeyInput::ArrowUp,
        Key::Space => KeyInput::Space,
        Key::PageDown => KeyInput::PageDown,
        Key::PageUp => KeyInput::PageUp,
        Key::Home => KeyInput::Home,
        Key::End => KeyInput::End,
        Key::Escape => KeyInput::Escape,
        Key::F => KeyInput::Char('f'),
        Key::P => KeyInput::Char('p'),
        Key::C => KeyInput::Char('c'),
        Key::T => KeyInput::Char('t'),
        Key::H => KeyInput::Char('h'),
        Key::R => KeyInput::Char('r'),
        Key::O => KeyInput::Char('o'),
        Key::A => KeyInput::Char('a'),
        Key::E => KeyInput::Char('e'),
        _ => return None,
    };
    Some(input)
}

/// `%` and `?` depend on the keyboard layout, so they come from text events.
fn text_input(text: &str) -> Vec<KeyInput> {
    text.chars()
        .filter_map(|c| match c {
            '%' => Some(KeyInput::Percent),
            '?' => Some(KeyInput::Question),
            _ => None,
        })
        .collect()
}

impl PresenterApp {
    fn new(
        controller: PlaybackController,
        source: Box<dyn ContentSource>,
        watch: Option<FileWatch>,
        base_dir: PathBuf,
    ) -> Self {
        let theme = Theme::from_settings(controller.settings());
        let image_cache = ImageCache::new(base_dir.clone());
        let epoch = controller.frame(Instant::now()).animation_epoch;
        Self {
            controller,
            source,
            watch,
            base_dir,
            theme,
            image_cache,
            export: None,
            toast: None,
            entrance: (epoch, Instant::now()),
        }
    }

    fn poll_reload(&mut self) {
        let changed = self.watch.as_ref().is_some_and(FileWatch::changed);
        if !changed {
            return;
        }
        match self.source.load() {
            Ok(content) => self.reload(&content),
            Err(e) => log::warn!("Reload failed: {e}"),
        }
    }

    fn reload(&mut self, content: &str) {
        if !self.controller.reload(content) {
            return;
        }
        self.theme = Theme::from_settings(self.controller.settings());
        log::debug!("Theme after reload: {}", self.theme.name);
        self.toast = Some(Toast::new("Reloaded"));
    }

    fn collect_keys(ctx: &egui::Context) -> Vec<KeyInput> {
        ctx.input(|i| {
            let mut keys = Vec::new();
            for event in &i.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } if !modifiers.command && !modifiers.alt => {
                        keys.extend(key_input(*key));
                    }
                    egui::Event::Text(text) => keys.extend(text_input(text)),
                    _ => {}
                }
            }
            keys
        })
    }

    fn apply(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Effect::Fullscreen(on) => ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(on)),
            Effect::Export(request) => self.start_export(request),
        }
    }

    fn start_export(&mut self, request: ExportRequest) {
        if self.export.is_some() {
            return;
        }
        let stem = self
            .source
            .name()
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or_else(|| self.source.name());
        let output_dir = self.base_dir.join(format!("{stem}-export"));
        match ExportJob::new(request, self.base_dir.clone(), output_dir) {
            Ok(job) => {
                log::info!(
                    "Exporting {} slides to {}",
                    job.total(),
                    job.output_dir().display()
                );
                self.export = Some(job);
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.toast = Some(Toast::new(format!("Export failed: {e}")));
            }
        }
    }

    fn finish_export(&mut self) {
        if let Some(job) = self.export.take() {
            let message = format!(
                "Exported {} of {} slides to {}",
                job.saved(),
                job.total(),
                job.output_dir().display()
            );
            log::info!("{message}");
            self.toast = Some(Toast::new(message));
        }
    }

    /// Opacity and vertical offset for the current slide's entrance.
    fn entrance(&mut self, epoch: u64, enabled: bool, now: Instant) -> (f32, f32) {
        if epoch != self.entrance.0 {
            self.entrance = (epoch, now);
        }
        if !enabled {
            return (1.0, 0.0);
        }
        render::entrance(now.duration_since(self.entrance.1).as_secs_f32())
    }

    fn draw_help(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::Window::new("Keyboard shortcuts")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("shortcuts")
                    .num_columns(2)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        for (keys, action) in SHORTCUTS {
                            ui.label(egui::RichText::new(*keys).monospace().color(self.theme.accent));
                            ui.label(*action);
                            ui.end_row();
                        }
                    });
                ui.separator();
                if ui.button("Close").clicked() {
                    commands.push(Command::CloseHelp);
                }
            });
    }

    fn draw_overview(&self, ctx: &egui::Context, screen: egui::Rect, commands: &mut Vec<Command>) {
        egui::Window::new("Overview")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size(screen.size() * 0.8)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(screen.height() * 0.7)
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            let slides = self.controller.slides();
                            for entry in self.controller.overview() {
                                let text = format!("{}\n{}", entry.number, entry.preview);
                                let mut label = egui::RichText::new(text);
                                match slides.get(entry.number - 1) {
                                    Some(slide) if slide.is_title() => label = label.strong(),
                                    Some(slide) if slide.is_emphasis() => {
                                        label = label.color(self.theme.accent)
                                    }
                                    Some(slide) if slide.is_image() => label = label.italics(),
                                    _ => {}
                                }
                                let button = egui::Button::new(label)
                                    .min_size(egui::vec2(180.0, 100.0))
                                    .selected(entry.active);
                                if ui.add(button).clicked() {
                                    commands.push(Command::SelectSlide(entry.number - 1));
                                }
                            }
                        });
                    });
                ui.separator();
                if ui.button("Close").clicked() {
                    commands.push(Command::CloseOverview);
                }
            });
    }

    fn draw_exit_confirm(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::Window::new("Exit presentation?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let position = self.controller.position();
                if position.is_last {
                    ui.label("That was the last slide. Leave the presentation?");
                } else {
                    ui.label(format!(
                        "You are on slide {} of {}. Leave the presentation?",
                        position.current, position.total
                    ));
                }
                ui.horizontal(|ui| {
                    if ui.button("Exit").clicked() {
                        commands.push(Command::ConfirmExit);
                    }
                    if ui.button("Cancel").clicked() {
                        commands.push(Command::CancelExit);
                    }
                });
            });
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(toast) = &self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let scale = (rect.width() / 1920.0).min(rect.height() / 1080.0);
        let color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let bg = Theme::with_opacity(self.theme.panel, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional((20.0 * scale).max(12.0)),
            color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_center_size(
            egui::pos2(rect.center().x, rect.bottom() - 100.0 * scale),
            galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, bg);
        ui.painter().galley(
            toast_rect.left_top() + egui::vec2(padding, padding),
            galley,
            color,
        );
    }
}

impl eframe::App for PresenterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(job) = self.export.as_mut() {
            if job.update(ctx) {
                self.finish_export();
                ctx.request_repaint();
            }
            return;
        }

        self.poll_reload();

        let now = Instant::now();
        for key in Self::collect_keys(ctx) {
            let effect = self.controller.handle_key(key, now);
            self.apply(ctx, effect);
        }

        let (epoch, animated) = {
            let frame = self.controller.frame(now);
            (frame.animation_epoch, frame.animations_enabled)
        };
        let (opacity, offset) = self.entrance(epoch, animated, now);

        let bg = self.theme.background;
        let mut tap = None;
        let mut screen = egui::Rect::ZERO;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                screen = rect;
                ui.painter().rect_filled(rect, 0.0, bg);

                // Overlay windows sit above this layer and take their own clicks
                let response = ui.interact(rect, ui.id().with("slide"), egui::Sense::click());
                if response.clicked() {
                    tap = response
                        .interact_pointer_pos()
                        .map(|pos| (pos.x - rect.left(), rect.width()));
                }

                let frame = self.controller.frame(now);
                let slide_rect = rect.translate(egui::vec2(0.0, offset * rect.height()));
                render::render_slide(
                    ui,
                    frame.slide,
                    frame.font_scale,
                    &self.theme,
                    slide_rect,
                    opacity,
                    &self.image_cache,
                );
                render::draw_chrome(ui, &frame, &self.theme, rect);
                self.draw_toast(ui, rect);

                if opacity < 1.0 {
                    ctx.request_repaint();
                }
            });

        if let Some((x, width)) = tap {
            let effect = self.controller.handle_tap(x, width, false, now);
            self.apply(ctx, effect);
        }

        let mut commands = Vec::new();
        let surfaces = self.controller.surfaces();
        if surfaces.help {
            self.draw_help(ctx, &mut commands);
        }
        if surfaces.overview {
            self.draw_overview(ctx, screen, &mut commands);
        }
        if surfaces.exit_confirm {
            self.draw_exit_confirm(ctx, &mut commands);
        }
        for command in commands {
            let effect = self.controller.dispatch(command, Instant::now());
            self.apply(ctx, effect);
        }

        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        } else if self.toast.is_some() {
            ctx.request_repaint();
        }

        // Timer ticks once a second
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}

/// Title from the deck's `title` metadata, else the source name.
fn window_title(content: &str, source: &dyn ContentSource) -> String {
    parser::get_metadata(content)
        .get("title")
        .filter(|t| !t.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("takahashi: {}", source.name()))
}

pub fn run(
    source: Box<dyn ContentSource>,
    base_dir: PathBuf,
    watch: Option<FileWatch>,
    launch: LaunchOptions,
) -> anyhow::Result<()> {
    let content = source.load()?;
    let presentation = parser::parse_presentation(&content);
    for warning in &presentation.warnings {
        log::warn!("{warning}");
    }

    // Deck metadata is layered on by the controller, and again on every reload
    let mut settings = Settings::from_config(&Config::load_or_default());
    if let Some(animations) = launch.animations {
        settings.animations = animations;
    }

    let title = window_title(&content, source.as_ref());
    let now = Instant::now();
    let mut controller =
        PlaybackController::load(presentation, settings, !launch.windowed, now)
            .map_err(|e| anyhow::anyhow!("{e} in {}", source.name()))?;

    if let Some(slide) = launch.slide {
        let last = controller.position().total;
        controller.dispatch(Command::SelectSlide(slide.clamp(1, last) - 1), now);
    }
    if launch.overview {
        controller.dispatch(Command::ToggleOverview, now);
    }

    let viewport = if launch.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let app = PresenterApp::new(controller, source, watch, base_dir);
            app.image_cache.prefetch(
                &cc.egui_ctx,
                app.controller.slides().iter().filter_map(Slide::image_url),
            );
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::input::command_for_key;
    use crate::source::BundledSource;

    #[test]
    fn test_bound_egui_keys_reach_commands() {
        for key in [
            egui::Key::ArrowRight,
            egui::Key::Space,
            egui::Key::Home,
            egui::Key::Escape,
            egui::Key::F,
            egui::Key::E,
        ] {
            let input = key_input(key).unwrap();
            assert!(command_for_key(input).is_some(), "{key:?}");
        }
        assert_eq!(key_input(egui::Key::Z), None);
    }

    #[test]
    fn test_symbols_come_from_text() {
        assert_eq!(text_input("%"), vec![KeyInput::Percent]);
        assert_eq!(text_input("a?b"), vec![KeyInput::Question]);
        assert!(text_input(" ").is_empty());
    }

    #[test]
    fn test_window_title() {
        let source = BundledSource::new("getting-started");
        assert_eq!(
            window_title("---\ntitle: Hello\n---\nx", &source),
            "Hello"
        );
        assert_eq!(window_title("x", &source), "takahashi: getting-started");
    }

    #[test]
    fn test_reload_rebuilds_theme() {
        let pres = parser::parse_presentation("---\ntheme: dark\n---\na");
        let controller =
            PlaybackController::load(pres, Settings::default(), false, Instant::now()).unwrap();
        let source = Box::new(BundledSource::new("getting-started"));
        let mut app = PresenterApp::new(controller, source, None, PathBuf::from("."));
        assert_eq!(app.theme.name, "dark");

        app.reload("---\ntheme: light\nfont: monospace\n---\na");
        assert_eq!(app.theme.name, "light");
        assert_eq!(app.theme.background, Theme::light().background);
        assert_eq!(app.theme.family, egui::FontFamily::Monospace);
        assert!(app.toast.is_some());

        app.toast = None;
        app.reload("   ");
        assert_eq!(app.theme.name, "light");
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_toast_fades_out() {
        let mut toast = Toast::new("hi");
        assert_eq!(toast.opacity(), 1.0);
        assert!(!toast.is_expired());
        toast.start -= Duration::from_secs(3);
        assert_eq!(toast.opacity(), 0.0);
        assert!(toast.is_expired());
    }
}
