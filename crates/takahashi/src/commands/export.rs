use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::Colorize;
use eframe::egui;

use crate::config::{Config, Settings};
use crate::parser::{self, Slide};
use crate::player::ExportRequest;
use crate::player::navigator;
use crate::render;
use crate::render::image_cache::{ImageCache, ImageState};
use crate::source::ContentSource;
use crate::theme::Theme;

/// How long a page waits for its image before it is captured anyway.
const IMAGE_WAIT: Duration = Duration::from_secs(10);

pub fn file_name(index: usize) -> String {
    format!("slide-{:02}.png", index + 1)
}

pub fn footer(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

/// Renders every slide of a request to `slide-NN.png`, one per repaint.
///
/// Drive it from `eframe::App::update`; the screenshot for a page arrives on
/// the repaint after it was drawn.
pub struct ExportJob {
    slides: Vec<Slide>,
    presenter: Option<String>,
    theme: Theme,
    image_cache: ImageCache,
    output_dir: PathBuf,
    current: usize,
    page_started: Instant,
    screenshot_requested: bool,
    saved: usize,
}

impl ExportJob {
    pub fn new(request: ExportRequest, base_dir: PathBuf, output_dir: PathBuf) -> anyhow::Result<Self> {
        if request.slides.is_empty() {
            return Err(crate::error::Error::NoSlides.into());
        }
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        Ok(Self {
            theme: Theme::from_settings(&request.settings),
            slides: request.slides,
            presenter: request.presenter,
            image_cache: ImageCache::new(base_dir),
            output_dir,
            current: 0,
            page_started: Instant::now(),
            screenshot_requested: false,
            saved: 0,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn total(&self) -> usize {
        self.slides.len()
    }

    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Draw the current page and collect finished screenshots. Returns true
    /// once every page has been written.
    pub fn update(&mut self, ctx: &egui::Context) -> bool {
        if self.current >= self.slides.len() {
            return true;
        }

        let mut captured = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    captured = Some(image.clone());
                }
            }
        });

        if let Some(image) = captured.filter(|_| self.screenshot_requested) {
            let name = file_name(self.current);
            let path = self.output_dir.join(&name);
            match save_color_image(&image, &path) {
                Ok(()) => {
                    log::info!("Saved {name}");
                    self.saved += 1;
                }
                Err(e) => log::error!("{e:#}"),
            }
            self.screenshot_requested = false;
            self.current += 1;
            self.page_started = Instant::now();
            if self.current >= self.slides.len() {
                return true;
            }
        }

        let bg = self.theme.background;
        let mut ready = true;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                ready = self.draw_page(ui, rect);
            });

        let waited_out = self.page_started.elapsed() >= IMAGE_WAIT;
        if !self.screenshot_requested && (ready || waited_out) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
        false
    }

    /// Returns false while the page's image is still loading.
    fn draw_page(&self, ui: &egui::Ui, rect: egui::Rect) -> bool {
        let slide = &self.slides[self.current];
        let scale = navigator::font_scale(slide.char_len());
        render::render_slide(ui, slide, scale, &self.theme, rect, 1.0, &self.image_cache);

        let size = (rect.height() * 0.025).max(10.0);
        let margin = size;
        let color = self.theme.muted;
        let painter = ui.painter();
        let counter = painter.layout_no_wrap(
            footer(self.current, self.slides.len()),
            egui::FontId::monospace(size),
            color,
        );
        let pos = egui::pos2(
            rect.right() - counter.rect.width() - margin,
            rect.bottom() - counter.rect.height() - margin,
        );
        painter.galley(pos, counter, color);

        if let Some(presenter) = &self.presenter {
            let galley =
                painter.layout_no_wrap(presenter.clone(), self.theme.font(size), color);
            let pos = egui::pos2(rect.left() + margin, rect.bottom() - galley.rect.height() - margin);
            painter.galley(pos, galley, color);
        }

        match slide.image_url() {
            Some(url) => !matches!(self.image_cache.get(ui.ctx(), url), ImageState::Loading),
            None => true,
        }
    }
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> anyhow::Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to save {}", path.display()))
}

struct ExportApp {
    job: ExportJob,
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.job.update(ctx) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

pub fn run(
    source: &dyn ContentSource,
    base_dir: PathBuf,
    output_dir: PathBuf,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let content = source.load()?;
    let presentation = parser::parse_presentation(&content);
    if presentation.slides.is_empty() {
        anyhow::bail!("{} in {}", crate::error::Error::NoSlides, source.name());
    }

    let settings = Settings::resolve(&Config::load_or_default(), &presentation.metadata);
    let request = ExportRequest {
        presenter: presentation.presenter().map(str::to_string),
        slides: presentation.slides,
        settings,
    };
    let job = ExportJob::new(request, base_dir, output_dir)?;

    eprintln!(
        "Exporting {} slides to {} ({}x{})",
        job.total(),
        job.output_dir().display(),
        width,
        height,
    );

    let title = format!("takahashi export: {}", source.name());
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ExportApp { job }))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("{}", "Export complete.".green());
    Ok(())
}
