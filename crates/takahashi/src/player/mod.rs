pub mod input;
pub mod navigator;
pub mod overview;
pub mod timer;
pub mod toggles;

use std::time::Instant;

use crate::config::Settings;
use crate::error::Result;
use crate::parser::{self, Metadata, Presentation, Slide};

use input::KeyInput;
use navigator::{Navigator, Position};
use overview::OverviewEntry;
use timer::PresentationTimer;
use toggles::DisplayToggles;

/// One logical user action. Every input source maps onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    /// Ask for confirmation before leaving.
    Exit,
    ToggleFullscreen,
    ToggleProgress,
    ToggleCounter,
    ToggleTimer,
    TogglePercentage,
    ToggleAll,
    ResetTimer,
    ToggleHelp,
    ToggleOverview,
    ToggleAnimations,
    Export,
    CloseHelp,
    CloseOverview,
    /// Pick a slide (0-based) from the overview grid.
    SelectSlide(usize),
    ConfirmExit,
    CancelExit,
}

/// What the window layer has to do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fullscreen(bool),
    Export(ExportRequest),
    Quit,
}

/// Everything an exporter needs: the full parsed deck and a settings snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub slides: Vec<Slide>,
    pub settings: Settings,
    pub presenter: Option<String>,
}

/// Overlays that sit on top of the slide and take over Escape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Surfaces {
    pub help: bool,
    pub overview: bool,
    pub exit_confirm: bool,
}

impl Surfaces {
    pub fn any_open(&self) -> bool {
        self.help || self.overview || self.exit_confirm
    }
}

/// Everything the renderer needs to draw one repaint.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub slide: &'a Slide,
    /// `current / total`, in `0.0..=1.0`.
    pub progress: f32,
    pub counter: String,
    pub percentage: String,
    pub timer: String,
    pub toggles: DisplayToggles,
    pub font_scale: f32,
    pub animation_epoch: u64,
    pub animations_enabled: bool,
}

/// One presentation session: navigation, timer, chrome toggles, and overlays.
pub struct PlaybackController {
    navigator: Navigator,
    metadata: Metadata,
    /// Settings before deck metadata; reloads re-apply metadata on top.
    base: Settings,
    settings: Settings,
    toggles: DisplayToggles,
    timer: PresentationTimer,
    surfaces: Surfaces,
    overview: Vec<OverviewEntry>,
    fullscreen: bool,
}

impl PlaybackController {
    /// `base` is the stored config plus any launch overrides; the deck's
    /// `theme`/`font` metadata is layered on here.
    pub fn load(
        presentation: Presentation,
        base: Settings,
        fullscreen: bool,
        now: Instant,
    ) -> Result<Self> {
        let settings = base.clone().with_metadata(&presentation.metadata);
        let navigator = Navigator::new(presentation.slides, settings.animations)?;
        log::debug!(
            "Loaded {} slides (theme={}, font={})",
            navigator.len(),
            settings.theme,
            settings.font
        );
        Ok(Self {
            navigator,
            metadata: presentation.metadata,
            base,
            settings,
            toggles: DisplayToggles::default(),
            timer: PresentationTimer::start(now),
            surfaces: Surfaces::default(),
            overview: Vec::new(),
            fullscreen,
        })
    }

    /// Re-parse edited text. Keeps the position (clamped), timer, toggles, and
    /// the animation setting; `theme`/`font` follow the new metadata.
    /// Text without slides is ignored so a half-typed file never blanks the show.
    pub fn reload(&mut self, content: &str) -> bool {
        let presentation = parser::parse_presentation(content);
        let index = self.navigator.index();
        let navigator = match self.navigator.reloaded(presentation.slides, index) {
            Ok(nav) => nav,
            Err(e) => {
                log::warn!("Reload skipped: {e}");
                return false;
            }
        };

        self.navigator = navigator;
        self.settings = Settings {
            animations: self.settings.animations,
            ..self.base.clone().with_metadata(&presentation.metadata)
        };
        self.metadata = presentation.metadata;
        if self.surfaces.overview {
            self.rebuild_overview();
        }
        log::info!("Reloaded {} slides", self.navigator.len());
        true
    }

    pub fn handle_key(&mut self, key: KeyInput, now: Instant) -> Effect {
        if key == KeyInput::Escape && self.surfaces.any_open() {
            // Overlays close through their own controls
            return Effect::None;
        }
        match input::command_for_key(key) {
            Some(command) => self.dispatch(command, now),
            None => Effect::None,
        }
    }

    pub fn handle_tap(&mut self, x: f32, width: f32, on_control: bool, now: Instant) -> Effect {
        if self.surfaces.any_open() {
            return Effect::None;
        }
        match input::command_for_tap(x, width, on_control) {
            Some(command) => self.dispatch(command, now),
            None => Effect::None,
        }
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) -> Effect {
        log::trace!("Command {command:?}");
        match command {
            Command::Next => {
                if !self.navigator.next() {
                    log::debug!("Already on the last slide");
                }
            }
            Command::Previous => {
                if !self.navigator.previous() {
                    log::debug!("Already on the first slide");
                }
            }
            Command::First => self.navigator.first(),
            Command::Last => self.navigator.last(),
            Command::Exit => self.surfaces.exit_confirm = true,
            Command::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                return Effect::Fullscreen(self.fullscreen);
            }
            Command::ToggleProgress => {
                self.toggles.toggle_progress();
            }
            Command::ToggleCounter => {
                self.toggles.toggle_counter();
            }
            Command::ToggleTimer => {
                self.toggles.toggle_timer();
            }
            Command::TogglePercentage => {
                self.toggles.toggle_percentage();
            }
            Command::ToggleAll => {
                self.toggles.toggle_all();
            }
            Command::ResetTimer => self.timer.reset(now),
            Command::ToggleHelp => self.surfaces.help = !self.surfaces.help,
            Command::ToggleOverview => {
                self.surfaces.overview = !self.surfaces.overview;
                if self.surfaces.overview {
                    self.rebuild_overview();
                }
            }
            Command::ToggleAnimations => {
                let enabled = self.navigator.toggle_animations();
                self.settings.animations = enabled;
                log::info!("Animations {}", if enabled { "enabled" } else { "disabled" });
            }
            Command::Export => return Effect::Export(self.export_request()),
            Command::CloseHelp => self.surfaces.help = false,
            Command::CloseOverview => self.surfaces.overview = false,
            Command::SelectSlide(index) => {
                self.navigator.render_at(index);
                self.surfaces.overview = false;
            }
            Command::ConfirmExit => {
                self.surfaces.exit_confirm = false;
                return Effect::Quit;
            }
            Command::CancelExit => self.surfaces.exit_confirm = false,
        }
        Effect::None
    }

    pub fn frame(&self, now: Instant) -> Frame<'_> {
        let position = self.navigator.info();
        let progress = position.current as f32 / position.total as f32;
        Frame {
            slide: self.navigator.current_slide(),
            progress,
            counter: format!("{} / {}", position.current, position.total),
            percentage: format!("{}%", (progress * 100.0).round() as u32),
            timer: self.timer.display(now),
            toggles: self.toggles,
            font_scale: self.navigator.font_scale(),
            animation_epoch: self.navigator.animation_epoch(),
            animations_enabled: self.navigator.animations_enabled(),
        }
    }

    pub fn export_request(&self) -> ExportRequest {
        ExportRequest {
            slides: self.navigator.slides().to_vec(),
            settings: self.settings.clone(),
            presenter: self.presenter().map(str::to_string),
        }
    }

    pub fn surfaces(&self) -> Surfaces {
        self.surfaces
    }

    /// Grid built when the overview last opened.
    pub fn overview(&self) -> &[OverviewEntry] {
        &self.overview
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presenter(&self) -> Option<&str> {
        self.metadata
            .get("presenter")
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    pub fn slides(&self) -> &[Slide] {
        self.navigator.slides()
    }

    pub fn position(&self) -> Position {
        self.navigator.info()
    }

    fn rebuild_overview(&mut self) {
        self.overview = overview::build(self.navigator.slides(), self.navigator.index());
    }
}
