use crate::error::{Error, Result};
use crate::parser::Slide;

/// Font size as a percentage of the viewport width, picked from the length of
/// the text: the shorter the phrase, the bigger it gets.
pub fn font_scale(char_len: usize) -> f32 {
    match char_len {
        0..=5 => 20.0,
        6..=10 => 15.0,
        11..=20 => 12.0,
        21..=40 => 10.0,
        41..=60 => 8.0,
        61..=100 => 6.0,
        _ => 4.0,
    }
}

/// Where the navigator currently stands, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub current: usize,
    pub total: usize,
    pub is_first: bool,
    pub is_last: bool,
}

/// Position over a fixed, non-empty slide sequence.
#[derive(Debug, Clone)]
pub struct Navigator {
    slides: Vec<Slide>,
    current: usize,
    animations_enabled: bool,
    font_scale: f32,
    animation_epoch: u64,
}

impl Navigator {
    pub fn new(slides: Vec<Slide>, animations_enabled: bool) -> Result<Self> {
        if slides.is_empty() {
            return Err(Error::NoSlides);
        }
        let mut nav = Self {
            slides,
            current: 0,
            animations_enabled,
            font_scale: 0.0,
            animation_epoch: 0,
        };
        // The first slide gets its entrance animation too
        nav.refresh();
        Ok(nav)
    }

    /// Swap in new slides at `index` (clamped) without counting it as a
    /// slide change: animation state carries over unchanged.
    pub fn reloaded(&self, slides: Vec<Slide>, index: usize) -> Result<Self> {
        if slides.is_empty() {
            return Err(Error::NoSlides);
        }
        let current = index.min(slides.len() - 1);
        let font_scale = font_scale(slides[current].char_len());
        Ok(Self {
            slides,
            current,
            animations_enabled: self.animations_enabled,
            font_scale,
            animation_epoch: self.animation_epoch,
        })
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) {
        self.current = 0;
        self.refresh();
    }

    pub fn last(&mut self) {
        self.current = self.slides.len() - 1;
        self.refresh();
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn render_at(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.current = index;
        self.refresh();
        true
    }

    pub fn toggle_animations(&mut self) -> bool {
        self.animations_enabled = !self.animations_enabled;
        self.animations_enabled
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn info(&self) -> Position {
        Position {
            current: self.current + 1,
            total: self.slides.len(),
            is_first: self.current == 0,
            is_last: self.current + 1 == self.slides.len(),
        }
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    /// Bumped on every slide change while animations are on; the renderer
    /// replays the entrance animation when it sees a new value.
    pub fn animation_epoch(&self) -> u64 {
        self.animation_epoch
    }

    fn refresh(&mut self) {
        self.font_scale = font_scale(self.current_slide().char_len());
        if self.animations_enabled {
            self.animation_epoch += 1;
        }
    }
}
