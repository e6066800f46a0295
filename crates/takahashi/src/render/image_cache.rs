//! Texture cache for `@image:` slides.
//!
//! Images load on a background thread so a slow remote fetch never stalls the
//! presentation. Failures are remembered and drawn as a placeholder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{Context, Result};
use eframe::egui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    Remote(String),
    Local(PathBuf),
}

/// Remote URLs are fetched as-is; anything else is a path relative to the deck.
pub fn resolve(base_dir: &Path, url: &str) -> ImageLocation {
    if url.starts_with("http://") || url.starts_with("https://") {
        ImageLocation::Remote(url.to_string())
    } else {
        let path = Path::new(url);
        if path.is_absolute() {
            ImageLocation::Local(path.to_path_buf())
        } else {
            ImageLocation::Local(base_dir.join(path))
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes)
        .context("Unsupported image data")?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

fn fetch(location: &ImageLocation) -> Result<Vec<u8>> {
    match location {
        ImageLocation::Remote(url) => {
            let bytes = ureq::get(url.as_str())
                .call()
                .with_context(|| format!("Failed to fetch {url}"))?
                .body_mut()
                .read_to_vec()
                .with_context(|| format!("Failed to read {url}"))?;
            Ok(bytes)
        }
        ImageLocation::Local(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display())),
    }
}

pub enum ImageState {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

enum Entry {
    Loading(mpsc::Receiver<Result<egui::ColorImage>>),
    Ready(egui::TextureHandle),
    Failed,
}

pub struct ImageCache {
    base_dir: PathBuf,
    entries: RefCell<HashMap<String, Entry>>,
}

impl ImageCache {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, ctx: &egui::Context, url: &str) -> ImageState {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(url.to_string())
            .or_insert_with(|| Entry::Loading(self.spawn_load(ctx, url)));

        if let Entry::Loading(rx) = &mut *entry {
            match rx.try_recv() {
                Ok(Ok(image)) => {
                    let texture = ctx.load_texture(url, image, egui::TextureOptions::LINEAR);
                    *entry = Entry::Ready(texture);
                }
                Ok(Err(e)) => {
                    log::warn!("Image unavailable: {e:#}");
                    *entry = Entry::Failed;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => *entry = Entry::Failed,
            }
        }

        match entry {
            Entry::Loading(_) => ImageState::Loading,
            Entry::Ready(texture) => ImageState::Ready(texture.clone()),
            Entry::Failed => ImageState::Failed,
        }
    }

    /// Start loading every image up front.
    pub fn prefetch<'a>(&self, ctx: &egui::Context, urls: impl IntoIterator<Item = &'a str>) {
        for url in urls {
            let _ = self.get(ctx, url);
        }
    }

    fn spawn_load(&self, ctx: &egui::Context, url: &str) -> mpsc::Receiver<Result<egui::ColorImage>> {
        let location = resolve(&self.base_dir, url);
        log::debug!("Loading image {location:?}");
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = fetch(&location).and_then(|bytes| decode(&bytes));
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        rx
    }
}
