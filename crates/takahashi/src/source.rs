//! Where presentation text comes from and where edits go.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use crate::error::{Error, Result};

const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Decks compiled into the binary, by name.
pub const EXAMPLES: &[(&str, &str)] = &[
    (
        "getting-started",
        include_str!("../../../demos/getting-started.txt"),
    ),
    (
        "takahashi-method",
        include_str!("../../../demos/takahashi-method.txt"),
    ),
];

/// Opaque get/set of presentation text.
pub trait ContentSource {
    /// Human-readable name for titles and messages.
    fn name(&self) -> String;
    fn load(&self) -> Result<String>;
    fn save(&self, content: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory that relative image paths in the deck resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }

    /// Watch the file for changes. Watches the parent directory so editors
    /// that save by renaming a temp file are still noticed.
    pub fn watch(&self) -> anyhow::Result<FileWatch> {
        let target = self
            .path
            .canonicalize()
            .unwrap_or_else(|_| self.path.clone());
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(WATCH_DEBOUNCE, tx)?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)?;
        log::debug!("Watching {} for changes", target.display());

        Ok(FileWatch {
            _debouncer: debouncer,
            rx,
            target,
        })
    }
}

impl ContentSource for FileSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    fn load(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| Error::ResourceLoad {
            name: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// A deck shipped inside the binary. Read-only.
#[derive(Debug, Clone)]
pub struct BundledSource {
    name: String,
}

impl BundledSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        EXAMPLES.iter().map(|(name, _)| *name)
    }
}

impl ContentSource for BundledSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Result<String> {
        EXAMPLES
            .iter()
            .find(|(name, _)| *name == self.name)
            .map(|(_, content)| content.to_string())
            .ok_or_else(|| Error::ResourceLoad {
                name: self.name.clone(),
                reason: format!(
                    "no such example. Available examples: {}",
                    Self::names().collect::<Vec<_>>().join(", ")
                ),
            })
    }

    fn save(&self, _content: &str) -> Result<()> {
        Err(Error::ResourceLoad {
            name: self.name.clone(),
            reason: "bundled examples are read-only".to_string(),
        })
    }
}

/// Live handle on a file watch; dropping it stops watching.
pub struct FileWatch {
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: mpsc::Receiver<DebounceEventResult>,
    target: PathBuf,
}

impl FileWatch {
    /// Drain pending events and report whether the watched file changed.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|event| event.path == self.target);
                }
                Err(e) => log::warn!("File watch error: {e}"),
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("talk.txt"));
        source.save("# Hello\n\nWorld").unwrap();
        assert_eq!(source.load().unwrap(), "# Hello\n\nWorld");
        assert_eq!(source.name(), "talk.txt");
        assert_eq!(source.base_dir(), dir.path());
    }

    #[test]
    fn test_missing_file_is_resource_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.txt"));
        assert!(matches!(source.load(), Err(Error::ResourceLoad { .. })));
    }

    #[test]
    fn test_bare_file_name_resolves_against_cwd() {
        assert_eq!(FileSource::new("talk.txt").base_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_bundled_examples_all_parse() {
        for name in BundledSource::names() {
            let text = BundledSource::new(name).load().unwrap();
            assert!(
                crate::parser::validate(&text).is_valid,
                "example {name} has no slides"
            );
        }
    }

    #[test]
    fn test_unknown_example_lists_available() {
        let err = BundledSource::new("nope").load().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nope"));
        assert!(message.contains("getting-started"));
    }

    #[test]
    fn test_bundled_source_is_read_only() {
        assert!(BundledSource::new("getting-started").save("x").is_err());
    }
}
