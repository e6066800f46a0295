use std::path::Path;

use colored::Colorize;

use crate::parser::{Metadata, frontmatter};
use crate::source::{ContentSource, FileSource};

const STARTER_SLIDES: &str = "\
# {title}

One idea per slide

! Make it big

Blank lines split slides
---
So do three dashes

Press ? for help
";

/// Starter deck text, titled after the file name.
pub fn starter(path: &Path) -> String {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "My Talk".to_string());

    let mut meta = Metadata::new();
    meta.insert("title".to_string(), title.clone());
    meta.insert("theme".to_string(), "dark".to_string());
    format!(
        "{}{}",
        frontmatter::to_block(&meta),
        STARTER_SLIDES.replace("{title}", &title)
    )
}

pub fn run(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }
    FileSource::new(path).save(&starter(path))?;
    println!("{} Created {}", "\u{2713}".green().bold(), path.display());
    println!("  Present it with: takahashi {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_starter_is_a_valid_deck() {
        let text = starter(Path::new("my-talk.txt"));
        let pres = parser::parse_presentation(&text);
        assert_eq!(pres.metadata.get("title").map(String::as_str), Some("my talk"));
        assert_eq!(pres.metadata.get("theme").map(String::as_str), Some("dark"));
        assert!(pres.slides[0].is_title());
        assert_eq!(pres.slides[0].content, "my talk");
        assert!(pres.slides.iter().any(|s| s.is_emphasis()));
        assert!(pres.warnings.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.txt");
        std::fs::write(&path, "keep me").unwrap();

        assert!(run(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");

        run(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("# talk"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks").join("intro.txt");
        run(&path, false).unwrap();
        assert!(path.is_file());
    }
}
