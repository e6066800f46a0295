use crate::parser::Slide;

const PREVIEW_CHARS: usize = 50;

/// One cell of the overview grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewEntry {
    /// 1-based slide number.
    pub number: usize,
    pub preview: String,
    pub active: bool,
}

pub fn build(slides: &[Slide], current: usize) -> Vec<OverviewEntry> {
    slides
        .iter()
        .enumerate()
        .map(|(index, slide)| OverviewEntry {
            number: index + 1,
            preview: preview(&slide.content),
            active: index == current,
        })
        .collect()
}

/// First 50 characters, with `...` when something was cut.
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
