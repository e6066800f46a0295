pub mod frontmatter;
pub mod splitter;
pub mod validate;

use std::collections::BTreeMap;

pub use validate::{Validation, validate};

/// Document-level `key: value` pairs from the leading `---` block.
pub type Metadata = BTreeMap<String, String>;

/// Display text used for an image slide without a caption.
pub const IMAGE_PLACEHOLDER: &str = "[Image]";

const IMAGE_MARKER: &str = "@image:";

#[derive(Debug, Clone, Default)]
pub struct Presentation {
    pub metadata: Metadata,
    pub slides: Vec<Slide>,
    pub warnings: Vec<ParseWarning>,
}

impl Presentation {
    pub fn presenter(&self) -> Option<&str> {
        self.metadata
            .get("presenter")
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// 1-based position in the deck.
    pub id: usize,
    /// Text shown on screen, with title/emphasis markers stripped.
    pub content: String,
    /// Global metadata plus per-slide hints (`fontSize`, `emphasis`).
    pub metadata: Metadata,
    pub kind: SlideKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideKind {
    Image { url: String, caption: Option<String> },
    Title { text: String },
    Emphasis { text: String },
    Plain { text: String },
}

impl Slide {
    pub fn is_image(&self) -> bool {
        matches!(self.kind, SlideKind::Image { .. })
    }

    pub fn is_title(&self) -> bool {
        matches!(self.kind, SlideKind::Title { .. })
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self.kind, SlideKind::Emphasis { .. })
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.kind {
            SlideKind::Image { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Length of the display text in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Non-fatal diagnostics collected while parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    InvalidImageUrl { slide: usize, url: String },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImageUrl { slide, url } => {
                write!(f, "Slide {slide}: Image URL may be invalid: {url}")
            }
        }
    }
}

/// Parse a document into its slides.
pub fn parse(content: &str) -> Vec<Slide> {
    parse_presentation(content).slides
}

/// Parse a document into metadata, slides, and warnings.
pub fn parse_presentation(content: &str) -> Presentation {
    if content.is_empty() {
        return Presentation::default();
    }

    let (metadata, body) = frontmatter::extract(content);
    let mut warnings = Vec::new();
    let slides = splitter::split(&body)
        .into_iter()
        .enumerate()
        .map(|(index, text)| create_slide(&text, index + 1, &metadata, &mut warnings))
        .collect();

    Presentation {
        metadata,
        slides,
        warnings,
    }
}

/// Metadata only, without building slides.
pub fn get_metadata(content: &str) -> Metadata {
    frontmatter::extract(content).0
}

pub fn count(content: &str) -> usize {
    parse(content).len()
}

fn create_slide(
    text: &str,
    id: usize,
    global: &Metadata,
    warnings: &mut Vec<ParseWarning>,
) -> Slide {
    let mut metadata = global.clone();

    // Image first: an image slide never gets title or emphasis treatment
    if let Some((url, caption)) = split_image(text) {
        if !is_valid_image_url(&url) {
            log::warn!("Slide {id}: Image URL may be invalid: {url}");
            warnings.push(ParseWarning::InvalidImageUrl {
                slide: id,
                url: url.clone(),
            });
        }
        let content = caption
            .clone()
            .unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string());
        return Slide {
            id,
            content,
            metadata,
            kind: SlideKind::Image { url, caption },
        };
    }

    let (content, kind) = if text.starts_with('#') {
        let stripped = strip_marker(text, '#');
        metadata.insert("fontSize".to_string(), "large".to_string());
        (
            stripped.clone(),
            SlideKind::Title { text: stripped },
        )
    } else if text.starts_with('!') {
        let stripped = strip_marker(text, '!');
        metadata.insert("emphasis".to_string(), "true".to_string());
        (
            stripped.clone(),
            SlideKind::Emphasis { text: stripped },
        )
    } else {
        (
            text.to_string(),
            SlideKind::Plain {
                text: text.to_string(),
            },
        )
    };

    Slide {
        id,
        content,
        metadata,
        kind,
    }
}

/// Strip a run of `marker` characters and the whitespace after it.
fn strip_marker(text: &str, marker: char) -> String {
    text.trim_start_matches(marker).trim_start().to_string()
}

/// `@image: <url>` on the first line, caption on any following lines.
fn split_image(text: &str) -> Option<(String, Option<String>)> {
    let rest = text.strip_prefix(IMAGE_MARKER)?;
    let (first, caption) = match rest.split_once('\n') {
        Some((first, caption)) => (first, Some(caption)),
        None => (rest, None),
    };

    let url = first.trim();
    if url.is_empty() {
        return None;
    }

    let caption = caption
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    Some((url.to_string(), caption))
}

/// Absolute http(s) URLs must parse; relative paths are taken verbatim; any
/// other non-empty string without whitespace counts as a bare path.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url::Url::parse(url).is_ok_and(|u| u.host_str().is_some_and(|h| !h.is_empty()));
    }

    if url.starts_with("./") || url.starts_with("../") || url.starts_with('/') {
        return true;
    }

    !url.is_empty() && !url.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n  ").is_empty());
    }

    #[test]
    fn test_separators_are_interchangeable() {
        for text in ["A\n\n\nB", "A\n\nB", "A\n---\nB"] {
            let slides = parse(text);
            let contents: Vec<&str> = slides.iter().map(|s| s.content.as_str()).collect();
            assert_eq!(contents, vec!["A", "B"], "input {text:?}");
        }
    }

    #[test]
    fn test_ids_are_dense_after_filtering() {
        let slides = parse("\n\nOne\n\n---\n\n\n---\nTwo\n\n\n\nThree\n---\n");
        let ids: Vec<usize> = slides.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_title_slide() {
        let slides = parse("# Title");
        assert_eq!(slides.len(), 1);
        assert!(slides[0].is_title());
        assert_eq!(slides[0].content, "Title");
        assert_eq!(
            slides[0].metadata.get("fontSize").map(String::as_str),
            Some("large")
        );
    }

    #[test]
    fn test_multiple_hashes_stripped() {
        let slides = parse("###   Deep");
        assert!(slides[0].is_title());
        assert_eq!(slides[0].content, "Deep");
    }

    #[test]
    fn test_emphasis_slide() {
        let slides = parse("!!Wow");
        assert_eq!(slides.len(), 1);
        assert!(slides[0].is_emphasis());
        assert_eq!(slides[0].content, "Wow");
        assert_eq!(
            slides[0].metadata.get("emphasis").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_bare_markers_become_empty_slides() {
        let slides = parse("#\n\n!");
        assert_eq!(slides.len(), 2);
        assert!(slides[0].is_title());
        assert_eq!(slides[0].content, "");
        assert!(slides[1].is_emphasis());
        assert_eq!(slides[1].content, "");
    }

    #[test]
    fn test_image_slide_with_caption() {
        let slides = parse("@image: http://x/y.png\nA caption");
        assert_eq!(slides.len(), 1);
        assert!(slides[0].is_image());
        assert_eq!(slides[0].image_url(), Some("http://x/y.png"));
        assert_eq!(slides[0].content, "A caption");
    }

    #[test]
    fn test_image_slide_without_caption() {
        let slides = parse("@image: ./cat.jpg");
        assert_eq!(slides[0].content, IMAGE_PLACEHOLDER);
        assert_eq!(
            slides[0].kind,
            SlideKind::Image {
                url: "./cat.jpg".to_string(),
                caption: None,
            }
        );
    }

    #[test]
    fn test_image_caption_may_span_lines() {
        let slides = parse("@image: cat.png\nFirst line\nSecond line");
        assert_eq!(slides[0].content, "First line\nSecond line");
    }

    #[test]
    fn test_image_caption_is_not_reclassified() {
        let slides = parse("@image: cat.png\n# Not a title");
        assert!(slides[0].is_image());
        assert!(!slides[0].is_title());
        assert!(!slides[0].metadata.contains_key("fontSize"));
    }

    #[test]
    fn test_title_marker_wins_over_emphasis() {
        let slides = parse("# !Wow");
        assert!(slides[0].is_title());
        assert!(!slides[0].is_emphasis());
        assert_eq!(slides[0].content, "!Wow");
        assert!(!slides[0].metadata.contains_key("emphasis"));
    }

    #[test]
    fn test_image_marker_without_url_is_plain() {
        let slides = parse("@image:");
        assert!(matches!(slides[0].kind, SlideKind::Plain { .. }));
        assert_eq!(slides[0].content, "@image:");
    }

    #[test]
    fn test_invalid_image_url_is_warning_not_failure() {
        let pres = parse_presentation("@image: http://\nBroken");
        assert_eq!(pres.slides.len(), 1);
        assert!(pres.slides[0].is_image());
        assert_eq!(
            pres.warnings,
            vec![ParseWarning::InvalidImageUrl {
                slide: 1,
                url: "http://".to_string(),
            }]
        );
    }

    #[test]
    fn test_image_url_rules() {
        assert!(is_valid_image_url("https://example.com/a.png"));
        assert!(is_valid_image_url("./a.png"));
        assert!(is_valid_image_url("../images/a.png"));
        assert!(is_valid_image_url("/abs/a b.png"));
        assert!(is_valid_image_url("a.png"));
        assert!(!is_valid_image_url("http://"));
        assert!(!is_valid_image_url("my picture.png"));
        assert!(!is_valid_image_url(""));
    }

    #[test]
    fn test_metadata_is_copied_to_every_slide() {
        let pres = parse_presentation("---\ntheme: light\npresenter: Ada\n---\nOne\n\nTwo");
        assert_eq!(pres.metadata.get("theme").map(String::as_str), Some("light"));
        assert_eq!(pres.presenter(), Some("Ada"));
        assert_eq!(pres.slides.len(), 2);
        for slide in &pres.slides {
            assert_eq!(slide.metadata.get("theme").map(String::as_str), Some("light"));
        }
    }

    #[test]
    fn test_get_metadata_matches_parse() {
        let text = "---\nfont: serif\n---\nHello";
        assert_eq!(get_metadata(text), parse_presentation(text).metadata);
    }

    #[test]
    fn test_count() {
        assert_eq!(count("a\n\nb\n\nc"), 3);
        assert_eq!(count(""), 0);
    }

    #[test]
    fn test_sample_deck_parses() {
        let content = include_str!("../../../../demos/getting-started.txt");
        let pres = parse_presentation(content);
        assert_eq!(pres.metadata.get("theme").map(String::as_str), Some("dark"));
        assert!(pres.slides.len() >= 10, "got {}", pres.slides.len());
        assert!(pres.slides[0].is_title());
        assert!(pres.warnings.is_empty());
    }

    proptest! {
        #[test]
        fn prop_ids_are_one_to_n(text in "[a-z#! \n-]{0,120}") {
            let slides = parse(&text);
            for (index, slide) in slides.iter().enumerate() {
                prop_assert_eq!(slide.id, index + 1);
            }
        }

        #[test]
        fn prop_parse_is_deterministic(text in "[a-z#!@: \n-]{0,120}") {
            prop_assert_eq!(parse(&text), parse(&text));
        }
    }
}
