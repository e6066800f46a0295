use super::{Slide, parse};

/// Slides longer than this many characters get a "very long" warning.
const LONG_TEXT_CHARS: usize = 100;
/// Words longer than this many characters may not fit on screen.
const LONG_WORD_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub is_valid: bool,
    pub slide_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a document before presenting it. Empty input is a normal state
/// (the author may still be typing), so it is reported, not raised.
pub fn validate(content: &str) -> Validation {
    let slides = parse(content);
    let errors = if slides.is_empty() {
        vec![crate::error::Error::NoSlides.to_string()]
    } else {
        Vec::new()
    };

    Validation {
        is_valid: !slides.is_empty(),
        slide_count: slides.len(),
        errors,
        warnings: warnings(&slides),
    }
}

fn warnings(slides: &[Slide]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, slide) in slides.iter().enumerate() {
        let number = index + 1;
        let len = slide.char_len();
        if len > LONG_TEXT_CHARS {
            warnings.push(format!(
                "Slide {number}: Text is very long ({len} chars). Consider splitting it."
            ));
        }

        let has_long_word = slide
            .content
            .split_whitespace()
            .any(|word| word.chars().count() > LONG_WORD_CHARS);
        if has_long_word {
            warnings.push(format!(
                "Slide {number}: Contains very long words that may not fit on screen."
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_slide_is_valid_with_warning() {
        let text = "word ".repeat(30);
        let text = text.trim();
        assert_eq!(text.chars().count(), 149);
        let text = format!("{text}s");

        let result = validate(&text);
        assert!(result.is_valid);
        assert_eq!(result.slide_count, 1);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec!["Slide 1: Text is very long (150 chars). Consider splitting it."]
        );
    }

    #[test]
    fn test_whitespace_only_is_invalid() {
        let result = validate("  \n\n\t\n ");
        assert!(!result.is_valid);
        assert_eq!(result.slide_count, 0);
        assert_eq!(result.errors, vec!["No slides found"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_long_word_warning() {
        let result = validate("Short\n\nsupercalifragilisticexpialidocious");
        assert_eq!(
            result.warnings,
            vec!["Slide 2: Contains very long words that may not fit on screen."]
        );
    }

    #[test]
    fn test_twenty_char_word_is_fine() {
        let result = validate(&"x".repeat(20));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_exactly_hundred_chars_is_fine() {
        let text = format!("{}e", "abcd ".repeat(20).trim_end());
        assert_eq!(text.chars().count(), 100);
        assert!(validate(&text).warnings.is_empty());
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 95 characters but well over 100 bytes
        let text = "日本語です ".repeat(16);
        assert!(text.trim_end().len() > 100);
        assert!(validate(&text).warnings.is_empty());
    }

    #[test]
    fn test_measures_display_text() {
        // The title marker is stripped before measuring
        let text = format!("## {}e", "abcd ".repeat(20).trim_end());
        assert!(validate(&text).warnings.is_empty());
    }
}
