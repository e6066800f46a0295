use std::sync::LazyLock;

use regex::Regex;

use super::Metadata;

/// Leading `---` / `key: value` lines / `---` block. The closing fence must be
/// followed by a newline.
static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t\r]*\n(?s:(.*?)\n)?---[ \t\r]*\n").expect("metadata regex is valid")
});

/// Split a document into its metadata block and the remaining body.
///
/// Without a block the metadata is empty and the body is the input unchanged.
pub fn extract(content: &str) -> (Metadata, String) {
    let Some(caps) = BLOCK.captures(content) else {
        return (Metadata::new(), content.to_string());
    };

    let interior = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(0).map_or(0, |m| m.end());
    (parse_pairs(interior), content[end..].to_string())
}

/// Parse `key: value` lines. Only the first colon splits; lines without a
/// colon or with an empty key are skipped.
fn parse_pairs(text: &str) -> Metadata {
    let mut meta = Metadata::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), value.trim().to_string());
    }
    meta
}

/// Serialize metadata back into a block that [`extract`] reads losslessly.
pub fn to_block(meta: &Metadata) -> String {
    let mut out = String::from("---\n");
    for (key, value) in meta {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_block_returns_body_unchanged() {
        let text = "Hello\n\nWorld";
        let (meta, body) = extract(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_basic_block() {
        let text = "---\ntheme: light\nfont: serif\n---\n# Hi";
        let (meta, body) = extract(text);
        assert_eq!(meta.get("theme").map(String::as_str), Some("light"));
        assert_eq!(meta.get("font").map(String::as_str), Some("serif"));
        assert_eq!(body, "# Hi");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let (meta, _) = extract("---\nurl: https://example.com:8080/x\n---\nA");
        assert_eq!(
            meta.get("url").map(String::as_str),
            Some("https://example.com:8080/x")
        );
    }

    #[test]
    fn test_lines_without_colon_or_key_are_ignored() {
        let (meta, _) = extract("---\njust words\n: orphan\npresenter: Ada\n---\nA");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("presenter").map(String::as_str), Some("Ada"));
    }

    #[test]
    fn test_block_must_start_at_beginning() {
        let text = "Intro\n---\ntheme: dark\n---\nA";
        let (meta, body) = extract(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let text = "---\ntheme: dark\nA slide";
        let (meta, body) = extract(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_closing_fence_needs_newline() {
        let (meta, _) = extract("---\ntheme: dark\n---");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_empty_block() {
        let (meta, body) = extract("---\n---\nA");
        assert!(meta.is_empty());
        assert_eq!(body, "A");
    }

    #[test]
    fn test_crlf_block() {
        let (meta, body) = extract("---\r\ntheme: light\r\n---\r\nA\r\n");
        assert_eq!(meta.get("theme").map(String::as_str), Some("light"));
        assert_eq!(body, "A\r\n");
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let (meta, _) = extract("---\nvenue: Tokyo\n---\nA");
        assert_eq!(meta.get("venue").map(String::as_str), Some("Tokyo"));
    }

    proptest! {
        #[test]
        fn prop_plain_text_has_no_metadata(text in "[a-zA-Z0-9 #!\n]{0,80}") {
            let (meta, body) = extract(&text);
            prop_assert!(meta.is_empty());
            prop_assert_eq!(body, text);
        }

        #[test]
        fn prop_block_round_trips(
            pairs in proptest::collection::btree_map(
                "[a-zA-Z][a-zA-Z0-9_-]{0,10}",
                "[a-zA-Z0-9:/. ]{0,20}",
                0..6,
            )
        ) {
            let meta: Metadata = pairs
                .into_iter()
                .map(|(k, v)| (k, v.trim().to_string()))
                .collect();
            let (parsed, body) = extract(&format!("{}Body", to_block(&meta)));
            prop_assert_eq!(parsed, meta);
            prop_assert_eq!(body, "Body");
        }
    }
}
