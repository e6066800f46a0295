/// Split a document body (after metadata extraction) into raw slide strings.
///
/// Two mechanisms create slide breaks:
/// 1. A line made only of three or more hyphens (`---`, `-----`, ...)
/// 2. A run of one or more blank lines
///
/// Candidates are trimmed and empty ones are dropped, so stacked separators
/// never produce blank slides.
pub fn split(body: &str) -> Vec<String> {
    // Phase 1: Normalize line endings
    let body = body.replace("\r\n", "\n");

    // Phase 2: Cut at every separator line or blank line
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in body.split('\n') {
        if is_dash_separator(line) || line.trim().is_empty() {
            flush(&mut current, &mut chunks);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut chunks);

    chunks
}

fn flush(current: &mut Vec<&str>, chunks: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let text = current.join("\n");
    current.clear();
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}
