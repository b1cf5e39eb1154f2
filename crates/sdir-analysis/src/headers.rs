//! Structural header classification.
//!
//! A line is a structural header when, after trimming, the whole line is one
//! bracket-enclosed span such as `[HOOK]` or `[FECHAMENTO/CONCLUSAO]`. The
//! bracket content is never inspected. Anything ambiguous (nested brackets,
//! an unclosed bracket, text outside the brackets) is narrative, so real
//! narration is never dropped.

/// Classification of a single script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Header,
    Narrative,
}

/// Classify one line of a script.
pub fn classify_line(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if is_structural_header(line) {
        LineKind::Header
    } else {
        LineKind::Narrative
    }
}

/// True if the whole (trimmed) span is a single well-formed `[...]` marker.
pub fn is_structural_header(span: &str) -> bool {
    let span = span.trim();
    span.len() >= 2
        && span.starts_with('[')
        && span.ends_with(']')
        && span.matches('[').count() == 1
        && span.matches(']').count() == 1
}

/// The script with every header line removed.
pub fn narrative_content(script: &str) -> String {
    strip_header_lines(script).0
}

/// True if the script contains at least one narrative line.
pub fn has_narrative(script: &str) -> bool {
    script.lines().any(|l| classify_line(l) == LineKind::Narrative)
}

/// Remove header lines from `text`, returning the remaining text and the
/// number of lines removed.
pub fn strip_header_lines(text: &str) -> (String, usize) {
    let mut removed = 0;
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let header = classify_line(line) == LineKind::Header;
            if header {
                removed += 1;
            }
            !header
        })
        .collect();

    (kept.join("\n"), removed)
}

/// Collapse all whitespace runs to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
