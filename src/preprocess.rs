//! Cleans raw pasted text before it is sent to the model.
//!
//! Pasted recipes arrive with web clutter: stray HTML, entity escapes,
//! blog chrome ("Jump to Recipe"), inconsistent line endings. The model
//! extracts noticeably better from cleaned text, so everything funnels
//! through [`normalize_text`] first.

/// Boilerplate phrases removed case-insensitively from pasted pages.
const BOILERPLATE: [&str; 3] = ["[Print Recipe]", "[Pin Recipe]", "Jump to Recipe"];

/// Normalize raw recipe text. Pure, never fails; text with nothing to
/// clean passes through unchanged apart from trimming.
pub fn normalize_text(raw: &str) -> String {
    // Normalize line endings
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");

    // Remove excessive whitespace while preserving structure
    let text = collapse_horizontal_whitespace(&text);
    let text = cap_blank_lines(&text);

    // Trim each line
    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    // Remove common HTML remnants (in case of copy-paste from web)
    let text = strip_tags(&text);
    let text = html_escape::decode_html_entities(&text).replace('\u{a0}', " ");

    // Remove common blog fluff patterns
    let mut text = text;
    for phrase in BOILERPLATE {
        text = remove_phrase_ci(&text, phrase);
    }

    text.trim().to_string()
}

/// Collapse runs of spaces and tabs to a single space.
fn collapse_horizontal_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            in_run = false;
            out.push(c);
        }
    }
    out
}

/// Cap consecutive newlines at two, i.e. at most one blank line.
fn cap_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}

/// Remove `<...>` tag remnants. A `<` with no closing `>` (or an empty
/// `<>`) is kept literally.
fn strip_tags(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '<' {
            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == '>') {
                if offset > 0 {
                    i += offset + 2;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Remove every occurrence of an ASCII phrase, ignoring case.
fn remove_phrase_ci(text: &str, phrase: &str) -> String {
    let needle: Vec<char> = phrase.chars().collect();
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if i + needle.len() <= chars.len()
            && chars[i..i + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
        {
            i += needle.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
