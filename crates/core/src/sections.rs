use std::collections::BTreeMap;

/// Heading vocabulary, scanned in this order.
pub const SECTION_HEADINGS: [&str; 6] = [
    "abstract",
    "introduction",
    "methods",
    "results",
    "discussion",
    "conclusion",
];

/// Maximum snippet length per section, in characters.
pub const SECTION_WINDOW_CHARS: usize = 2_000;

/// Split `text` into named sections by locating the first case-insensitive
/// occurrence of each heading token and taking a bounded window from there.
/// Headings that never occur are absent from the result; windows are
/// allowed to overlap.
pub fn segment_sections(text: &str) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();

    for heading in SECTION_HEADINGS {
        if let Some(offset) = find_ascii_case_insensitive(text, heading) {
            let snippet = char_prefix(&text[offset..], SECTION_WINDOW_CHARS)
                .trim()
                .to_string();
            if !snippet.is_empty() {
                sections.insert(capitalize(heading), snippet);
            }
        }
    }

    sections
}

/// Byte offset of the first case-insensitive occurrence of an ASCII
/// `token` in `text`, or `None`.
fn find_ascii_case_insensitive(text: &str, token: &str) -> Option<usize> {
    let haystack = text.as_bytes();
    let needle = token.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Prefix of `text` holding at most `max_chars` characters, cut on a
/// character boundary.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
