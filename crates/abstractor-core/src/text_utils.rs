use once_cell::sync::Lazy;
use regex::Regex;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Normalize one extracted line: expand ligatures, drop soft hyphens and
/// zero-width characters, collapse whitespace runs and trim.
pub fn normalize_line(text: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let text = expand_ligatures(text).replace(['\u{00AD}', '\u{200B}', '\u{FEFF}'], "");
    WS_RE.replace_all(&text, " ").trim().to_string()
}
