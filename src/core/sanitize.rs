// src/core/sanitize.rs

/// Minimal entity decoding for the catalog pages.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop all whitespace (ids split across markup come back as `phs1 .v2.p1`).
pub fn squeeze_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Integer cell value; thousands separators allowed.
pub fn parse_count(cell: &str) -> Option<u64> {
    let digits: String = cell.trim().chars().filter(|&c| c != ',').collect();
    digits.parse().ok()
}

/// Strip a trailing `:` from a label such as `GRU:`.
pub fn trim_label(s: &str) -> String {
    normalize_ws(s).trim_end_matches(':').trim_end().to_string()
}
