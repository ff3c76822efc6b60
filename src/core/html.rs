// src/core/html.rs
//! Low-level HTML string helpers.
//!
//! Naive by intent: tag names and attributes are matched ASCII
//! case-insensitively, the first closing tag ends a block, and nothing is
//! validated. Lowercasing is ASCII-only so byte offsets in the lowered copy
//! stay valid in the original.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Position of the next `<tag` opener at or after `from` in an already
/// lowered document. `<b` does not match `<br>` or `<body>`.
fn find_open(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{tag}");
    let mut i = from;
    loop {
        let at = lc.get(i..)?.find(&pat)? + i;
        match lc.as_bytes().get(at + pat.len()) {
            Some(b'>' | b'/' | b' ' | b'\t' | b'\r' | b'\n') => return Some(at),
            Some(_) => i = at + pat.len(),
            None => return None,
        }
    }
}

/// Next complete `<tag ...> ... </tag>` block from `from` onwards.
/// Returns `(start_of_opener, end_after_closer)`.
pub fn next_tag_block_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let start = find_open(&lc, &tag, from)?;
    let open_end = s[start..].find('>')? + start + 1;
    let close = format!("</{tag}>");
    let end_rel = lc[open_end..].find(&close)?;
    Some((start, open_end + end_rel + close.len()))
}

/// Every `<tag>` block in `s`, in order.
pub fn blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b, e)) = next_tag_block_ci(s, tag, pos) {
        out.push(&s[b..e]);
        pos = e;
    }
    out
}

/// First `<tag>` opener at or after `from` whose attributes contain `needle`
/// (quotes ignored, e.g. `id=study-name`). Returns `(start, end_after_gt)`.
pub fn open_tag_with_attr(s: &str, tag: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let needle = to_lower(needle);
    let mut pos = from;
    loop {
        let start = find_open(&lc, &tag, pos)?;
        let gt = lc[start..].find('>')? + start;
        let opener: String = lc[start..gt].chars().filter(|&c| c != '"' && c != '\'').collect();
        if opener.contains(&needle) {
            return Some((start, gt + 1));
        }
        pos = gt + 1;
    }
}

/// Inner HTML of the first `<tag>` block carrying `needle` in its opener.
pub fn block_with_attr<'a>(s: &'a str, tag: &str, needle: &str) -> Option<&'a str> {
    let (start, open_end) = open_tag_with_attr(s, tag, needle, 0)?;
    let (_, end) = next_tag_block_ci(s, tag, start)?;
    let close_len = tag.len() + 3;
    s.get(open_end..end - close_len)
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return INNER (nested tags kept).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    s!()
}

/// Remove all `<...>` tags without touching whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Visible text of a fragment: tags stripped, entities decoded, whitespace collapsed.
pub fn text_of(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}

/// Texts of the `<td>`/`<th>` cells of one row, in document order.
pub fn cell_texts(tr: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0usize;
    loop {
        let td = next_tag_block_ci(tr, "td", pos);
        let th = next_tag_block_ci(tr, "th", pos);
        let (b, e) = match (td, th) {
            (Some(a), Some(b)) => if a.0 <= b.0 { a } else { b },
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        cells.push(text_of(&inner_after_open_tag(&tr[b..e])));
        pos = e;
    }
    cells
}

/// Texts of every `<a>` in `s`.
pub fn anchor_texts(s: &str) -> Vec<String> {
    blocks(s, "a").into_iter().map(text_of).collect()
}
