// src/specs/search.rs
//! Keyword search results.
//!
//! Only the first result row matters: its leading `<span>` holds the
//! versioned id, often split as `<b>phs000007</b>.v30.p11`, sometimes with
//! a line break between the parts.

use crate::core::html::{next_tag_block_ci, text_of};
use crate::core::sanitize::squeeze_ws;

/// Raw id text of the first search hit, if the page has a results table.
/// The whole span is the id; whitespace left between its parts is dropped.
pub fn top_hit(page: &str) -> Option<String> {
    let (ts, te) = next_tag_block_ci(page, "table", 0)?;
    let table = &page[ts..te];
    let (rs, re) = next_tag_block_ci(table, "tr", 0)?;
    let row = &table[rs..re];
    let (ss, se) = next_tag_block_ci(row, "span", 0)?;
    let id = squeeze_ws(&text_of(&row[ss..se]));
    if id.is_empty() { None } else { Some(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_row_span_only() {
        let page = r#"<div><table class="results">
            <tr><td><span><b>phs000007</b>.v30.p11</span> Framingham Cohort</td></tr>
            <tr><td><span><b>phs000008</b>.v1.p1</span></td></tr>
        </table></div>"#;
        assert_eq!(top_hit(page).as_deref(), Some("phs000007.v30.p11"));
    }

    #[test]
    fn id_split_across_lines() {
        let page = "<table><tr><td><span><b>phs000007</b>\n.v30.p11</span></td></tr></table>";
        assert_eq!(top_hit(page).as_deref(), Some("phs000007.v30.p11"));
    }

    #[test]
    fn no_table_no_hit() {
        assert_eq!(top_hit("<p>No items found.</p>"), None);
        assert_eq!(top_hit("<table><tr><td>nothing</td></tr></table>"), None);
    }
}
