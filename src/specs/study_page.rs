// src/specs/study_page.rs
//! Scraping *spec* for a study's detail page.
//!
//! Where things live:
//! - Title: `<span id="study-name">`. Absent on removed or non-study pages.
//! - History: `<div id="studyHistoryTable">` followed by a table whose rows
//!   link every version, oldest first: `<td><a href=…>phs…v8.p1</a></td>`.
//! - Results: the first `<tbody>`; each row is
//!   `study | data type | samples | subjects | samples | subjects …`.
//! - Consent groups: a bold `Legend` marker followed by a list of bold labels.
//!
//! Returns a plain [`StudyPage`]; deciding what to keep is the extractor's job.

use crate::core::html::{
    block_with_attr, blocks, cell_texts, inner_after_open_tag, next_tag_block_ci, text_of, to_lower,
};
use crate::core::sanitize::{parse_count, trim_label};

/// The parts of a detail page the extractor reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyPage {
    pub title: Option<String>,
    /// Every listed version id, oldest first.
    pub history: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub consent_groups: Vec<String>,
}

/// One line of the sequencing results table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub study: String,
    pub data_type: String,
    /// Interleaved samples / subjects counts.
    pub values: Vec<u64>,
}

pub fn parse(doc: &str) -> StudyPage {
    StudyPage {
        title: title(doc),
        history: history(doc),
        rows: result_rows(doc),
        consent_groups: consent_groups(doc),
    }
}

pub fn title(doc: &str) -> Option<String> {
    let inner = block_with_attr(doc, "span", "id=study-name")?;
    let t = text_of(inner);
    if t.is_empty() { None } else { Some(t) }
}

/// Version ids from the table inside the history `<div>`. A div without a
/// table of its own lists nothing.
pub fn history(doc: &str) -> Vec<String> {
    let Some(div) = block_with_attr(doc, "div", "id=studyhistorytable") else {
        return Vec::new();
    };
    let Some((ts, te)) = next_tag_block_ci(div, "table", 0) else {
        return Vec::new();
    };
    let table = &div[ts..te];

    let mut out = Vec::new();
    for tr in blocks(table, "tr") {
        let Some((ds, de)) = next_tag_block_ci(tr, "td", 0) else { continue };
        let td = &tr[ds..de];
        let Some((as_, ae)) = next_tag_block_ci(td, "a", 0) else { continue };
        let id = text_of(&td[as_..ae]);
        if !id.is_empty() {
            out.push(id);
        }
    }
    out
}

pub fn result_rows(doc: &str) -> Vec<ResultRow> {
    let Some((bs, be)) = next_tag_block_ci(doc, "tbody", 0) else {
        return Vec::new();
    };
    let body = &doc[bs..be];

    let mut out = Vec::new();
    for tr in blocks(body, "tr") {
        let cells: Vec<String> = cell_texts(tr).into_iter().filter(|c| !c.is_empty()).collect();
        if cells.len() < 2 {
            continue;
        }
        let values = cells[2..]
            .iter()
            .map(|c| {
                parse_count(c).unwrap_or_else(|| {
                    logd!("results row {}: non-numeric cell {c:?} counted as 0", cells[0]);
                    0
                })
            })
            .collect();
        out.push(ResultRow { study: cells[0].clone(), data_type: cells[1].clone(), values });
    }
    out
}

/// Labels after the bold `Legend` marker, up to the end of the element that
/// holds it (first `</div>`, `</td>` or `</table>`). No marker means no
/// consent groups.
pub fn consent_groups(doc: &str) -> Vec<String> {
    let Some(after) = legend_end(doc) else { return Vec::new() };
    let rest = &doc[after..];
    let lc = to_lower(rest);
    let cut = ["</div>", "</td>", "</table>"]
        .iter()
        .filter_map(|c| lc.find(c))
        .min()
        .unwrap_or(rest.len());
    let scope = &rest[..cut];

    let first_bold = next_tag_block_ci(scope, "b", 0).map(|(b, _)| b);
    let list = ["ul", "ol"]
        .iter()
        .filter_map(|t| next_tag_block_ci(scope, t, 0))
        .min_by_key(|(b, _)| *b);

    // A list opening before any bold label owns the labels.
    let region = match (list, first_bold) {
        (Some((ls, le)), Some(fb)) if ls < fb => &scope[ls..le],
        (Some((ls, le)), None) => &scope[ls..le],
        _ => scope,
    };

    let mut out: Vec<String> = Vec::new();
    for b in blocks(region, "b") {
        let label = trim_label(&text_of(&inner_after_open_tag(b)));
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

fn legend_end(doc: &str) -> Option<usize> {
    let mut pos = 0usize;
    while let Some((b, e)) = next_tag_block_ci(doc, "b", pos) {
        if to_lower(&trim_label(&text_of(&doc[b..e]))) == "legend" {
            return Some(e);
        }
        pos = e;
    }
    None
}
