// src/export.rs
//! Flat tables for downstream reporting.
//!
//! Study table (one snapshot, every study):
//! - the study's only substudy is itself → one row, parent `NA`
//! - otherwise → one aggregate row (parent `NA`) then one row per substudy
//!   (parent = the study's id, consent groups left blank)
//!
//! Top-level split (collation): top-level rows with a non-zero total,
//! divided by whether the study was already requested, with a study link.

use std::collections::BTreeSet;

use crate::config::options::fill;
use crate::core::sanitize::parse_count;
use crate::model::StudyRecord;

pub const STUDY_TABLE_HEADERS: [&str; 7] =
    ["study_id", "parent_id", "wgs_num", "wes_num", "seq_total", "consent_groups", "name"];

pub const TOP_LEVEL_HEADERS: [&str; 7] =
    ["top_level_study", "wgs_num", "wes_num", "seq_total", "consent_groups", "name", "url"];

pub const NO_PARENT: &str = "NA";

const CONSENT_SEP: &str = ",";

/// One line of the study table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyRow {
    pub study_id: String,
    /// `None` for top-level rows (`NA` on disk).
    pub parent_id: Option<String>,
    pub wgs: u64,
    pub wes: u64,
    pub consent_groups: String,
    pub name: String,
}

impl StudyRow {
    pub fn seq_total(&self) -> u64 {
        self.wgs.saturating_add(self.wes)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn to_cells(&self) -> Vec<String> {
        row![
            self.study_id,
            self.parent_id.as_deref().unwrap_or(NO_PARENT),
            self.wgs,
            self.wes,
            self.seq_total(),
            self.consent_groups,
            self.name,
        ]
    }

    /// Inverse of [`to_cells`](Self::to_cells). `seq_total` is recomputed.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() < STUDY_TABLE_HEADERS.len() {
            return None;
        }
        Some(Self {
            study_id: cells[0].clone(),
            parent_id: (cells[1] != NO_PARENT).then(|| cells[1].clone()),
            wgs: parse_count(&cells[2])?,
            wes: parse_count(&cells[3])?,
            consent_groups: cells[5].clone(),
            name: cells[6].clone(),
        })
    }
}

/// Rows for one study.
pub fn rows_for(rec: &StudyRecord) -> Vec<StudyRow> {
    let consents = rec.consent_groups.join(CONSENT_SEP);
    let top = StudyRow {
        study_id: s!(rec.id.full()),
        parent_id: None,
        wgs: rec.wgs(),
        wes: rec.wes(),
        consent_groups: consents,
        name: rec.name.clone(),
    };
    if rec.is_self_substudy() {
        return vec![top];
    }

    let mut out = Vec::with_capacity(rec.seqs.len() + 1);
    out.push(top);
    for sub in rec.seqs.values() {
        out.push(StudyRow {
            study_id: s!(sub.id.full()),
            parent_id: Some(s!(rec.id.full())),
            wgs: sub.wgs(),
            wes: sub.wes(),
            consent_groups: s!(),
            name: sub.name.clone().unwrap_or_default(),
        });
    }
    out
}

/// Study table rows for a whole snapshot, in snapshot order.
pub fn study_rows(snapshot: &[StudyRecord]) -> Vec<StudyRow> {
    snapshot.iter().flat_map(rows_for).collect()
}

/// Read a study table back. The header row and malformed rows are skipped.
pub fn parse_study_rows(rows: &[Vec<String>]) -> Vec<StudyRow> {
    let mut out = Vec::with_capacity(rows.len());
    for cells in rows {
        if cells.first().map(String::as_str) == Some(STUDY_TABLE_HEADERS[0]) {
            continue;
        }
        match StudyRow::from_cells(cells) {
            Some(r) => out.push(r),
            None => logd!("Study table: malformed row {cells:?} skipped"),
        }
    }
    out
}

/// Ids listed both as a top-level study and as another study's substudy.
/// A parent's row for its own substudy doesn't count. Expected to be empty;
/// anything else points at a scraping problem.
pub fn parent_and_substudy(rows: &[StudyRow]) -> Vec<String> {
    let top: BTreeSet<&str> = rows.iter().filter(|r| r.is_top_level()).map(|r| r.study_id.as_str()).collect();
    let sub: BTreeSet<&str> = rows
        .iter()
        .filter(|r| r.parent_id.as_ref().is_some_and(|p| *p != r.study_id))
        .map(|r| r.study_id.as_str())
        .collect();
    top.intersection(&sub).map(|s| s.to_string()).collect()
}

/// Base ids from a requested-studies list (full or partial ids, one per line).
pub fn requested_bases(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split('.').next())
        .map(|b| b.to_string())
        .collect()
}

/// Top-level rows split into (already requested, not requested).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopLevelSplit {
    pub requested: Vec<Vec<String>>,
    pub not_requested: Vec<Vec<String>>,
}

pub fn split_top_level(
    rows: &[StudyRow],
    requested: &BTreeSet<String>,
    link_template: &str,
) -> TopLevelSplit {
    let mut out = TopLevelSplit::default();
    for r in rows.iter().filter(|r| r.is_top_level() && r.seq_total() > 0) {
        let cells = row![
            r.study_id,
            r.wgs,
            r.wes,
            r.seq_total(),
            r.consent_groups,
            r.name,
            fill(link_template, &r.study_id),
        ];
        let base = r.study_id.split('.').next().unwrap_or(&r.study_id);
        if requested.contains(base) {
            out.requested.push(cells);
        } else {
            out.not_requested.push(cells);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;

    #[test]
    fn self_substudy_collapses_to_one_row() {
        let rec = record(
            "phs1.v2.p1",
            "Solo",
            &[("phs1.v2.p1", &[("Whole Genome Sequencing", 10), ("Whole Exome Sequencing", 5)])],
        );
        let rows = rows_for(&rec);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_cells(), row!["phs1.v2.p1", "NA", 10, 5, 15, "", "Solo"]);
    }

    #[test]
    fn aggregate_then_substudies() {
        let mut rec = record(
            "phs1.v2.p1",
            "Parent",
            &[
                ("phs2.v1.p1", &[("Whole Genome Sequencing", 10)]),
                ("phs3.v4.p2", &[("Whole Exome Sequencing", 3), ("whole genome (WGS)", 1)]),
            ],
        );
        rec.consent_groups = vec![s!("GRU"), s!("HMB")];
        rec.seqs.get_mut("phs2").unwrap().name = Some(s!("Two"));

        let cells: Vec<Vec<String>> = rows_for(&rec).iter().map(StudyRow::to_cells).collect();
        assert_eq!(
            cells,
            vec![
                row!["phs1.v2.p1", "NA", 11, 3, 14, "GRU,HMB", "Parent"],
                row!["phs2.v1.p1", "phs1.v2.p1", 10, 0, 10, "", "Two"],
                row!["phs3.v4.p2", "phs1.v2.p1", 1, 3, 4, "", ""],
            ]
        );
    }

    #[test]
    fn table_reads_back() {
        let rec = record("phs1.v2.p1", "P", &[("phs2.v1.p1", &[("Whole Genome Sequencing", 2)])]);
        let rows = rows_for(&rec);
        let mut cells = vec![STUDY_TABLE_HEADERS.iter().map(|s| s.to_string()).collect::<Vec<_>>()];
        cells.extend(rows.iter().map(StudyRow::to_cells));
        cells.push(row!["broken", "row"]);
        assert_eq!(parse_study_rows(&cells), rows);
    }

    #[test]
    fn overlap_check() {
        let rows = vec![
            StudyRow { study_id: s!("phs1.v1.p1"), parent_id: None, wgs: 1, wes: 0, consent_groups: s!(), name: s!() },
            StudyRow { study_id: s!("phs2.v1.p1"), parent_id: None, wgs: 1, wes: 0, consent_groups: s!(), name: s!() },
            StudyRow { study_id: s!("phs2.v1.p1"), parent_id: Some(s!("phs1.v1.p1")), wgs: 1, wes: 0, consent_groups: s!(), name: s!() },
            StudyRow { study_id: s!("phs1.v1.p1"), parent_id: Some(s!("phs1.v1.p1")), wgs: 1, wes: 0, consent_groups: s!(), name: s!() },
        ];
        assert_eq!(parent_and_substudy(&rows), vec!["phs2.v1.p1"]);
    }

    #[test]
    fn requested_split_skips_empty_and_substudies() {
        let requested = requested_bases("phs1.v1.p1\nphs1.v2.p1\n\n  phs9  \n");
        assert_eq!(requested.len(), 2);

        let rows = vec![
            StudyRow { study_id: s!("phs1.v3.p1"), parent_id: None, wgs: 2, wes: 1, consent_groups: s!("GRU"), name: s!("One") },
            StudyRow { study_id: s!("phs2.v1.p1"), parent_id: None, wgs: 0, wes: 4, consent_groups: s!(), name: s!("Two") },
            StudyRow { study_id: s!("phs3.v1.p1"), parent_id: None, wgs: 0, wes: 0, consent_groups: s!(), name: s!("Zero") },
            StudyRow { study_id: s!("phs4.v1.p1"), parent_id: Some(s!("phs2.v1.p1")), wgs: 4, wes: 0, consent_groups: s!(), name: s!() },
        ];
        let split = split_top_level(&rows, &requested, "https://example.org/study?id={id}");
        assert_eq!(
            split.requested,
            vec![row!["phs1.v3.p1", 2, 1, 3, "GRU", "One", "https://example.org/study?id=phs1.v3.p1"]]
        );
        assert_eq!(split.not_requested.len(), 1);
        assert_eq!(split.not_requested[0][0], "phs2.v1.p1");
    }
}
