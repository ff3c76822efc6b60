// src/diff.rs
//! Snapshot differ and the human-readable update report.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::model::{DiffResult, StudyRecord};

const RULE: &str = "----------------------------------------";

/// Compare `new` against `old`, keyed by base id.
///
/// - new: base id absent from `old`
/// - updated: base id present in `old` with a strictly lower version
///
/// Studies only in `old` are not reported. If a base id repeats within one
/// snapshot the last record for it counts. Output keeps `new`'s order.
pub fn diff(old: &[StudyRecord], new: &[StudyRecord]) -> DiffResult {
    let old_by_id: HashMap<&str, &StudyRecord> = old.iter().map(|r| (r.base(), r)).collect();
    let last_in_new: HashMap<&str, usize> =
        new.iter().enumerate().map(|(i, r)| (r.base(), i)).collect();

    let mut out = DiffResult::default();
    for (i, rec) in new.iter().enumerate() {
        if last_in_new.get(rec.base()) != Some(&i) {
            continue;
        }
        match old_by_id.get(rec.base()) {
            None => out.new_studies.push(rec.clone()),
            Some(prev) if rec.version() > prev.version() => out.updated_studies.push(rec.clone()),
            Some(_) => {}
        }
    }
    out
}

/// Render both sections. Studies without any sequence counts of interest
/// are left out here, not in [`diff`].
pub fn report_string(result: &DiffResult) -> String {
    let mut out = String::new();
    push_section(&mut out, "New studies", &result.new_studies);
    out.push('\n');
    push_section(&mut out, "Updated studies", &result.updated_studies);
    out
}

/// [`report_string`] into any writer.
pub fn write_report<W: Write>(mut w: W, result: &DiffResult) -> io::Result<()> {
    w.write_all(report_string(result).as_bytes())?;
    w.flush()
}

fn push_section(out: &mut String, title: &str, studies: &[StudyRecord]) {
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    for rec in studies.iter().filter(|r| r.is_reportable()) {
        push_study(out, rec);
    }
}

fn push_study(out: &mut String, rec: &StudyRecord) {
    out.push_str(&format!("{}: {}\n", rec.id, rec.name));
    if !rec.consent_groups.is_empty() {
        out.push_str(&format!("\tConsent groups: {}\n", rec.consent_groups.join(", ")));
    }
    for sub in rec.seqs.values() {
        let counts = sub
            .seqs
            .iter()
            .map(|(label, n)| format!("{n} {label}"))
            .collect::<Vec<_>>()
            .join(", ");
        match &sub.name {
            Some(name) if !name.is_empty() => out.push_str(&format!("\t{} ({name}): {counts}\n", sub.id)),
            _ => out.push_str(&format!("\t{}: {counts}\n", sub.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;

    const WGS: &[(&str, u64)] = &[("Whole Genome Sequencing", 10)];

    #[test]
    fn new_and_updated() {
        let old = vec![record("phs1.v1.p1", "A", &[("phs1.v1.p1", WGS)])];
        let new = vec![
            record("phs1.v2.p1", "A", &[("phs1.v2.p1", WGS)]),
            record("phs2.v1.p1", "B", &[("phs2.v1.p1", WGS)]),
        ];
        let d = diff(&old, &new);
        assert_eq!(d.new_studies.iter().map(|r| r.id.full()).collect::<Vec<_>>(), vec!["phs2.v1.p1"]);
        assert_eq!(d.updated_studies.iter().map(|r| r.id.full()).collect::<Vec<_>>(), vec!["phs1.v2.p1"]);
    }

    #[test]
    fn version_rollback_is_not_an_update() {
        let old = vec![record("phs1.v2.p1", "A", &[])];
        let new = vec![record("phs1.v1.p1", "A", &[])];
        let d = diff(&old, &new);
        assert!(d.updated_studies.is_empty());
        assert!(d.new_studies.is_empty());
    }

    #[test]
    fn same_version_and_deletions_are_silent() {
        let old = vec![record("phs1.v2.p1", "A", &[]), record("phs9.v1.p1", "Gone", &[])];
        let new = vec![record("phs1.v2.p2", "A", &[])];
        assert_eq!(diff(&old, &new), DiffResult::default());
    }

    #[test]
    fn empty_old_means_everything_is_new() {
        let new = vec![record("phs1.v1.p1", "A", &[]), record("phs2.v3.p1", "B", &[])];
        let d = diff(&[], &new);
        assert_eq!(d.new_studies.len(), 2);
    }

    #[test]
    fn duplicate_base_in_new_counts_once() {
        let new = vec![record("phs1.v1.p1", "A", &[]), record("phs1.v3.p1", "A", &[])];
        let d = diff(&[], &new);
        assert_eq!(d.new_studies.len(), 1);
        assert_eq!(d.new_studies[0].version(), 3);
    }

    #[test]
    fn report_layout() {
        let mut a = record(
            "phs1.v2.p1",
            "Alpha",
            &[
                ("phs1.v2.p1", &[("Whole Exome Sequencing", 4), ("Whole Genome Sequencing", 10)]),
                ("phs3.v1.p1", WGS),
            ],
        );
        a.consent_groups = vec![s!("GRU"), s!("HMB")];
        a.seqs.get_mut("phs3").unwrap().name = Some(s!("Sub Three"));
        let b = record("phs2.v1.p1", "No data", &[]);
        let d = DiffResult { new_studies: vec![a, b], updated_studies: vec![] };

        let expected = "New studies\n\
            ----------------------------------------\n\
            phs1.v2.p1: Alpha\n\
            \tConsent groups: GRU, HMB\n\
            \tphs1.v2.p1: 4 Whole Exome Sequencing, 10 Whole Genome Sequencing\n\
            \tphs3.v1.p1 (Sub Three): 10 Whole Genome Sequencing\n\
            \n\
            Updated studies\n\
            ----------------------------------------\n";
        assert_eq!(report_string(&d), expected);
    }
}
