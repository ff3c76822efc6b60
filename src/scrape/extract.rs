// src/scrape/extract.rs
//! Study info extraction: versioned id → [`StudyRecord`] at the newest
//! version the catalog admits to.

use std::collections::BTreeMap;

use crate::catalog::CatalogSource;
use crate::config::options::ExtractOptions;
use crate::error::FetchError;
use crate::ident::StudyId;
use crate::model::{Snapshot, StudyRecord, SubstudyRecord};
use crate::progress::Progress;
use crate::specs::{ResultRow, StudyPage};

/// Data types worth counting. Case-insensitive.
pub fn matches_data_type(label: &str) -> bool {
    let label = label.to_lowercase();
    label.contains("whole exome") || label.contains("whole genome")
}

/// Samples-column total of a results row: values alternate samples and
/// subjects, so every even index is summed.
pub fn sequence_total(values: &[u64]) -> u64 {
    values.iter().step_by(2).fold(0, |acc, n| acc.saturating_add(*n))
}

/// Fold the kept results rows into per-substudy counts keyed by base id.
/// A data type repeated for one substudy adds up.
pub fn substudies_from_rows(rows: &[ResultRow]) -> BTreeMap<String, SubstudyRecord> {
    let mut out: BTreeMap<String, SubstudyRecord> = BTreeMap::new();
    for row in rows {
        if !matches_data_type(&row.data_type) {
            continue;
        }
        let Some(sub) = StudyId::parse(&row.study) else {
            logd!("Extract: results row with unparsable study {:?} skipped", row.study);
            continue;
        };
        let total = sequence_total(&row.values);
        let rec = out
            .entry(s!(sub.base()))
            .or_insert_with(|| SubstudyRecord::new(sub));
        let count = rec.seqs.entry(row.data_type.clone()).or_insert(0);
        *count = count.saturating_add(total);
    }
    out
}

/// Newest version id listed in the page's history table.
fn newest_listed(page: &StudyPage) -> Option<StudyId> {
    page.history.last().and_then(|raw| StudyId::parse(raw))
}

/// Extract one study.
///
/// `Ok(None)` when the requested page has no title (removed or not a study).
/// When the history table lists a newer version the newer page is used
/// instead, hop by hop, up to `max_version_hops`.
pub fn extract<C: CatalogSource + ?Sized>(
    catalog: &C,
    requested: &StudyId,
    opts: &ExtractOptions,
) -> Result<Option<StudyRecord>, FetchError> {
    let mut current = requested.clone();
    let mut page = catalog.study_page(&current)?;
    let Some(mut name) = page.title.clone() else {
        logf!("Extract: {current}: no study title, skipped");
        return Ok(None);
    };

    for _ in 0..opts.max_version_hops {
        let Some(newest) = newest_listed(&page) else { break };
        if newest.base() != current.base() {
            logd!("Extract: {current}: history lists foreign id {newest}, ignored");
            break;
        }
        if newest.version() <= current.version() {
            break;
        }
        logd!("Extract: {current}: history lists newer {newest}");
        let next = catalog.study_page(&newest)?;
        let Some(next_name) = next.title.clone() else {
            logf!("Extract: {newest}: no study title, staying on {current}");
            break;
        };
        current = newest;
        page = next;
        name = next_name;
    }

    let mut seqs = substudies_from_rows(&page.rows);

    if opts.substudy_names {
        for (base, sub) in seqs.iter_mut() {
            sub.name = if base == current.base() {
                Some(name.clone())
            } else {
                substudy_title(catalog, &sub.id)
            };
        }
    }

    let consent_groups = if opts.consent_groups { page.consent_groups } else { Vec::new() };

    Ok(Some(StudyRecord { id: current, name, consent_groups, seqs }))
}

/// Title of a substudy's own page; any failure is just "no name".
fn substudy_title<C: CatalogSource + ?Sized>(catalog: &C, id: &StudyId) -> Option<String> {
    match catalog.study_page(id) {
        Ok(page) => page.title,
        Err(e) => {
            logd!("Extract: substudy {id}: {e}");
            None
        }
    }
}

/// Extract every resolved id in order, skipping failures.
pub fn extract_all<C: CatalogSource + ?Sized>(
    catalog: &C,
    ids: &[StudyId],
    opts: &ExtractOptions,
    progress: &mut dyn Progress,
) -> Snapshot {
    progress.begin("extract", ids.len());
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match extract(catalog, id, opts) {
            Ok(Some(record)) => {
                progress.item_done(&format!("{} ({})", record.id, record.name));
                out.push(record);
            }
            Ok(None) => progress.item_failed(id.full(), "no info found"),
            Err(e) => {
                loge!("Extract: {id}: {e}");
                progress.item_failed(id.full(), &e.to_string());
            }
        }
    }
    progress.finish();
    out
}
