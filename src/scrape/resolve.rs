// src/scrape/resolve.rs
//! Version resolution: unversioned base id → best-known versioned id.
//!
//! The study's directory listing is the primary source; the highest parsable
//! version wins. When nothing in the directory parses (or the directory can't
//! be read) the first keyword-search hit is accepted only if its base id is
//! exactly the one asked for. This is best-effort; the extractor later chases
//! the true newest version through the page's history table.

use crate::catalog::CatalogSource;
use crate::error::FetchError;
use crate::ident::StudyId;
use crate::progress::Progress;

/// Highest-version parsable entry; the first one wins on ties.
pub fn best_entry<S: AsRef<str>>(entries: &[S]) -> Option<StudyId> {
    let mut best: Option<StudyId> = None;
    for entry in entries {
        let Some(id) = StudyId::parse(entry.as_ref()) else { continue };
        if best.as_ref().is_none_or(|b| id.version() > b.version()) {
            best = Some(id);
        }
    }
    best
}

/// Resolve one base id. `Ok(None)` means unresolvable; `Err` means the
/// search fallback could not be fetched either.
pub fn resolve<C: CatalogSource + ?Sized>(
    catalog: &C,
    base: &str,
) -> Result<Option<StudyId>, FetchError> {
    match catalog.directory_entries(base) {
        Ok(entries) => {
            if let Some(id) = best_entry(&entries) {
                logd!("Resolve: {base} → {id} (directory, {} entries)", entries.len());
                return Ok(Some(id));
            }
            logd!("Resolve: {base}: no versioned entries in directory, searching");
        }
        Err(e) => logd!("Resolve: {base}: directory unavailable ({e}), searching"),
    }

    let hit = catalog.search_top_hit(base)?;
    let resolved = hit
        .as_deref()
        .and_then(StudyId::parse)
        .filter(|id| id.base() == base);

    match (&hit, &resolved) {
        (_, Some(id)) => logd!("Resolve: {base} → {id} (search)"),
        (Some(other), None) => logd!("Resolve: {base}: top search hit {other:?} rejected"),
        (None, None) => logd!("Resolve: {base}: no search results"),
    }
    Ok(resolved)
}

/// Resolve every base id in order. Unresolvable and unreachable ids are
/// logged, reported and dropped; the rest of the batch carries on.
pub fn resolve_all<C: CatalogSource + ?Sized>(
    catalog: &C,
    bases: &[String],
    progress: &mut dyn Progress,
) -> Vec<StudyId> {
    progress.begin("resolve", bases.len());
    let mut out = Vec::with_capacity(bases.len());
    for base in bases {
        match resolve(catalog, base) {
            Ok(Some(id)) => {
                progress.item_done(&format!("{base} → {id}"));
                out.push(id);
            }
            Ok(None) => {
                logf!("Resolve: {base}: unresolvable, skipped");
                progress.item_failed(base, "no versioned id found");
            }
            Err(e) => {
                loge!("Resolve: {base}: {e}");
                progress.item_failed(base, &e.to_string());
            }
        }
    }
    progress.finish();
    out
}
