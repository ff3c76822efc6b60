// src/scrape/mod.rs
//! Resolve → extract, over a whole batch of studies.
pub mod extract;
pub mod resolve;

pub use extract::{extract, extract_all};
pub use resolve::{resolve, resolve_all};

use crate::catalog::CatalogSource;
use crate::config::options::ExtractOptions;
use crate::error::FetchError;
use crate::model::Snapshot;
use crate::progress::Progress;

/// Build a fresh snapshot.
///
/// `study_ids` restricts the run to those base ids; otherwise the catalog's
/// study list is read, and that listing is the only fetch whose failure
/// aborts the run. Every other failure only drops the study it belongs to.
pub fn collect_snapshot<C: CatalogSource + ?Sized>(
    catalog: &C,
    study_ids: Option<&[String]>,
    opts: &ExtractOptions,
    progress: &mut dyn Progress,
) -> Result<Snapshot, FetchError> {
    let bases = match study_ids {
        Some(ids) => {
            progress.log("Using existing list of parent study ids");
            ids.to_vec()
        }
        None => catalog.study_list()?,
    };
    logf!("Collect: {} base ids", bases.len());

    let resolved = resolve_all(catalog, &bases, progress);
    progress.log(&format!("Fetching info for {} studies", resolved.len()));

    let snapshot = extract_all(catalog, &resolved, opts, progress);
    logf!("Collect: {} records", snapshot.len());
    Ok(snapshot)
}
