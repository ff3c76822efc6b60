// src/runner.rs
use std::io::{self, Write};

use crate::{
    catalog::CatalogSource,
    config::options::{CollateOptions, RunOptions},
    diff::{diff, report_string, write_report},
    error::RunError,
    export::{self, STUDY_TABLE_HEADERS, TOP_LEVEL_HEADERS},
    model::DiffResult,
    progress::Progress,
    scrape::collect_snapshot,
    store,
};

/// One update cycle: previous snapshot → fresh snapshot → persist → diff → report.
///
/// The report goes to `updatefile` when set, stdout otherwise. A failure to
/// read the catalog's study list aborts before anything is written.
pub fn update<C: CatalogSource + ?Sized>(
    opts: &RunOptions,
    catalog: &C,
    progress: &mut dyn Progress,
) -> Result<DiffResult, RunError> {
    let old = match &opts.infile {
        Some(path) => store::load_snapshot(path)?,
        None => Vec::new(),
    };
    progress.log(&format!("Previous snapshot: {} studies", old.len()));

    let new = collect_snapshot(catalog, opts.study_ids.as_deref(), &opts.extract, progress)?;

    if let Some(path) = &opts.outfile {
        store::save_snapshot(path, &new)?;
        progress.log(&format!("Saved {} studies to {}", new.len(), path.display()));
    }

    if let Some(path) = &opts.table {
        let rows: Vec<Vec<String>> =
            export::study_rows(&new).iter().map(export::StudyRow::to_cells).collect();
        store::write_table(path, &STUDY_TABLE_HEADERS, &rows)?;
        progress.log(&format!("Study table written to {}", path.display()));
    }

    let result = diff(&old, &new);
    logf!(
        "Update: {} new, {} updated",
        result.new_studies.len(),
        result.updated_studies.len()
    );

    match &opts.updatefile {
        Some(path) => store::write_atomic(path, report_string(&result).as_bytes())?,
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, &result)?;
            out.flush()?;
        }
    }
    Ok(result)
}

/// What a collation produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollateSummary {
    pub requested: usize,
    pub not_requested: usize,
    /// Ids seen both as a top-level study and as a substudy.
    pub overlapping: Vec<String>,
}

/// Split a study table into requested and not-yet-requested top-level studies.
pub fn collate(opts: &CollateOptions, progress: &mut dyn Progress) -> Result<CollateSummary, RunError> {
    let rows = export::parse_study_rows(&store::read_table(&opts.table)?);
    progress.log(&format!("Read {} rows from {}", rows.len(), opts.table.display()));

    let overlapping = export::parent_and_substudy(&rows);
    for id in &overlapping {
        loge!("Collate: {id} is listed both as a top-level study and as a substudy");
        progress.log(&format!("Warning: {id} is both a top-level study and a substudy"));
    }

    let requested = export::requested_bases(&store::read_text(&opts.requested)?);
    progress.log(&format!("{} studies already requested", requested.len()));

    let split = export::split_top_level(&rows, &requested, &opts.study_link_url);
    store::write_table(&opts.existing_out, &TOP_LEVEL_HEADERS, &split.requested)?;
    store::write_table(&opts.new_out, &TOP_LEVEL_HEADERS, &split.not_requested)?;
    progress.log(&format!(
        "{} requested → {}, {} not requested → {}",
        split.requested.len(),
        opts.existing_out.display(),
        split.not_requested.len(),
        opts.new_out.display()
    ));

    Ok(CollateSummary {
        requested: split.requested.len(),
        not_requested: split.not_requested.len(),
        overlapping,
    })
}
