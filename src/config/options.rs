// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Where the catalog lives and how hard to try reading it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub study_list_url: String,
    pub directory_url: String,
    pub study_page_url: String,
    pub search_url: String,
    /// Per attempt.
    pub timeout: Duration,
    /// Extra attempts after the first.
    pub retries: u32,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            study_list_url: s!(STUDY_LIST_URL),
            directory_url: s!(STUDY_DIRECTORY_URL),
            study_page_url: s!(STUDY_PAGE_URL),
            search_url: s!(SEARCH_PAGE_URL),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            retries: RETRIES,
            user_agent: s!(USER_AGENT),
        }
    }
}

impl CatalogConfig {
    pub fn directory_url_for(&self, base: &str) -> String {
        fill(&self.directory_url, base)
    }
    pub fn study_page_url_for(&self, id: &str) -> String {
        fill(&self.study_page_url, id)
    }
    pub fn search_url_for(&self, base: &str) -> String {
        fill(&self.search_url, base)
    }
}

/// Replace `{id}` in a URL template.
pub fn fill(template: &str, id: &str) -> String {
    template.replace("{id}", id)
}

/// Which optional parts of a study page to read.
///
/// Parent-study runs leave both flags off; top-level runs turn both on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Fetch each substudy's own page for its title.
    pub substudy_names: bool,
    /// Read the consent-group legend.
    pub consent_groups: bool,
    /// Upper bound on history-table hops while chasing the newest version.
    pub max_version_hops: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            substudy_names: false,
            consent_groups: false,
            max_version_hops: MAX_VERSION_HOPS,
        }
    }
}

impl ExtractOptions {
    /// Substudy names and consent groups on.
    pub fn top_level() -> Self {
        Self { substudy_names: true, consent_groups: true, ..Self::default() }
    }
}

/// One update cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub catalog: CatalogConfig,
    pub extract: ExtractOptions,
    /// Restrict the run to these base ids instead of the full study list.
    pub study_ids: Option<Vec<String>>,
    /// Previous snapshot; `None` treats everything as new.
    pub infile: Option<PathBuf>,
    /// Where to persist the new snapshot.
    pub outfile: Option<PathBuf>,
    /// Diff report destination; `None` is stdout.
    pub updatefile: Option<PathBuf>,
    /// Full study table of the new snapshot.
    pub table: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Split of a study table into requested / not-yet-requested top-level studies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollateOptions {
    pub table: PathBuf,
    pub requested: PathBuf,
    pub existing_out: PathBuf,
    pub new_out: PathBuf,
    pub study_link_url: String,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl CollateOptions {
    pub fn new(table: PathBuf, requested: PathBuf) -> Self {
        Self {
            table,
            requested,
            existing_out: PathBuf::from(DEFAULT_EXISTING_FILE),
            new_out: PathBuf::from(DEFAULT_NEW_FILE),
            study_link_url: s!(STUDY_LINK_URL),
            log_file: None,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_fill_id() {
        let cfg = CatalogConfig::default();
        assert_eq!(
            cfg.directory_url_for("phs000007"),
            "https://ftp.ncbi.nlm.nih.gov/dbgap/studies/phs000007/"
        );
        assert!(cfg.study_page_url_for("phs000007.v30.p11").ends_with("study_id=phs000007.v30.p11"));
        assert!(cfg.search_url_for("phs1").ends_with("?term=phs1"));
        assert_eq!(cfg.retries, 3);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }
}
