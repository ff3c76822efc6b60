// src/config/consts.rs

// Catalog endpoints. `{id}` is replaced with a base or versioned study id.
pub const STUDY_LIST_URL: &str = "https://ftp.ncbi.nlm.nih.gov/dbgap/studies/";
pub const STUDY_DIRECTORY_URL: &str = "https://ftp.ncbi.nlm.nih.gov/dbgap/studies/{id}/";
pub const STUDY_PAGE_URL: &str =
    "https://www.ncbi.nlm.nih.gov/projects/gap/cgi-bin/molecular.cgi?study_id={id}";
pub const SEARCH_PAGE_URL: &str = "https://www.ncbi.nlm.nih.gov/gap/?term={id}";
pub const STUDY_LINK_URL: &str =
    "https://www.ncbi.nlm.nih.gov/projects/gap/cgi-bin/study.cgi?study_id={id}";

// Net config
pub const TIMEOUT_SECS: u64 = 5;
pub const RETRIES: u32 = 3;
pub const USER_AGENT: &str = concat!("dbgap_scrape/", env!("CARGO_PKG_VERSION"));

// Scrape
pub const MAX_VERSION_HOPS: usize = 64;

// Local files
pub const DEFAULT_LOG_FILE: &str = ".dbgap/debug.log";
pub const DEFAULT_EXISTING_FILE: &str = "existing_top_level_studies.tsv";
pub const DEFAULT_NEW_FILE: &str = "new_top_level_studies.tsv";
