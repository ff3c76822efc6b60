// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific readers for the catalog. Each spec knows *where the ground
//! truth lives in the markup* of one kind of page and turns it into a small
//! structured value. Nothing here fetches, caches or decides what to do next.
//!
//! ## Pages
//! - `listing` – directory listings of the study tree (root list of base ids,
//!   per-study list of versioned ids). Accepts an HTML index or a plain
//!   FTP-style listing.
//! - `search` – the first hit of a keyword search.
//! - `study_page` – a study's detail page: title, version history, sequencing
//!   results table, consent-group legend.
//!
//! ## Conventions
//! - Case-insensitive tag detection via `core::html`; no full-document regexes.
//! - Scan locally inside the block that owns the data (`<tbody>`, the history
//!   `<div>`, the list after the legend marker).
//! - Missing pieces come back empty or `None`; callers decide if that matters.
//!
//! Testable offline against captured or hand-written fixtures.
pub mod listing;
pub mod search;
pub mod study_page;

pub use study_page::{ResultRow, StudyPage};
