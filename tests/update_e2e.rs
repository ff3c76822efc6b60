// tests/update_e2e.rs
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use dbgap_scrape::catalog::RemoteCatalog;
use dbgap_scrape::config::options::{CatalogConfig, CollateOptions, ExtractOptions, RunOptions};
use dbgap_scrape::core::Fetch;
use dbgap_scrape::error::{FetchError, RunError};
use dbgap_scrape::progress::NullProgress;
use dbgap_scrape::ident::StudyId;
use dbgap_scrape::scrape::extract;
use dbgap_scrape::{runner, store, tsv};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("dbgap_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// Pages served from memory by URL.
#[derive(Default)]
struct FakeFetch {
    pages: HashMap<String, String>,
}

impl FakeFetch {
    fn serve(&mut self, url: &str, body: String) {
        self.pages.insert(url.to_string(), body);
    }
}

impl Fetch for FakeFetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::EmptyResponse { url: url.to_string(), attempts: 1 })
    }
}

fn config() -> CatalogConfig {
    CatalogConfig {
        study_list_url: "mem://studies/".into(),
        directory_url: "mem://studies/{id}/".into(),
        study_page_url: "mem://page?study_id={id}".into(),
        search_url: "mem://search?term={id}".into(),
        ..CatalogConfig::default()
    }
}

fn listing(entries: &[&str]) -> String {
    let mut s = String::from("<html><body><pre>\n<a href=\"../\">Parent Directory</a>\n");
    for e in entries {
        s.push_str(&format!("<a href=\"{e}/\">{e}/</a>   2020-01-01 00:00   -\n"));
    }
    s.push_str("</pre></body></html>");
    s
}

fn study_html(title: &str, history: &[&str], rows: &[(&str, &str, u64, u64)], consents: &[&str]) -> String {
    let mut s = format!("<html><body><span id=\"study-name\">{title}</span>\n");
    s.push_str("<div id=\"studyHistoryTable\"><table>\n");
    for h in history {
        s.push_str(&format!("<tr><td><a href=\"?study_id={h}\">{h}</a></td><td>date</td></tr>\n"));
    }
    s.push_str("</table></div>\n<table><tbody>\n");
    for (study, kind, samples, subjects) in rows {
        s.push_str(&format!(
            "<tr><td>{study}</td><td>{kind}</td><td>{samples}</td><td>{subjects}</td></tr>\n"
        ));
    }
    s.push_str("</tbody></table>\n");
    if !consents.is_empty() {
        s.push_str("<p><b>Legend</b></p><ul>");
        for c in consents {
            s.push_str(&format!("<li><b>{c}</b> consent text</li>"));
        }
        s.push_str("</ul>");
    }
    s.push_str("</body></html>");
    s
}

/// Two parent studies; `alpha_version` decides how far along phs000001 is.
fn catalog_at(alpha_version: u32) -> FakeFetch {
    let mut f = FakeFetch::default();
    f.serve("mem://studies/", listing(&["phs000001", "phs000002", "README.txt"]));

    let alpha_versions: Vec<String> = (1..=alpha_version).map(|v| format!("phs000001.v{v}.p1")).collect();
    let alpha_refs: Vec<&str> = alpha_versions.iter().map(String::as_str).collect();
    f.serve("mem://studies/phs000001/", listing(&alpha_refs));
    for id in &alpha_refs {
        f.serve(
            &format!("mem://page?study_id={id}"),
            study_html(
                "Alpha Cohort",
                &alpha_refs,
                &[
                    (*id, "Whole Genome Sequencing", 100 * alpha_version as u64, 90),
                    ("phs000003.v1.p1", "Whole Exome Sequencing", 20, 20),
                    ("phs000003.v1.p1", "SNP Genotypes (Array)", 999, 999),
                ],
                &["GRU", "HMB-IRB"],
            ),
        );
    }
    f.serve(
        "mem://page?study_id=phs000003.v1.p1",
        study_html("Alpha Exomes", &["phs000003.v1.p1"], &[], &[]),
    );

    // Beta has no readable directory; found through search.
    f.serve(
        "mem://search?term=phs000002",
        "<table><tr><td><span><b>phs000002</b>.v4.p2</span> Beta</td></tr></table>".to_string(),
    );
    f.serve(
        "mem://page?study_id=phs000002.v4.p2",
        study_html("Beta Study", &[], &[("phs000002.v4.p2", "Whole Exome Sequencing", 7, 7)], &[]),
    );
    f
}

fn run_opts(dir: &PathBuf, infile: &str, outfile: &str, report: &str) -> RunOptions {
    RunOptions {
        catalog: config(),
        extract: ExtractOptions::top_level(),
        infile: Some(dir.join(infile)),
        outfile: Some(dir.join(outfile)),
        updatefile: Some(dir.join(report)),
        table: Some(dir.join("table.tsv")),
        ..RunOptions::default()
    }
}

#[test]
fn first_run_reports_everything_as_new() {
    let dir = tmp_dir("first_run");
    let catalog = RemoteCatalog::new(config(), catalog_at(1));
    let opts = run_opts(&dir, "missing.json", "snap1.json", "report.txt");

    let result = runner::update(&opts, &catalog, &mut NullProgress).unwrap();
    assert_eq!(result.new_studies.len(), 2);
    assert!(result.updated_studies.is_empty());

    let report = fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.starts_with("New studies\n"));
    assert!(report.contains("phs000001.v1.p1: Alpha Cohort\n"));
    assert!(report.contains("\tConsent groups: GRU, HMB-IRB\n"));
    assert!(report.contains("\tphs000003.v1.p1 (Alpha Exomes): 20 Whole Exome Sequencing\n"));
    assert!(report.contains("phs000002.v4.p2: Beta Study\n"));

    let saved = store::load_snapshot(&dir.join("snap1.json")).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].seqs["phs000001"].seqs["Whole Genome Sequencing"], 100);
    assert!(!dir.join("snap1.json.tmp").exists());

    let table = tsv::parse_rows(&fs::read_to_string(dir.join("table.tsv")).unwrap());
    assert_eq!(table[0][0], "study_id");
    assert_eq!(
        table[1],
        vec!["phs000001.v1.p1", "NA", "100", "20", "120", "GRU,HMB-IRB", "Alpha Cohort"]
    );
    // Beta is its own only substudy: one row.
    assert_eq!(table.len(), 5);
    assert_eq!(table[4][0], "phs000002.v4.p2");
    assert_eq!(table[4][1], "NA");
}

#[test]
fn second_run_reports_version_bump_only() {
    let dir = tmp_dir("second_run");
    let first = run_opts(&dir, "none.json", "snap1.json", "report1.txt");
    runner::update(&first, &RemoteCatalog::new(config(), catalog_at(1)), &mut NullProgress).unwrap();

    let second = run_opts(&dir, "snap1.json", "snap2.json", "report2.txt");
    let result =
        runner::update(&second, &RemoteCatalog::new(config(), catalog_at(2)), &mut NullProgress).unwrap();
    assert!(result.new_studies.is_empty());
    assert_eq!(result.updated_studies.len(), 1);
    assert_eq!(result.updated_studies[0].id.full(), "phs000001.v2.p1");

    let report = fs::read_to_string(dir.join("report2.txt")).unwrap();
    let (new_part, updated_part) = report.split_once("Updated studies").unwrap();
    assert!(!new_part.contains("phs000001"));
    assert!(updated_part.contains("phs000001.v2.p1: Alpha Cohort"));
    assert!(updated_part.contains("200 Whole Genome Sequencing"));
}

#[test]
fn unreachable_study_list_aborts_before_writing() {
    let dir = tmp_dir("no_list");
    let catalog = RemoteCatalog::new(config(), FakeFetch::default());
    let opts = run_opts(&dir, "none.json", "snap.json", "report.txt");
    let err = runner::update(&opts, &catalog, &mut NullProgress).unwrap_err();
    assert!(matches!(err, RunError::Fetch(FetchError::EmptyResponse { .. })));
    assert!(!dir.join("snap.json").exists());
    assert!(!dir.join("report.txt").exists());
}

#[test]
fn explicit_ids_skip_the_study_list() {
    let dir = tmp_dir("explicit_ids");
    let mut opts = run_opts(&dir, "none.json", "snap.json", "report.txt");
    opts.study_ids = Some(vec!["phs000002".to_string()]);
    opts.extract = ExtractOptions::default();
    let mut fetch = catalog_at(1);
    fetch.pages.remove("mem://studies/");

    let result = runner::update(&opts, &RemoteCatalog::new(config(), fetch), &mut NullProgress).unwrap();
    assert_eq!(result.new_studies.len(), 1);
    assert_eq!(result.new_studies[0].id.full(), "phs000002.v4.p2");
    assert!(result.new_studies[0].consent_groups.is_empty());
}

#[test]
fn collate_splits_requested_studies() {
    let dir = tmp_dir("collate");
    let opts = run_opts(&dir, "none.json", "snap.json", "report.txt");
    runner::update(&opts, &RemoteCatalog::new(config(), catalog_at(1)), &mut NullProgress).unwrap();

    fs::write(dir.join("requested.txt"), "phs000001.v1.p1\nphs000001\n\nphs999999.v1.p1\n").unwrap();
    let mut collate = CollateOptions::new(dir.join("table.tsv"), dir.join("requested.txt"));
    collate.existing_out = dir.join("existing.tsv");
    collate.new_out = dir.join("new.tsv");
    collate.study_link_url = "https://example.org/study?study_id={id}".into();

    let summary = runner::collate(&collate, &mut NullProgress).unwrap();
    assert_eq!(summary.requested, 1);
    assert_eq!(summary.not_requested, 1);
    assert!(summary.overlapping.is_empty());

    let existing = tsv::parse_rows(&fs::read_to_string(dir.join("existing.tsv")).unwrap());
    assert_eq!(existing[0][0], "top_level_study");
    assert_eq!(existing[1][0], "phs000001.v1.p1");
    assert_eq!(existing[1][6], "https://example.org/study?study_id=phs000001.v1.p1");

    let new = tsv::parse_rows(&fs::read_to_string(dir.join("new.tsv")).unwrap());
    assert_eq!(new.len(), 2);
    assert_eq!(new[1][0], "phs000002.v4.p2");
    assert_eq!(new[1][3], "7");
}

#[test]
fn empty_history_div_keeps_the_requested_study() {
    let mut fetch = FakeFetch::default();
    fetch.serve(
        "mem://page?study_id=phs000001.v1.p1",
        r#"<html><body><span id="study-name">Alpha Cohort</span>
        <div id="studyHistoryTable"></div>
        <table><tbody>
            <tr><td><a href="?study_id=phs000009.v7.p1">phs000009.v7.p1</a></td>
                <td>Whole Genome Sequencing</td><td>5</td><td>5</td></tr>
        </tbody></table></body></html>"#
            .to_string(),
    );
    fetch.serve(
        "mem://page?study_id=phs000009.v7.p1",
        study_html("Some other study", &[], &[], &[]),
    );
    let catalog = RemoteCatalog::new(config(), fetch);

    let requested = StudyId::parse("phs000001.v1.p1").unwrap();
    let rec = extract(&catalog, &requested, &ExtractOptions::default()).unwrap().unwrap();
    assert_eq!(rec.id.full(), "phs000001.v1.p1");
    assert_eq!(rec.name, "Alpha Cohort");
    assert_eq!(rec.seqs["phs000009"].seqs["Whole Genome Sequencing"], 5);
}
