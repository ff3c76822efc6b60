// src/specs/listing.rs
//! Directory listings of the study tree.
//!
//! The HTTPS mirror serves an HTML index (`<a href="phs000007.v1.p1/">…</a>`);
//! the FTP tree serves one entry per line with the name last. Both shapes are
//! read here; trailing `/` is dropped from every entry.

use crate::core::html::{anchor_texts, to_lower};
use crate::ident;

/// Entry names in listing order.
pub fn entries(page: &str) -> Vec<String> {
    let raw = if to_lower(page).contains("<a ") {
        anchor_texts(page)
    } else {
        page.lines()
            .filter_map(|line| line.split_whitespace().last())
            .map(|s| s.to_string())
            .collect()
    };
    raw.into_iter()
        .map(|e| e.trim().trim_end_matches('/').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Base study ids (`phs<digits>`) from the root listing. Headers, parent
/// links and stray files are dropped.
pub fn base_ids(page: &str) -> Vec<String> {
    entries(page).into_iter().filter(|e| ident::is_base_id(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ftp_style_lines() {
        let page = "total 12\n\
            dr-xr-xr-x   2 ftp anonymous 4096 Jan 01  2019 phs000007.v1.p1\n\
            dr-xr-xr-x   2 ftp anonymous 4096 Jan 01  2020 phs000007.v30.p11\n";
        assert_eq!(entries(page), vec!["12", "phs000007.v1.p1", "phs000007.v30.p11"]);
    }

    #[test]
    fn html_index() {
        let page = r#"<html><body><h1>Index of /dbgap/studies/phs000007</h1><pre>
            <a href="/dbgap/studies/">Parent Directory</a>                             -
            <a href="phs000007.v1.p1/">phs000007.v1.p1/</a>    2019-01-01 00:00    -
            <a href="phs000007.v30.p11/">phs000007.v30.p11/</a>  2020-01-01 00:00    -
            </pre></body></html>"#;
        assert_eq!(
            entries(page),
            vec!["Parent Directory", "phs000007.v1.p1", "phs000007.v30.p11"]
        );
    }

    #[test]
    fn root_list_keeps_only_base_ids() {
        let page = r#"<a href="../">../</a> <a href="phs000001/">phs000001/</a>
            <a href="README.txt">README.txt</a> <a href="phs000002/">phs000002/</a>"#;
        assert_eq!(base_ids(page), vec!["phs000001", "phs000002"]);
        assert!(base_ids("").is_empty());
    }
}
