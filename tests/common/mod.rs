// tests/common/mod.rs
#![allow(dead_code)]

use std::path::Path;

use or_scrape::config::options::ScrapeOptions;

pub const LABEL: &str = r#"<strong class="note-content-field disable-tex-rendering">"#;

/// One listing item the way the site renders it.
pub fn note(title: &str, href: &str, abstract_text: Option<&str>, keywords: &str, area: &str) -> String {
    let abstract_html = abstract_text
        .map(|a| format!(r#"<li>{LABEL}Abstract:</strong> <div class="note-content-value">{a}</div></li>"#))
        .unwrap_or_default();
    format!(
        r#"<div class="note"><h4><a href="{href}">{title}</a></h4><ul>{abstract_html}<li>{LABEL}Keywords:</strong> <span class="note-content-value">{keywords}</span></li><li>{LABEL}Primary Area:</strong> <span class="note-content-value">{area}</span></li></ul></div>"#
    )
}

pub fn paper(n: u32) -> String {
    note(&format!("Paper {n}"), &format!("/forum?id={n}"), Some("a"), "k", "p")
}

pub fn options(out: &Path, categories: &[&str]) -> ScrapeOptions {
    ScrapeOptions {
        base_url: "https://openreview.net".into(),
        out_dir: out.to_path_buf(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}
