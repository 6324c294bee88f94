// src/specs/listing.rs
//! Scraping *spec* for a conference group page.
//!
//! Layout (rendered by client-side JS, so only a live snapshot has it):
//! - Tabs: `li[role=presentation] > a[aria-controls=<category>]`.
//! - One content region per category: `<div id="<category>">`.
//! - Items: `div.note`; the first link is title + forum URL.
//! - Details: `strong.note-content-field.disable-tex-rendering` labels, each
//!   followed by its value (`div` for Abstract, `span` for the others).
//! - Pagination: `ul.pagination > li.right-arrow > a` inside the region. On the
//!   last page the arrow is `li.right-arrow.disabled`, which the exact class
//!   match deliberately skips.

use std::fmt;

use tracing::warn;
use url::Url;

use crate::core::{clean, Node, Snapshot};
use crate::session::Locator;
use crate::store::PaperRecord;

pub const LISTING_READY_CLASS: &str = "tab-content";
pub const TAB_SELECTOR: &str = "li[role='presentation'] a";
pub const TAB_TARGET_ATTR: &str = "aria-controls";

pub const ITEM_TAG: &str = "div";
pub const ITEM_CLASS: &str = "note";
pub const LABEL_TAG: &str = "strong";
pub const LABEL_CLASS: &str = "note-content-field disable-tex-rendering";

const NEXT_ARROW: &str = "ul[class='pagination'] li[class='right-arrow'] a";

/// Container that becomes visible once the listing app has rendered.
pub fn listing_ready() -> Locator {
    Locator::class(LISTING_READY_CLASS)
}

pub fn tab_controls() -> Locator {
    Locator::css(TAB_SELECTOR)
}

pub fn content_region(category: &str) -> Locator {
    Locator::id(category)
}

pub fn next_page_control(category: &str) -> Locator {
    Locator::css(format!("{} {NEXT_ARROW}", content_region(category).to_css()))
}

/// Labeled detail fields every item must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailField {
    Abstract,
    Keywords,
    PrimaryArea,
}

impl DetailField {
    pub const ALL: [DetailField; 3] = [DetailField::Abstract, DetailField::Keywords, DetailField::PrimaryArea];

    /// Substring looked for in the label text (case-sensitive).
    pub fn label(self) -> &'static str {
        match self {
            DetailField::Abstract => "Abstract",
            DetailField::Keywords => "Keywords",
            DetailField::PrimaryArea => "Primary Area",
        }
    }

    /// Tag of the sibling that holds the value.
    fn value_tag(self) -> &'static str {
        match self {
            DetailField::Abstract => "div",
            DetailField::Keywords | DetailField::PrimaryArea => "span",
        }
    }

    fn missing(self) -> MissingField {
        match self {
            DetailField::Abstract => MissingField::Abstract,
            DetailField::Keywords => MissingField::Keywords,
            DetailField::PrimaryArea => MissingField::PrimaryArea,
        }
    }
}

/// A field that could not be read from a (probably half-rendered) item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Link,
    Abstract,
    Keywords,
    PrimaryArea,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissingField::Title => "Title",
            MissingField::Link => "Link",
            MissingField::Abstract => "Abstract",
            MissingField::Keywords => "Keywords",
            MissingField::PrimaryArea => "Primary Area",
        };
        f.write_str(s)
    }
}

/// Result of reading one snapshot of one category page.
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// Every item parsed; records in document order.
    Complete(Vec<PaperRecord>),
    /// Item `item` (0-based) lacked fields. Nothing from this snapshot may be kept.
    Incomplete { item: usize, title: String, missing: Vec<MissingField> },
    /// The category's region is not in the snapshot at all.
    RegionMissing,
}

/// Read every item of `category`'s region. Stops at the first incomplete item.
pub fn extract_page(snapshot: &Snapshot, category: &str, base: &Url) -> PageOutcome {
    let Some(region) = snapshot.find_by_id(category) else {
        return PageOutcome::RegionMissing;
    };

    let mut records = Vec::new();
    for (i, item) in region.find_all(ITEM_TAG, Some(ITEM_CLASS)).into_iter().enumerate() {
        match extract_item(item, category, base) {
            Ok(record) => records.push(record),
            Err((title, missing)) => return PageOutcome::Incomplete { item: i, title, missing },
        }
    }
    PageOutcome::Complete(records)
}

/// One `div.note` → record, or (best-effort title, missing fields).
pub fn extract_item(
    item: Node<'_>,
    category: &str,
    base: &Url,
) -> Result<PaperRecord, (String, Vec<MissingField>)> {
    let mut missing = Vec::new();

    let anchor = item.find_first("a", None);
    let name = anchor.map(|a| clean(a.text().trim())).unwrap_or_default();
    if name.is_empty() {
        missing.push(MissingField::Title);
    }
    let url = anchor
        .and_then(|a| a.attr("href"))
        .and_then(|href| base.join(href).ok());
    if url.is_none() {
        missing.push(MissingField::Link);
    }

    // First label per field wins; a miss on that label is not rescued by a later one.
    let mut values: [Option<Option<String>>; 3] = [None, None, None];
    for label in item.find_all(LABEL_TAG, Some(LABEL_CLASS)) {
        let text = label.text();
        let Some(slot) = DetailField::ALL.iter().position(|f| text.contains(f.label())) else {
            continue;
        };
        if values[slot].is_some() {
            continue;
        }
        let field = DetailField::ALL[slot];
        let value = label
            .next_sibling_by_tag(field.value_tag())
            .map(|n| clean(n.text().trim()))
            .filter(|v| !v.is_empty());
        if value.is_none() {
            warn!("{} not found", field.label());
        }
        values[slot] = Some(value);
    }

    let [abstract_text, keywords, primary_area] = values.map(Option::flatten);
    for (field, value) in DetailField::ALL.iter().zip([&abstract_text, &keywords, &primary_area]) {
        if value.is_none() {
            missing.push(field.missing());
        }
    }

    match (url, abstract_text, keywords, primary_area) {
        (Some(url), Some(abstract_text), Some(keywords), Some(primary_area)) if missing.is_empty() => {
            Ok(PaperRecord::new(category, name, abstract_text, keywords, primary_area, url.as_str()))
        }
        _ => Err((name, missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://openreview.net/group?id=ICLR.cc/2024/Conference#tab-accept-oral").unwrap()
    }

    fn note(title: &str, href: &str, details: &[(&str, &str, &str)]) -> String {
        let mut s = format!(r#"<div class="note"><h4><a href="{href}">{title}</a></h4><ul>"#);
        for (label, tag, value) in details {
            s.push_str(&format!(
                r#"<li><strong class="note-content-field disable-tex-rendering">{label}:</strong> <{tag} class="note-content-value">{value}</{tag}></li>"#
            ));
        }
        s.push_str("</ul></div>");
        s
    }

    fn full(title: &str, href: &str) -> String {
        note(title, href, &[
            ("Abstract", "div", "An abstract,\n with \"quotes\"."),
            ("Keywords", "span", "ml, nlp"),
            ("Primary Area", "span", "general"),
        ])
    }

    fn page(category: &str, notes: &[String]) -> Snapshot {
        Snapshot::parse(&format!(
            r#"<html><body><div class="tab-content"><div id="{category}">{}</div></div></body></html>"#,
            notes.concat()
        ))
    }

    #[test]
    fn complete_item_is_sanitized_and_resolved() {
        let snap = page("accept-poster", &[full("Foo, Paper", "/forum?id=1")]);
        let PageOutcome::Complete(records) = extract_page(&snap, "accept-poster", &base()) else {
            panic!("expected complete page");
        };
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.status(), "accept-poster");
        assert_eq!(r.name(), "Foo Paper");
        assert_eq!(r.abstract_text(), "An abstract with quotes.");
        assert_eq!(r.keywords(), "ml nlp");
        assert_eq!(r.primary_area(), "general");
        assert_eq!(r.url(), "https://openreview.net/forum?id=1");
    }

    #[test]
    fn missing_value_node_makes_page_incomplete() {
        let broken = note("Second", "/forum?id=2", &[
            ("Abstract", "span", "wrong tag"),
            ("Keywords", "span", "k"),
            ("Primary Area", "span", "p"),
        ]);
        let snap = page("accept-oral", &[full("First", "/forum?id=1"), broken, full("Third", "/forum?id=3")]);
        assert_eq!(
            extract_page(&snap, "accept-oral", &base()),
            PageOutcome::Incomplete { item: 1, title: s!("Second"), missing: vec![MissingField::Abstract] },
        );
    }

    #[test]
    fn absent_label_and_link_are_missing() {
        let item = r#"<div class="note"><a>Only a title</a>
            <strong class="note-content-field disable-tex-rendering">Keywords:</strong><span>k</span></div>"#;
        let snap = page("c", &[s!(item)]);
        match extract_page(&snap, "c", &base()) {
            PageOutcome::Incomplete { item, missing, .. } => {
                assert_eq!(item, 0);
                assert_eq!(missing, vec![MissingField::Link, MissingField::Abstract, MissingField::PrimaryArea]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn first_label_wins_when_repeated() {
        let item = note("T", "/forum?id=9", &[
            ("Abstract", "div", "first"),
            ("Abstract", "div", "second"),
            ("Keywords", "span", "k"),
            ("Primary Area", "span", "p"),
        ]);
        let snap = page("c", &[item]);
        let PageOutcome::Complete(records) = extract_page(&snap, "c", &base()) else { panic!() };
        assert_eq!(records[0].abstract_text(), "first");
    }

    #[test]
    fn other_regions_are_ignored() {
        let snap = Snapshot::parse(&format!(
            r#"<div id="accept-oral">{}</div><div id="accept-poster">{}{}</div>"#,
            full("Oral", "/forum?id=1"),
            full("Poster A", "/forum?id=2"),
            full("Poster B", "/forum?id=3"),
        ));
        let PageOutcome::Complete(records) = extract_page(&snap, "accept-poster", &base()) else { panic!() };
        let names: Vec<_> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Poster A", "Poster B"]);
        assert_eq!(extract_page(&snap, "accept-spotlight", &base()), PageOutcome::RegionMissing);
    }

    #[test]
    fn next_control_is_scoped_to_region() {
        assert_eq!(
            next_page_control("accept-oral").to_css(),
            "[id='accept-oral'] ul[class='pagination'] li[class='right-arrow'] a"
        );
    }
}
