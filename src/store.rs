// src/store.rs
//! In-memory tables: one `CategoryTable` per category, filled page by page.

use crate::config::consts::CSV_HEADER;

/// One fully extracted listing item. Text fields are already sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaperRecord {
    status: String,
    name: String,
    abstract_text: String,
    keywords: String,
    primary_area: String,
    url: String,
}

impl PaperRecord {
    pub fn new(
        status: impl Into<String>,
        name: impl Into<String>,
        abstract_text: impl Into<String>,
        keywords: impl Into<String>,
        primary_area: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            name: name.into(),
            abstract_text: abstract_text.into(),
            keywords: keywords.into(),
            primary_area: primary_area.into(),
            url: url.into(),
        }
    }

    pub fn status(&self) -> &str { &self.status }
    pub fn name(&self) -> &str { &self.name }
    pub fn abstract_text(&self) -> &str { &self.abstract_text }
    pub fn keywords(&self) -> &str { &self.keywords }
    pub fn primary_area(&self) -> &str { &self.primary_area }
    pub fn url(&self) -> &str { &self.url }

    /// Cells in `CSV_HEADER` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.status.clone(),
            self.name.clone(),
            self.abstract_text.clone(),
            self.keywords.clone(),
            self.primary_area.clone(),
            self.url.clone(),
        ]
    }
}

/// Records of one category, in encounter order. Append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTable {
    status: String,
    records: Vec<PaperRecord>,
}

impl CategoryTable {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into(), records: Vec::new() }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn append(&mut self, record: PaperRecord) {
        debug_assert_eq!(record.status(), self.status, "record filed under the wrong category");
        self.records.push(record);
    }

    /// Commit a whole page at once.
    pub fn extend(&mut self, records: impl IntoIterator<Item = PaperRecord>) {
        for r in records {
            self.append(r);
        }
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers() -> Vec<String> {
        CSV_HEADER.iter().map(|h| s!(*h)).collect()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(PaperRecord::to_row).collect()
    }
}
