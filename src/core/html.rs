// src/core/html.rs
//! Read-only view over one rendered page, backed by `scraper`.
//!
//! A `Snapshot` is taken once per extraction attempt and thrown away on the
//! next navigation; nothing here talks to the browser.

use scraper::{ElementRef, Html};

pub struct Snapshot {
    doc: Html,
}

impl Snapshot {
    pub fn parse(markup: &str) -> Self {
        Self { doc: Html::parse_document(markup) }
    }

    pub fn root(&self) -> Node<'_> {
        Node(self.doc.root_element())
    }

    /// First element in document order whose `id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Node<'_>> {
        let root = self.doc.root_element();
        std::iter::once(root)
            .chain(root.descendants().skip(1).filter_map(ElementRef::wrap))
            .find(|e| e.value().id() == Some(id))
            .map(Node)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Descendants named `tag`, in document order. `class` may hold several
    /// space-separated names; all of them must be present.
    pub fn find_all(&self, tag: &str, class: Option<&str>) -> Vec<Node<'a>> {
        self.0
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name().eq_ignore_ascii_case(tag))
            .filter(|e| class.is_none_or(|c| has_classes(e, c)))
            .map(Node)
            .collect()
    }

    pub fn find_first(&self, tag: &str, class: Option<&str>) -> Option<Node<'a>> {
        self.find_all(tag, class).into_iter().next()
    }

    /// All descendant text, concatenated as-is.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// The nearest following sibling element named `tag` (not necessarily adjacent).
    pub fn next_sibling_by_tag(&self, tag: &str) -> Option<Node<'a>> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name().eq_ignore_ascii_case(tag))
            .map(Node)
    }
}

fn has_classes(e: &ElementRef<'_>, wanted: &str) -> bool {
    wanted
        .split_ascii_whitespace()
        .all(|w| e.value().classes().any(|c| c == w))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="a">
            <div class="note first">
              <a href="/x">  Title  </a>
              <strong class="field bold">Abstract:</strong>
              <span>not this</span>
              <div>Body <b>text</b></div>
            </div>
            <div class="note"><a href="/y">Second</a></div>
          </div>
          <div id="a">duplicate id</div>
        </body></html>"#;

    #[test]
    fn find_by_id_takes_first_in_document_order() {
        let snap = Snapshot::parse(PAGE);
        let region = snap.find_by_id("a").unwrap();
        assert_eq!(region.find_all("div", Some("note")).len(), 2);
        assert!(snap.find_by_id("missing").is_none());
    }

    #[test]
    fn class_filter_requires_all_names() {
        let snap = Snapshot::parse(PAGE);
        let root = snap.root();
        assert_eq!(root.find_all("div", Some("note first")).len(), 1);
        assert_eq!(root.find_all("strong", Some("bold field")).len(), 1);
        assert_eq!(root.find_all("strong", Some("field italic")).len(), 0);
    }

    #[test]
    fn text_attr_and_siblings() {
        let snap = Snapshot::parse(PAGE);
        let note = snap.root().find_first("div", Some("note")).unwrap();
        let a = note.find_first("a", None).unwrap();
        assert_eq!(a.text(), "  Title  ");
        assert_eq!(a.attr("href"), Some("/x"));

        let label = note.find_first("strong", None).unwrap();
        let value = label.next_sibling_by_tag("div").unwrap();
        assert_eq!(value.text(), "Body text");
        assert_eq!(label.next_sibling_by_tag("span").unwrap().text(), "not this");
        assert!(label.next_sibling_by_tag("p").is_none());
    }
}
