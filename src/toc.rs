use crate::dom::{Document, Element, Node};

pub const PROSE_CLASS: &str = "prose";
pub const MIN_HEADINGS: usize = 3;
pub const TOC_CLASS: &str = "toc";

const HEADING_TAGS: [&str; 3] = ["h1", "h2", "h3"];

#[derive(Debug, Clone)]
pub struct HeadingEntry {
    pub id: String,
    pub text: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub text: String,
    pub href: String,
}

/// Builds and inserts the article's table of contents. Returns the link
/// entries that went into the nav, or an empty list when the page was left
/// untouched (no article, ambiguous article, or too few headings).
pub fn build(doc: &mut Document, prose_class: &str, min_headings: usize) -> Vec<TocEntry> {
    let is_article = |el: &Element| el.has_class(prose_class);

    let containers = doc.count_elements(&is_article);
    if containers != 1 {
        tracing::debug!(containers, "skipping toc: page needs exactly one article container");
        return Vec::new();
    }
    let Some(path) = doc.find_element_path(&is_article) else {
        return Vec::new();
    };
    let Some(article) = doc.element_at_path_mut(&path) else {
        return Vec::new();
    };

    let mut collected = 0usize;
    article.walk_descendants(&mut |el| {
        if is_heading(el) {
            collected += 1;
        }
    });
    if collected < min_headings {
        tracing::debug!(
            headings = collected,
            min_headings,
            "skipping toc: article is too short"
        );
        return Vec::new();
    }

    let headings = assign_heading_ids(article);
    let entries = headings
        .iter()
        .map(|h| TocEntry {
            text: h.text.clone(),
            href: format!("#{}", h.id),
        })
        .collect::<Vec<_>>();

    doc.insert_before(&is_article, Node::Element(build_nav(&entries)));
    tracing::debug!(links = entries.len(), "inserted toc nav");
    entries
}

fn is_heading(el: &Element) -> bool {
    HEADING_TAGS.contains(&el.tag.as_str())
}

/// Labels every heading: a heading without an id gets `h_<n>` where `n` is
/// its position in the full collected sequence; existing ids stay untouched.
fn assign_heading_ids(article: &mut Element) -> Vec<HeadingEntry> {
    let mut headings: Vec<HeadingEntry> = Vec::new();

    article.walk_descendants_mut(&mut |el| {
        if !is_heading(el) {
            return;
        }
        let order = headings.len();
        let id = match el.attr("id").filter(|v| !v.trim().is_empty()) {
            Some(existing) => existing.to_owned(),
            None => {
                let generated = format!("h_{order}");
                el.set_attr("id", &generated);
                generated
            }
        };
        headings.push(HeadingEntry {
            id,
            text: el.text_content().trim().to_owned(),
            order,
        });
    });

    headings
}

fn build_nav(entries: &[TocEntry]) -> Element {
    let mut list = Element::new("ol");
    for entry in entries {
        let mut link = Element::new("a");
        link.set_attr("href", &entry.href);
        link.children.push(Node::Text(entry.text.clone()));

        let mut item = Element::new("li");
        item.children.push(Node::Element(link));
        list.children.push(Node::Element(item));
    }

    let mut nav = Element::new("nav");
    nav.set_attr("class", TOC_CLASS);
    nav.children.push(Node::Element(list));
    nav
}
