//! Page classification strategies
//!
//! Both strategies parse the page with `scraper`, whose html5ever backend
//! builds a best-effort tree for any input. Malformed markup therefore never
//! produces an error; at worst the tree has nothing to match.

use crate::matching::{Evidence, MatchPattern};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text content is never rendered
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Decides whether a page matches and what evidence supports the match
pub trait Classifier {
    /// Classifies an HTML document
    ///
    /// Returns `None` when the page does not match.
    fn classify(&self, html: &str) -> Option<Evidence>;
}

/// Matches pages containing a `div` whose class attribute contains a pattern
#[derive(Debug, Clone)]
pub struct StructuralClassifier {
    patterns: Vec<MatchPattern>,
}

impl StructuralClassifier {
    pub fn new(patterns: Vec<MatchPattern>) -> Self {
        Self { patterns }
    }
}

impl Classifier for StructuralClassifier {
    fn classify(&self, html: &str) -> Option<Evidence> {
        if self.patterns.is_empty() {
            return None;
        }

        let document = Html::parse_document(html);
        let selector = Selector::parse("div[class]").ok()?;

        // Patterns are tried in input order against every div
        let found = self.patterns.iter().any(|pattern| {
            document.select(&selector).any(|element| {
                element
                    .value()
                    .attr("class")
                    .map_or(false, |class| pattern.is_match(class))
            })
        });

        found.then_some(Evidence::ModuleFound)
    }
}

/// Matches pages whose visible text contains any of the phrases
#[derive(Debug, Clone)]
pub struct TextualClassifier {
    patterns: Vec<MatchPattern>,
}

impl TextualClassifier {
    pub fn new(patterns: Vec<MatchPattern>) -> Self {
        Self { patterns }
    }
}

impl Classifier for TextualClassifier {
    fn classify(&self, html: &str) -> Option<Evidence> {
        if self.patterns.is_empty() {
            return None;
        }

        let text = extract_visible_text(html);
        if text.is_empty() {
            return None;
        }

        let matched: Vec<String> = self
            .patterns
            .iter()
            .filter(|pattern| pattern.is_match(&text))
            .map(|pattern| pattern.as_str().to_string())
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(Evidence::Phrases(matched))
        }
    }
}

/// Elements that start a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "td", "th",
    "title", "tr", "ul",
];

/// Extracts the visible text of an HTML document
///
/// Text nodes are concatenated in document order, so inline markup such as
/// `<b>grain</b>-free` reads as `grain-free`. Block-level elements add a word
/// boundary around their content. Whitespace runs are collapsed to single
/// spaces. Markup, attribute values, comments and the contents of `script`,
/// `style`, `noscript` and `template` are excluded.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_TEXT_ELEMENTS.contains(&name) {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push(' ');
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
