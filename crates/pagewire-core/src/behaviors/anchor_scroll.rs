//! Smooth scrolling for same-page links.

use std::sync::LazyLock;

use super::{Binding, Listener};
use crate::dom::{Document, ElementId, ScrollOptions, Selector};
use crate::event::{EventKind, Flow};

static FRAGMENT_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r##"a[href^="#"]"##).expect("fragment link selector is valid"));

/// Bind every same-page link present at attach time.
pub fn bindings<D: Document>(doc: &D) -> Vec<Binding> {
    doc.query_all(&FRAGMENT_LINKS)
        .into_iter()
        .map(|link| Binding::new(link, EventKind::Click, Listener::AnchorScroll))
        .collect()
}

/// Scroll to the link's target when it resolves. An empty or unknown
/// fragment leaves the click to the host's default navigation.
pub fn on_click<D: Document>(doc: &mut D, link: ElementId) -> Flow {
    let href = doc.attribute(link, "href").unwrap_or_default();
    let fragment = href.strip_prefix('#').unwrap_or_default();
    if fragment.is_empty() {
        return Flow::Continue;
    }

    match doc.by_id(fragment) {
        Some(target) => {
            doc.scroll_into_view(target, ScrollOptions::default());
            Flow::PreventDefault
        }
        None => {
            tracing::debug!(fragment = %fragment, "Anchor target not found");
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementLocator, MemoryDocument, NodeSpec, ScrollBehavior, ScrollBlock};

    fn page() -> MemoryDocument {
        MemoryDocument::from_nodes([
            NodeSpec::new("a").id("to-users").attr("href", "#users").text("Users"),
            NodeSpec::new("a").id("to-nowhere").attr("href", "#nowhere").text("Nowhere"),
            NodeSpec::new("a").id("bare").attr("href", "#").text("Top"),
            NodeSpec::new("a").id("external").attr("href", "/register/").text("Register"),
            NodeSpec::new("section").id("users"),
        ])
    }

    #[test]
    fn binds_only_fragment_links() {
        let doc = page();
        assert_eq!(bindings(&doc).len(), 3);
    }

    #[test]
    fn resolved_fragment_scrolls_smoothly() {
        let mut doc = page();
        let link = doc.by_id("to-users").unwrap();
        assert_eq!(on_click(&mut doc, link), Flow::PreventDefault);

        let request = &doc.scroll_requests()[0];
        assert_eq!(request.element_id.as_deref(), Some("users"));
        assert_eq!(request.options.behavior, ScrollBehavior::Smooth);
        assert_eq!(request.options.block, ScrollBlock::Start);
    }

    #[test]
    fn unresolved_fragment_keeps_default() {
        let mut doc = page();
        for id in ["to-nowhere", "bare"] {
            let link = doc.by_id(id).unwrap();
            assert_eq!(on_click(&mut doc, link), Flow::Continue);
        }
        assert!(doc.scroll_requests().is_empty());
    }
}
