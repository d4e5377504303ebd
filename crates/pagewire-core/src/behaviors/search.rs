//! Client-side substring filter over the user table.

use std::sync::LazyLock;

use serde::Serialize;

use super::{Binding, Listener};
use crate::config::BehaviorConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::event::EventKind;

static BODY_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("row selector is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FilterStats {
    pub shown: usize,
    pub hidden: usize,
}

/// The synthesized search box and the table it filters.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    table: ElementId,
    container: ElementId,
    input: ElementId,
}

impl SearchFilter {
    /// Insert the search box immediately before the user table.
    /// `None` when there is no table or it has no parent to insert into.
    pub fn install<D: Document>(doc: &mut D, config: &BehaviorConfig) -> Option<Self> {
        let table = doc.query_first(&Selector::class(&config.selectors.users_table_class))?;
        let Some(parent) = doc.parent(table) else {
            tracing::debug!("User table has no parent, search box skipped");
            return None;
        };

        let container = doc.create_element("div");
        doc.add_class(container, &config.selectors.search_container_class);
        doc.set_style(container, "margin-bottom", &config.appearance.search_margin_bottom);

        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "text");
        doc.add_class(input, &config.selectors.form_control_class);
        doc.set_attribute(input, "placeholder", &config.labels.search_placeholder);
        doc.set_style(input, "max-width", &config.appearance.search_max_width);

        doc.append_child(container, input);
        doc.insert_before(parent, container, table);

        Some(Self {
            table,
            container,
            input,
        })
    }

    pub fn table(&self) -> ElementId {
        self.table
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn input(&self) -> ElementId {
        self.input
    }

    pub fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(self.input, EventKind::Input, Listener::SearchInput)]
    }

    /// Show rows whose text contains the current query, ignoring case;
    /// hide the rest. An empty query shows every row.
    pub fn on_input<D: Document>(&self, doc: &mut D) -> FilterStats {
        let query = doc.value(self.input).unwrap_or_default().to_lowercase();
        let mut stats = FilterStats::default();

        for row in doc.query_within(self.table, &BODY_ROWS) {
            if doc.text_content(row).to_lowercase().contains(&query) {
                doc.set_style(row, "display", "");
                stats.shown += 1;
            } else {
                doc.set_style(row, "display", "none");
                stats.hidden += 1;
            }
        }

        tracing::trace!(query = %query, shown = stats.shown, hidden = stats.hidden, "Rows filtered");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementLocator, MemoryDocument, NodeSpec};

    fn row(name: &str, email: &str) -> NodeSpec {
        NodeSpec::new("tr").class("user-row").children([
            NodeSpec::new("td").text(name),
            NodeSpec::new("td").text(email),
        ])
    }

    fn listing() -> MemoryDocument {
        MemoryDocument::from_nodes([NodeSpec::new("div").class("container").child(
            NodeSpec::new("table").class("users-table").children([
                NodeSpec::new("thead").child(NodeSpec::new("tr").child(NodeSpec::new("th").text("Username"))),
                NodeSpec::new("tbody").children([
                    row("alice", "alice@example.com"),
                    row("Bob", "bob@example.org"),
                    row("carol", "carol@example.com"),
                ]),
            ]),
        )])
    }

    fn search(doc: &mut MemoryDocument, filter: &SearchFilter, query: &str) -> FilterStats {
        doc.set_value(filter.input(), query);
        filter.on_input(doc)
    }

    #[test]
    fn inserts_box_before_table() {
        let config = BehaviorConfig::default();
        let mut doc = listing();
        let filter = SearchFilter::install(&mut doc, &config).unwrap();

        let container = doc.query_first(&Selector::class("search-container")).unwrap();
        assert_eq!(container, filter.container());
        assert_eq!(doc.parent(container), doc.parent(filter.table()));
        assert_eq!(doc.attribute(filter.input(), "placeholder").as_deref(), Some("Search users..."));
        assert_eq!(doc.style(filter.input(), "max-width").as_deref(), Some("400px"));
        assert_eq!(doc.style(container, "margin-bottom").as_deref(), Some("1rem"));

        let outline = doc.outline();
        assert!(outline.find("search-container").unwrap() < outline.find("users-table").unwrap());
    }

    #[test]
    fn case_insensitive_substring() {
        let mut doc = listing();
        let filter = SearchFilter::install(&mut doc, &BehaviorConfig::default()).unwrap();

        assert_eq!(search(&mut doc, &filter, "BOB"), FilterStats { shown: 1, hidden: 2 });
        assert_eq!(search(&mut doc, &filter, "example.com"), FilterStats { shown: 2, hidden: 1 });
    }

    #[test]
    fn zero_matches_then_clear_restores() {
        let mut doc = listing();
        let filter = SearchFilter::install(&mut doc, &BehaviorConfig::default()).unwrap();

        assert_eq!(search(&mut doc, &filter, "zzz"), FilterStats { shown: 0, hidden: 3 });
        assert_eq!(search(&mut doc, &filter, ""), FilterStats { shown: 3, hidden: 0 });

        for row in doc.query_all(&Selector::class("user-row")) {
            assert_eq!(doc.style(row, "display"), None);
        }
    }

    #[test]
    fn header_row_is_never_hidden() {
        let mut doc = listing();
        let filter = SearchFilter::install(&mut doc, &BehaviorConfig::default()).unwrap();
        search(&mut doc, &filter, "zzz");
        let header = doc.query_first(&Selector::parse("thead tr").unwrap()).unwrap();
        assert_eq!(doc.style(header, "display"), None);
    }

    #[test]
    fn no_table_no_box() {
        let mut doc = MemoryDocument::from_nodes([NodeSpec::new("div")]);
        assert!(SearchFilter::install(&mut doc, &BehaviorConfig::default()).is_none());
        assert!(doc.query_all(&Selector::class("search-container")).is_empty());
    }
}
