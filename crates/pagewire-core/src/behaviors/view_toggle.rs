//! Table / card view switch for the user list.

use serde::Serialize;

use super::{Binding, Listener};
use crate::config::BehaviorConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::event::EventKind;

/// Which listing region is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Table,
    Cards,
}

impl ViewMode {
    pub fn other(&self) -> ViewMode {
        match self {
            ViewMode::Table => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Table,
        }
    }

    /// Control label while this mode is shown: it names the other view.
    pub fn control_label<'a>(&self, config: &'a BehaviorConfig) -> &'a str {
        match self {
            ViewMode::Table => &config.labels.switch_to_cards,
            ViewMode::Cards => &config.labels.switch_to_table,
        }
    }
}

/// The located toggle control.
#[derive(Debug, Clone, Copy)]
pub struct ViewToggle {
    control: ElementId,
}

impl ViewToggle {
    pub fn locate<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<Self> {
        doc.by_id(&config.selectors.toggle_view_id)
            .map(|control| Self { control })
    }

    pub fn element(&self) -> ElementId {
        self.control
    }

    pub fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(self.control, EventKind::Click, Listener::ToggleView)]
    }

    /// The visible mode, read from the table's inline `display`.
    /// `None` unless both regions exist.
    pub fn current<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<ViewMode> {
        let (table, _) = Self::regions(doc, config)?;
        Some(if doc.style(table, "display").as_deref() == Some("none") {
            ViewMode::Cards
        } else {
            ViewMode::Table
        })
    }

    /// Flip to the other region and relabel the control. Returns the mode
    /// now shown, or `None` when either region is missing.
    pub fn on_click<D: Document>(&self, doc: &mut D, config: &BehaviorConfig) -> Option<ViewMode> {
        let (table, cards) = Self::regions(doc, config)?;
        let next = Self::current(doc, config)?.other();

        match next {
            ViewMode::Table => {
                doc.set_style(table, "display", "table");
                doc.set_style(cards, "display", "none");
            }
            ViewMode::Cards => {
                doc.set_style(table, "display", "none");
                doc.set_style(cards, "display", "grid");
            }
        }
        doc.set_text(self.control, next.control_label(config));
        tracing::debug!(mode = ?next, "View toggled");
        Some(next)
    }

    fn regions<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<(ElementId, ElementId)> {
        let table = doc.query_first(&Selector::class(&config.selectors.users_table_class))?;
        let cards = doc.query_first(&Selector::class(&config.selectors.users_cards_class))?;
        Some((table, cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementLocator, MemoryDocument, NodeSpec};

    fn listing() -> MemoryDocument {
        MemoryDocument::from_nodes([
            NodeSpec::new("button").id("toggleView").class("btn").text("Switch to Card View"),
            NodeSpec::new("table").class("users-table"),
            NodeSpec::new("div").class("users-cards").style("display", "none"),
        ])
    }

    #[test]
    fn toggle_twice_restores_region_and_label() {
        let config = BehaviorConfig::default();
        let mut doc = listing();
        let toggle = ViewToggle::locate(&doc, &config).unwrap();
        let control = toggle.element();

        assert_eq!(ViewToggle::current(&doc, &config), Some(ViewMode::Table));

        assert_eq!(toggle.on_click(&mut doc, &config), Some(ViewMode::Cards));
        assert_eq!(doc.text_content(control), "Switch to Table View");
        let cards = doc.query_first(&Selector::class("users-cards")).unwrap();
        assert_eq!(doc.style(cards, "display").as_deref(), Some("grid"));

        assert_eq!(toggle.on_click(&mut doc, &config), Some(ViewMode::Table));
        assert_eq!(doc.text_content(control), "Switch to Card View");
        let table = doc.query_first(&Selector::class("users-table")).unwrap();
        assert_eq!(doc.style(table, "display").as_deref(), Some("table"));
        assert_eq!(doc.style(cards, "display").as_deref(), Some("none"));
    }

    #[test]
    fn missing_region_leaves_label() {
        let config = BehaviorConfig::default();
        let mut doc = MemoryDocument::from_nodes([
            NodeSpec::new("button").id("toggleView").text("Switch to Card View"),
            NodeSpec::new("table").class("users-table"),
        ]);
        let toggle = ViewToggle::locate(&doc, &config).unwrap();
        assert_eq!(toggle.on_click(&mut doc, &config), None);
        assert_eq!(doc.text_content(toggle.element()), "Switch to Card View");
    }

    #[test]
    fn mode_other_is_involution() {
        assert_eq!(ViewMode::Table.other().other(), ViewMode::Table);
        assert_eq!(ViewMode::Cards.other(), ViewMode::Table);
    }
}
