//! Slight scale-up of user rows under the pointer.

use super::{Binding, Listener};
use crate::config::{css_seconds, BehaviorConfig};
use crate::dom::{Document, ElementId, Selector};
use crate::event::EventKind;

#[derive(Debug, Clone)]
pub struct RowHover {
    rows: Vec<ElementId>,
    hover_transform: String,
    transition: String,
}

impl RowHover {
    pub fn locate<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<Self> {
        let rows = doc.query_all(&Selector::class(&config.selectors.user_row_class));
        if rows.is_empty() {
            return None;
        }
        Some(Self {
            rows,
            hover_transform: format!("scale({})", config.appearance.hover_scale),
            transition: format!("transform {} ease", css_seconds(config.appearance.hover_transition_ms)),
        })
    }

    pub fn rows(&self) -> &[ElementId] {
        &self.rows
    }

    pub fn bindings(&self) -> Vec<Binding> {
        self.rows
            .iter()
            .flat_map(|row| {
                [
                    Binding::new(*row, EventKind::MouseEnter, Listener::HoverEnter),
                    Binding::new(*row, EventKind::MouseLeave, Listener::HoverLeave),
                ]
            })
            .collect()
    }

    pub fn on_enter<D: Document>(&self, doc: &mut D, row: ElementId) {
        doc.set_style(row, "transform", &self.hover_transform);
        doc.set_style(row, "transition", &self.transition);
    }

    pub fn on_leave<D: Document>(&self, doc: &mut D, row: ElementId) {
        doc.set_style(row, "transform", "scale(1)");
    }
}
