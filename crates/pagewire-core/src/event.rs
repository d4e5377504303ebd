//! Events delivered to a [`crate::Page`] by its host.

use serde::{Deserialize, Serialize};

use crate::dom::{ElementId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Submit,
    Input,
    Click,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    /// Whether listeners on ancestors of the target also run.
    pub fn bubbles(&self) -> bool {
        !matches!(self, EventKind::MouseEnter | EventKind::MouseLeave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub target: ElementId,
    /// Pointer position for mouse events, when the host knows it.
    pub pointer: Option<Point>,
}

impl Event {
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            pointer: None,
        }
    }

    pub fn submit(target: ElementId) -> Self {
        Self::new(EventKind::Submit, target)
    }

    pub fn input(target: ElementId) -> Self {
        Self::new(EventKind::Input, target)
    }

    pub fn click(target: ElementId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn click_at(target: ElementId, x: f64, y: f64) -> Self {
        Self {
            pointer: Some(Point { x, y }),
            ..Self::click(target)
        }
    }

    pub fn mouse_enter(target: ElementId) -> Self {
        Self::new(EventKind::MouseEnter, target)
    }

    pub fn mouse_leave(target: ElementId) -> Self {
        Self::new(EventKind::MouseLeave, target)
    }
}

/// What a listener asks of the host after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    PreventDefault,
}

/// Result of [`crate::Page::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Dispatch {
    /// Number of listeners that ran.
    pub handled: usize,
    /// Some listener suppressed the host's default action.
    pub default_prevented: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_events_do_not_bubble() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::Submit.bubbles());
        assert!(!EventKind::MouseEnter.bubbles());
        assert!(!EventKind::MouseLeave.bubbles());
    }

    #[test]
    fn click_at_records_pointer() {
        let event = Event::click_at(ElementId(3), 4.0, 5.0);
        assert_eq!(event.kind, EventKind::Click);
        assert_eq!(event.pointer, Some(Point { x: 4.0, y: 5.0 }));
    }
}
