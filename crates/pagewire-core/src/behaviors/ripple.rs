//! Click ripple on button-styled controls.

use super::{Binding, DetachReason, Listener, TimerAction};
use crate::config::{css_px, BehaviorConfig};
use crate::dom::{Document, ElementId, Point, Selector};
use crate::event::EventKind;
use crate::timer::TimerQueue;

#[derive(Debug, Clone)]
pub struct Ripple {
    buttons: Vec<ElementId>,
}

impl Ripple {
    pub fn locate<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<Self> {
        let buttons = doc.query_all(&Selector::class(&config.selectors.button_class));
        if buttons.is_empty() {
            return None;
        }
        Some(Self { buttons })
    }

    pub fn buttons(&self) -> &[ElementId] {
        &self.buttons
    }

    pub fn bindings(&self) -> Vec<Binding> {
        self.buttons
            .iter()
            .map(|button| Binding::new(*button, EventKind::Click, Listener::Ripple))
            .collect()
    }

    /// Append a ripple centred on the click point and schedule its removal.
    /// Without a pointer position the ripple is centred on the button.
    pub fn on_click<D: Document>(
        doc: &mut D,
        button: ElementId,
        pointer: Option<Point>,
        config: &BehaviorConfig,
        timers: &mut TimerQueue<TimerAction>,
    ) -> ElementId {
        let rect = doc.bounding_rect(button);
        let size = rect.width.max(rect.height);
        let click = pointer.unwrap_or_else(|| rect.center());
        let x = click.x - rect.left - size / 2.0;
        let y = click.y - rect.top - size / 2.0;

        let ripple = doc.create_element("span");
        doc.add_class(ripple, &config.selectors.ripple_class);
        doc.append_child(button, ripple);

        let size_px = css_px(size);
        doc.set_style(ripple, "width", &size_px);
        doc.set_style(ripple, "height", &size_px);
        doc.set_style(ripple, "left", &css_px(x));
        doc.set_style(ripple, "top", &css_px(y));

        timers.schedule(
            config.appearance.ripple_lifetime(),
            TimerAction::Detach {
                element: ripple,
                reason: DetachReason::Ripple,
            },
        );
        ripple
    }
}
