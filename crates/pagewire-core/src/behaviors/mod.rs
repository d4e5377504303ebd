//! The seven independent page behaviors.
//!
//! Each behavior locates its elements once at attach time and contributes
//! [`Binding`]s; the [`crate::Page`] routes events to them. Follow-up work
//! is scheduled as [`TimerAction`] data on the page's timer queue.

pub mod anchor_scroll;
pub mod auto_dismiss;
pub mod registration;
pub mod ripple;
pub mod row_hover;
pub mod search;
pub mod view_toggle;

use crate::dom::ElementId;
use crate::event::EventKind;

pub use auto_dismiss::AutoDismiss;
pub use registration::RegistrationForm;
pub use ripple::Ripple;
pub use row_hover::RowHover;
pub use search::{FilterStats, SearchFilter};
pub use view_toggle::{ViewMode, ViewToggle};

/// Which handler runs for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    SubmitRegistration,
    BorderFeedback,
    ToggleView,
    HoverEnter,
    HoverLeave,
    SearchInput,
    AnchorScroll,
    Ripple,
}

/// A listener bound to one element and event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub element: ElementId,
    pub kind: EventKind,
    pub listener: Listener,
}

impl Binding {
    pub fn new(element: ElementId, kind: EventKind, listener: Listener) -> Self {
        Self {
            element,
            kind,
            listener,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachReason {
    Banner,
    Ripple,
}

/// Deferred work on the page's timer queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Start fading the banners present at attach time.
    FadeBanners(Vec<ElementId>),
    /// Detach an element whose animation finished.
    Detach {
        element: ElementId,
        reason: DetachReason,
    },
}
