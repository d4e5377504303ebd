//! Document capability used by every page behavior.
//!
//! Behaviors never touch a rendering engine directly. They find elements
//! through [`ElementLocator`] and mutate them through [`Document`], so the
//! same code runs against a browser binding or the in-memory
//! [`MemoryDocument`] used by tests and the CLI host.

pub mod memory;
pub mod selector;

use serde::{Deserialize, Serialize};

pub use memory::{MemoryDocument, NodeSpec, ScrollRequest};
pub use selector::{AttrCondition, Combinator, Selector, SelectorPart, SelectorStep};

/// Opaque handle to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// On-screen box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }
}

/// Pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Element lookup.
///
/// Queries only ever return elements attached to the document.
pub trait ElementLocator {
    /// Element whose `id` attribute equals `id`.
    fn by_id(&self, id: &str) -> Option<ElementId>;

    /// All matching elements in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementId>;

    /// All matching descendants of `root` in document order.
    fn query_within(&self, root: ElementId, selector: &Selector) -> Vec<ElementId>;

    fn query_first(&self, selector: &Selector) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_first_within(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.query_within(root, selector).into_iter().next()
    }
}

/// Reads and mutations on located elements.
///
/// Every method tolerates stale handles: reads return `None`/defaults and
/// writes are ignored.
pub trait Document: ElementLocator {
    fn tag(&self, el: ElementId) -> Option<String>;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    fn add_class(&mut self, el: ElementId, class: &str);

    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Inline style property, `None` when unset.
    fn style(&self, el: ElementId, property: &str) -> Option<String>;

    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    /// Concatenated text of the element and all its descendants.
    fn text_content(&self, el: ElementId) -> String;

    /// Replace the element's children with a single text run.
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Current value of a form control.
    fn value(&self, el: ElementId) -> Option<String>;

    fn set_value(&mut self, el: ElementId, value: &str);

    fn is_disabled(&self, el: ElementId) -> bool;

    fn set_disabled(&mut self, el: ElementId, disabled: bool);

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    fn bounding_rect(&self, el: ElementId) -> Rect;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> ElementId;

    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Insert `child` into `parent` immediately before `reference`.
    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: ElementId);

    /// Detach an element. Returns `false` when it was already detached.
    fn remove(&mut self, el: ElementId) -> bool;

    fn is_attached(&self, el: ElementId) -> bool;

    fn scroll_into_view(&mut self, el: ElementId, options: ScrollOptions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.center(), Point { x: 60.0, y: 40.0 });
    }

    #[test]
    fn scroll_options_default_is_smooth_start() {
        let options = ScrollOptions::default();
        assert_eq!(options.behavior, ScrollBehavior::Smooth);
        assert_eq!(options.block, ScrollBlock::Start);
    }
}
