//! Arena-backed in-memory document.
//!
//! Built from a JSON page fixture and used wherever no rendering engine is
//! available: unit tests, integration tests and the CLI host.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use serde::{Deserialize, Serialize};

use super::selector::{Combinator, Selector, SelectorPart, SelectorStep};
use super::{Document, ElementId, ElementLocator, Rect, ScrollOptions};
use crate::error::{PageError, PageResult};

const BODY_TAG: &str = "body";
const TEXT_TAG: &str = "#text";

/// Declarative description of an element subtree, as found in fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    /// Leading text run, placed before `children`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A page fixture file: a title and the body's top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub title: String,
    pub body: Vec<NodeSpec>,
}

impl PageFixture {
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> PageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A recorded `scroll_into_view` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub target: ElementId,
    pub element_id: Option<String>,
    pub options: ScrollOptions,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    disabled: bool,
    rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            value: None,
            disabled: false,
            rect: Rect::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    fn is_element(&self) -> bool {
        self.tag != TEXT_TAG
    }

    fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }

    fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

/// In-memory [`Document`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: ElementId,
    title: String,
    scrolls: Vec<ScrollRequest>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty document with only the `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(BODY_TAG)],
            root: ElementId(0),
            title: String::new(),
            scrolls: Vec::new(),
        }
    }

    /// Build a document whose root holds `body`.
    pub fn from_nodes(body: impl IntoIterator<Item = NodeSpec>) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        for spec in body {
            doc.build(root, spec);
        }
        doc
    }

    pub fn from_fixture(fixture: PageFixture) -> Self {
        let mut doc = Self::from_nodes(fixture.body);
        doc.title = fixture.title;
        doc
    }

    pub fn from_json(json: &str) -> PageResult<Self> {
        let fixture = PageFixture::from_json(json)?;
        if has_empty_tag(&fixture.body) {
            return Err(PageError::Fixture("node with empty tag".to_string()));
        }
        Ok(Self::from_fixture(fixture))
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Scroll requests received so far, oldest first.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    /// Resolve a selector to its first attached match.
    pub fn select(&self, selector: &str) -> PageResult<Option<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(match selector.id_only() {
            Some(id) => self.by_id(id),
            None => self.query_first(&selector),
        })
    }

    fn build(&mut self, parent: ElementId, spec: NodeSpec) -> ElementId {
        let el = self.create_element(&spec.tag);
        {
            let node = &mut self.nodes[el.0 as usize];
            node.attrs = spec.attrs;
            if let Some(id) = spec.id {
                node.attrs.insert("id".to_string(), id);
            }
            if let Some(class) = spec.class {
                node.attrs.insert("class".to_string(), class);
            }
            node.style = spec.style;
            node.disabled = spec.disabled;
            node.rect = spec.rect.unwrap_or_default();
            node.value = spec.value.or_else(|| node.attrs.get("value").cloned());
        }
        if let Some(text) = spec.text {
            let text_node = self.create_text(&text);
            self.append_child(el, text_node);
        }
        for child in spec.children {
            self.build(el, child);
        }
        self.append_child(parent, el);
        el
    }

    fn create_text(&mut self, text: &str) -> ElementId {
        let mut node = Node::new(TEXT_TAG);
        node.text = text.to_string();
        self.push(node)
    }

    fn push(&mut self, node: Node) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(node);
        id
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0 as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.0 as usize)
    }

    fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.node(el).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != el);
        }
        if let Some(n) = self.node_mut(el) {
            n.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    fn collect_elements(&self, from: ElementId, out: &mut Vec<ElementId>) {
        let Some(node) = self.node(from) else {
            return;
        };
        for child in &node.children {
            if self.node(*child).is_some_and(Node::is_element) {
                out.push(*child);
                self.collect_elements(*child, out);
            }
        }
    }

    fn matches_step(&self, el: ElementId, step: &SelectorStep) -> bool {
        let Some(node) = self.node(el) else {
            return false;
        };
        if !node.is_element() {
            return false;
        }
        if let Some(tag) = &step.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &step.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if step.classes.iter().any(|c| !node.has_class(c)) {
            return false;
        }
        step.attrs
            .iter()
            .all(|cond| cond.matches(node.attrs.get(cond.key()).map(String::as_str)))
    }

    fn matches(&self, el: ElementId, selector: &Selector) -> bool {
        let parts = selector.parts();
        match parts.last() {
            Some(last) => self.matches_step(el, &last.step) && self.matches_left(el, parts, parts.len() - 1),
            None => false,
        }
    }

    /// `parts[idx]` already matched `el`; match the rest of the chain to
    /// its left, trying every qualifying ancestor for descendant steps.
    fn matches_left(&self, el: ElementId, parts: &[SelectorPart], idx: usize) -> bool {
        if idx == 0 {
            return true;
        }
        let prev = &parts[idx - 1].step;
        match parts[idx].combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Child => self
                .parent(el)
                .is_some_and(|parent| self.matches_step(parent, prev) && self.matches_left(parent, parts, idx - 1)),
            Combinator::Descendant => {
                let mut cursor = self.parent(el);
                while let Some(ancestor) = cursor {
                    if self.matches_step(ancestor, prev) && self.matches_left(ancestor, parts, idx - 1) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    /// Indented outline of the attached tree, one element or text run per
    /// line: tag, id, classes, notable attributes, value, inline style.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            let _ = writeln!(out, "# {}", self.title);
        }
        if let Some(root) = self.node(self.root) {
            for child in &root.children {
                self.write_outline(*child, 0, &mut out);
            }
        }
        out
    }

    fn write_outline(&self, el: ElementId, depth: usize, out: &mut String) {
        let Some(node) = self.node(el) else {
            return;
        };
        let indent = "  ".repeat(depth);
        if node.tag == TEXT_TAG {
            let text = node.text.trim();
            if !text.is_empty() {
                let _ = writeln!(out, "{}\"{}\"", indent, text);
            }
            return;
        }

        let mut line = format!("{}{}", indent, node.tag);
        if let Some(id) = node.attrs.get("id") {
            let _ = write!(line, "#{}", id);
        }
        if let Some(classes) = node.attrs.get("class") {
            for class in classes.split_whitespace() {
                let _ = write!(line, ".{}", class);
            }
        }
        for (key, value) in &node.attrs {
            if matches!(key.as_str(), "name" | "type" | "href" | "placeholder") {
                let _ = write!(line, "[{}=\"{}\"]", key, value);
            }
        }
        if node.is_form_control() {
            let _ = write!(line, " value=\"{}\"", node.value.as_deref().unwrap_or(""));
        }
        if node.disabled {
            line.push_str(" disabled");
        }
        if !node.style.is_empty() {
            let style: Vec<String> = node.style.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
            let _ = write!(line, " {{{}}}", style.join("; "));
        }
        let _ = writeln!(out, "{}", line);

        for child in &node.children {
            self.write_outline(*child, depth + 1, out);
        }
    }
}

fn has_empty_tag(nodes: &[NodeSpec]) -> bool {
    nodes
        .iter()
        .any(|n| n.tag.trim().is_empty() || has_empty_tag(&n.children))
}

impl ElementLocator for MemoryDocument {
    fn by_id(&self, id: &str) -> Option<ElementId> {
        let mut all = Vec::new();
        self.collect_elements(self.root, &mut all);
        all.into_iter()
            .find(|el| self.node(*el).and_then(|n| n.attrs.get("id")).is_some_and(|v| v == id))
    }

    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.query_within(self.root, selector)
    }

    fn query_within(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut all = Vec::new();
        self.collect_elements(root, &mut all);
        all.into_iter().filter(|el| self.matches(*el, selector)).collect()
    }
}

impl Document for MemoryDocument {
    fn tag(&self, el: ElementId) -> Option<String> {
        self.node(el).filter(|n| n.is_element()).map(|n| n.tag.clone())
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.node(el).and_then(|n| n.attrs.get(name).cloned())
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if self.has_class(el, class) {
            return;
        }
        if let Some(node) = self.node_mut(el) {
            let list = node.attrs.entry("class".to_string()).or_default();
            if !list.is_empty() {
                list.push(' ');
            }
            list.push_str(class);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el).is_some_and(|n| n.has_class(class))
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.node(el).and_then(|n| n.style.get(property).cloned())
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            if value.is_empty() {
                node.style.remove(property);
            } else {
                node.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn text_content(&self, el: ElementId) -> String {
        let Some(node) = self.node(el) else {
            return String::new();
        };
        if node.tag == TEXT_TAG {
            return node.text.clone();
        }
        node.children.iter().map(|c| self.text_content(*c)).collect()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        let children = match self.node(el) {
            Some(node) if node.is_element() => node.children.clone(),
            _ => return,
        };
        for child in children {
            self.detach(child);
        }
        let text_node = self.create_text(text);
        self.append_child(el, text_node);
    }

    fn value(&self, el: ElementId) -> Option<String> {
        self.node(el)
            .filter(|n| n.is_form_control())
            .map(|n| n.value.clone().unwrap_or_default())
    }

    fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(node) = self.node_mut(el) {
            if node.is_form_control() {
                node.value = Some(value.to_string());
            }
        }
    }

    fn is_disabled(&self, el: ElementId) -> bool {
        self.node(el).is_some_and(|n| n.disabled)
    }

    fn set_disabled(&mut self, el: ElementId, disabled: bool) {
        if let Some(node) = self.node_mut(el) {
            node.disabled = disabled;
        }
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.node(el).map(|n| n.rect).unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.push(Node::new(tag))
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.node(parent).is_none() || self.node(child).is_none() || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: ElementId) {
        if self.node(child).is_none() || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        let Some(p) = self.node_mut(parent) else {
            return;
        };
        match p.children.iter().position(|c| *c == reference) {
            Some(pos) => p.children.insert(pos, child),
            None => p.children.push(child),
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove(&mut self, el: ElementId) -> bool {
        if el == self.root || self.node(el).and_then(|n| n.parent).is_none() {
            return false;
        }
        self.detach(el);
        true
    }

    fn is_attached(&self, el: ElementId) -> bool {
        self.node(el).is_some() && self.is_ancestor(self.root, el)
    }

    fn scroll_into_view(&mut self, el: ElementId, options: ScrollOptions) {
        if !self.is_attached(el) {
            return;
        }
        let element_id = self.attribute(el, "id");
        self.scrolls.push(ScrollRequest {
            target: el,
            element_id,
            options,
        });
    }
}
