//! A small CSS selector subset.
//!
//! Supported: type (`tr`), id (`#toggleView`), class (`.btn`), attribute
//! presence and equality (`[name]`, `[name="email"]`), attribute prefix
//! (`[href^="#"]`), compound steps (`button[type="submit"]`) and the
//! descendant and child combinators (`tbody tr`, `form > input`).

use std::fmt;
use std::str::FromStr;

use crate::error::{PageError, PageResult};

/// Condition on a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
}

impl AttrCondition {
    pub fn key(&self) -> &str {
        match self {
            AttrCondition::Exists { key }
            | AttrCondition::Eq { key, .. }
            | AttrCondition::StartsWith { key, .. } => key,
        }
    }

    /// Test the condition against an attribute value (`None` if absent).
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match (self, actual) {
            (_, None) => false,
            (AttrCondition::Exists { .. }, Some(_)) => true,
            (AttrCondition::Eq { value, .. }, Some(actual)) => actual == value,
            (AttrCondition::StartsWith { value, .. }, Some(actual)) => actual.starts_with(value.as_str()),
        }
    }
}

/// One compound selector, e.g. `input.form-control[name="email"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorStep {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrCondition>,
}

/// Relation of a step to the step on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPart {
    pub step: SelectorStep,
    /// `None` for the leftmost part.
    pub combinator: Option<Combinator>,
}

/// A parsed selector chain, matched right to left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    parts: Vec<SelectorPart>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(selector: &str) -> PageResult<Self> {
        let source = selector.trim();
        if source.is_empty() {
            return Err(PageError::Selector(selector.to_string()));
        }

        let mut parts: Vec<SelectorPart> = Vec::new();
        let mut pending: Option<Combinator> = None;

        for token in tokenize(source)? {
            if token == ">" {
                if pending.is_some() || parts.is_empty() {
                    return Err(PageError::Selector(source.to_string()));
                }
                pending = Some(Combinator::Child);
                continue;
            }

            let step = parse_step(&token, source)?;
            let combinator = if parts.is_empty() {
                None
            } else {
                Some(pending.take().unwrap_or(Combinator::Descendant))
            };
            parts.push(SelectorPart { step, combinator });
        }

        if parts.is_empty() || pending.is_some() {
            return Err(PageError::Selector(source.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Shorthand for `.name`.
    pub fn class(name: &str) -> Self {
        Self::single(SelectorStep {
            classes: vec![name.to_string()],
            ..Default::default()
        })
    }

    /// Shorthand for `#name`.
    pub fn id(name: &str) -> Self {
        Self::single(SelectorStep {
            id: Some(name.to_string()),
            ..Default::default()
        })
    }

    /// Shorthand for `input[name="..."]`.
    pub fn input_named(name: &str) -> Self {
        Self::single(SelectorStep {
            tag: Some("input".to_string()),
            attrs: vec![AttrCondition::Eq {
                key: "name".to_string(),
                value: name.to_string(),
            }],
            ..Default::default()
        })
    }

    fn single(step: SelectorStep) -> Self {
        let mut source = step.tag.clone().unwrap_or_default();
        if let Some(id) = &step.id {
            source.push('#');
            source.push_str(id);
        }
        for class in &step.classes {
            source.push('.');
            source.push_str(class);
        }
        for attr in &step.attrs {
            match attr {
                AttrCondition::Exists { key } => source.push_str(&format!("[{}]", key)),
                AttrCondition::Eq { key, value } => source.push_str(&format!("[{}=\"{}\"]", key, value)),
                AttrCondition::StartsWith { key, value } => {
                    source.push_str(&format!("[{}^=\"{}\"]", key, value))
                }
            }
        }
        Self {
            source,
            parts: vec![SelectorPart {
                step,
                combinator: None,
            }],
        }
    }

    pub fn parts(&self) -> &[SelectorPart] {
        &self.parts
    }

    /// The id when the selector is a bare `#id`, for fast lookup.
    pub fn id_only(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [only] if only.step.tag.is_none() && only.step.classes.is_empty() && only.step.attrs.is_empty() => {
                only.step.id.as_deref()
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split on whitespace and `>` outside of attribute brackets and quotes.
fn tokenize(source: &str) -> PageResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket = false;
    let mut quote: Option<char> = None;

    for ch in source.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if bracket => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket = true;
                current.push(ch);
            }
            ']' => {
                bracket = false;
                current.push(ch);
            }
            '>' if !bracket => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            c if c.is_whitespace() && !bracket => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if bracket || quote.is_some() {
        return Err(PageError::Selector(source.to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_step(part: &str, source: &str) -> PageResult<SelectorStep> {
    let err = || PageError::Selector(source.to_string());
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(err)?;
                if step.id.replace(id).is_some() {
                    return Err(err());
                }
                i = next;
            }
            b'.' => {
                let (class, next) = parse_ident(part, i + 1).ok_or_else(err)?;
                step.classes.push(class);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_attr(part, i).ok_or_else(err)?;
                step.attrs.push(cond);
                i = next;
            }
            _ => {
                if step.tag.is_some() || step.id.is_some() || !step.classes.is_empty() || !step.attrs.is_empty() {
                    return Err(err());
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(err)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

/// Parse `[key]`, `[key=value]`, `[key="value"]` or `[key^="value"]`
/// starting at the opening bracket.
fn parse_attr(src: &str, open: usize) -> Option<(AttrCondition, usize)> {
    let close = open + src.get(open..)?.find(']')?;
    let body = src.get(open + 1..close)?.trim();
    let next = close + 1;

    let (key, op, raw) = if let Some(pos) = body.find("^=") {
        (&body[..pos], "^=", &body[pos + 2..])
    } else if let Some(pos) = body.find('=') {
        (&body[..pos], "=", &body[pos + 1..])
    } else {
        (body, "", "")
    };

    let key = key.trim();
    if key.is_empty() || !key.bytes().all(is_ident_char) {
        return None;
    }
    let key = key.to_ascii_lowercase();

    if op.is_empty() {
        return Some((AttrCondition::Exists { key }, next));
    }

    let raw = raw.trim();
    let value = match raw.as_bytes().first() {
        Some(b'"') | Some(b'\'') => {
            if raw.len() < 2 || raw.as_bytes()[raw.len() - 1] != raw.as_bytes()[0] {
                return None;
            }
            raw[1..raw.len() - 1].to_string()
        }
        Some(_) => raw.to_string(),
        None => return None,
    };

    let cond = match op {
        "^=" => AttrCondition::StartsWith { key, value },
        _ => AttrCondition::Eq { key, value },
    };
    Some((cond, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_step() {
        let sel = Selector::parse(r#"button.btn[type="submit"]"#).unwrap();
        assert_eq!(sel.parts().len(), 1);
        let step = &sel.parts()[0].step;
        assert_eq!(step.tag.as_deref(), Some("button"));
        assert_eq!(step.classes, vec!["btn".to_string()]);
        assert_eq!(
            step.attrs,
            vec![AttrCondition::Eq {
                key: "type".into(),
                value: "submit".into()
            }]
        );
    }

    #[test]
    fn parses_combinators() {
        let sel = Selector::parse("table.users-table > tbody tr").unwrap();
        let combinators: Vec<_> = sel.parts().iter().map(|p| p.combinator).collect();
        assert_eq!(
            combinators,
            vec![None, Some(Combinator::Child), Some(Combinator::Descendant)]
        );
    }

    #[test]
    fn attribute_prefix_keeps_hash() {
        let sel = Selector::parse(r##"a[href^="#"]"##).unwrap();
        let cond = &sel.parts()[0].step.attrs[0];
        assert!(cond.matches(Some("#top")));
        assert!(!cond.matches(Some("/users/")));
        assert!(!cond.matches(None));
    }

    #[test]
    fn quoted_value_may_contain_spaces() {
        let sel = Selector::parse(r#"[title="two words"]"#).unwrap();
        assert_eq!(sel.parts().len(), 1);
    }

    #[test]
    fn id_only_detection() {
        assert_eq!(Selector::parse("#toggleView").unwrap().id_only(), Some("toggleView"));
        assert_eq!(Selector::parse("div#toggleView").unwrap().id_only(), None);
    }

    #[test]
    fn shorthands_render_source() {
        assert_eq!(Selector::class("btn").as_str(), ".btn");
        assert_eq!(Selector::id("x").as_str(), "#x");
        assert_eq!(Selector::input_named("email").as_str(), r#"input[name="email"]"#);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "   ", "> tr", "tr >", "[unclosed", ".", "#", "a[=x]", "div span#"] {
            assert!(Selector::parse(bad).is_err(), "should reject {bad:?}");
        }
    }
}
