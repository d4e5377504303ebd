//! Scripted user interaction against an attached page.
//!
//! A scenario is a JSON list of steps. The runner plays the part of the
//! browser: it writes input values before firing `input`, submits the
//! enclosing form after an unprevented click on a submit control, ignores
//! clicks on disabled controls, and advances the virtual clock on `wait`.
//!
//! ```json
//! { "steps": [
//!     { "action": "input", "target": "input[name=\"username\"]", "value": "ab" },
//!     { "action": "click", "target": "#submit", "x": 130, "y": 70 },
//!     { "action": "wait", "ms": 600 }
//! ] }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, ElementId, ElementLocator, Selector};
use crate::error::{PageError, PageResult};
use crate::event::{Dispatch, Event};
use crate::notify::RecordingNotifier;
use crate::page::Page;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Replace a control's value, then fire `input`.
    Input { target: String, value: String },
    /// Click, optionally at viewport coordinates.
    Click {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    /// Submit a form directly (e.g. Enter in a field).
    Submit { target: String },
    Hover { target: String },
    Leave { target: String },
    /// Let virtual time pass.
    Wait { ms: u64 },
    /// Detach an element, as a manual dismiss would.
    Remove { target: String },
}

impl Step {
    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Step::Input { target, value } => format!("input {} = {:?}", target, value),
            Step::Click { target, x: Some(x), y: Some(y) } => format!("click {} at ({}, {})", target, x, y),
            Step::Click { target, .. } => format!("click {}", target),
            Step::Submit { target } => format!("submit {}", target),
            Step::Hover { target } => format!("hover {}", target),
            Step::Leave { target } => format!("leave {}", target),
            Step::Wait { ms } => format!("wait {}ms", ms),
            Step::Remove { target } => format!("remove {}", target),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// What happened on one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: String,
    /// Virtual time after the step, in milliseconds.
    pub at_ms: u64,
    pub handled: usize,
    pub default_prevented: bool,
    /// For clicks on submit controls and submit steps: whether the form
    /// was actually sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepOutcome>,
}

impl ScenarioReport {
    /// Every alert raised during the run, in order.
    pub fn alerts(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|s| s.alerts.iter().map(String::as_str))
            .collect()
    }
}

/// Resolve a selector string to its first attached element.
pub fn resolve<L: ElementLocator>(doc: &L, target: &str) -> PageResult<ElementId> {
    let selector = Selector::parse(target)?;
    let found = match selector.id_only() {
        Some(id) => doc.by_id(id),
        None => doc.query_first(&selector),
    };
    found.ok_or_else(|| PageError::TargetNotFound(target.to_string()))
}

/// Whether clicking `el` submits its form.
fn is_submit_control<D: Document>(doc: &D, el: ElementId) -> bool {
    let kind = doc.attribute(el, "type").map(|t| t.to_ascii_lowercase());
    match doc.tag(el).as_deref() {
        Some("button") => matches!(kind.as_deref(), None | Some("submit")),
        Some("input") => kind.as_deref() == Some("submit"),
        _ => false,
    }
}

fn enclosing_form<D: Document>(doc: &D, el: ElementId) -> Option<ElementId> {
    let mut cursor = doc.parent(el);
    while let Some(current) = cursor {
        if doc.tag(current).as_deref() == Some("form") {
            return Some(current);
        }
        cursor = doc.parent(current);
    }
    None
}

/// Drives a page through scenario steps.
pub struct ScenarioRunner<D> {
    page: Page<D, RecordingNotifier>,
}

impl<D: Document> ScenarioRunner<D> {
    /// Wrap a page, attaching it if the host has not already.
    pub fn new(mut page: Page<D, RecordingNotifier>) -> Self {
        if !page.is_attached() {
            page.attach();
        }
        Self { page }
    }

    pub fn page(&self) -> &Page<D, RecordingNotifier> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page<D, RecordingNotifier> {
        &mut self.page
    }

    pub fn into_page(self) -> Page<D, RecordingNotifier> {
        self.page
    }

    /// Run every step, stopping at the first unresolvable target.
    pub fn run(&mut self, scenario: &Scenario) -> PageResult<ScenarioReport> {
        let mut report = ScenarioReport::default();
        for step in &scenario.steps {
            report.steps.push(self.run_step(step)?);
        }
        Ok(report)
    }

    pub fn run_step(&mut self, step: &Step) -> PageResult<StepOutcome> {
        let mut outcome = StepOutcome {
            step: step.describe(),
            ..Default::default()
        };

        match step {
            Step::Input { target, value } => {
                let el = resolve(self.page.document(), target)?;
                self.page.document_mut().set_value(el, value);
                record(&mut outcome, self.page.dispatch(Event::input(el)));
            }
            Step::Click { target, x, y } => {
                let at = match (x, y) {
                    (Some(x), Some(y)) => Some((*x, *y)),
                    (None, None) => None,
                    _ => {
                        return Err(PageError::InvalidStep(format!(
                            "click on {} needs both x and y, or neither",
                            target
                        )))
                    }
                };
                let el = resolve(self.page.document(), target)?;
                self.click(el, at, &mut outcome);
            }
            Step::Submit { target } => {
                let el = resolve(self.page.document(), target)?;
                let dispatch = self.page.dispatch(Event::submit(el));
                record(&mut outcome, dispatch);
                outcome.submitted = Some(!dispatch.default_prevented);
            }
            Step::Hover { target } => {
                let el = resolve(self.page.document(), target)?;
                record(&mut outcome, self.page.dispatch(Event::mouse_enter(el)));
            }
            Step::Leave { target } => {
                let el = resolve(self.page.document(), target)?;
                record(&mut outcome, self.page.dispatch(Event::mouse_leave(el)));
            }
            Step::Wait { ms } => {
                let ran = self.page.advance(Duration::from_millis(*ms));
                if ran > 0 {
                    outcome.note = Some(format!("{} timer task(s) ran", ran));
                }
            }
            Step::Remove { target } => {
                let el = resolve(self.page.document(), target)?;
                self.page.document_mut().remove(el);
            }
        }

        outcome.at_ms = self.page.now().as_millis() as u64;
        outcome.alerts = self.page.notifier_mut().drain();
        Ok(outcome)
    }

    fn click(&mut self, el: ElementId, at: Option<(f64, f64)>, outcome: &mut StepOutcome) {
        if self.page.document().is_disabled(el) {
            outcome.note = Some("ignored: control is disabled".to_string());
            return;
        }

        let event = match at {
            Some((x, y)) => Event::click_at(el, x, y),
            None => Event::click(el),
        };
        let dispatch = self.page.dispatch(event);
        record(outcome, dispatch);
        if dispatch.default_prevented {
            return;
        }

        let doc = self.page.document();
        if !is_submit_control(doc, el) {
            return;
        }
        let Some(form) = enclosing_form(doc, el) else {
            return;
        };
        let submit = self.page.dispatch(Event::submit(form));
        outcome.handled += submit.handled;
        outcome.default_prevented |= submit.default_prevented;
        outcome.submitted = Some(!submit.default_prevented);
    }
}

fn record(outcome: &mut StepOutcome, dispatch: Dispatch) {
    outcome.handled += dispatch.handled;
    outcome.default_prevented |= dispatch.default_prevented;
}
