//! Registration form gating and live field feedback.

use std::sync::LazyLock;

use super::{Binding, Listener};
use crate::config::BehaviorConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::event::{EventKind, Flow};
use crate::notify::Notifier;
use crate::validation::{validate, Field, RegistrationInput, ValidationReport};

static SUBMIT_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"button[type="submit"]"#).expect("submit selector is valid"));

/// The located registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    form: ElementId,
    controls: Vec<ElementId>,
}

impl RegistrationForm {
    /// Find the form by id; `None` makes the behavior inactive.
    pub fn locate<D: Document>(doc: &D, config: &BehaviorConfig) -> Option<Self> {
        let form = doc.by_id(&config.selectors.registration_form_id)?;
        let controls = doc.query_within(form, &Selector::class(&config.selectors.form_control_class));
        Some(Self { form, controls })
    }

    pub fn element(&self) -> ElementId {
        self.form
    }

    pub fn controls(&self) -> &[ElementId] {
        &self.controls
    }

    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = vec![Binding::new(self.form, EventKind::Submit, Listener::SubmitRegistration)];
        bindings.extend(
            self.controls
                .iter()
                .map(|control| Binding::new(*control, EventKind::Input, Listener::BorderFeedback)),
        );
        bindings
    }

    /// Read the named inputs that exist inside the form.
    pub fn read_input<D: Document>(&self, doc: &D) -> RegistrationInput {
        let read = |field: Field| {
            doc.query_first_within(self.form, &Selector::input_named(field.input_name()))
                .map(|input| doc.value(input).unwrap_or_default())
        };
        RegistrationInput {
            username: read(Field::Username),
            email: read(Field::Email),
            full_name: read(Field::FullName),
            phone: read(Field::Phone),
        }
    }

    /// Validate on submit. Invalid: one alert listing every violation and
    /// the submission is cancelled. Valid: the submit control is disabled
    /// and relabelled so the form cannot be sent twice.
    pub fn on_submit<D: Document, N: Notifier>(
        &self,
        doc: &mut D,
        notifier: &mut N,
        config: &BehaviorConfig,
    ) -> (Flow, ValidationReport) {
        let report = validate(&self.read_input(doc));

        if !report.is_valid() {
            tracing::debug!(violations = report.violations.len(), "Registration blocked");
            notifier.alert(&report.message());
            return (Flow::PreventDefault, report);
        }

        let submit = doc.query_first_within(self.form, &SUBMIT_BUTTON);
        if let Some(button) = submit {
            doc.set_text(button, &config.labels.submitting);
            doc.set_disabled(button, true);
        }
        tracing::debug!("Registration submitted");
        (Flow::Continue, report)
    }

    /// Colour a control's border by whether it holds non-blank text.
    pub fn on_input<D: Document>(doc: &mut D, control: ElementId, config: &BehaviorConfig) {
        let filled = doc.value(control).is_some_and(|v| !v.trim().is_empty());
        let color = if filled {
            &config.appearance.filled_border_color
        } else {
            &config.appearance.empty_border_color
        };
        doc.set_style(control, "border-color", color);
    }
}
