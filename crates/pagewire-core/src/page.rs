//! The Page Behavior Attacher.
//!
//! `Page` owns a document, a notifier and a virtual-clock timer queue.
//! [`Page::attach`] scans the document once and binds every behavior whose
//! elements are present; the host then feeds it events with
//! [`Page::dispatch`] and time with [`Page::advance`].
//!
//! ```ignore
//! let doc = MemoryDocument::from_json(&std::fs::read_to_string("users.json")?)?;
//! let mut page = Page::new(doc, RecordingNotifier::new(), BehaviorConfig::default());
//! page.attach();
//!
//! let toggle = page.document().by_id("toggleView").unwrap();
//! page.dispatch(Event::click(toggle));
//! page.advance(Duration::from_millis(5500));
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::behaviors::{
    anchor_scroll, AutoDismiss, Binding, Listener, RegistrationForm, Ripple, RowHover,
    SearchFilter, TimerAction, ViewMode, ViewToggle,
};
use crate::config::BehaviorConfig;
use crate::dom::{Document, ElementId};
use crate::event::{Dispatch, Event, Flow};
use crate::notify::Notifier;
use crate::timer::{TaskId, TimerQueue};
use crate::validation::ValidationReport;

/// Which behaviors became active on attach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttachReport {
    /// `true` when `attach` had already run; nothing was bound again.
    pub already_attached: bool,
    pub registration_form: bool,
    pub view_toggle: bool,
    pub hover_rows: usize,
    pub banners: usize,
    pub search_box: bool,
    pub anchor_links: usize,
    pub ripple_buttons: usize,
    pub listeners: usize,
}

impl AttachReport {
    /// Names of the active behaviors, in a stable order.
    pub fn active(&self) -> Vec<&'static str> {
        let mut active = Vec::new();
        if self.registration_form {
            active.push("registration-form");
        }
        if self.view_toggle {
            active.push("view-toggle");
        }
        if self.hover_rows > 0 {
            active.push("row-hover");
        }
        if self.banners > 0 {
            active.push("auto-dismiss");
        }
        if self.search_box {
            active.push("table-search");
        }
        if self.anchor_links > 0 {
            active.push("anchor-scroll");
        }
        if self.ripple_buttons > 0 {
            active.push("ripple");
        }
        active
    }
}

#[derive(Debug, Default)]
struct Behaviors {
    registration: Option<RegistrationForm>,
    view_toggle: Option<ViewToggle>,
    row_hover: Option<RowHover>,
    auto_dismiss: Option<AutoDismiss>,
    search: Option<SearchFilter>,
    ripple: Option<Ripple>,
}

/// A document with page behaviors attached.
pub struct Page<D, N> {
    doc: D,
    notifier: N,
    config: BehaviorConfig,
    timers: TimerQueue<TimerAction>,
    bindings: Vec<Binding>,
    behaviors: Behaviors,
    report: Option<AttachReport>,
    last_validation: Option<ValidationReport>,
}

impl<D: Document, N: Notifier> Page<D, N> {
    pub fn new(doc: D, notifier: N, config: BehaviorConfig) -> Self {
        Self {
            doc,
            notifier,
            config,
            timers: TimerQueue::new(),
            bindings: Vec::new(),
            behaviors: Behaviors::default(),
            report: None,
            last_validation: None,
        }
    }

    /// Bind every behavior whose elements are present. Runs once; later
    /// calls return the first report with `already_attached` set.
    pub fn attach(&mut self) -> AttachReport {
        if let Some(report) = &self.report {
            tracing::debug!("Page behaviors already attached");
            return AttachReport {
                already_attached: true,
                ..report.clone()
            };
        }

        let _span = tracing::info_span!("attach").entered();
        let config = &self.config;
        let mut report = AttachReport::default();

        self.behaviors.registration = RegistrationForm::locate(&self.doc, config);
        if let Some(form) = &self.behaviors.registration {
            self.bindings.extend(form.bindings());
            report.registration_form = true;
        } else {
            tracing::debug!(id = %config.selectors.registration_form_id, "No registration form");
        }

        self.behaviors.view_toggle = ViewToggle::locate(&self.doc, config);
        if let Some(toggle) = &self.behaviors.view_toggle {
            self.bindings.extend(toggle.bindings());
            report.view_toggle = true;
        }

        self.behaviors.row_hover = RowHover::locate(&self.doc, config);
        if let Some(hover) = &self.behaviors.row_hover {
            self.bindings.extend(hover.bindings());
            report.hover_rows = hover.rows().len();
        }

        self.behaviors.auto_dismiss = AutoDismiss::schedule(&self.doc, config, &mut self.timers);
        if let Some(dismiss) = &self.behaviors.auto_dismiss {
            report.banners = dismiss.banners().len();
        }

        // Buttons are collected before the search box exists so the
        // synthesized input never gets a ripple.
        self.behaviors.ripple = Ripple::locate(&self.doc, config);

        self.behaviors.search = SearchFilter::install(&mut self.doc, config);
        if let Some(search) = &self.behaviors.search {
            self.bindings.extend(search.bindings());
            report.search_box = true;
        }

        let anchors = anchor_scroll::bindings(&self.doc);
        report.anchor_links = anchors.len();
        self.bindings.extend(anchors);

        if let Some(ripple) = &self.behaviors.ripple {
            self.bindings.extend(ripple.bindings());
            report.ripple_buttons = ripple.buttons().len();
        }

        report.listeners = self.bindings.len();

        tracing::info!("Page behaviors loaded successfully");
        tracing::info!(
            listeners = report.listeners,
            active = %report.active().join(", "),
            "Welcome to pagewire"
        );

        self.report = Some(report.clone());
        report
    }

    pub fn is_attached(&self) -> bool {
        self.report.is_some()
    }

    /// Run every listener bound for the event, on the target and (for
    /// bubbling events) its ancestors, innermost first.
    pub fn dispatch(&mut self, event: Event) -> Dispatch {
        let path = if event.kind.bubbles() {
            self.event_path(event.target)
        } else {
            vec![event.target]
        };

        let mut outcome = Dispatch::default();
        for current in path {
            let listeners: Vec<Listener> = self
                .bindings
                .iter()
                .filter(|b| b.element == current && b.kind == event.kind)
                .map(|b| b.listener)
                .collect();

            for listener in listeners {
                tracing::trace!(?listener, element = current.0, "Dispatch");
                outcome.handled += 1;
                if self.run_listener(listener, current, &event) == Flow::PreventDefault {
                    outcome.default_prevented = true;
                }
            }
        }
        outcome
    }

    fn event_path(&self, target: ElementId) -> Vec<ElementId> {
        let mut path = vec![target];
        let mut cursor = self.doc.parent(target);
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.doc.parent(parent);
        }
        path
    }

    fn run_listener(&mut self, listener: Listener, current: ElementId, event: &Event) -> Flow {
        match listener {
            Listener::SubmitRegistration => {
                let Some(form) = &self.behaviors.registration else {
                    return Flow::Continue;
                };
                let (flow, report) = form.on_submit(&mut self.doc, &mut self.notifier, &self.config);
                self.last_validation = Some(report);
                flow
            }
            Listener::BorderFeedback => {
                RegistrationForm::on_input(&mut self.doc, current, &self.config);
                Flow::Continue
            }
            Listener::ToggleView => {
                if let Some(toggle) = &self.behaviors.view_toggle {
                    toggle.on_click(&mut self.doc, &self.config);
                }
                Flow::Continue
            }
            Listener::HoverEnter => {
                if let Some(hover) = &self.behaviors.row_hover {
                    hover.on_enter(&mut self.doc, current);
                }
                Flow::Continue
            }
            Listener::HoverLeave => {
                if let Some(hover) = &self.behaviors.row_hover {
                    hover.on_leave(&mut self.doc, current);
                }
                Flow::Continue
            }
            Listener::SearchInput => {
                if let Some(search) = &self.behaviors.search {
                    search.on_input(&mut self.doc);
                }
                Flow::Continue
            }
            Listener::AnchorScroll => anchor_scroll::on_click(&mut self.doc, current),
            Listener::Ripple => {
                Ripple::on_click(&mut self.doc, current, event.pointer, &self.config, &mut self.timers);
                Flow::Continue
            }
        }
    }

    /// Move the virtual clock forward by `by`, running every task that
    /// falls due, including tasks scheduled by earlier tasks. Returns the
    /// number of tasks run.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.timers.now() + by;
        let mut ran = 0;
        while let Some(scheduled) = self.timers.pop_due(until) {
            self.run_timer(scheduled.task);
            ran += 1;
        }
        self.timers.set_now(until);
        ran
    }

    /// Advance until no timers remain. Returns the number of tasks run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(wait) = self.timers.time_until_next() {
            ran += self.advance(wait);
        }
        ran
    }

    fn run_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::FadeBanners(banners) => {
                let faded = AutoDismiss::fade(&mut self.doc, &banners, &self.config, &mut self.timers);
                tracing::debug!(faded, "Banners fading");
            }
            TimerAction::Detach { element, reason } => {
                if self.doc.remove(element) {
                    tracing::debug!(element = element.0, ?reason, "Element removed");
                } else {
                    tracing::debug!(element = element.0, ?reason, "Element already detached");
                }
            }
        }
    }

    /// Current virtual time since the page was created.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Cancel a scheduled task, e.g. the banner fade.
    pub fn cancel_timer(&mut self, id: TaskId) -> bool {
        self.timers.cancel(id)
    }

    /// Task id of the pending banner fade, if banners were found.
    pub fn banner_fade_task(&self) -> Option<TaskId> {
        self.behaviors.auto_dismiss.as_ref().map(AutoDismiss::task)
    }

    /// Currently visible listing region, when both regions exist.
    pub fn view_mode(&self) -> Option<ViewMode> {
        ViewToggle::current(&self.doc, &self.config)
    }

    /// Outcome of the most recent registration submit.
    pub fn last_validation(&self) -> Option<&ValidationReport> {
        self.last_validation.as_ref()
    }

    pub fn search_input(&self) -> Option<ElementId> {
        self.behaviors.search.as_ref().map(SearchFilter::input)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn into_parts(self) -> (D, N) {
        (self.doc, self.notifier)
    }
}
