//! Page integration tests
//!
//! These tests attach every behavior to the bundled registration and user
//! list fixtures and drive them the way a visitor would.
//!
//! ## What These Tests Verify
//!
//! - Registration blocks bad input with one combined alert
//! - Accepted registration disables the submit button
//! - View toggle, row hover, search, anchor scroll and ripple on the user list
//! - Banners fade and detach on the virtual clock
//! - Attach is idempotent

use std::time::Duration;

use pagewire_core::dom::ScrollBehavior;
use pagewire_core::{
    BehaviorConfig, Document, ElementLocator, Event, LogNotifier, MemoryDocument, Page, PageError,
    RecordingNotifier, Scenario, ScenarioRunner, Selector, Step, ViewMode,
};
use pagewire_core::logging::{CaptureLayer, LogBuffer};
use tracing_subscriber::prelude::*;

const REGISTER: &str = include_str!("../../../demos/register.json");
const USERS: &str = include_str!("../../../demos/users.json");

// ============================================================================
// Test Utilities
// ============================================================================

fn page_from(fixture: &str) -> Page<MemoryDocument, RecordingNotifier> {
    let doc = MemoryDocument::from_json(fixture).expect("fixture parses");
    let mut page = Page::new(doc, RecordingNotifier::new(), BehaviorConfig::default());
    page.attach();
    page
}

fn runner_for(fixture: &str) -> ScenarioRunner<MemoryDocument> {
    let doc = MemoryDocument::from_json(fixture).expect("fixture parses");
    ScenarioRunner::new(Page::new(doc, RecordingNotifier::new(), BehaviorConfig::default()))
}

fn el(page: &Page<MemoryDocument, RecordingNotifier>, selector: &str) -> pagewire_core::ElementId {
    page.document()
        .select(selector)
        .expect("selector parses")
        .unwrap_or_else(|| panic!("{} not found", selector))
}

fn visible_rows(page: &Page<MemoryDocument, RecordingNotifier>) -> usize {
    page.document()
        .query_all(&Selector::class("user-row"))
        .into_iter()
        .filter(|row| page.document().style(*row, "display").as_deref() != Some("none"))
        .count()
}

fn fill(runner: &mut ScenarioRunner<MemoryDocument>, username: &str, email: &str, full_name: &str) {
    for (name, value) in [("username", username), ("email", email), ("full_name", full_name)] {
        runner
            .run_step(&Step::Input {
                target: format!("input[name=\"{}\"]", name),
                value: value.to_string(),
            })
            .unwrap();
    }
}

// ============================================================================
// Registration Page
// ============================================================================

#[test]
fn test_register_page_attaches_form_and_ripple() {
    let mut page = page_from(REGISTER);
    let report = page.attach();
    assert!(report.already_attached);
    assert!(report.registration_form);
    assert!(!report.view_toggle);
    assert!(!report.search_box);
    assert_eq!(report.ripple_buttons, 1);
    assert_eq!(report.active(), vec!["registration-form", "ripple"]);
}

#[test]
fn test_all_three_rules_fail_in_one_alert() {
    let mut runner = runner_for(REGISTER);
    fill(&mut runner, "ab", "x@y", "A");

    let outcome = runner
        .run_step(&Step::Click {
            target: "#submitButton".into(),
            x: Some(130.0),
            y: Some(420.0),
        })
        .unwrap();

    assert!(outcome.default_prevented);
    assert_eq!(outcome.submitted, Some(false));
    assert_eq!(
        outcome.alerts,
        vec![
            "Username must be at least 3 characters long.\n\
             Please enter a valid email address.\n\
             Full name must be at least 2 characters long.\n"
                .to_string()
        ]
    );

    let page = runner.page();
    let button = el(page, "#submitButton");
    assert!(!page.document().is_disabled(button));
    assert_eq!(page.document().text_content(button), "Register");
    assert_eq!(page.last_validation().map(|r| r.violations.len()), Some(3));
}

#[test]
fn test_valid_registration_disables_submit() {
    let mut runner = runner_for(REGISTER);
    fill(&mut runner, "alice", "a@b.com", "Al");

    let outcome = runner
        .run_step(&Step::Click {
            target: "#submitButton".into(),
            x: None,
            y: None,
        })
        .unwrap();
    assert!(!outcome.default_prevented);
    assert_eq!(outcome.submitted, Some(true));
    assert!(outcome.alerts.is_empty());

    let button = el(runner.page(), "#submitButton");
    assert!(runner.page().document().is_disabled(button));
    assert_eq!(runner.page().document().text_content(button), "Registering...");

    // A second click on the disabled button does nothing
    let again = runner
        .run_step(&Step::Click {
            target: "#submitButton".into(),
            x: None,
            y: None,
        })
        .unwrap();
    assert_eq!(again.handled, 0);
    assert_eq!(again.submitted, None);
    assert_eq!(again.note.as_deref(), Some("ignored: control is disabled"));
}

#[test]
fn test_border_feedback_tracks_content() {
    let mut runner = runner_for(REGISTER);
    fill(&mut runner, "alice", "", "   ");

    let page = runner.page();
    let color = |selector: &str| page.document().style(el(page, selector), "border-color");
    assert_eq!(color("#id_username").as_deref(), Some("#28a745"));
    assert_eq!(color("#id_email").as_deref(), Some("#ddd"));
    assert_eq!(color("#id_full_name").as_deref(), Some("#ddd"));
    assert_eq!(color("#id_phone"), None);
}

#[test]
fn test_log_notifier_reports_blocked_submit() {
    let buffer = LogBuffer::new();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));

    tracing::subscriber::with_default(subscriber, || {
        let doc = MemoryDocument::from_json(REGISTER).unwrap();
        let mut page = Page::new(doc, LogNotifier, BehaviorConfig::default());
        page.attach();
        let form = page.document().select("#registrationForm").unwrap().unwrap();
        assert!(page.dispatch(Event::submit(form)).default_prevented);
    });

    let warnings = buffer.messages_at("warn");
    assert_eq!(warnings, vec!["User alert".to_string()]);
    assert!(buffer.messages_at("info").contains(&"Page behaviors loaded successfully".to_string()));
}

#[test]
fn test_bundled_invalid_scenario() {
    let scenario = Scenario::from_json(include_str!("../../../demos/scenarios/register_invalid.json")).unwrap();
    let mut runner = runner_for(REGISTER);
    let report = runner.run(&scenario).unwrap();

    assert_eq!(report.alerts().len(), 1);
    let last = report.steps.last().unwrap();
    assert_eq!(last.at_ms, 600);
    assert_eq!(last.note.as_deref(), Some("1 timer task(s) ran"));
    assert!(runner
        .page()
        .document()
        .query_all(&Selector::class("ripple"))
        .is_empty());
}

// ============================================================================
// User List Page
// ============================================================================

#[test]
fn test_users_page_attach_report() {
    let page = page_from(USERS);
    let doc = page.document();

    let container = doc.query_first(&Selector::class("search-container")).unwrap();
    let table = doc.query_first(&Selector::class("users-table")).unwrap();
    assert_eq!(doc.parent(container), doc.parent(table));

    let input = page.search_input().unwrap();
    assert_eq!(doc.attribute(input, "placeholder").as_deref(), Some("Search users..."));
    assert_eq!(doc.style(input, "max-width").as_deref(), Some("400px"));
    assert_eq!(doc.style(container, "margin-bottom").as_deref(), Some("1rem"));
    assert_eq!(page.pending_timers(), 1);
}

#[test]
fn test_toggle_twice_restores_view() {
    let mut page = page_from(USERS);
    let toggle = el(&page, "#toggleView");
    let table = el(&page, ".users-table");
    let cards = el(&page, ".users-cards");

    page.dispatch(Event::click(toggle));
    assert_eq!(page.view_mode(), Some(ViewMode::Cards));
    assert_eq!(page.document().style(table, "display").as_deref(), Some("none"));
    assert_eq!(page.document().style(cards, "display").as_deref(), Some("grid"));
    assert_eq!(page.document().text_content(toggle), "Switch to Table View");

    page.dispatch(Event::click(toggle));
    assert_eq!(page.view_mode(), Some(ViewMode::Table));
    assert_eq!(page.document().style(table, "display").as_deref(), Some("table"));
    assert_eq!(page.document().style(cards, "display").as_deref(), Some("none"));
    assert_eq!(page.document().text_content(toggle), "Switch to Card View");
}

#[test]
fn test_row_hover_scales_and_restores() {
    let mut page = page_from(USERS);
    let row = el(&page, "tr.user-row");

    page.dispatch(Event::mouse_enter(row));
    assert_eq!(page.document().style(row, "transform").as_deref(), Some("scale(1.01)"));
    assert_eq!(page.document().style(row, "transition").as_deref(), Some("transform 0.3s ease"));

    page.dispatch(Event::mouse_leave(row));
    assert_eq!(page.document().style(row, "transform").as_deref(), Some("scale(1)"));
}

#[test]
fn test_search_filters_and_clears() {
    let mut page = page_from(USERS);
    let input = page.search_input().unwrap();

    page.document_mut().set_value(input, "BOB");
    page.dispatch(Event::input(input));
    assert_eq!(visible_rows(&page), 1);

    page.document_mut().set_value(input, "no such user");
    page.dispatch(Event::input(input));
    assert_eq!(visible_rows(&page), 0);

    page.document_mut().set_value(input, "");
    page.dispatch(Event::input(input));
    assert_eq!(visible_rows(&page), 3);

    // Header row is never filtered
    let header = el(&page, "thead tr");
    assert_eq!(page.document().style(header, "display"), None);
}

#[test]
fn test_anchor_links() {
    let mut page = page_from(USERS);

    let known = page.dispatch(Event::click(el(&page, "#jumpToList")));
    assert!(known.default_prevented);
    let request = &page.document().scroll_requests()[0];
    assert_eq!(request.element_id.as_deref(), Some("userList"));
    assert_eq!(request.options.behavior, ScrollBehavior::Smooth);

    let unknown = page.dispatch(Event::click(el(&page, "#jumpToHelp")));
    assert_eq!(unknown.handled, 1);
    assert!(!unknown.default_prevented);
    assert_eq!(page.document().scroll_requests().len(), 1);
}

#[test]
fn test_banner_detached_within_five_and_a_half_seconds() {
    let mut page = page_from(USERS);
    let banner = el(&page, ".alert");

    page.advance(Duration::from_millis(5000));
    assert_eq!(page.document().style(banner, "opacity").as_deref(), Some("0"));
    assert_eq!(page.document().style(banner, "transition").as_deref(), Some("opacity 0.5s ease"));
    assert!(page.document().is_attached(banner));

    page.advance(Duration::from_millis(500));
    assert!(!page.document().is_attached(banner));
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn test_banner_removed_early_is_skipped() {
    let mut page = page_from(USERS);
    let banner = el(&page, ".alert");
    page.document_mut().remove(banner);

    assert_eq!(page.run_until_idle(), 1);
    assert!(!page.document().is_attached(banner));
}

#[test]
fn test_ripple_detached_after_lifetime() {
    let mut page = page_from(USERS);
    let toggle = el(&page, "#toggleView");

    let outcome = page.dispatch(Event::click_at(toggle, 40.0, 130.0));
    assert_eq!(outcome.handled, 2);
    let ripples = page.document().query_within(toggle, &Selector::class("ripple"));
    assert_eq!(ripples.len(), 1);

    page.advance(Duration::from_millis(599));
    assert!(page.document().is_attached(ripples[0]));
    page.advance(Duration::from_millis(1));
    assert!(!page.document().is_attached(ripples[0]));
}

#[test]
fn test_attach_is_idempotent() {
    let mut page = page_from(USERS);
    let before = page.bindings().len();
    let report = page.attach();

    assert!(report.already_attached);
    assert_eq!(page.bindings().len(), before);
    assert_eq!(page.document().query_all(&Selector::class("search-container")).len(), 1);

    // One listener run per click, not two
    let toggle = el(&page, "#toggleView");
    page.dispatch(Event::click(toggle));
    assert_eq!(page.view_mode(), Some(ViewMode::Cards));
}

#[test]
fn test_bundled_browse_scenario() {
    let scenario = Scenario::from_json(include_str!("../../../demos/scenarios/users_browse.json")).unwrap();
    let mut runner = runner_for(USERS);
    let report = runner.run(&scenario).unwrap();

    assert_eq!(report.steps.len(), scenario.steps.len());
    assert!(report.alerts().is_empty());
    assert_eq!(runner.page().view_mode(), Some(ViewMode::Table));
    assert_eq!(visible_rows(runner.page()), 3);
    assert!(runner.page().document().query_all(&Selector::class("alert")).is_empty());
    assert!(runner.page().document().query_all(&Selector::class("ripple")).is_empty());
}

// ============================================================================
// Configuration and Errors
// ============================================================================

#[test]
fn test_custom_labels_apply() {
    let config = BehaviorConfig::from_json(
        r#"{"labels": {"switch_to_cards": "Cards", "switch_to_table": "Table"}}"#,
    )
    .unwrap();
    let doc = MemoryDocument::from_json(USERS).unwrap();
    let mut page = Page::new(doc, RecordingNotifier::new(), config);
    page.attach();

    let toggle = el(&page, "#toggleView");
    page.dispatch(Event::click(toggle));
    assert_eq!(page.document().text_content(toggle), "Table");
}

#[test]
fn test_unknown_target_is_an_error() {
    let mut runner = runner_for(USERS);
    let err = runner
        .run_step(&Step::Click {
            target: "#missing".into(),
            x: None,
            y: None,
        })
        .unwrap_err();
    assert!(matches!(err, PageError::TargetNotFound(ref t) if t == "#missing"));
}

#[test]
fn test_page_without_any_hooks() {
    let doc = MemoryDocument::from_json(r#"{"title": "Empty", "body": [{"tag": "p", "text": "hi"}]}"#).unwrap();
    let mut page = Page::new(doc, RecordingNotifier::new(), BehaviorConfig::default());
    let report = page.attach();

    assert!(report.active().is_empty());
    assert_eq!(report.listeners, 0);
    assert_eq!(page.run_until_idle(), 0);
}
