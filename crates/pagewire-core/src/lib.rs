//! pagewire core library
//!
//! Presentation behaviors for the user registration and user list pages,
//! written against a document capability so they run the same way in a
//! browser binding, in tests, and in the CLI host.
//!
//! ## Behaviors
//!
//! - **Registration form**: validates username, email and full name on
//!   submit, shows one alert listing every problem, and disables the
//!   submit button once the form is accepted
//! - **View toggle**: switches the user list between table and cards
//! - **Row hover**: scales a user row slightly under the pointer
//! - **Auto-dismiss**: fades out and removes banners 5 seconds after load
//! - **Table search**: inserts a search box and filters rows as you type
//! - **Anchor scroll**: smooth-scrolls same-page links to their target
//! - **Ripple**: click feedback on `.btn` controls
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use pagewire_core::{BehaviorConfig, Event, MemoryDocument, Page, RecordingNotifier};
//!
//! let doc = MemoryDocument::from_json(&std::fs::read_to_string("register.json")?)?;
//! let mut page = Page::new(doc, RecordingNotifier::new(), BehaviorConfig::default());
//! page.attach();
//!
//! let form = page.document().by_id("registrationForm").unwrap();
//! let outcome = page.dispatch(Event::submit(form));
//! if outcome.default_prevented {
//!     println!("{}", page.notifier().last().unwrap_or_default());
//! }
//! page.advance(Duration::from_secs(6));
//! ```

pub mod behaviors;
pub mod config;
pub mod dom;
pub mod error;
pub mod event;
pub mod logging;
pub mod notify;
pub mod page;
pub mod scenario;
pub mod timer;
pub mod validation;

// Re-exports
pub use behaviors::{FilterStats, ViewMode};
pub use config::BehaviorConfig;
pub use dom::{Document, ElementId, ElementLocator, MemoryDocument, NodeSpec, Point, Rect, Selector};
pub use dom::memory::PageFixture;
pub use error::{PageError, PageResult};
pub use event::{Dispatch, Event, EventKind, Flow};
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use page::{AttachReport, Page};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, Step, StepOutcome};
pub use timer::{TaskId, TimerQueue};
pub use validation::{validate, Field, RegistrationInput, Rule, ValidationReport, Violation};
