//! # flow-form
//!
//! Navigation engine for conversational forms: one question at a time,
//! with branching, validation gates, progress and timing. Renderer-agnostic.
//!
//! A [`Form`] owns the questions of a [`FormDefinition`]. After every
//! confirmed answer it recomputes the active path (the questions reachable
//! given the current answers and their jump rules), moves to the next
//! question and queues [`FormEvent`]s for the renderer.
//!
//! ## Usage
//!
//! ```
//! use flow_form::{Form, FormDefinition, FormEvent, Jump, Question, QuestionType};
//!
//! let definition = FormDefinition::new(vec![
//!     Question::new(QuestionType::MultipleChoice, "Do you have a pet?")
//!         .with_id("pet")
//!         .required()
//!         .with_choices(["yes", "no"])
//!         .with_jump(Jump::map([("no", "done")])),
//!     Question::new(QuestionType::Text, "What is its name?")
//!         .with_id("name")
//!         .required(),
//!     Question::new(QuestionType::SectionBreak, "Thanks!").with_id("done"),
//! ]);
//!
//! let mut form = Form::new(definition).unwrap();
//! form.toggle_option("pet", "no");
//! form.enter();
//!
//! assert_eq!(form.active_question_id(), Some("done"));
//! assert_eq!(form.num_active_questions(), 2);
//! assert!(form.drain_events().contains(&FormEvent::Answer { id: "pet".into() }));
//! ```
//!
//! ## Question behaviors
//!
//! Validation is delegated to a [`QuestionBehavior`] per question type,
//! looked up in a [`BehaviorRegistry`]. Override a type with
//! [`BehaviorRegistry::register`] and build the form with
//! [`Form::with_registry`].
//!
//! ## Timer
//!
//! With `config.timer` set, the form counts seconds between the start and
//! stop steps. The engine does not own a clock: call [`Form::tick`] once per
//! second, for example from a [`Ticker`] (cargo feature `ticker`, on by
//! default).

// Re-export all types from flow-form-types
pub use flow_form_types::*;

pub mod behavior;
pub use behavior::QuestionBehavior;

mod registry;
pub use registry::BehaviorRegistry;

mod path;
pub use path::{ActivePath, resolve_active_path};

mod event;
pub use event::FormEvent;

mod progress;
pub use progress::Progress;

mod timer;
pub use timer::{Timer, format_elapsed};

mod form;
pub use form::Form;

#[cfg(feature = "ticker")]
mod ticker;
#[cfg(feature = "ticker")]
pub use ticker::Ticker;

// Scripted driver for testing forms without a renderer
mod test_runner;
pub use test_runner::{TestRunError, TestRunner};
