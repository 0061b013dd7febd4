//! Core types for the flow-form crate.
//!
//! This crate provides the presentation-agnostic data of a conversational form:
//! - `FormDefinition` and `FormConfig` - The top-level form structure, loadable from JSON
//! - `Question` and `QuestionType` - Individual questions and their configuration
//! - `AnswerValue` and `Answers` - Answer state and the collected export
//! - `Jump` and `StepRef` - Branching rules and step references
//! - `Language` - User-facing strings and template formatting

mod answer_value;
pub use answer_value::{AnswerValue, FileInfo};

mod answers;
pub use answers::{AnswerError, Answers};

mod step_ref;
pub use step_ref::StepRef;

mod jump;
pub use jump::{Jump, JumpFn, OTHER_KEY, SUBMIT_TARGET};

mod question;
pub use question::{
    Bound, ChoiceOption, DATE_ISO_MASK, DATE_MASK, Interaction, Mask, MatrixColumn, MatrixRow,
    PHONE_US_MASK, Question, QuestionType, Subquestion,
};

mod language;
pub use language::Language;

mod form_definition;
pub use form_definition::{FormConfig, FormDefinition};

mod error;
pub use error::FormError;
