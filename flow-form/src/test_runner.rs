//! Scripted driver for testing forms without a renderer.
//!
//! `TestRunner` plays a form the way a user would: for each active
//! question it enters the scripted answer (or nothing) and presses enter,
//! following jumps until the form can be submitted.
//!
//! # Example
//!
//! ```
//! use flow_form::{FormDefinition, Question, QuestionType, TestRunner};
//!
//! let definition = FormDefinition::new(vec![
//!     Question::new(QuestionType::Text, "Host?").with_id("host").required(),
//!     Question::new(QuestionType::Number, "Port?").with_id("port").required(),
//! ]);
//!
//! let answers = TestRunner::new()
//!     .with_answer("host", "localhost")
//!     .with_answer("port", "8080")
//!     .run(definition)
//!     .unwrap();
//!
//! assert_eq!(answers.get_text("host").unwrap(), "localhost");
//! assert_eq!(answers.get_number("port").unwrap(), 8080.0);
//! ```

use std::collections::HashMap;

use flow_form_types::{AnswerValue, Answers, FormDefinition, FormError, QuestionType};
use tracing::debug;

use crate::Form;

/// A driver that answers questions from pre-configured values.
#[derive(Debug, Clone, Default)]
pub struct TestRunner {
    answers: HashMap<String, AnswerValue>,
}

/// Error type for TestRunner.
#[derive(Debug, thiserror::Error)]
pub enum TestRunError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Missing answer for required question: {0}")]
    MissingAnswer(String),

    #[error("Validation failed for '{id}': {message}")]
    ValidationFailed { id: String, message: String },

    #[error("Question '{0}' keeps coming back, the form does not progress")]
    Stalled(String),

    #[error("Form ended without being completed")]
    NotCompleted,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for question `id`.
    ///
    /// Choice questions take the option value (or a list of them); composite
    /// and matrix questions take a map keyed by subquestion or row id.
    pub fn with_answer(mut self, id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(id.into(), value.into());
        self
    }

    /// Build a form from `definition` and play it.
    pub fn run(&self, definition: FormDefinition) -> Result<Answers, TestRunError> {
        let mut form = Form::new(definition)?;
        self.play(&mut form)
    }

    /// Play `form` to submission and return its answers.
    pub fn play(&self, form: &mut Form) -> Result<Answers, TestRunError> {
        let limit = form.questions().len();
        let mut visits: HashMap<String, usize> = HashMap::new();

        while !form.is_submitted() {
            let Some(question) = form.active_question() else {
                if form.is_completed() {
                    form.submit();
                    break;
                }
                return Err(TestRunError::NotCompleted);
            };

            let id = question.id().to_string();
            let kind = question.kind();
            let required = question.is_required();
            let index = form.active_index();

            let count = visits.entry(id.clone()).or_default();
            *count += 1;
            if *count > limit {
                return Err(TestRunError::Stalled(id));
            }

            match self.answers.get(&id) {
                Some(value) => apply(form, &id, kind, value),
                None if required && kind != QuestionType::SectionBreak => {
                    return Err(TestRunError::MissingAnswer(id));
                }
                None => {}
            }

            if form.is_disabled() {
                form.finish_auto_advance();
                continue;
            }
            if form.active_index() != index || form.active_question_id() != Some(id.as_str()) {
                continue;
            }

            if !form.is_valid(&id) {
                let message = form.error_message(&id).unwrap_or_default();
                return Err(TestRunError::ValidationFailed { id, message });
            }

            form.enter();
            if form.is_disabled() {
                form.finish_auto_advance();
            }
        }

        debug!("Scripted run submitted");
        Ok(form.answers())
    }
}

fn apply(form: &mut Form, id: &str, kind: QuestionType, value: &AnswerValue) {
    match (kind, value) {
        (QuestionType::MultipleText, AnswerValue::Map(fields)) => {
            for (sub_id, text) in fields {
                form.set_subanswer(id, sub_id, text.as_text().unwrap_or_default());
            }
        }
        (QuestionType::Matrix, AnswerValue::Map(rows)) => {
            for (row, cell) in rows {
                match cell {
                    AnswerValue::List(columns) => {
                        for column in columns {
                            form.set_matrix_cell(id, row, column);
                        }
                    }
                    other => {
                        if let Some(column) = other.as_text() {
                            form.set_matrix_cell(id, row, column);
                        }
                    }
                }
            }
        }
        (QuestionType::File, AnswerValue::Files(files)) => {
            form.attach_files(id, files.clone());
        }
        (kind, AnswerValue::Text(choice)) if kind.has_options() => {
            if !form.toggle_option(id, choice) {
                form.set_other(id, choice.clone());
            }
        }
        (kind, AnswerValue::List(choices)) if kind.has_options() => {
            for choice in choices {
                if !form.toggle_option(id, choice) {
                    form.set_other(id, choice.clone());
                }
            }
        }
        (kind, AnswerValue::Number(n)) if kind.is_scale() => {
            form.toggle_option(id, &n.to_string());
        }
        _ => {
            form.set_answer(id, value.clone());
        }
    }
}
