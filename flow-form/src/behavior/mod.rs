//! Per-type validity rules.
//!
//! The engine never looks at type-specific configuration. It asks a
//! [`QuestionBehavior`] whether a question has a value, whether it is valid,
//! and which message to show. Each question type picks a small strategy
//! struct through the [`BehaviorRegistry`](crate::BehaviorRegistry); types
//! only override the rules that differ from the defaults.

mod choice;
mod composite;
mod file;
mod matrix;
mod text;

pub use choice::{ChoiceBehavior, ScaleBehavior};
pub use composite::CompositeBehavior;
pub use file::FileBehavior;
pub use matrix::MatrixBehavior;
pub use text::{
    BaseBehavior, DateBehavior, EmailBehavior, NumberBehavior, SectionBreakBehavior,
    TextBehavior, UrlBehavior,
};

use flow_form_types::{AnswerValue, Language, Question};

/// Validity and answeredness protocol every question type implements.
pub trait QuestionBehavior: Send + Sync {
    /// True if the current input counts as an answer.
    fn has_value(&self, question: &Question) -> bool {
        question.answer().has_value()
    }

    /// Normalize the answer before it is confirmed.
    fn fix_answer(&self, question: &Question) -> AnswerValue {
        question.answer().clone()
    }

    /// Type-specific rule. The error carries a human-readable message.
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        require(self.has_value(question), question, language)
    }

    /// Optional questions without input are always valid.
    fn is_valid(&self, question: &Question, language: &Language) -> bool {
        (!question.is_required() && !self.has_value(question))
            || self.validate(question, language).is_ok()
    }

    /// Whether a renderer should flag the question. Never gates navigation.
    fn show_invalid(&self, question: &Question, language: &Language) -> bool {
        question.interaction().enter_pressed && !self.is_valid(question, language)
    }

    fn error_message(&self, question: &Question, language: &Language) -> Option<String> {
        if self.is_valid(question, language) {
            return None;
        }

        Some(
            self.validate(question, language)
                .err()
                .unwrap_or_else(|| language.invalid_prompt.clone()),
        )
    }
}

/// Required questions need a value.
pub(crate) fn require(has_value: bool, question: &Question, language: &Language) -> Result<(), String> {
    if question.is_required() && !has_value {
        Err(language.invalid_prompt.clone())
    } else {
        Ok(())
    }
}

/// Textual form of a scalar answer.
pub(crate) fn answer_text(answer: &AnswerValue) -> Option<String> {
    match answer {
        AnswerValue::Text(text) => Some(text.clone()),
        AnswerValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
