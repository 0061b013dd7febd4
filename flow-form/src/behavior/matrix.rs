use flow_form_types::{Language, Question};

use super::{QuestionBehavior, require};

/// Required matrices need a selection in every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixBehavior;

impl QuestionBehavior for MatrixBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if !question.is_required() {
            return Ok(());
        }

        let answered_rows = question.answer().as_map();
        let all_rows = question.rows().iter().all(|row| {
            answered_rows
                .and_then(|entries| entries.get(&row.id))
                .is_some_and(|value| value.has_value())
        });

        if all_rows {
            require(self.has_value(question), question, language)
        } else {
            Err(language.invalid_prompt.clone())
        }
    }
}
