use flow_form_types::{Language, Question};

use super::{QuestionBehavior, require};

/// MultipleText: every field must have been filled in at least once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeBehavior;

impl QuestionBehavior for CompositeBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        let touched = &question.interaction().touched;
        if question
            .subquestions()
            .iter()
            .any(|sub| !touched.contains(&sub.id))
        {
            return Err(language.invalid_prompt.clone());
        }

        require(self.has_value(question), question, language)
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::{QuestionType, Subquestion};

    use super::*;

    #[test]
    fn all_fields_must_be_touched() {
        let language = Language::default();
        let mut question = Question::new(QuestionType::MultipleText, "Your name")
            .required()
            .with_subquestions([Subquestion::new("first", "First"), Subquestion::new("last", "Last")]);
        question.prepare();

        question.set_subanswer("first", "Ada");
        assert!(!CompositeBehavior.is_valid(&question, &language));
        question.set_subanswer("last", "");
        assert!(CompositeBehavior.is_valid(&question, &language));
    }

    #[test]
    fn optional_untouched_is_valid() {
        let language = Language::default();
        let mut question = Question::new(QuestionType::MultipleText, "Your name")
            .with_subquestions([Subquestion::new("first", "First")]);
        question.prepare();
        assert!(CompositeBehavior.is_valid(&question, &language));
    }
}
