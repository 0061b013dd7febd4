use flow_form_types::Question;

use super::QuestionBehavior;

/// MultipleChoice and MultiplePictureChoice: a selected option, or a
/// non-empty free-text value when other values are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceBehavior;

impl QuestionBehavior for ChoiceBehavior {
    fn has_value(&self, question: &Question) -> bool {
        if question.options().iter().any(|o| o.selected) {
            return true;
        }

        question.allows_other() && question.other().is_some_and(|o| !o.trim().is_empty())
    }
}

/// OpinionScale and IconRate: one of the numbered options is selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleBehavior;

impl QuestionBehavior for ScaleBehavior {
    fn has_value(&self, question: &Question) -> bool {
        question.options().iter().any(|o| o.selected)
    }
}
