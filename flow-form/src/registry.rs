use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use flow_form_types::QuestionType;

use crate::behavior::{
    BaseBehavior, ChoiceBehavior, CompositeBehavior, DateBehavior, EmailBehavior, FileBehavior,
    MatrixBehavior, NumberBehavior, QuestionBehavior, ScaleBehavior, SectionBreakBehavior,
    TextBehavior, UrlBehavior,
};

static FALLBACK: BaseBehavior = BaseBehavior;

/// Table from question type to the behavior that validates it.
///
/// Types without an entry fall back to [`BaseBehavior`].
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<QuestionType, Arc<dyn QuestionBehavior>>,
}

impl BehaviorRegistry {
    /// An empty registry: every type uses the base rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in behavior for every question type.
    pub fn builtin() -> Self {
        let text: Arc<dyn QuestionBehavior> = Arc::new(TextBehavior);
        let base: Arc<dyn QuestionBehavior> = Arc::new(BaseBehavior);
        let choice: Arc<dyn QuestionBehavior> = Arc::new(ChoiceBehavior);
        let scale: Arc<dyn QuestionBehavior> = Arc::new(ScaleBehavior);

        let mut registry = Self::new();
        for kind in QuestionType::ALL {
            let behavior: Arc<dyn QuestionBehavior> = match kind {
                QuestionType::Text | QuestionType::Password | QuestionType::Phone => text.clone(),
                QuestionType::LongText | QuestionType::Dropdown => base.clone(),
                QuestionType::Email => Arc::new(EmailBehavior),
                QuestionType::Number => Arc::new(NumberBehavior),
                QuestionType::Url => Arc::new(UrlBehavior),
                QuestionType::Date => Arc::new(DateBehavior),
                QuestionType::File => Arc::new(FileBehavior),
                QuestionType::MultipleChoice | QuestionType::MultiplePictureChoice => {
                    choice.clone()
                }
                QuestionType::OpinionScale | QuestionType::IconRate => scale.clone(),
                QuestionType::MultipleText => Arc::new(CompositeBehavior),
                QuestionType::Matrix => Arc::new(MatrixBehavior),
                QuestionType::SectionBreak => Arc::new(SectionBreakBehavior),
            };
            registry.behaviors.insert(kind, behavior);
        }
        registry
    }

    /// Replace the behavior of one type.
    pub fn register(&mut self, kind: QuestionType, behavior: impl QuestionBehavior + 'static) {
        self.behaviors.insert(kind, Arc::new(behavior));
    }

    pub fn with(mut self, kind: QuestionType, behavior: impl QuestionBehavior + 'static) -> Self {
        self.register(kind, behavior);
        self
    }

    pub fn get(&self, kind: QuestionType) -> &dyn QuestionBehavior {
        self.behaviors
            .get(&kind)
            .map_or(&FALLBACK as &dyn QuestionBehavior, |behavior| behavior.as_ref())
    }

    pub fn contains(&self, kind: QuestionType) -> bool {
        self.behaviors.contains_key(&kind)
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.behaviors.keys().map(QuestionType::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("BehaviorRegistry").field("types", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::{Language, Question};

    use super::*;

    struct AlwaysInvalid;

    impl QuestionBehavior for AlwaysInvalid {
        fn validate(&self, _question: &Question, _language: &Language) -> Result<(), String> {
            Err("nope".to_string())
        }
    }

    #[test]
    fn builtin_covers_every_type() {
        let registry = BehaviorRegistry::builtin();
        assert!(QuestionType::ALL.iter().all(|kind| registry.contains(*kind)));
    }

    #[test]
    fn register_overrides_one_type() {
        let registry = BehaviorRegistry::builtin().with(QuestionType::Text, AlwaysInvalid);
        let language = Language::default();
        let text = Question::new(QuestionType::Text, "Name?").with_answer("Ada");
        let long = Question::new(QuestionType::LongText, "Story?").with_answer("Ada");

        assert!(!registry.get(QuestionType::Text).is_valid(&text, &language));
        assert!(registry.get(QuestionType::LongText).is_valid(&long, &language));
    }

    #[test]
    fn empty_registry_falls_back_to_base_rules() {
        let registry = BehaviorRegistry::new();
        let language = Language::default();
        let email = Question::new(QuestionType::Email, "Email?").with_answer("not an email");
        assert!(registry.get(QuestionType::Email).is_valid(&email, &language));
    }
}
